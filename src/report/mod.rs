pub mod aggregation;
pub mod daily;
pub mod format;
pub mod ranking;
pub mod settlement;
