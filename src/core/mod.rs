pub mod currency;
pub mod entity;
pub mod instruction;
