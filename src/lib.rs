//! # settlement-report
//!
//! Currency-aware settlement date resolution and daily settlement reporting.
//!
//! Given a batch of trade instructions, this crate moves each requested
//! settlement date onto the next business day of its currency, groups the
//! trades by settlement date and counter-entity, and ranks entities by
//! incoming and outgoing value.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: instructions, currencies, entities
//! - **calendar** — Business-day rule tables and settlement date resolution
//! - **report** — Aggregation into daily reports, ranking and rendering
//! - **parse** — Instruction record parsing
//! - **config** — Loading rule tables from properties or JSON files
//! - **simulation** — Random instruction batches for load testing

pub mod calendar;
pub mod config;
pub mod core;
pub mod parse;
pub mod report;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::calendar::resolver::{ResolutionError, SettlementDateResolver};
    pub use crate::calendar::rules::{BusinessDayRuleTable, WeekdaySet};
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::entity::EntityName;
    pub use crate::core::instruction::{Direction, Instruction, InstructionSet};
    pub use crate::report::aggregation::{AggregationEngine, AggregationError};
    pub use crate::report::daily::{DailyReport, EntityReport};
    pub use crate::report::ranking::{DailyTotals, RankMetric};
    pub use crate::report::settlement::SettlementReport;
}
