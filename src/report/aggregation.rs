use crate::calendar::resolver::{ResolutionError, SettlementDateResolver};
use crate::core::currency::CurrencyCode;
use crate::core::entity::EntityName;
use crate::core::instruction::InstructionSet;
use crate::report::daily::DailyReport;
use crate::report::settlement::SettlementReport;
use chrono::NaiveDate;
use log::info;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors arising from aggregating a batch of instructions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("cannot resolve settlement date for {entity} ({currency}): {source}")]
    Resolution {
        entity: EntityName,
        currency: CurrencyCode,
        #[source]
        source: ResolutionError,
    },
}

/// Builds settlement reports from instruction batches.
///
/// # Algorithm
///
/// 1. Resolve each instruction's settlement date with the resolver.
/// 2. Add its value to the entity's report for that date, on the
///    incoming side for sells and the outgoing side for buys.
///
/// The first resolution failure aborts the batch; no partial report is
/// returned.
pub struct AggregationEngine<'a> {
    resolver: &'a SettlementDateResolver,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(resolver: &'a SettlementDateResolver) -> Self {
        Self { resolver }
    }

    pub fn aggregate(
        &self,
        instructions: &InstructionSet,
    ) -> Result<SettlementReport, AggregationError> {
        let mut days: BTreeMap<NaiveDate, DailyReport> = BTreeMap::new();

        for instruction in instructions {
            let date = self
                .resolver
                .resolve(instruction.settlement_date(), instruction.currency())
                .map_err(|source| AggregationError::Resolution {
                    entity: instruction.entity().clone(),
                    currency: instruction.currency().clone(),
                    source,
                })?;
            days.entry(date).or_default().add_instruction(instruction);
        }

        info!(
            "aggregated {} instructions into {} settlement dates",
            instructions.len(),
            days.len()
        );
        Ok(SettlementReport::new(days))
    }
}
