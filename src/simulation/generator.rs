//! Random instruction batches for load testing and demos.

use crate::core::currency::CurrencyCode;
use crate::core::entity::EntityName;
use crate::core::instruction::{Direction, Instruction, InstructionSet};
use crate::parse::instruction::ParserConfig;
use chrono::{Days, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random instruction batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of instructions to generate.
    pub instruction_count: usize,
    /// Number of distinct entities.
    pub entity_count: usize,
    /// Currencies to draw from.
    pub currencies: Vec<CurrencyCode>,
    /// First possible requested settlement date.
    pub start: NaiveDate,
    /// Requested settlement dates fall in `start .. start + days`.
    pub days: u64,
    /// Maximum units per instruction.
    pub max_units: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            instruction_count: 100,
            entity_count: 10,
            currencies: vec![
                CurrencyCode::new("USD"),
                CurrencyCode::new("GBP"),
                CurrencyCode::new("AED"),
                CurrencyCode::new("SAR"),
            ],
            start: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap_or_default(),
            days: 14,
            max_units: 1_000,
        }
    }
}

/// Generate a random instruction batch.
pub fn generate_batch(config: &BatchConfig) -> InstructionSet {
    let mut rng = rand::thread_rng();
    let mut set = InstructionSet::new();

    if config.entity_count == 0 || config.currencies.is_empty() {
        return set;
    }

    let entities: Vec<EntityName> = (0..config.entity_count)
        .map(|i| EntityName::new(format!("ENTITY-{:03}", i)))
        .collect();

    for _ in 0..config.instruction_count {
        let entity = entities[rng.gen_range(0..entities.len())].clone();
        let currency = config.currencies[rng.gen_range(0..config.currencies.len())].clone();
        let direction = if rng.gen_bool(0.5) {
            Direction::Buy
        } else {
            Direction::Sell
        };

        let offset = rng.gen_range(0..config.days.max(1));
        let settlement = config
            .start
            .checked_add_days(Days::new(offset))
            .unwrap_or(config.start);
        let instruction_date = settlement
            .checked_sub_days(Days::new(rng.gen_range(0..3)))
            .unwrap_or(settlement);

        // fx to 4 places, price to cents
        let forex = Decimal::new(rng.gen_range(1_000..20_000), 4);
        let price = Decimal::new(rng.gen_range(100..1_000_000), 2);
        let units = rng.gen_range(1..=config.max_units.max(1));

        set.add(Instruction::new(
            entity,
            direction,
            forex,
            currency,
            instruction_date,
            settlement,
            units,
            price,
        ));
    }

    set
}

/// Render instructions as records readable by
/// [`parse_batch`](crate::parse::instruction::parse_batch) with `config`.
pub fn render_batch(set: &InstructionSet, config: &ParserConfig) -> String {
    let sep = config.separator.as_str();
    let mut out = String::new();
    for ins in set {
        let fields = [
            ins.entity().to_string(),
            ins.direction().flag().to_string(),
            ins.forex().to_string(),
            ins.currency().to_string(),
            ins.instruction_date().format(&config.date_format).to_string(),
            ins.settlement_date().format(&config.date_format).to_string(),
            ins.units().to_string(),
            ins.price_per_unit().to_string(),
        ];
        out.push_str(&fields.join(sep));
        out.push('\n');
    }
    out
}
