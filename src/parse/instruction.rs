use crate::core::currency::CurrencyCode;
use crate::core::entity::EntityName;
use crate::core::instruction::{Direction, Instruction, InstructionSet};
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of logical fields in an instruction record.
pub const FIELD_COUNT: usize = 8;

/// How instruction records are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Field separator, matched literally.
    pub separator: String,
    /// `strftime` pattern for the two date fields.
    pub date_format: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            date_format: "%d %b %Y".to_string(),
        }
    }
}

impl ParserConfig {
    /// How many separator-delimited pieces a single date occupies.
    pub fn date_width(&self) -> usize {
        self.date_format.split(self.separator.as_str()).count()
    }

    /// Raw separator-delimited pieces expected in a record.
    pub fn expected_pieces(&self) -> usize {
        FIELD_COUNT + 2 * (self.date_width() - 1)
    }
}

/// Logical fields of an instruction record, in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Entity,
    Direction,
    Forex,
    Currency,
    InstructionDate,
    SettlementDate,
    Units,
    PricePerUnit,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Entity => "entity",
            Field::Direction => "buy/sell flag",
            Field::Forex => "agreed fx",
            Field::Currency => "currency",
            Field::InstructionDate => "instruction date",
            Field::SettlementDate => "settlement date",
            Field::Units => "units",
            Field::PricePerUnit => "price per unit",
        };
        f.write_str(name)
    }
}

/// Errors arising from parsing one instruction record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {{{line}}} has {found} fields, expected {expected}")]
    FieldCount {
        line: String,
        found: usize,
        expected: usize,
    },
    #[error("line {{{line}}} has invalid {field}: '{value}'")]
    InvalidField {
        line: String,
        field: Field,
        value: String,
    },
}

/// A record parse failure inside a multi-line batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {number}: {source}")]
pub struct BatchParseError {
    /// 1-based line number.
    pub number: usize,
    #[source]
    pub source: ParseError,
}

/// Parse one instruction record.
///
/// Records hold, in order: entity, `B`/`S` flag, agreed fx, currency,
/// instruction date, requested settlement date, units and price per unit.
///
/// # Examples
///
/// ```
/// use settlement_report::parse::instruction::{parse_line, ParserConfig};
/// use rust_decimal_macros::dec;
///
/// let ins = parse_line(
///     "foo B 0.50 SGP 01 Jan 2016 02 Jan 2016 200 100.25",
///     &ParserConfig::default(),
/// ).unwrap();
/// assert_eq!(ins.entity().as_str(), "foo");
/// assert_eq!(ins.value(), dec!(10025));
/// ```
pub fn parse_line(line: &str, config: &ParserConfig) -> Result<Instruction, ParseError> {
    let mut pieces: Vec<&str> = line
        .trim_end_matches(['\r', '\n'])
        .split(config.separator.as_str())
        .collect();
    while pieces.len() > 1 && pieces.last() == Some(&"") {
        pieces.pop();
    }

    let expected = config.expected_pieces();
    if pieces.len() != expected {
        return Err(ParseError::FieldCount {
            line: line.to_string(),
            found: pieces.len(),
            expected,
        });
    }

    let invalid = |field: Field, value: &str| ParseError::InvalidField {
        line: line.to_string(),
        field,
        value: value.to_string(),
    };

    let width = config.date_width();
    let mut rest = pieces.as_slice();
    let mut take = |n: usize| {
        let (head, tail) = rest.split_at(n);
        rest = tail;
        head.join(config.separator.as_str())
    };

    let entity = take(1);
    if entity.trim().is_empty() {
        return Err(invalid(Field::Entity, &entity));
    }

    let flag = take(1);
    let direction = Direction::from_flag(&flag).ok_or_else(|| invalid(Field::Direction, &flag))?;

    let forex_text = take(1);
    let forex = parse_non_negative(&forex_text).ok_or_else(|| invalid(Field::Forex, &forex_text))?;

    let currency = take(1);
    if currency.is_empty() {
        return Err(invalid(Field::Currency, &currency));
    }

    let instruction_text = take(width);
    let instruction_date = NaiveDate::parse_from_str(&instruction_text, &config.date_format)
        .map_err(|_| invalid(Field::InstructionDate, &instruction_text))?;

    let settlement_text = take(width);
    let settlement_date = NaiveDate::parse_from_str(&settlement_text, &config.date_format)
        .map_err(|_| invalid(Field::SettlementDate, &settlement_text))?;

    let units_text = take(1);
    let units: u32 = units_text
        .parse()
        .map_err(|_| invalid(Field::Units, &units_text))?;

    let price_text = take(1);
    let price_per_unit =
        parse_non_negative(&price_text).ok_or_else(|| invalid(Field::PricePerUnit, &price_text))?;

    Ok(Instruction::new(
        EntityName::new(entity),
        direction,
        forex,
        CurrencyCode::new(currency),
        instruction_date,
        settlement_date,
        units,
        price_per_unit,
    ))
}

fn parse_non_negative(text: &str) -> Option<Decimal> {
    text.parse::<Decimal>()
        .ok()
        .filter(|value| *value >= Decimal::ZERO)
}

/// Parse every non-blank line of `text` into an instruction set.
pub fn parse_batch(text: &str, config: &ParserConfig) -> Result<InstructionSet, BatchParseError> {
    let mut set = InstructionSet::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            warn!("skipping blank line {}", index + 1);
            continue;
        }
        let instruction = parse_line(line, config).map_err(|source| BatchParseError {
            number: index + 1,
            source,
        })?;
        set.add(instruction);
    }
    debug!("parsed {} instructions", set.len());
    Ok(set)
}
