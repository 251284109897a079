use crate::core::currency::CurrencyCode;
use crate::core::entity::EntityName;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Errors arising from building an instruction out of untrusted fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstructionError {
    #[error("forex rate must not be negative, got {0}")]
    NegativeForex(Decimal),
    #[error("price per unit must not be negative, got {0}")]
    NegativePrice(Decimal),
}

/// Trade direction of an instruction.
///
/// From the reporting side, a sell brings cash in and a buy sends cash out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "B")]
    Buy,
    #[serde(rename = "S")]
    Sell,
}

impl Direction {
    /// Parse the single-letter flag used in instruction records.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "B" => Some(Direction::Buy),
            "S" => Some(Direction::Sell),
            _ => None,
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Direction::Buy => "B",
            Direction::Sell => "S",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// A trade settlement instruction.
///
/// Carries everything needed to resolve the actual settlement date and to
/// value the trade in the reporting currency. Instructions are immutable
/// once created; each gets a unique id so that an [`InstructionSet`] never
/// counts the same instruction twice.
///
/// # Examples
///
/// ```
/// use settlement_report::core::currency::CurrencyCode;
/// use settlement_report::core::entity::EntityName;
/// use settlement_report::core::instruction::{Direction, Instruction};
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let instruction = Instruction::new(
///     EntityName::new("foo"),
///     Direction::Buy,
///     dec!(0.50),
///     CurrencyCode::new("SGP"),
///     NaiveDate::from_ymd_opt(2016, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2016, 1, 2).unwrap(),
///     200,
///     dec!(100.25),
/// );
///
/// assert_eq!(instruction.value(), dec!(10025));
/// ```
///
/// Deserialized instructions go through the same checks as
/// [`Instruction::new`] and always get a fresh id; any `id` in the input is
/// ignored.
#[derive(Debug, Clone, Serialize)]
pub struct Instruction {
    id: Uuid,
    entity: EntityName,
    direction: Direction,
    /// Agreed rate from the instruction currency into USD.
    forex: Decimal,
    currency: CurrencyCode,
    instruction_date: NaiveDate,
    /// Settlement date requested by the client, before business-day rules.
    settlement_date: NaiveDate,
    units: u32,
    price_per_unit: Decimal,
}

impl Instruction {
    /// Create a new instruction.
    ///
    /// # Panics
    ///
    /// Panics if `forex` or `price_per_unit` is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity: EntityName,
        direction: Direction,
        forex: Decimal,
        currency: CurrencyCode,
        instruction_date: NaiveDate,
        settlement_date: NaiveDate,
        units: u32,
        price_per_unit: Decimal,
    ) -> Self {
        assert!(
            forex >= Decimal::ZERO,
            "Instruction forex rate must not be negative, got {}",
            forex
        );
        assert!(
            price_per_unit >= Decimal::ZERO,
            "Instruction price per unit must not be negative, got {}",
            price_per_unit
        );
        Self {
            id: Uuid::new_v4(),
            entity,
            direction,
            forex,
            currency,
            instruction_date,
            settlement_date,
            units,
            price_per_unit,
        }
    }

    /// USD value of the trade: price per unit x forex x units.
    pub fn value(&self) -> Decimal {
        self.price_per_unit * self.forex * Decimal::from(self.units)
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn forex(&self) -> Decimal {
        self.forex
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn instruction_date(&self) -> NaiveDate {
        self.instruction_date
    }

    pub fn settlement_date(&self) -> NaiveDate {
        self.settlement_date
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn price_per_unit(&self) -> Decimal {
        self.price_per_unit
    }
}

/// Instruction fields as they arrive from serialized input, before checks.
#[derive(Debug, Deserialize)]
struct InstructionFields {
    entity: EntityName,
    direction: Direction,
    forex: Decimal,
    currency: CurrencyCode,
    instruction_date: NaiveDate,
    settlement_date: NaiveDate,
    units: u32,
    price_per_unit: Decimal,
}

impl InstructionFields {
    fn validate(self) -> Result<Instruction, InstructionError> {
        if self.forex < Decimal::ZERO {
            return Err(InstructionError::NegativeForex(self.forex));
        }
        if self.price_per_unit < Decimal::ZERO {
            return Err(InstructionError::NegativePrice(self.price_per_unit));
        }
        Ok(Instruction::new(
            self.entity,
            self.direction,
            self.forex,
            self.currency,
            self.instruction_date,
            self.settlement_date,
            self.units,
            self.price_per_unit,
        ))
    }
}

impl<'de> Deserialize<'de> for Instruction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        InstructionFields::deserialize(deserializer)?
            .validate()
            .map_err(serde::de::Error::custom)
    }
}

/// A batch of distinct instructions submitted for reporting.
///
/// Insertion order is kept so that aggregation is reproducible (the first
/// spelling seen for an entity is the one displayed), but an instruction
/// whose id is already present is ignored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstructionSet {
    instructions: Vec<Instruction>,
    #[serde(skip)]
    ids: HashSet<Uuid>,
}

impl InstructionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instruction. Returns `false` if it was already in the set.
    pub fn add(&mut self, instruction: Instruction) -> bool {
        if !self.ids.insert(instruction.id()) {
            return false;
        }
        self.instructions.push(instruction);
        true
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Total value of all instructions in the given direction.
    pub fn total_value(&self, direction: Direction) -> Decimal {
        self.instructions
            .iter()
            .filter(|i| i.direction() == direction)
            .map(|i| i.value())
            .sum()
    }

    /// All unique currencies referenced in this set.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut currencies: Vec<CurrencyCode> = self
            .instructions
            .iter()
            .map(|i| i.currency().clone())
            .collect();
        currencies.sort();
        currencies.dedup();
        currencies
    }
}

impl FromIterator<Instruction> for InstructionSet {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        let mut set = InstructionSet::new();
        for instruction in iter {
            set.add(instruction);
        }
        set
    }
}

impl<'a> IntoIterator for &'a InstructionSet {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_instruction(direction: Direction, forex: Decimal) -> Instruction {
        Instruction::new(
            EntityName::new("foo"),
            direction,
            forex,
            CurrencyCode::new("SGP"),
            date(2016, 1, 1),
            date(2016, 1, 2),
            200,
            dec!(100.25),
        )
    }

    #[test]
    fn test_instruction_value_is_exact() {
        assert_eq!(sample_instruction(Direction::Buy, dec!(0.50)).value(), dec!(10025));
        assert_eq!(sample_instruction(Direction::Buy, dec!(1.02)).value(), dec!(20451));
        assert_eq!(sample_instruction(Direction::Buy, dec!(1.3)).value(), dec!(26065));
        assert_eq!(sample_instruction(Direction::Sell, dec!(0.75)).value(), dec!(15037.5));
    }

    #[test]
    fn test_zero_units_has_zero_value() {
        let ins = Instruction::new(
            EntityName::new("foo"),
            Direction::Sell,
            dec!(1),
            CurrencyCode::new("USD"),
            date(2016, 1, 1),
            date(2016, 1, 2),
            0,
            dec!(12.5),
        );
        assert_eq!(ins.value(), Decimal::ZERO);
    }

    #[test]
    #[should_panic(expected = "must not be negative")]
    fn test_negative_forex_rejected() {
        sample_instruction(Direction::Buy, dec!(-1));
    }

    #[test]
    fn test_deserialize_validates_and_assigns_fresh_id() {
        let original = sample_instruction(Direction::Sell, dec!(0.75));
        let json = serde_json::to_string(&original).unwrap();

        let copy: Instruction = serde_json::from_str(&json).unwrap();
        assert_ne!(copy.id(), original.id());
        assert_eq!(copy.value(), original.value());
        assert_eq!(copy.direction(), Direction::Sell);

        let mut set = InstructionSet::new();
        assert!(set.add(original));
        assert!(set.add(copy));
    }

    #[test]
    fn test_deserialize_rejects_negative_amounts() {
        let json = r#"{
            "entity": "foo", "direction": "B", "forex": "-0.5", "currency": "SGP",
            "instruction_date": "2016-01-01", "settlement_date": "2016-01-02",
            "units": 200, "price_per_unit": "100.25"
        }"#;
        let err = serde_json::from_str::<Instruction>(json).unwrap_err();
        assert!(err.to_string().contains("forex rate must not be negative"));

        let json = json
            .replace("\"-0.5\"", "\"0.5\"")
            .replace("\"100.25\"", "\"-1\"");
        let err = serde_json::from_str::<Instruction>(&json).unwrap_err();
        assert!(err.to_string().contains("price per unit must not be negative"));
    }

    #[test]
    fn test_direction_flags() {
        assert_eq!(Direction::from_flag("B"), Some(Direction::Buy));
        assert_eq!(Direction::from_flag("S"), Some(Direction::Sell));
        assert_eq!(Direction::from_flag("b"), None);
        assert_eq!(Direction::Sell.to_string(), "S");
    }

    #[test]
    fn test_set_ignores_duplicate_instruction() {
        let ins = sample_instruction(Direction::Buy, dec!(0.50));
        let mut set = InstructionSet::new();
        assert!(set.add(ins.clone()));
        assert!(!set.add(ins));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_keeps_equal_but_distinct_instructions() {
        let set: InstructionSet = vec![
            sample_instruction(Direction::Buy, dec!(0.50)),
            sample_instruction(Direction::Buy, dec!(0.50)),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.total_value(Direction::Buy), dec!(20050));
        assert_eq!(set.total_value(Direction::Sell), Decimal::ZERO);
    }

    #[test]
    fn test_set_currencies() {
        let mut set = InstructionSet::new();
        set.add(sample_instruction(Direction::Buy, dec!(1)));
        set.add(sample_instruction(Direction::Sell, dec!(1)));
        assert_eq!(set.currencies(), vec![CurrencyCode::new("SGP")]);
    }
}
