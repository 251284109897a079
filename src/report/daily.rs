use crate::core::entity::{EntityKey, EntityName};
use crate::core::instruction::{Direction, Instruction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Incoming and outgoing totals of one entity on one settlement date.
///
/// Incoming is the value of the entity's sell instructions, outgoing the
/// value of its buy instructions. Both start at zero and only grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    /// First spelling seen for this entity.
    entity: EntityName,
    incoming: Decimal,
    outgoing: Decimal,
}

impl EntityReport {
    pub fn new(entity: EntityName) -> Self {
        Self {
            entity,
            incoming: Decimal::ZERO,
            outgoing: Decimal::ZERO,
        }
    }

    pub fn entity(&self) -> &EntityName {
        &self.entity
    }

    pub fn incoming(&self) -> Decimal {
        self.incoming
    }

    pub fn outgoing(&self) -> Decimal {
        self.outgoing
    }

    /// Book an instruction's value on the side given by its direction.
    pub fn apply(&mut self, direction: Direction, value: Decimal) {
        match direction {
            Direction::Sell => self.incoming += value,
            Direction::Buy => self.outgoing += value,
        }
    }
}

/// Per-entity settlement totals for a single settlement date.
///
/// Entities are keyed case-insensitively and iterate in key order, so the
/// serialized form is stable. Use the ranking methods for a value-ordered view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    entities: BTreeMap<EntityKey, EntityReport>,
}

impl DailyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the value of `instruction` to its entity's totals.
    pub fn add_instruction(&mut self, instruction: &Instruction) {
        let entity = instruction.entity();
        self.entities
            .entry(entity.key())
            .or_insert_with(|| EntityReport::new(entity.clone()))
            .apply(instruction.direction(), instruction.value());
    }

    /// Look up an entity by name, ignoring case.
    pub fn entity(&self, name: &str) -> Option<&EntityReport> {
        self.entities.get(&EntityName::new(name).key())
    }

    pub fn entity_reports(&self) -> impl Iterator<Item = (&EntityKey, &EntityReport)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
