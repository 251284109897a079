use crate::core::currency::CurrencyCode;
use chrono::{Datelike, Weekday};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Owner name used in errors for the default weekday list.
pub const DEFAULT_OWNER: &str = "default";

/// Errors arising from building a business-day rule table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("cannot parse value for day '{token}' of currency {currency}")]
    InvalidWeekday { currency: String, token: String },
    #[error("day {day} of currency {currency} is outside 0 (Sunday) to 6 (Saturday)")]
    WeekdayOutOfRange { currency: String, day: i64 },
}

/// A set of weekdays, numbered Sunday = 0 through Saturday = 6.
///
/// Set semantics only: duplicates collapse and order is irrelevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Monday to Friday.
    pub const MONDAY_TO_FRIDAY: WeekdaySet = WeekdaySet(0b0011_1110);
    /// Sunday to Thursday, the Gulf working week.
    pub const SUNDAY_TO_THURSDAY: WeekdaySet = WeekdaySet(0b0001_1111);

    pub fn empty() -> Self {
        Self(0)
    }

    /// Build a set from weekdays.
    pub fn from_weekdays(days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut set = Self::empty();
        for day in days {
            set.0 |= 1 << day.num_days_from_sunday();
        }
        set
    }

    /// Parse a comma-separated list of day numbers such as `"0,1,2,3,4"`.
    ///
    /// `owner` names the currency (or [`DEFAULT_OWNER`]) in any error. A
    /// single trailing comma is allowed; an empty list is not.
    pub fn parse(owner: &str, list: &str) -> Result<Self, RuleError> {
        let list = list.trim();
        let list = list.strip_suffix(',').unwrap_or(list);
        let mut set = Self::empty();
        for token in list.split(',') {
            let token = token.trim();
            let day: i64 = token.parse().map_err(|_| RuleError::InvalidWeekday {
                currency: owner.to_string(),
                token: token.to_string(),
            })?;
            if !(0..=6).contains(&day) {
                return Err(RuleError::WeekdayOutOfRange {
                    currency: owner.to_string(),
                    day,
                });
            }
            set.0 |= 1 << day;
        }
        Ok(set)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_sunday()) != 0
    }

    /// Whether the weekday of `date` is in the set.
    pub fn allows(&self, date: impl Datelike) -> bool {
        self.contains(date.weekday())
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Day numbers in ascending order.
    pub fn days(&self) -> Vec<u8> {
        (0..7u8).filter(|d| self.0 & (1 << d) != 0).collect()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days: Vec<String> = self.days().iter().map(|d| d.to_string()).collect();
        f.write_str(&days.join(","))
    }
}

/// Which weekday set applies to a currency, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedDays<'a> {
    /// The currency has its own rule.
    Explicit(&'a WeekdaySet),
    /// The currency is not listed; the default rule applies.
    UsesDefault(&'a WeekdaySet),
    /// Not listed and no default configured.
    Unconfigured,
}

impl<'a> AllowedDays<'a> {
    pub fn days(&self) -> Option<&'a WeekdaySet> {
        match *self {
            AllowedDays::Explicit(days) | AllowedDays::UsesDefault(days) => Some(days),
            AllowedDays::Unconfigured => None,
        }
    }
}

/// Weekdays on which each currency settles.
///
/// Built once from configuration and never mutated afterwards: the builder
/// methods consume the table, and reconfiguring means building a new one.
///
/// # Examples
///
/// ```
/// use settlement_report::calendar::rules::{AllowedDays, BusinessDayRuleTable, WeekdaySet};
/// use settlement_report::core::currency::CurrencyCode;
///
/// let table = BusinessDayRuleTable::from_pairs(
///     [("AED", "0,1,2,3,4")],
///     Some("1,2,3,4,5"),
/// ).unwrap();
///
/// assert_eq!(
///     table.allowed_days(&CurrencyCode::new("AED")),
///     AllowedDays::Explicit(&WeekdaySet::SUNDAY_TO_THURSDAY),
/// );
/// assert_eq!(
///     table.allowed_days(&CurrencyCode::new("USD")),
///     AllowedDays::UsesDefault(&WeekdaySet::MONDAY_TO_FRIDAY),
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessDayRuleTable {
    rules: HashMap<CurrencyCode, WeekdaySet>,
    default: Option<WeekdaySet>,
}

impl BusinessDayRuleTable {
    /// An empty table: every currency is unconfigured.
    pub fn new() -> Self {
        Self::default()
    }

    /// AED and SAR settle Sunday to Thursday, everything else Monday to Friday.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(CurrencyCode::new("AED"), WeekdaySet::SUNDAY_TO_THURSDAY)
            .with_rule(CurrencyCode::new("SAR"), WeekdaySet::SUNDAY_TO_THURSDAY)
            .with_default(WeekdaySet::MONDAY_TO_FRIDAY)
    }

    /// Build from `(currency, "d,d,...")` pairs and an optional default list.
    ///
    /// A currency listed twice keeps its last rule.
    pub fn from_pairs<I, C, L>(pairs: I, default: Option<&str>) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (C, L)>,
        C: AsRef<str>,
        L: AsRef<str>,
    {
        let mut table = Self::new();
        for (currency, list) in pairs {
            let currency = currency.as_ref();
            let days = WeekdaySet::parse(currency, list.as_ref())?;
            table.rules.insert(CurrencyCode::new(currency), days);
        }
        if let Some(list) = default {
            table.default = Some(WeekdaySet::parse(DEFAULT_OWNER, list)?);
        }
        Ok(table)
    }

    pub fn with_rule(mut self, currency: CurrencyCode, days: WeekdaySet) -> Self {
        self.rules.insert(currency, days);
        self
    }

    pub fn with_default(mut self, days: WeekdaySet) -> Self {
        self.default = Some(days);
        self
    }

    /// Look up the weekdays a currency may settle on.
    pub fn allowed_days(&self, currency: &CurrencyCode) -> AllowedDays<'_> {
        match (self.rules.get(currency), &self.default) {
            (Some(days), _) => AllowedDays::Explicit(days),
            (None, Some(days)) => AllowedDays::UsesDefault(days),
            (None, None) => AllowedDays::Unconfigured,
        }
    }

    pub fn default_days(&self) -> Option<&WeekdaySet> {
        self.default.as_ref()
    }

    /// Currencies with an explicit rule, sorted.
    pub fn currencies(&self) -> Vec<&CurrencyCode> {
        let mut currencies: Vec<&CurrencyCode> = self.rules.keys().collect();
        currencies.sort();
        currencies
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for BusinessDayRuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for currency in self.currencies() {
            writeln!(f, "{}: {}", currency, self.rules[currency])?;
        }
        match &self.default {
            Some(days) => writeln!(f, "{}: {}", DEFAULT_OWNER, days),
            None => writeln!(f, "{}: (none)", DEFAULT_OWNER),
        }
    }
}
