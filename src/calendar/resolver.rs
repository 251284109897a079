use crate::calendar::rules::{AllowedDays, BusinessDayRuleTable};
use crate::core::currency::CurrencyCode;
use chrono::{Days, NaiveDate, NaiveDateTime};
use log::debug;
use thiserror::Error;

/// Number of consecutive days scanned before giving up.
pub const SCAN_HORIZON_DAYS: u64 = 7;

/// Errors arising from settlement date resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("currency {currency} unknown and no default settlement days configured")]
    Unconfigured { currency: CurrencyCode },
    #[error("no valid settlement day found for currency {currency} from {requested}")]
    NoValidDay {
        currency: CurrencyCode,
        requested: NaiveDate,
    },
}

/// Moves requested settlement dates onto the next business day of their
/// currency.
///
/// The resolver owns an immutable rule table. To change rules, build a new
/// resolver.
///
/// # Examples
///
/// ```
/// use settlement_report::calendar::resolver::SettlementDateResolver;
/// use settlement_report::calendar::rules::BusinessDayRuleTable;
/// use settlement_report::core::currency::CurrencyCode;
/// use chrono::NaiveDate;
///
/// let resolver = SettlementDateResolver::new(BusinessDayRuleTable::standard());
/// let friday = NaiveDate::from_ymd_opt(2018, 8, 10).unwrap();
/// let sunday = NaiveDate::from_ymd_opt(2018, 8, 12).unwrap();
///
/// assert_eq!(resolver.resolve(friday, &CurrencyCode::new("AED")).unwrap(), sunday);
/// assert_eq!(resolver.resolve(friday, &CurrencyCode::new("USD")).unwrap(), friday);
/// ```
#[derive(Debug, Clone)]
pub struct SettlementDateResolver {
    rules: BusinessDayRuleTable,
}

impl SettlementDateResolver {
    pub fn new(rules: BusinessDayRuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &BusinessDayRuleTable {
        &self.rules
    }

    /// Earliest date on or after `requested` that falls on an allowed
    /// weekday for `currency`, looking at most [`SCAN_HORIZON_DAYS`] ahead.
    pub fn resolve(
        &self,
        requested: NaiveDate,
        currency: &CurrencyCode,
    ) -> Result<NaiveDate, ResolutionError> {
        let allowed = match self.rules.allowed_days(currency) {
            AllowedDays::Explicit(days) | AllowedDays::UsesDefault(days) => days,
            AllowedDays::Unconfigured => {
                return Err(ResolutionError::Unconfigured {
                    currency: currency.clone(),
                })
            }
        };

        let mut candidate = requested;
        for _ in 0..SCAN_HORIZON_DAYS {
            if allowed.allows(candidate) {
                if candidate != requested {
                    debug!("{} settlement moved from {} to {}", currency, requested, candidate);
                }
                return Ok(candidate);
            }
            candidate = match candidate.checked_add_days(Days::new(1)) {
                Some(next) => next,
                None => break,
            };
        }

        Err(ResolutionError::NoValidDay {
            currency: currency.clone(),
            requested,
        })
    }

    /// Like [`resolve`](Self::resolve), discarding the time of day first.
    pub fn resolve_datetime(
        &self,
        requested: NaiveDateTime,
        currency: &CurrencyCode,
    ) -> Result<NaiveDate, ResolutionError> {
        self.resolve(requested.date(), currency)
    }
}
