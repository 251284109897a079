use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code.
///
/// Codes are compared exactly as given. The business-day rule table keys
/// its entries by this type, so `"aed"` and `"AED"` are distinct currencies.
///
/// # Examples
///
/// ```
/// use settlement_report::core::currency::CurrencyCode;
///
/// let aed = CurrencyCode::new("AED");
/// let sar = CurrencyCode::new("SAR");
/// assert_ne!(aed, sar);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
