//! Loading business-day rule tables from files.
//!
//! Two formats are accepted. Properties text:
//!
//! ```text
//! # AED settles Sunday to Thursday
//! currency.settlementDays.AED=0,1,2,3,4
//! # everything else Monday to Friday
//! currency.default=1,2,3,4,5
//! ```
//!
//! and JSON, chosen by a `.json` file extension:
//!
//! ```json
//! { "currencies": { "AED": "0,1,2,3,4" }, "default": "1,2,3,4,5" }
//! ```

use crate::calendar::rules::{BusinessDayRuleTable, RuleError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key prefix of per-currency rules in properties files.
pub const CURRENCY_KEY_PREFIX: &str = "currency.settlementDays.";
/// Key of the default rule in properties files.
pub const DEFAULT_KEY: &str = "currency.default";

/// Errors arising from loading rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error loading rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON rule file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Rules(#[from] RuleError),
}

/// Rule configuration as it appears in a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    /// Currency code -> comma-separated day numbers.
    #[serde(default)]
    pub currencies: BTreeMap<String, String>,
    #[serde(default)]
    pub default: Option<String>,
}

impl RuleFile {
    pub fn into_table(self) -> Result<BusinessDayRuleTable, RuleError> {
        BusinessDayRuleTable::from_pairs(self.currencies, self.default.as_deref())
    }
}

/// Split a properties line into key and value.
///
/// The key ends at the first `=`, `:` or whitespace. Whitespace around the
/// separator is skipped, and a line holding only a key has an empty value.
fn split_property(line: &str) -> (&str, &str) {
    match line.find(|c: char| c == '=' || c == ':' || c.is_whitespace()) {
        Some(end) => {
            let rest = line[end..].trim_start();
            let rest = rest
                .strip_prefix(['=', ':'])
                .unwrap_or(rest)
                .trim_start();
            (&line[..end], rest)
        }
        None => (line, ""),
    }
}

/// Parse properties text into a rule table.
///
/// Blank lines and lines starting with `#` or `!` are ignored, as are keys
/// other than the currency and default keys. Keys and values are separated
/// by `=`, `:` or whitespace.
pub fn parse_properties(text: &str) -> Result<BusinessDayRuleTable, ConfigError> {
    let mut file = RuleFile::default();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let (key, value) = split_property(line);
        let value = value.trim_end();

        if let Some(currency) = key.strip_prefix(CURRENCY_KEY_PREFIX) {
            file.currencies.insert(currency.to_string(), value.to_string());
        } else if key == DEFAULT_KEY {
            file.default = Some(value.to_string());
        } else {
            debug!("ignoring unrelated key {}", key);
        }
    }
    Ok(file.into_table()?)
}

/// Parse JSON text into a rule table.
pub fn parse_json(text: &str) -> Result<BusinessDayRuleTable, ConfigError> {
    let file: RuleFile = serde_json::from_str(text)?;
    Ok(file.into_table()?)
}

/// Load a rule table from disk, choosing the format by file extension.
pub fn load_rules(path: impl AsRef<Path>) -> Result<BusinessDayRuleTable, ConfigError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let table = if is_json {
        parse_json(&text)?
    } else {
        parse_properties(&text)?
    };
    info!(
        "loaded settlement rules for {} currencies from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}
