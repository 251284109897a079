pub mod rule_file;

pub use rule_file::{load_rules, parse_json, parse_properties, ConfigError, RuleFile};
