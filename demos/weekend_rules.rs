//! Currency weekend rules example.
//!
//! Shows how the same requested date settles differently for a
//! Monday-Friday currency and a Sunday-Thursday currency, and what happens
//! when a currency has no rule at all.

use chrono::{Days, NaiveDate};
use settlement_report::calendar::resolver::SettlementDateResolver;
use settlement_report::config::parse_properties;
use settlement_report::core::currency::CurrencyCode;

const RULES: &str = "\
# Gulf working week
currency.settlementDays.AED=0,1,2,3,4
currency.settlementDays.SAR=0,1,2,3,4
# settles Tuesdays and Saturdays only
currency.settlementDays.T_AND_S=2,6
";

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  settlement-report: Weekend Rules        ║");
    println!("╚══════════════════════════════════════════╝\n");

    let table = match parse_properties(RULES) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    println!("Rules (no default configured):\n{}", table);

    let resolver = SettlementDateResolver::new(table);
    let monday = NaiveDate::from_ymd_opt(2018, 8, 6).unwrap_or_default();

    for currency in ["AED", "T_AND_S", "USD"] {
        let code = CurrencyCode::new(currency);
        println!("━━━ {} ━━━", code);
        for offset in 0..7 {
            let requested = monday + Days::new(offset);
            match resolver.resolve(requested, &code) {
                Ok(settles) => println!("  {}  →  {}", requested.format("%a %d %b"), settles.format("%a %d %b")),
                Err(e) => {
                    println!("  {}", e);
                    break;
                }
            }
        }
        println!();
    }
}
