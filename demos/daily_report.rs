//! Daily settlement report example.
//!
//! Parses a handful of instruction records, resolves their settlement
//! dates under the built-in currency rules and prints the ranked report.

use settlement_report::calendar::resolver::SettlementDateResolver;
use settlement_report::calendar::rules::BusinessDayRuleTable;
use settlement_report::parse::{parse_batch, ParserConfig};
use settlement_report::report::aggregation::AggregationEngine;
use settlement_report::report::format::format_usd;
use settlement_report::report::ranking::RankMetric;

const INSTRUCTIONS: &str = "\
foo B 0.50 SGP 01 Jan 2016 02 Jan 2016 200 100.25
bar S 0.22 AED 05 Jan 2016 07 Jan 2016 450 150.5
Foo S 1.02 EUR 05 Jan 2016 08 Jan 2016 120 82.4
baz B 1.3 GBP 06 Jan 2016 09 Jan 2016 75 410
bar B 3.67 SAR 06 Jan 2016 08 Jan 2016 1000 12.5
";

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  settlement-report: Daily Report Example ║");
    println!("╚══════════════════════════════════════════╝\n");

    let instructions = match parse_batch(INSTRUCTIONS, &ParserConfig::default()) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    let resolver = SettlementDateResolver::new(BusinessDayRuleTable::standard());

    println!("━━━ Resolved Settlement Dates ━━━\n");
    for ins in &instructions {
        match resolver.resolve(ins.settlement_date(), ins.currency()) {
            Ok(date) => println!(
                "  {:<4} {} {}  requested {}  settles {}",
                ins.entity(),
                ins.direction(),
                ins.currency(),
                ins.settlement_date(),
                date
            ),
            Err(e) => println!("  {:<4} {}", ins.entity(), e),
        }
    }
    println!();

    let report = match AggregationEngine::new(&resolver).aggregate(&instructions) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    println!("{}", report);

    println!("━━━ Top Incoming Entity Per Day ━━━\n");
    for (date, daily) in report.iter() {
        if let Some(top) = daily.ranked(RankMetric::Incoming).last() {
            println!("  {}  {:<4} {}", date, top.entity(), format_usd(top.incoming()));
        }
    }
}
