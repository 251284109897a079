//! settlement-report CLI
//!
//! Build daily settlement reports from instruction files.
//!
//! # Usage
//!
//! ```bash
//! # Report on an instruction file with the built-in currency rules
//! settlement-report report --input instructions.txt
//!
//! # Use custom currency rules and JSON output
//! settlement-report report --input instructions.txt --config currency.properties --format json
//!
//! # Generate a random instruction file for testing
//! settlement-report generate --instructions 500 --entities 20
//! ```

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use settlement_report::calendar::resolver::SettlementDateResolver;
use settlement_report::calendar::rules::BusinessDayRuleTable;
use settlement_report::config::load_rules;
use settlement_report::core::currency::CurrencyCode;
use settlement_report::parse::{parse_batch, ParserConfig};
use settlement_report::report::aggregation::AggregationEngine;
use settlement_report::report::ranking::RankMetric;
use settlement_report::report::settlement::SettlementReport;
use settlement_report::simulation::generator::{generate_batch, render_batch, BatchConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settlement-report — currency-aware settlement reporting

USAGE:
    settlement-report <COMMAND> [OPTIONS]

COMMANDS:
    report      Resolve settlement dates and report daily totals per entity
    rules       Print the currency settlement rules in effect
    generate    Generate a random instruction file (for testing)
    help        Show this message

OPTIONS (report):
    --input <FILE>          Path to the instruction file
    --config <FILE>         Currency rules (.properties or .json); built-in rules if omitted
    --date-format <FORMAT>  strftime date pattern (default: %d %b %Y)
    --separator <SEP>       Field separator (default: single space)
    --format <FORMAT>       Output format: text (default) or json

OPTIONS (rules):
    --config <FILE>         Currency rules (.properties or .json)

OPTIONS (generate):
    --instructions <N>      Number of instructions (default: 100)
    --entities <N>          Number of entities (default: 10)
    --currencies <LIST>     Comma-separated currency codes (default: USD,GBP,AED,SAR)
    --start <YYYY-MM-DD>    First requested settlement date (default: 2016-01-01)
    --days <N>              Spread of requested settlement dates (default: 14)
    --output <FILE>         Write to file instead of stdout

EXAMPLES:
    settlement-report report --input instructions.txt
    settlement-report report --input trades.csv --separator , --date-format %Y-%m-%d
    settlement-report rules --config currency.properties
    settlement-report generate --instructions 500 --output instructions.txt"#
    );
}

/// JSON output schema for a settlement report.
#[derive(serde::Serialize)]
struct ReportOutput {
    dates: Vec<DailyOutput>,
}

#[derive(serde::Serialize)]
struct DailyOutput {
    date: NaiveDate,
    incoming: String,
    incoming_ranks: Vec<String>,
    outgoing: String,
    outgoing_ranks: Vec<String>,
    entities: Vec<EntityOutput>,
}

#[derive(serde::Serialize)]
struct EntityOutput {
    entity: String,
    incoming: String,
    outgoing: String,
}

fn report_output(report: &SettlementReport) -> ReportOutput {
    let dates = report
        .iter()
        .map(|(date, daily)| {
            let totals = daily.totals();
            DailyOutput {
                date,
                incoming: totals.incoming.to_string(),
                incoming_ranks: daily.rank_by(RankMetric::Incoming),
                outgoing: totals.outgoing.to_string(),
                outgoing_ranks: daily.rank_by(RankMetric::Outgoing),
                entities: daily
                    .ranked(RankMetric::Incoming)
                    .into_iter()
                    .map(|entity| EntityOutput {
                        entity: entity.entity().to_string(),
                        incoming: entity.incoming().to_string(),
                        outgoing: entity.outgoing().to_string(),
                    })
                    .collect(),
            }
        })
        .collect();
    ReportOutput { dates }
}

fn require_value(args: &[String], i: usize, message: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{}", message);
        process::exit(1);
    })
}

fn load_table(config_path: Option<&str>) -> BusinessDayRuleTable {
    match config_path {
        Some(path) => load_rules(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => {
            info!("no rule file given, using built-in currency rules");
            BusinessDayRuleTable::standard()
        }
    }
}

fn cmd_report(args: &[String]) {
    let mut input_path = None;
    let mut config_path = None;
    let mut parser = ParserConfig::default();
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(require_value(args, i, "--input requires a file path"));
            }
            "--config" => {
                i += 1;
                config_path = Some(require_value(args, i, "--config requires a file path"));
            }
            "--date-format" => {
                i += 1;
                parser.date_format = require_value(args, i, "--date-format requires a pattern");
            }
            "--separator" => {
                i += 1;
                parser.separator = require_value(args, i, "--separator requires a value");
                if parser.separator.is_empty() {
                    eprintln!("--separator must not be empty");
                    process::exit(1);
                }
            }
            "--format" => {
                i += 1;
                format = require_value(args, i, "--format requires 'text' or 'json'");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let resolver = SettlementDateResolver::new(load_table(config_path.as_deref()));

    let text = fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });
    let instructions = parse_batch(&text, &parser).unwrap_or_else(|e| {
        eprintln!("Error parsing '{}': {}", path, e);
        process::exit(1);
    });

    let report = AggregationEngine::new(&resolver)
        .aggregate(&instructions)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    if format == "json" {
        let json = serde_json::to_string_pretty(&report_output(&report)).unwrap_or_else(|e| {
            eprintln!("Error serializing report: {}", e);
            process::exit(1);
        });
        println!("{}", json);
    } else {
        print!("{}", report);
    }
}

fn cmd_rules(args: &[String]) {
    let mut config_path = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(require_value(args, i, "--config requires a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    print!("{}", load_table(config_path.as_deref()));
}

fn cmd_generate(args: &[String]) {
    let mut config = BatchConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--instructions" => {
                i += 1;
                config.instruction_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--instructions requires a number");
                        process::exit(1);
                    });
            }
            "--entities" => {
                i += 1;
                config.entity_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--entities requires a number");
                        process::exit(1);
                    });
            }
            "--currencies" => {
                i += 1;
                let list = require_value(args, i, "--currencies requires a comma-separated list");
                config.currencies = list
                    .split(',')
                    .map(|s| CurrencyCode::new(s.trim()))
                    .collect();
            }
            "--start" => {
                i += 1;
                config.start = args
                    .get(i)
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                    .unwrap_or_else(|| {
                        eprintln!("--start requires a date as YYYY-MM-DD");
                        process::exit(1);
                    });
            }
            "--days" => {
                i += 1;
                config.days = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--days requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(require_value(args, i, "--output requires a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let set = generate_batch(&config);
    let text = render_batch(&set, &ParserConfig::default());

    if let Some(path) = output_path {
        fs::write(&path, &text).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        let total: Decimal = set.iter().map(|i| i.value()).sum();
        eprintln!(
            "Generated {} instructions across {} entities (total value {}) → {}",
            set.len(),
            config.entity_count,
            total.round_dp(2),
            path
        );
    } else {
        print!("{}", text);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "report" => cmd_report(rest),
        "rules" => cmd_rules(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
