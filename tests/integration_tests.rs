use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use settlement_report::calendar::resolver::{ResolutionError, SettlementDateResolver};
use settlement_report::calendar::rules::BusinessDayRuleTable;
use settlement_report::config::parse_properties;
use settlement_report::core::currency::CurrencyCode;
use settlement_report::core::entity::EntityName;
use settlement_report::core::instruction::{Direction, Instruction, InstructionSet};
use settlement_report::parse::{parse_batch, ParserConfig};
use settlement_report::report::aggregation::{AggregationEngine, AggregationError};
use settlement_report::report::ranking::RankMetric;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn preset(entity: &str, direction: Direction, forex: Decimal, currency: &str, settlement: u32) -> Instruction {
    Instruction::new(
        EntityName::new(entity),
        direction,
        forex,
        CurrencyCode::new(currency),
        date(2016, 1, 1),
        date(2016, 1, settlement),
        200,
        dec!(100.25),
    )
}

/// Six instructions spread over three settlement dates once weekend rules apply.
fn preset_batch() -> InstructionSet {
    vec![
        preset("foo", Direction::Buy, dec!(0.50), "SGP", 2),
        preset("foo", Direction::Buy, dec!(1.02), "EUR", 2),
        preset("foo", Direction::Buy, dec!(1.3), "GBP", 2),
        preset("foo", Direction::Sell, dec!(0.75), "AED", 2),
        preset("bar", Direction::Buy, dec!(1.3), "GBP", 6),
        preset("bar", Direction::Buy, dec!(1.02), "GBP", 2),
    ]
    .into_iter()
    .collect()
}

fn standard_resolver() -> SettlementDateResolver {
    SettlementDateResolver::new(BusinessDayRuleTable::standard())
}

/// Full pipeline: instructions → resolved dates → daily reports → ranks.
#[test]
fn several_entities_several_days() {
    let resolver = standard_resolver();
    let report = AggregationEngine::new(&resolver)
        .aggregate(&preset_batch())
        .unwrap();

    assert_eq!(
        report.dates().collect::<Vec<_>>(),
        vec![date(2016, 1, 3), date(2016, 1, 4), date(2016, 1, 6)]
    );

    // AED settles on Sunday
    let sunday = report.daily(date(2016, 1, 3)).unwrap();
    assert_eq!(sunday.len(), 1);
    assert_eq!(sunday.entity("foo").unwrap().incoming(), dec!(15037.5));
    assert_eq!(sunday.entity("foo").unwrap().outgoing(), Decimal::ZERO);

    // everything else requested for Saturday moves to Monday
    let monday = report.daily(date(2016, 1, 4)).unwrap();
    assert_eq!(monday.len(), 2);
    assert_eq!(monday.entity("foo").unwrap().outgoing(), dec!(56541));
    assert_eq!(monday.entity("bar").unwrap().outgoing(), dec!(20451));
    assert_eq!(monday.rank_by(RankMetric::Outgoing), vec!["bar", "foo"]);
    // neither has incoming, so the name decides
    assert_eq!(monday.rank_by(RankMetric::Incoming), vec!["bar", "foo"]);

    let wednesday = report.daily(date(2016, 1, 6)).unwrap();
    assert_eq!(wednesday.entity("bar").unwrap().outgoing(), dec!(26065));
}

#[test]
fn single_instruction_renders_report() {
    let resolver = standard_resolver();
    let set: InstructionSet = vec![preset("foo", Direction::Buy, dec!(0.50), "SGP", 2)]
        .into_iter()
        .collect();
    let report = AggregationEngine::new(&resolver).aggregate(&set).unwrap();

    let totals = report.daily(date(2016, 1, 4)).unwrap().totals();
    assert_eq!(totals.incoming, Decimal::ZERO);
    assert_eq!(totals.outgoing, dec!(10025));

    assert_eq!(
        report.to_string(),
        "Settlement Report :\n\
         On 04 Jan 2016:\n\
         Incoming: USD0.00\n\
         Incoming entity ranks: foo\n\
         Outgoing: USD10,025.00\n\
         Outgoing entity ranks: foo\n"
    );
}

/// A weekend sell under the default rule books as Monday incoming.
#[test]
fn default_rule_moves_weekend_sell_to_monday() {
    let table = BusinessDayRuleTable::from_pairs(Vec::<(&str, &str)>::new(), Some("1,2,3,4,5"))
        .unwrap();
    let resolver = SettlementDateResolver::new(table);
    let set: InstructionSet = vec![Instruction::new(
        EntityName::new("acme"),
        Direction::Sell,
        dec!(1),
        CurrencyCode::new("XXX"),
        date(2018, 8, 10),
        date(2018, 8, 11),
        1,
        dec!(100),
    )]
    .into_iter()
    .collect();

    let report = AggregationEngine::new(&resolver).aggregate(&set).unwrap();
    let monday = report.daily(date(2018, 8, 13)).unwrap();
    assert_eq!(monday.entity("acme").unwrap().incoming(), dec!(100));
}

#[test]
fn entity_names_collapse_ignoring_case() {
    let resolver = standard_resolver();
    let make = |name: &str| {
        Instruction::new(
            EntityName::new(name),
            Direction::Buy,
            dec!(1),
            CurrencyCode::new("USD"),
            date(2016, 1, 4),
            date(2016, 1, 4),
            1,
            dec!(100),
        )
    };
    let set: InstructionSet = vec![make("foo"), make("Foo")].into_iter().collect();
    let report = AggregationEngine::new(&resolver).aggregate(&set).unwrap();

    let monday = report.daily(date(2016, 1, 4)).unwrap();
    assert_eq!(monday.len(), 1);
    let foo = monday.entity("FOO").unwrap();
    assert_eq!(foo.entity().as_str(), "foo");
    assert_eq!(foo.outgoing(), dec!(200));
}

#[test]
fn duplicate_instruction_counted_once() {
    let resolver = standard_resolver();
    let ins = preset("foo", Direction::Buy, dec!(0.50), "SGP", 2);
    let mut set = InstructionSet::new();
    set.add(ins.clone());
    set.add(ins);

    let report = AggregationEngine::new(&resolver).aggregate(&set).unwrap();
    let monday = report.daily(date(2016, 1, 4)).unwrap();
    assert_eq!(monday.entity("foo").unwrap().outgoing(), dec!(10025));
}

#[test]
fn unknown_currency_without_default_fails_batch() {
    let table = parse_properties("currency.settlementDays.AED=0,1,2,3,4\n").unwrap();
    let resolver = SettlementDateResolver::new(table);

    let err = AggregationEngine::new(&resolver)
        .aggregate(&preset_batch())
        .unwrap_err();
    let AggregationError::Resolution { source, .. } = err;
    assert!(matches!(source, ResolutionError::Unconfigured { .. }));
}

#[test]
fn reconfiguring_builds_new_resolver() {
    let set: InstructionSet = vec![preset("foo", Direction::Sell, dec!(1), "GBP", 8)]
        .into_iter()
        .collect();

    let weekdays = standard_resolver();
    let gbp_fridays_off = SettlementDateResolver::new(
        parse_properties("currency.settlementDays.GBP=1,2,3,4\ncurrency.default=1,2,3,4,5\n")
            .unwrap(),
    );

    let before = AggregationEngine::new(&weekdays).aggregate(&set).unwrap();
    let after = AggregationEngine::new(&gbp_fridays_off).aggregate(&set).unwrap();

    assert_eq!(before.dates().collect::<Vec<_>>(), vec![date(2016, 1, 8)]);
    assert_eq!(after.dates().collect::<Vec<_>>(), vec![date(2016, 1, 11)]);
}

/// Text records through to the rendered report.
#[test]
fn parsed_file_to_report() {
    let text = "\
foo B 0.50 SGP 01 Jan 2016 02 Jan 2016 200 100.25
bar S 0.22 AED 05 Jan 2016 07 Jan 2016 450 150.5

Baz S 1 USD 05 Jan 2016 07 Jan 2016 10 1000.5
";
    let set = parse_batch(text, &ParserConfig::default()).unwrap();
    assert_eq!(set.len(), 3);

    let resolver = standard_resolver();
    let report = AggregationEngine::new(&resolver).aggregate(&set).unwrap();
    let thursday = report.daily(date(2016, 1, 7)).unwrap();
    assert_eq!(thursday.totals().incoming, dec!(24904.5));
    assert_eq!(thursday.rank_by(RankMetric::Incoming), vec!["Baz", "bar"]);

    let rendered = report.to_string();
    assert!(rendered.contains("On 07 Jan 2016:\nIncoming: USD24,904.50\n"));
    assert!(rendered.find("04 Jan 2016").unwrap() < rendered.find("07 Jan 2016").unwrap());
}

#[test]
fn report_serializes_to_json() {
    let resolver = standard_resolver();
    let report = AggregationEngine::new(&resolver)
        .aggregate(&preset_batch())
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["days"]["2016-01-04"]["entities"]["FOO"].is_object());
    let outgoing: Decimal = json["days"]["2016-01-04"]["entities"]["FOO"]["outgoing"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(outgoing, dec!(56541));
}
