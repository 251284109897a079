use crate::report::daily::{DailyReport, EntityReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of an entity's cash flow to rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMetric {
    Incoming,
    Outgoing,
}

impl RankMetric {
    pub fn value(&self, report: &EntityReport) -> Decimal {
        match self {
            RankMetric::Incoming => report.incoming(),
            RankMetric::Outgoing => report.outgoing(),
        }
    }
}

/// Sums across all entities of one daily report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub incoming: Decimal,
    pub outgoing: Decimal,
}

impl DailyReport {
    /// Total incoming and outgoing value for the day.
    pub fn totals(&self) -> DailyTotals {
        self.entity_reports()
            .fold(DailyTotals::default(), |mut totals, (_, report)| {
                totals.incoming += report.incoming();
                totals.outgoing += report.outgoing();
                totals
            })
    }

    /// Entity reports ordered by `metric`, smallest first.
    ///
    /// Equal values are ordered by the uppercase entity name, so the result
    /// is a total order that does not depend on insertion order.
    pub fn ranked(&self, metric: RankMetric) -> Vec<&EntityReport> {
        let mut entries: Vec<_> = self.entity_reports().collect();
        entries.sort_by(|(a_key, a), (b_key, b)| {
            metric
                .value(a)
                .cmp(&metric.value(b))
                .then_with(|| a_key.cmp(b_key))
        });
        entries.into_iter().map(|(_, report)| report).collect()
    }

    /// Entity display names ordered as by [`ranked`](Self::ranked).
    pub fn rank_by(&self, metric: RankMetric) -> Vec<String> {
        self.ranked(metric)
            .into_iter()
            .map(|report| report.entity().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::CurrencyCode;
    use crate::core::entity::EntityName;
    use crate::core::instruction::{Direction, Instruction};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn instruction(entity: &str, direction: Direction, price: Decimal) -> Instruction {
        let date = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
        Instruction::new(
            EntityName::new(entity),
            direction,
            dec!(1),
            CurrencyCode::new("USD"),
            date,
            date,
            1,
            price,
        )
    }

    fn report(entries: &[(&str, Direction, Decimal)]) -> DailyReport {
        let mut report = DailyReport::new();
        for (entity, direction, price) in entries {
            report.add_instruction(&instruction(entity, *direction, *price));
        }
        report
    }

    #[test]
    fn test_totals_sum_all_entities() {
        let r = report(&[
            ("foo", Direction::Sell, dec!(10.5)),
            ("bar", Direction::Sell, dec!(4.5)),
            ("bar", Direction::Buy, dec!(7)),
        ]);
        assert_eq!(
            r.totals(),
            DailyTotals {
                incoming: dec!(15),
                outgoing: dec!(7),
            }
        );
    }

    #[test]
    fn test_empty_report_totals_are_zero() {
        assert_eq!(DailyReport::new().totals(), DailyTotals::default());
        assert!(DailyReport::new().rank_by(RankMetric::Incoming).is_empty());
    }

    #[test]
    fn test_rank_ascending_by_metric() {
        let r = report(&[
            ("big", Direction::Buy, dec!(300)),
            ("small", Direction::Buy, dec!(100)),
            ("mid", Direction::Buy, dec!(200)),
        ]);
        assert_eq!(r.rank_by(RankMetric::Outgoing), vec!["small", "mid", "big"]);
    }

    #[test]
    fn test_ties_broken_by_name_ignoring_case() {
        let r = report(&[
            ("charlie", Direction::Sell, dec!(50)),
            ("Bravo", Direction::Sell, dec!(50)),
            ("alpha", Direction::Sell, dec!(50)),
        ]);
        assert_eq!(
            r.rank_by(RankMetric::Incoming),
            vec!["alpha", "Bravo", "charlie"]
        );
    }

    #[test]
    fn test_entities_without_flow_rank_first() {
        let r = report(&[
            ("seller", Direction::Sell, dec!(10)),
            ("buyer", Direction::Buy, dec!(10)),
        ]);
        assert_eq!(r.rank_by(RankMetric::Incoming), vec!["buyer", "seller"]);
        assert_eq!(r.rank_by(RankMetric::Outgoing), vec!["seller", "buyer"]);
    }
}
