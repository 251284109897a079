use crate::report::daily::DailyReport;
use crate::report::ranking::DailyTotals;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Daily reports for every resolved settlement date, in date order.
///
/// Produced by the aggregation engine and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    days: BTreeMap<NaiveDate, DailyReport>,
}

impl SettlementReport {
    pub(crate) fn new(days: BTreeMap<NaiveDate, DailyReport>) -> Self {
        Self { days }
    }

    /// The report for a settlement date, if anything settles that day.
    pub fn daily(&self, date: NaiveDate) -> Option<&DailyReport> {
        self.days.get(&date)
    }

    /// Settlement dates, earliest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Daily reports in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &DailyReport)> {
        self.days.iter().map(|(date, report)| (*date, report))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Totals over every date in the report.
    pub fn grand_totals(&self) -> DailyTotals {
        self.days
            .values()
            .map(DailyReport::totals)
            .fold(DailyTotals::default(), |mut acc, day| {
                acc.incoming += day.incoming;
                acc.outgoing += day.outgoing;
                acc
            })
    }
}
