//! Text rendering of settlement reports.
//!
//! ```text
//! Settlement Report :
//! On 04 Jan 2016:
//! Incoming: USD0.00
//! Incoming entity ranks: foo
//! Outgoing: USD10,025.00
//! Outgoing entity ranks: foo
//! ```

use crate::report::daily::DailyReport;
use crate::report::ranking::RankMetric;
use crate::report::settlement::SettlementReport;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// `strftime` pattern for dates in the rendered report.
pub const REPORT_DATE_FORMAT: &str = "%d %b %Y";

/// Format a USD amount as `USD1,234.50`, rounding half to even at cents.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{}USD{}.{}", sign, group_thousands(whole), cents)
}

fn group_thousands(whole: &str) -> String {
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(REPORT_DATE_FORMAT).to_string()
}

impl fmt::Display for DailyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let totals = self.totals();
        writeln!(f, "Incoming: {}", format_usd(totals.incoming))?;
        writeln!(
            f,
            "Incoming entity ranks: {}",
            self.rank_by(RankMetric::Incoming).join(", ")
        )?;
        writeln!(f, "Outgoing: {}", format_usd(totals.outgoing))?;
        writeln!(
            f,
            "Outgoing entity ranks: {}",
            self.rank_by(RankMetric::Outgoing).join(", ")
        )
    }
}

impl fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settlement Report :")?;
        for (date, daily) in self.iter() {
            writeln!(f, "On {}:", format_date(date))?;
            write!(f, "{}", daily)?;
        }
        Ok(())
    }
}
