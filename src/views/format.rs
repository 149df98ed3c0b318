use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::loan::Loan;
use crate::types::Period;

/// format a decimal amount as `$1,234,567.89`, half away from zero
pub fn currency_decimal(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

/// format an amount as currency; non-finite values are shown as-is
pub fn currency(value: f64) -> String {
    match Decimal::from_f64(value) {
        Some(decimal) => currency_decimal(decimal),
        None => format!("${}", value),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count.abs() == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// human readable span of months, in years and months once past 18 months
pub fn duration(months: i64) -> String {
    let magnitude = months.abs();
    let sign = if months < 0 { "-" } else { "" };

    if magnitude > 18 {
        format!(
            "{}{} {}",
            sign,
            plural(magnitude / 12, "year"),
            plural(magnitude % 12, "month")
        )
    } else {
        format!("{}{}", sign, plural(magnitude, "month"))
    }
}

/// serializable summary of a loan's outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub name: String,
    pub principal: f64,
    pub repayment: f64,
    pub effective_repayment: f64,
    pub fees: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub periods: Period,
    pub duration: String,
    pub lump_sum_count: usize,
    pub total_repayments: f64,
    pub total_interest: f64,
    pub total_interest_display: String,
}

impl LoanSummary {
    pub fn from_loan(loan: &Loan) -> Result<Self> {
        let periods = loan.periods_to_zero()?;
        let total_interest = loan.total_interest()?;

        Ok(Self {
            name: loan.name().to_string(),
            principal: loan.principal(),
            repayment: loan.repayment(),
            effective_repayment: loan.effective_repayment(),
            fees: loan.fees(),
            start_date: loan.start_date(),
            end_date: loan.end_date()?,
            periods,
            duration: duration(i64::from(periods)),
            lump_sum_count: loan.lump_sums().len(),
            total_repayments: loan.total_repayments()?,
            total_interest,
            total_interest_display: currency(total_interest),
        })
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}
