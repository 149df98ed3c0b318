use chrono::{Datelike, Months, NaiveDate};
use log::warn;

use crate::errors::{AmortizationError, Result};
use crate::types::{Period, MONTHLY_PERCENT_DIVISOR, ROUNDING_EPSILON};

/// growth factor of 1 means no interest accrues and the closed forms degenerate
pub(crate) fn is_flat(growth: f64) -> bool {
    (growth - 1.0).abs() <= f64::EPSILON
}

/// monthly growth factor from an annual percentage, e.g. 4.5 -> 1.00375
pub fn growth_factor(annual_percent: f64) -> f64 {
    1.0 + annual_percent / MONTHLY_PERCENT_DIVISOR
}

/// balance after `n` periods of compounding at `growth` with a constant
/// amortizing payment. Signed: keeps going below zero past payoff.
pub fn balance_at_period(principal: f64, growth: f64, payment: f64, n: Period) -> f64 {
    if is_flat(growth) {
        return principal - payment * f64::from(n);
    }

    let compound = growth.powf(f64::from(n));
    if compound.is_infinite() {
        // the steady-state balance decides which way it diverges
        let steady = payment / (growth - 1.0);
        if principal == steady {
            return principal;
        }
        return (principal - steady) * compound;
    }

    principal * compound - payment * (1.0 - compound) / (1.0 - growth)
}

/// real-valued period at which the balance reaches exactly zero
pub fn periods_to_zero(principal: f64, growth: f64, payment: f64) -> Result<f64> {
    if principal <= 0.0 {
        return Ok(0.0);
    }

    let interest = principal * (growth - 1.0);

    if is_flat(growth) {
        if payment <= 0.0 {
            warn!("flat loan with non-positive payment {} never repays", payment);
            return Err(AmortizationError::NonConvergent { payment, interest });
        }
        return Ok(principal / payment);
    }

    // ln argument is 1 - interest / payment, positive only when the payment outruns interest
    if payment <= 0.0 || payment <= interest {
        warn!(
            "payment {} does not cover periodic interest {} on balance {}",
            payment, interest, principal
        );
        return Err(AmortizationError::NonConvergent { payment, interest });
    }

    Ok(-(1.0 + principal * (1.0 - growth) / payment).ln() / growth.ln())
}

/// round a real-valued period count: a remainder above the epsilon is a
/// genuine extra period, anything smaller is floating point residue
pub fn round_periods(periods: f64) -> Result<Period> {
    if periods <= 0.0 {
        return Ok(0);
    }

    let rounded = if periods - periods.floor() > ROUNDING_EPSILON {
        periods.ceil()
    } else {
        periods.floor()
    };

    if !rounded.is_finite() || rounded > f64::from(Period::MAX) {
        warn!("payoff after {} periods does not fit a period count", periods);
        return Err(AmortizationError::DateOutOfRange {
            message: format!("payoff after {} periods", periods),
        });
    }

    Ok(rounded as Period)
}

/// constant repayment (fees included) that clears `principal` in exactly `n` periods
pub fn minimum_repayment(principal: f64, growth: f64, fees: f64, n: Period) -> Result<f64> {
    if n == 0 {
        return Err(AmortizationError::invalid("term must be at least one period"));
    }

    if is_flat(growth) {
        return Ok(fees + principal / f64::from(n));
    }

    let compound = growth.powf(f64::from(n));
    if compound.is_infinite() {
        // an unbounded term only has to service the interest
        return Ok(fees + principal * (growth - 1.0));
    }

    Ok(fees + principal * compound * (1.0 - growth) / (1.0 - compound))
}

/// whole months from `start` to `date`, ignoring the day of month
pub fn months_between(start: NaiveDate, date: NaiveDate) -> i64 {
    i64::from(date.year() - start.year()) * 12 + i64::from(date.month()) - i64::from(start.month())
}

/// advance a date by whole months, clamping to the end of shorter months
pub fn add_months(date: NaiveDate, months: Period) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| AmortizationError::DateOutOfRange {
            message: format!("{} plus {} months", date, months),
        })
}
