use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::errors::{AmortizationError, Result};
use crate::loan::Loan;
use crate::payments::amortization::add_months;
use crate::portfolio::LoanCollection;
use crate::types::{DatePoint, Period, Point};

fn require_stride(stride: Period) -> Result<usize> {
    if stride == 0 {
        return Err(AmortizationError::invalid("plot stride must be at least one period"));
    }
    Ok(stride as usize)
}

/// periods between plot points: half-yearly for short loans, yearly otherwise
pub fn resolution(periods: Period) -> Period {
    if periods <= 120 {
        6
    } else {
        12
    }
}

/// balance sampled at `0, stride, 2 * stride, ...` up to and including `periods`
pub fn amount_owing_series(loan: &Loan, periods: Period, stride: Period) -> Result<Vec<Point>> {
    let step = require_stride(stride)?;
    Ok((0..=periods)
        .step_by(step)
        .map(|x| Point {
            x,
            y: loan.amount_owing(x),
        })
        .collect())
}

/// balance sampled by calendar month from the start date, stopping once the
/// balance drops below one effective repayment (repayment plus extra repayment)
pub fn date_series(loan: &Loan, stride_months: Period) -> Result<Vec<DatePoint>> {
    require_stride(stride_months)?;
    // bounds the walk and rejects loans that never repay
    let end = loan.periods_to_zero()?;
    let repayment = loan.effective_repayment();

    let mut points = Vec::new();
    let mut period: Period = 0;
    while period <= end {
        let date = add_months(loan.start_date(), period)?;
        let owing = loan.amount_owing_at_date(date);
        if owing < repayment {
            break;
        }
        points.push(DatePoint { x: date, y: owing });
        period += stride_months;
    }

    Ok(points)
}

/// calendar year of each sampled point
pub fn year_labels(start: NaiveDate, periods: Period, stride: Period) -> Result<Vec<i32>> {
    let step = require_stride(stride)?;
    (0..=periods)
        .step_by(step)
        .map(|period| add_months(start, period).map(|date| date.year()))
        .collect()
}

/// one line of a chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

/// every loan in a collection sampled on a shared axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub resolution: Period,
    pub labels: Vec<i32>,
    pub series: Vec<Series>,
}

impl Chart {
    /// sample each loan up to the longest payoff, labelled from the earliest start
    pub fn from_collection(loans: &LoanCollection) -> Result<Self> {
        let periods = loans.plot_periods()?;
        let resolution = resolution(periods);
        let start = loans.earliest_start_date()?.start_date();

        let series = loans
            .iter()
            .map(|loan| {
                Ok(Series {
                    name: loan.name().to_string(),
                    points: amount_owing_series(loan, periods, resolution)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            resolution,
            labels: year_labels(start, periods, resolution)?,
            series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::LumpSumCollection;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn flat_loan() -> Loan {
        Loan::new(1_200.0, 1.0, 100.0, 0.0, 0.0, start(), LumpSumCollection::new()).unwrap()
    }

    #[test]
    fn test_resolution() {
        assert_eq!(resolution(12), 6);
        assert_eq!(resolution(120), 6);
        assert_eq!(resolution(121), 12);
    }

    #[test]
    fn test_amount_owing_series() {
        let points = amount_owing_series(&flat_loan(), 12, 6).unwrap();
        assert_eq!(
            points,
            vec![
                Point { x: 0, y: 1_200.0 },
                Point { x: 6, y: 600.0 },
                Point { x: 12, y: 0.0 },
            ]
        );
        assert!(amount_owing_series(&flat_loan(), 12, 0).is_err());
    }

    #[test]
    fn test_date_series_stops_below_repayment() {
        let points = date_series(&flat_loan(), 1).unwrap();

        // 1200 down to 100 is plotted, 0 is below one repayment
        assert_eq!(points.len(), 12);
        assert_eq!(points[0], DatePoint { x: start(), y: 1_200.0 });
        assert_eq!(points[11].y, 100.0);
        assert_eq!(points[11].x, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    }

    #[test]
    fn test_date_series_rejects_non_convergent() {
        let loan = Loan::new(100_000.0, 1.01, 500.0, 0.0, 0.0, start(), LumpSumCollection::new())
            .unwrap();
        assert!(date_series(&loan, 1).is_err());
    }

    #[test]
    fn test_year_labels() {
        let labels = year_labels(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), 24, 6).unwrap();
        assert_eq!(labels, vec![2024, 2025, 2025, 2026, 2026]);
    }

    #[test]
    fn test_chart_from_collection() {
        let mut loans = LoanCollection::new();
        loans.push(flat_loan().with_name("standard"));
        loans.push(
            Loan::new(1_200.0, 1.0, 200.0, 0.0, 0.0, start(), LumpSumCollection::new())
                .unwrap()
                .with_name("extra"),
        );

        let chart = Chart::from_collection(&loans).unwrap();
        assert_eq!(chart.resolution, 6);
        assert_eq!(chart.labels, vec![2024, 2024, 2025]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[1].name, "extra");
        assert_eq!(chart.series[1].points[1].y, 0.0);

        assert!(Chart::from_collection(&LoanCollection::new()).is_err());
    }
}
