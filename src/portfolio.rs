use chrono::NaiveDate;

use crate::errors::{AmortizationError, Result};
use crate::loan::Loan;
use crate::types::Period;

/// independent loan scenarios compared side by side
///
/// The first loan is the current scenario; the rest are frozen comparisons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanCollection {
    loans: Vec<Loan>,
}

impl LoanCollection {
    pub fn new() -> Self {
        Self { loans: Vec::new() }
    }

    pub fn push(&mut self, loan: Loan) {
        self.loans.push(loan);
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Loan> {
        self.loans.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Loan> {
        self.loans.get(index)
    }

    /// the recalculated loan, first by convention
    pub fn current(&self) -> Result<&Loan> {
        self.loans.first().ok_or(AmortizationError::EmptyCollection)
    }

    /// loan with the earliest start date, first one wins ties
    pub fn earliest_start_date(&self) -> Result<&Loan> {
        let mut earliest = self.current()?;
        for loan in &self.loans {
            if loan.start_date() < earliest.start_date() {
                earliest = loan;
            }
        }
        Ok(earliest)
    }

    /// loan with the latest payoff date, first one wins ties
    pub fn latest_end_date(&self) -> Result<&Loan> {
        let mut latest = self.current()?;
        let mut latest_end: NaiveDate = latest.end_date()?;
        for loan in &self.loans {
            let end = loan.end_date()?;
            if end > latest_end {
                latest = loan;
                latest_end = end;
            }
        }
        Ok(latest)
    }

    /// interest saved by the loan at `index` relative to the current loan
    pub fn interest_savings(&self, index: usize) -> Result<f64> {
        let other = self.comparison(index)?;
        Ok(self.current()?.total_interest()? - other.total_interest()?)
    }

    /// months saved by the loan at `index` relative to the current loan, negative when longer
    pub fn time_savings(&self, index: usize) -> Result<i64> {
        let other = self.comparison(index)?;
        Ok(i64::from(self.current()?.periods_to_zero()?) - i64::from(other.periods_to_zero()?))
    }

    /// periods needed to plot every loan to payoff
    pub fn plot_periods(&self) -> Result<Period> {
        let mut periods = None;
        for loan in &self.loans {
            let end = loan.periods_to_zero()?;
            periods = Some(periods.map_or(end, |p: Period| p.max(end)));
        }
        periods.ok_or(AmortizationError::EmptyCollection)
    }

    fn comparison(&self, index: usize) -> Result<&Loan> {
        self.loans.get(index).ok_or_else(|| {
            AmortizationError::invalid(format!(
                "no loan at index {} in a collection of {}",
                index,
                self.loans.len()
            ))
        })
    }
}

impl FromIterator<Loan> for LoanCollection {
    fn from_iter<T: IntoIterator<Item = Loan>>(iter: T) -> Self {
        Self {
            loans: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LoanCollection {
    type Item = &'a Loan;
    type IntoIter = std::slice::Iter<'a, Loan>;

    fn into_iter(self) -> Self::IntoIter {
        self.loans.iter()
    }
}
