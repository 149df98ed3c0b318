use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AmortizationError, Result};
use crate::types::{LumpSumId, Period};

use super::amortization::months_between;

/// one-off payment reducing the balance at a given period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSum {
    pub id: LumpSumId,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    period: Period,
}

impl LumpSum {
    /// create a lump sum with a generated id
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self::with_id(Uuid::new_v4(), date, amount)
    }

    /// create a lump sum with a caller supplied id
    pub fn with_id(id: LumpSumId, date: NaiveDate, amount: f64) -> Self {
        Self {
            id,
            date,
            amount,
            period: 0,
        }
    }

    /// periods since the owning loan's start date
    pub fn period(&self) -> Period {
        self.period
    }

    /// recompute the period against a loan's start date
    pub(crate) fn rebase(&mut self, start_date: NaiveDate) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(AmortizationError::invalid(format!(
                "lump sum {} has a non-finite amount",
                self.id
            )));
        }

        let months = months_between(start_date, self.date);
        self.period = Period::try_from(months).map_err(|_| {
            AmortizationError::invalid(format!(
                "lump sum {} on {} is before the loan start {}",
                self.id, self.date, start_date
            ))
        })?;
        Ok(())
    }
}

/// ordered collection of lump sums, not necessarily sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LumpSumCollection {
    items: Vec<LumpSum>,
}

impl LumpSumCollection {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, lump_sum: LumpSum) {
        self.items.push(lump_sum);
    }

    /// remove a lump sum by id, returning it if present
    pub fn remove(&mut self, id: LumpSumId) -> Option<LumpSum> {
        let index = self.items.iter().position(|l| l.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: LumpSumId) -> Option<&LumpSum> {
        self.items.iter().find(|l| l.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LumpSum> {
        self.items.iter()
    }

    /// stable sort by period ascending
    pub fn sort_by_period(&mut self) {
        self.items.sort_by_key(|l| l.period);
    }

    /// sorted copy, leaving this collection untouched
    pub fn sorted_by_period(&self) -> Self {
        let mut sorted = self.clone();
        sorted.sort_by_period();
        sorted
    }

    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(|l| l.amount).sum()
    }

    /// sum of lump sums falling on `period`
    pub fn amount_at(&self, period: Period) -> f64 {
        self.items
            .iter()
            .filter(|l| l.period == period)
            .map(|l| l.amount)
            .sum()
    }

    pub(crate) fn rebase(&mut self, start_date: NaiveDate) -> Result<()> {
        for lump_sum in &mut self.items {
            lump_sum.rebase(start_date)?;
        }
        Ok(())
    }
}

impl FromIterator<LumpSum> for LumpSumCollection {
    fn from_iter<T: IntoIterator<Item = LumpSum>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<LumpSum>> for LumpSumCollection {
    fn from(items: Vec<LumpSum>) -> Self {
        Self { items }
    }
}

impl IntoIterator for LumpSumCollection {
    type Item = LumpSum;
    type IntoIter = std::vec::IntoIter<LumpSum>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a LumpSumCollection {
    type Item = &'a LumpSum;
    type IntoIter = std::slice::Iter<'a, LumpSum>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = LumpSum::new(date(2025, 1, 1), 1_000.0);
        let b = LumpSum::new(date(2025, 1, 1), 1_000.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_rebase_period() {
        let mut lump_sum = LumpSum::new(date(2026, 3, 1), 5_000.0);
        lump_sum.rebase(date(2024, 1, 15)).unwrap();
        assert_eq!(lump_sum.period(), 26);

        // rebasing again against a different start replaces the period
        lump_sum.rebase(date(2026, 1, 1)).unwrap();
        assert_eq!(lump_sum.period(), 2);
    }

    #[test]
    fn test_rebase_rejects_dates_before_start() {
        let mut lump_sum = LumpSum::new(date(2023, 12, 31), 5_000.0);
        assert!(lump_sum.rebase(date(2024, 1, 1)).is_err());

        let mut nan = LumpSum::new(date(2024, 2, 1), f64::NAN);
        assert!(nan.rebase(date(2024, 1, 1)).is_err());
    }

    #[test]
    fn test_stable_sort_by_period() {
        let start = date(2024, 1, 1);
        let mut lump_sums: LumpSumCollection = vec![
            LumpSum::new(date(2025, 6, 1), 3.0),
            LumpSum::new(date(2024, 6, 1), 1.0),
            LumpSum::new(date(2025, 6, 20), 4.0),
            LumpSum::new(date(2024, 6, 9), 2.0),
        ]
        .into();
        lump_sums.rebase(start).unwrap();

        let sorted = lump_sums.sorted_by_period();
        let amounts: Vec<f64> = sorted.iter().map(|l| l.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0, 4.0]);

        // original order untouched
        assert_eq!(lump_sums.iter().next().unwrap().amount, 3.0);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let base: LumpSumCollection = vec![LumpSum::new(date(2024, 6, 1), 1_000.0)].into();
        let mut scenario = base.clone();
        scenario.push(LumpSum::new(date(2025, 6, 1), 2_000.0));

        assert_eq!(base.len(), 1);
        assert_eq!(scenario.len(), 2);
        assert_eq!(scenario.total_amount(), 3_000.0);
    }

    #[test]
    fn test_remove_by_id() {
        let keep = LumpSum::new(date(2024, 6, 1), 1_000.0);
        let gone = LumpSum::new(date(2024, 7, 1), 2_000.0);
        let gone_id = gone.id;
        let mut lump_sums: LumpSumCollection = vec![keep.clone(), gone].into();

        let removed = lump_sums.remove(gone_id).unwrap();
        assert_eq!(removed.amount, 2_000.0);
        assert!(lump_sums.remove(gone_id).is_none());
        assert_eq!(lump_sums.get(keep.id), Some(&keep));
        assert_eq!(lump_sums.len(), 1);
    }

    #[test]
    fn test_amount_at_period() {
        let mut lump_sums: LumpSumCollection = vec![
            LumpSum::new(date(2024, 3, 1), 100.0),
            LumpSum::new(date(2024, 3, 28), 50.0),
            LumpSum::new(date(2024, 4, 1), 25.0),
        ]
        .into();
        lump_sums.rebase(date(2024, 1, 1)).unwrap();
        assert_eq!(lump_sums.amount_at(2), 150.0);
        assert_eq!(lump_sums.amount_at(3), 25.0);
        assert_eq!(lump_sums.amount_at(4), 0.0);
    }
}
