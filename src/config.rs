use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AmortizationError, Result};
use crate::loan::Loan;
use crate::payments::amortization::{growth_factor, minimum_repayment};
use crate::payments::{LumpSum, LumpSumCollection};
use crate::types::Period;

/// loan inputs as entered by a user, annual rate in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanConfig {
    #[serde(default)]
    pub name: String,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: Period,
    /// defaults to the minimum repayment for the term
    #[serde(default)]
    pub repayment: Option<f64>,
    #[serde(default)]
    pub extra_repayment: f64,
    #[serde(default)]
    pub fees: f64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub lump_sums: Vec<LumpSumConfig>,
}

/// lump sum entry, id generated when absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumpSumConfig {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub date: NaiveDate,
    pub amount: f64,
}

impl LumpSumConfig {
    fn to_lump_sum(&self) -> LumpSum {
        match self.id {
            Some(id) => LumpSum::with_id(id, self.date, self.amount),
            None => LumpSum::new(self.date, self.amount),
        }
    }
}

impl LoanConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn growth_factor(&self) -> f64 {
        growth_factor(self.annual_rate_percent)
    }

    /// build the loan described by this configuration
    pub fn build(&self) -> Result<Loan> {
        let growth = self.growth_factor();
        let repayment = match self.repayment {
            Some(repayment) => repayment,
            None => minimum_repayment(self.principal, growth, self.fees, self.term_months)?,
        };
        let lump_sums = self.lump_sums.iter().map(LumpSumConfig::to_lump_sum).collect();

        Ok(Loan::new(
            self.principal,
            growth,
            repayment,
            self.extra_repayment,
            self.fees,
            self.start_date,
            lump_sums,
        )?
        .with_term(self.term_months)
        .with_name(self.name.clone()))
    }
}

/// builder for loans
#[derive(Debug, Clone, Default)]
pub struct LoanBuilder {
    name: Option<String>,
    principal: Option<f64>,
    growth: Option<f64>,
    repayment: Option<f64>,
    extra_repayment: f64,
    fees: f64,
    term_months: Option<Period>,
    start_date: Option<NaiveDate>,
    lump_sums: LumpSumCollection,
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn principal(mut self, principal: f64) -> Self {
        self.principal = Some(principal);
        self
    }

    /// annual rate in percent, compounded monthly
    pub fn annual_rate(mut self, percent: f64) -> Self {
        self.growth = Some(growth_factor(percent));
        self
    }

    /// periodic growth factor, e.g. 1.00375
    pub fn growth_factor(mut self, growth: f64) -> Self {
        self.growth = Some(growth);
        self
    }

    pub fn repayment(mut self, repayment: f64) -> Self {
        self.repayment = Some(repayment);
        self
    }

    pub fn extra_repayment(mut self, extra: f64) -> Self {
        self.extra_repayment = extra;
        self
    }

    pub fn fees(mut self, fees: f64) -> Self {
        self.fees = fees;
        self
    }

    pub fn term_months(mut self, months: Period) -> Self {
        self.term_months = Some(months);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn lump_sum(mut self, date: NaiveDate, amount: f64) -> Self {
        self.lump_sums.push(LumpSum::new(date, amount));
        self
    }

    /// copy of a shared base list, so scenarios never alias each other
    pub fn lump_sums(mut self, lump_sums: &LumpSumCollection) -> Self {
        self.lump_sums = lump_sums.clone();
        self
    }

    /// build starting today when no start date was given
    pub fn build(self) -> Result<Loan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    /// build with explicit time provider for the default start date
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<Loan> {
        let principal = self
            .principal
            .ok_or_else(|| AmortizationError::invalid("principal is required"))?;
        let growth = self.growth.unwrap_or(1.0);
        let start_date = self
            .start_date
            .unwrap_or_else(|| time_provider.now().date_naive());

        let repayment = match (self.repayment, self.term_months) {
            (Some(repayment), _) => repayment,
            (None, Some(term)) => minimum_repayment(principal, growth, self.fees, term)?,
            (None, None) => {
                return Err(AmortizationError::invalid(
                    "either a repayment or a term is required",
                ))
            }
        };

        let loan = Loan::new(
            principal,
            growth,
            repayment,
            self.extra_repayment,
            self.fees,
            start_date,
            self.lump_sums,
        )?
        .with_term(self.term_months.unwrap_or(0));

        Ok(match self.name {
            Some(name) => loan.with_name(name),
            None => loan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    const JSON: &str = r#"{
        "name": "home",
        "principal": 300000,
        "annual_rate_percent": 4.5,
        "term_months": 360,
        "start_date": "2024-01-01",
        "lump_sums": [
            { "date": "2029-01-15", "amount": 50000 },
            { "id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "date": "2026-01-01", "amount": 0 }
        ]
    }"#;

    #[test]
    fn test_config_from_json() {
        let config = LoanConfig::from_json(JSON).unwrap();
        assert_eq!(config.name, "home");
        assert_eq!(config.repayment, None);
        assert_eq!(config.fees, 0.0);
        assert_eq!(config.lump_sums.len(), 2);
        assert_abs_diff_eq!(config.growth_factor(), 1.00375, epsilon = 1e-12);
    }

    #[test]
    fn test_config_builds_loan_with_minimum_repayment() {
        let loan = LoanConfig::from_json(JSON).unwrap().build().unwrap();
        assert_eq!(loan.name(), "home");
        assert_eq!(loan.term(), 360);
        assert_abs_diff_eq!(loan.repayment(), 1520.06, epsilon = 0.01);

        let ids: Vec<Uuid> = loan.lump_sums().iter().map(|l| l.id).collect();
        assert!(ids.contains(&Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()));
        assert_eq!(loan.lump_sums().iter().last().unwrap().period(), 60);
        assert!(loan.periods_to_zero().unwrap() < 360);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = LoanConfig::from_json(JSON).unwrap();
        let again = LoanConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            LoanConfig::from_json(r#"{ "principal": "lots" }"#),
            Err(AmortizationError::Config(_))
        ));
    }

    #[test]
    fn test_builder_with_time_defaults_start_date() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap(),
        ));

        let loan = LoanBuilder::new()
            .principal(1_200.0)
            .repayment(100.0)
            .build_with_time(&time)
            .unwrap();

        assert_eq!(loan.start_date(), NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        assert_eq!(loan.interest_rate(), 1.0);
        assert_eq!(loan.periods_to_zero().unwrap(), 12);
    }

    #[test]
    fn test_builder_term_sets_repayment() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let loan = LoanBuilder::new()
            .name("thirty years")
            .principal(300_000.0)
            .annual_rate(4.5)
            .term_months(360)
            .start_date(start)
            .lump_sum(NaiveDate::from_ymd_opt(2029, 1, 1).unwrap(), 50_000.0)
            .build()
            .unwrap();

        assert_eq!(loan.name(), "thirty years");
        assert_abs_diff_eq!(loan.minimum_repayments().unwrap(), loan.repayment(), epsilon = 1e-9);
        assert!(loan.periods_to_zero().unwrap() < 360);
    }

    #[test]
    fn test_builder_requires_principal_and_repayment() {
        assert!(LoanBuilder::new().repayment(100.0).build().is_err());
        assert!(LoanBuilder::new().principal(1_000.0).build().is_err());
    }

    #[test]
    fn test_builder_copies_shared_lump_sums() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut base = LumpSumCollection::new();
        base.push(LumpSum::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), 1_000.0));

        let loan = LoanBuilder::new()
            .principal(10_000.0)
            .growth_factor(1.005)
            .repayment(500.0)
            .start_date(start)
            .lump_sums(&base)
            .build()
            .unwrap();

        base.push(LumpSum::new(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), 1_000.0));
        assert_eq!(loan.lump_sums().len(), 1);
        assert_eq!(loan.lump_sums().iter().next().unwrap().period(), 12);
    }
}
