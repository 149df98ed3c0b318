use chrono::NaiveDate;
use log::{debug, trace};
use serde::Serialize;

use crate::errors::{AmortizationError, Result};
use crate::payments::amortization::{
    add_months, balance_at_period, minimum_repayment, months_between, periods_to_zero,
    round_periods,
};
use crate::payments::LumpSumCollection;
use crate::types::Period;

/// a single amortization scenario
///
/// Compounds once per period (one calendar month) at a fixed growth factor
/// with a fixed repayment. Lump sums are re-based against the start date and
/// sorted when the loan is constructed; the loan is not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Loan {
    principal: f64,
    interest_rate: f64,
    repayment: f64,
    extra_repayment: f64,
    fees: f64,
    start_date: NaiveDate,
    term: Period,
    lump_sums: LumpSumCollection,
    name: String,
}

/// where and at what cost the balance reaches zero
#[derive(Debug, Clone, Copy, PartialEq)]
struct Payoff {
    periods: Period,
    total_paid: f64,
}

/// one period of the amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPayment {
    pub period: Period,
    pub date: NaiveDate,
    pub opening_balance: f64,
    pub interest: f64,
    pub fees: f64,
    pub lump_sum: f64,
    pub payment: f64,
    pub closing_balance: f64,
}

/// period by period view of a loan up to payoff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationSchedule {
    pub payments: Vec<ScheduledPayment>,
    pub total_payment: f64,
    pub total_interest: f64,
}

impl AmortizationSchedule {
    /// get payment for specific period
    pub fn get_payment(&self, period: Period) -> Option<&ScheduledPayment> {
        self.payments.iter().find(|p| p.period == period)
    }
}

fn require_finite(value: f64, field: &str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AmortizationError::invalid(format!("{} must be a finite number", field)))
    }
}

impl Loan {
    /// create a loan, re-basing and sorting its lump sums against `start_date`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        principal: f64,
        interest_rate: f64,
        repayment: f64,
        extra_repayment: f64,
        fees: f64,
        start_date: NaiveDate,
        mut lump_sums: LumpSumCollection,
    ) -> Result<Self> {
        require_finite(principal, "principal")?;
        require_finite(interest_rate, "interest rate")?;
        require_finite(repayment, "repayment")?;
        require_finite(extra_repayment, "extra repayment")?;
        require_finite(fees, "fees")?;

        if principal <= 0.0 {
            return Err(AmortizationError::invalid(format!(
                "principal must be positive, got {}",
                principal
            )));
        }
        if interest_rate <= 0.0 {
            return Err(AmortizationError::invalid(format!(
                "interest growth factor must be positive, got {}",
                interest_rate
            )));
        }

        lump_sums.rebase(start_date)?;
        lump_sums.sort_by_period();

        debug!(
            "loan: principal {}, growth {}, repayment {} + {}, fees {}, {} lump sums from {}",
            principal,
            interest_rate,
            repayment,
            extra_repayment,
            fees,
            lump_sums.len(),
            start_date
        );

        Ok(Self {
            principal,
            interest_rate,
            repayment,
            extra_repayment,
            fees,
            start_date,
            term: 0,
            lump_sums,
            name: String::new(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// nominal term in periods, used for the minimum repayment only
    pub fn with_term(mut self, term: Period) -> Self {
        self.term = term;
        self
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    pub fn repayment(&self) -> f64 {
        self.repayment
    }

    pub fn extra_repayment(&self) -> f64 {
        self.extra_repayment
    }

    pub fn fees(&self) -> f64 {
        self.fees
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn term(&self) -> Period {
        self.term
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// lump sums sorted by period
    pub fn lump_sums(&self) -> &LumpSumCollection {
        &self.lump_sums
    }

    /// cash paid each period, extra repayment included
    pub fn effective_repayment(&self) -> f64 {
        self.repayment + self.extra_repayment
    }

    /// portion of each repayment left after fees
    pub fn amortizing_payment(&self) -> f64 {
        self.effective_repayment() - self.fees
    }

    /// balance owing after `n` periods, never below zero
    ///
    /// Zero from the payoff period on, so it agrees with the final
    /// installment even when the payoff period was rounded down.
    pub fn amount_owing(&self, n: Period) -> f64 {
        if let Ok(payoff) = self.payoff() {
            if n >= payoff.periods {
                return 0.0;
            }
        }

        let growth = self.interest_rate;
        let payment = self.amortizing_payment();
        let mut balance = self.principal;
        let mut last = 0;

        for lump_sum in self.lump_sums.iter().take_while(|l| l.period() <= n) {
            balance = balance_at_period(balance, growth, payment, lump_sum.period() - last)
                - lump_sum.amount;
            last = lump_sum.period();

            // paid off, stays paid off
            if balance <= 0.0 {
                return 0.0;
            }
        }

        balance_at_period(balance, growth, payment, n - last).max(0.0)
    }

    /// balance owing on a calendar date; dates before the start owe the principal
    pub fn amount_owing_at_date(&self, date: NaiveDate) -> f64 {
        if date < self.start_date {
            return self.principal;
        }

        // chrono's date range spans a few million months, so this saturates only in theory
        let period = Period::try_from(months_between(self.start_date, date)).unwrap_or(Period::MAX);
        self.amount_owing(period)
    }

    /// number of periods until the balance reaches zero
    pub fn periods_to_zero(&self) -> Result<Period> {
        Ok(self.payoff()?.periods)
    }

    /// total cash paid over the life of the loan, fees and lump sums included
    pub fn total_repayments(&self) -> Result<f64> {
        Ok(self.payoff()?.total_paid)
    }

    pub fn total_interest(&self) -> Result<f64> {
        Ok(self.total_repayments()? - self.principal)
    }

    /// date the balance reaches zero
    pub fn end_date(&self) -> Result<NaiveDate> {
        add_months(self.start_date, self.periods_to_zero()?)
    }

    /// repayment needed to clear the principal over `term` periods, ignoring lump sums
    pub fn minimum_repayments(&self) -> Result<f64> {
        minimum_repayment(self.principal, self.interest_rate, self.fees, self.term)
    }

    fn payoff(&self) -> Result<Payoff> {
        let growth = self.interest_rate;
        let payment = self.amortizing_payment();
        let repayment = self.effective_repayment();
        let mut balance = self.principal;
        let mut last: Period = 0;
        let mut total_paid = 0.0;

        for lump_sum in &self.lump_sums {
            let gap = lump_sum.period() - last;

            // the segment may clear the balance before this lump sum is ever paid
            if let Ok(periods) = periods_to_zero(balance, growth, payment).and_then(round_periods) {
                if periods <= gap {
                    return Ok(self.settle(balance, last, periods, total_paid));
                }
            }

            let owing = balance_at_period(balance, growth, payment, gap);
            total_paid += f64::from(gap) * repayment;
            trace!(
                "segment {}..{}: balance {} -> {}, lump sum {}",
                last,
                lump_sum.period(),
                balance,
                owing,
                lump_sum.amount
            );

            if owing - lump_sum.amount <= 0.0 {
                debug!("lump sum {} clears the loan at period {}", lump_sum.id, lump_sum.period());
                return Ok(Payoff {
                    periods: lump_sum.period(),
                    total_paid: total_paid + owing,
                });
            }

            total_paid += lump_sum.amount;
            balance = owing - lump_sum.amount;
            last = lump_sum.period();
        }

        let periods = round_periods(periods_to_zero(balance, growth, payment)?)?;
        if last.checked_add(periods).is_none() {
            return Err(AmortizationError::DateOutOfRange {
                message: format!("payoff {} periods after period {}", periods, last),
            });
        }
        Ok(self.settle(balance, last, periods, total_paid))
    }

    /// close the final segment: full repayments, then the exact residual
    fn settle(&self, balance: f64, last: Period, periods: Period, total_paid: f64) -> Payoff {
        if periods == 0 {
            return Payoff {
                periods: last,
                total_paid,
            };
        }

        let carried = balance_at_period(balance, self.interest_rate, self.amortizing_payment(), periods - 1)
            .max(0.0);
        let final_installment = carried * self.interest_rate + self.fees;
        let payoff = Payoff {
            periods: last + periods,
            total_paid: total_paid
                + f64::from(periods - 1) * self.effective_repayment()
                + final_installment,
        };

        debug!(
            "paid off after {} periods, final installment {}, total {}",
            payoff.periods, final_installment, payoff.total_paid
        );
        payoff
    }

    /// period by period breakdown up to payoff
    pub fn schedule(&self) -> Result<AmortizationSchedule> {
        let end = self.periods_to_zero()?;
        let growth = self.interest_rate;
        let mut payments = Vec::new();

        if self.lump_sums.iter().any(|l| l.period() == 0) {
            let closing_balance = self.amount_owing(0);
            payments.push(ScheduledPayment {
                period: 0,
                date: self.start_date,
                opening_balance: self.principal,
                interest: 0.0,
                fees: 0.0,
                lump_sum: self.principal - closing_balance,
                payment: self.principal - closing_balance,
                closing_balance,
            });
        }

        for period in 1..=end {
            let opening_balance = self.amount_owing(period - 1);
            let interest = opening_balance * (growth - 1.0);
            let scheduled = (opening_balance * growth - self.amortizing_payment()).max(0.0);

            let (closing_balance, lump_sum) = if period == end {
                (0.0, self.lump_sums.amount_at(period).min(scheduled))
            } else {
                (self.amount_owing(period), self.lump_sums.amount_at(period))
            };

            payments.push(ScheduledPayment {
                period,
                date: add_months(self.start_date, period)?,
                opening_balance,
                interest,
                fees: self.fees,
                lump_sum,
                payment: opening_balance + interest + self.fees - closing_balance,
                closing_balance,
            });
        }

        let total_payment = payments.iter().map(|p| p.payment).sum();
        let total_interest = payments.iter().map(|p| p.interest).sum();

        Ok(AmortizationSchedule {
            payments,
            total_payment,
            total_interest,
        })
    }
}
