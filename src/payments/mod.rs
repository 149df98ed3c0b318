pub mod amortization;
pub mod lump_sum;

pub use amortization::{
    add_months, balance_at_period, growth_factor, minimum_repayment, months_between,
    periods_to_zero, round_periods,
};
pub use lump_sum::{LumpSum, LumpSumCollection};
