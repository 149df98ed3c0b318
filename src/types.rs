use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a lump sum
pub type LumpSumId = Uuid;

/// index of a compounding period, one calendar month each
pub type Period = u32;

/// fractional periods above this are rounded up, anything at or below is dropped
pub const ROUNDING_EPSILON: f64 = 1e-3;

/// annual percentage to monthly growth factor: percent (/100) and monthly (/12) in one constant
pub const MONTHLY_PERCENT_DIVISOR: f64 = 1200.0;

/// plot point keyed by period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: Period,
    pub y: f64,
}

/// plot point keyed by calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatePoint {
    pub x: NaiveDate,
    pub y: f64,
}
