pub mod format;
pub mod plot;

pub use format::{currency, duration, LoanSummary};
pub use plot::{amount_owing_series, date_series, resolution, year_labels, Chart, Series};
