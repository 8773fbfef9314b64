mod fetch;
mod naming;

pub use fetch::ReportFetcher;
pub use naming::{format_date, report_date};
