pub mod category;
pub mod config_value;
pub mod report;
pub mod weekday;

pub use category::Category;
pub use config_value::{ConfigValue, Configuration};
pub use report::{DayEntry, Report, normalize_day_entries, parse_report_id, report_id};
pub use weekday::Weekday;
