//! ISO-8601 week helpers.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Monday of the given ISO week, `None` if the week does not exist in that year.
pub fn iso_week_start(year: i32, week: u32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

/// ISO `(year, week)` containing the given date.
pub fn iso_week_of(d: NaiveDate) -> (i32, u32) {
    let w = d.iso_week();
    (w.year(), w.week())
}

/// The ISO week following `(year, week)`, crossing year boundaries.
pub fn next_iso_week(year: i32, week: u32) -> Option<(i32, u32)> {
    let monday = iso_week_start(year, week)?;
    Some(iso_week_of(monday + Duration::weeks(1)))
}

/// Monday–Friday span of an ISO week, formatted `DD.MM.YYYY`.
pub fn week_span(year: i32, week: u32) -> Option<(String, String)> {
    let monday = iso_week_start(year, week)?;
    let friday = monday + Duration::days(4);
    Some((
        monday.format("%d.%m.%Y").to_string(),
        friday.format("%d.%m.%Y").to_string(),
    ))
}
