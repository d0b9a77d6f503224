//! Civil time in the fixed +07:00 offset (WIB).
//!
//! All due timestamps are produced in this offset and every "day" the
//! handler talks about is a WIB calendar day.

use chrono::{DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike};

pub const WIB_OFFSET_SECS: i32 = 7 * 3600;

const MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

pub fn wib() -> FixedOffset {
    FixedOffset::east_opt(WIB_OFFSET_SECS).expect("+07:00 is a valid offset")
}

pub fn default_due_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).expect("23:59:00 is a valid time")
}

/// `date` at `time`, WIB.
pub fn at(date: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    match wib().from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => dt,
        _ => unreachable!("fixed offsets map local times one-to-one"),
    }
}

/// `date` at 23:59:00 WIB.
pub fn end_of_day(date: NaiveDate) -> DateTime<FixedOffset> {
    at(date, default_due_time())
}

/// [date 00:00:00, date 23:59:59] in WIB.
pub fn day_window(date: NaiveDate) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let start = at(date, NaiveTime::MIN);
    let end = at(date, NaiveTime::from_hms_opt(23, 59, 59).expect("23:59:59 is a valid time"));
    (start, end)
}

/// WIB calendar day of an instant.
pub fn wib_date(instant: &DateTime<FixedOffset>) -> NaiveDate {
    instant.with_timezone(&wib()).date_naive()
}

/// "20 Des 2025, 10.00 WIB"
pub fn format_for_user(instant: &DateTime<FixedOffset>) -> String {
    let local = instant.with_timezone(&wib());
    let month = MONTHS_ID[local.month0() as usize];
    format!(
        "{:02} {} {}, {:02}.{:02} WIB",
        local.day(),
        month,
        local.year(),
        local.hour(),
        local.minute()
    )
}
