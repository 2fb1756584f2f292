use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use types::Window;

/// Scoreboard windows, computed from local-time calendar boundaries the way
/// players think about them: "today" runs midnight to midnight in the
/// server's timezone, weeks start on Sunday, months and years are calendar
/// months and years.

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(at) => at.with_timezone(&Utc),
        // Midnight can fall into a DST gap; read it as UTC then.
        None => Utc.from_utc_datetime(&naive),
    }
}

fn month_start(mut year: i32, mut month: i32) -> NaiveDate {
    while month < 1 {
        month += 12;
        year -= 1;
    }
    while month > 12 {
        month -= 12;
        year += 1;
    }
    NaiveDate::from_ymd_opt(year, month as u32, 1).expect("normalized month start")
}

/// The calendar day `n` days back: [its midnight, the next midnight).
pub fn days_ago(n: u32) -> Window {
    let day = Local::now().date_naive() - Duration::days(n as i64);
    Window::between(local_midnight(day), local_midnight(day + Duration::days(1)))
}

/// The Sunday-started week `n` weeks back.
pub fn weeks_ago(n: u32) -> Window {
    let today = Local::now().date_naive();
    let days_since_sunday = today.weekday().num_days_from_sunday() as i64;
    let week_start = today - Duration::days(days_since_sunday) - Duration::days(7 * n as i64);
    Window::between(
        local_midnight(week_start),
        local_midnight(week_start + Duration::days(7)),
    )
}

/// The calendar month `n` months back.
pub fn months_ago(n: u32) -> Window {
    let today = Local::now().date_naive();
    let start = month_start(today.year(), today.month() as i32 - n as i32);
    let end = month_start(start.year(), start.month() as i32 + 1);
    Window::between(local_midnight(start), local_midnight(end))
}

/// The calendar year `n` years back.
pub fn years_ago(n: u32) -> Window {
    let today = Local::now().date_naive();
    let start = month_start(today.year() - n as i32, 1);
    let end = month_start(start.year() + 1, 1);
    Window::between(local_midnight(start), local_midnight(end))
}
