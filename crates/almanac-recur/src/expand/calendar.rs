//! Calendar arithmetic used by period generation.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::rule::WeekOfMonth;

/// Monday of the week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// The `week`-th `weekday` of a month, or `None` when the month has no such day.
pub(crate) fn nth_weekday_of_month(
    year: i32,
    month: u32,
    week: WeekOfMonth,
    weekday: Weekday,
) -> Option<NaiveDate> {
    match week.nth() {
        Some(n) => NaiveDate::from_weekday_of_month_opt(year, month, weekday, n),
        None => {
            let last = last_day_of_month(year, month)?;
            let back = (7 + last.weekday().num_days_from_monday()
                - weekday.num_days_from_monday())
                % 7;
            last.checked_sub_days(Days::new(u64::from(back)))
        }
    }
}
