//! Calendar validation for the request tuple.
//!
//! Rules fire in a fixed order: sign check, month range, day-in-month
//! (Gregorian leap rule for February), hour range. The first violated rule
//! names the error.

use crate::{error::InsolationError, model::InsolationRequest};

/// Standard Gregorian rule: divisible by 4 and not by 100, unless by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Day count for a month, `0` for anything outside 1..=12.
pub fn days_in_month(year: i32, month: i32) -> i32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

pub fn check(request: &InsolationRequest) -> Result<(), InsolationError> {
    if request.month < 0 || request.day < 0 || request.hour < 0 {
        return Err(InsolationError::validation(
            "Month, day, and hour must be non-negative values",
        ));
    }

    if !(1..=12).contains(&request.month) {
        return Err(InsolationError::validation("Month must be between 1 and 12"));
    }

    if request.day < 1 || request.day > days_in_month(request.year, request.month) {
        return Err(InsolationError::validation(format!(
            "Invalid day for the month {}. Please enter a valid day.",
            request.month
        )));
    }

    if !(0..=23).contains(&request.hour) {
        return Err(InsolationError::validation("Hour must be between 0 and 23"));
    }

    Ok(())
}
