use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

use crate::models::conversation::PatientKind;
use crate::models::fields::Field;
use crate::models::intent::FlowIntent;
use crate::models::AppointmentDraft;

pub const OPENING_HOUR: u32 = 9;
pub const CLOSING_HOUR: u32 = 17;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("that time is outside our hours. We're open Monday to Saturday, 9:00 AM to 5:00 PM")]
    OutOfHours,

    #[error("we can only book appointments up to {max_days} days ahead, and not in the past")]
    OutOfWindow { max_days: i64 },

    #[error("missing required field: {0}")]
    Incomplete(&'static str),

    #[error("couldn't understand the {0}")]
    Unparseable(&'static str),

    #[error("that phone number doesn't match the one on file for this customer ID")]
    IdentityMismatch,
}

/// Appointments run Monday through Saturday, 09:00 inclusive to 17:00
/// exclusive.
pub fn business_hours(date: NaiveDate, time: NaiveTime) -> Result<(), ValidationError> {
    if date.weekday() == Weekday::Sun {
        return Err(ValidationError::OutOfHours);
    }
    let open = NaiveTime::from_hms_opt(OPENING_HOUR, 0, 0).unwrap();
    let close = NaiveTime::from_hms_opt(CLOSING_HOUR, 0, 0).unwrap();
    if time < open || time >= close {
        return Err(ValidationError::OutOfHours);
    }
    Ok(())
}

/// The requested date must not be in the past and must fall within
/// `max_days` of today.
pub fn booking_window(
    date: NaiveDate,
    today: NaiveDate,
    max_days: i64,
) -> Result<(), ValidationError> {
    if date < today || date > today + Duration::days(max_days) {
        return Err(ValidationError::OutOfWindow { max_days });
    }
    Ok(())
}

/// Every required field for the intent must be known. Returns the first
/// missing field in prompt order.
pub fn complete(
    draft: &AppointmentDraft,
    intent: FlowIntent,
    kind: PatientKind,
) -> Result<(), ValidationError> {
    for field in Field::required_for(intent, kind) {
        let known = match field {
            Field::PatientKind => kind != PatientKind::Unset,
            other => draft.has(*other),
        };
        if !known {
            return Err(ValidationError::Incomplete(field.as_str()));
        }
    }
    Ok(())
}

/// Phone numbers are compared digits-only.
pub fn phones_match(on_file: &str, supplied: &str) -> bool {
    let digits = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
    digits(on_file) == digits(supplied)
}

pub fn normalize_phone(text: &str) -> Result<String, ValidationError> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 7 {
        return Err(ValidationError::Unparseable("phone number"));
    }
    Ok(digits)
}

/// Accepts "11:00 AM", "11am", "2:15 pm", 24-hour "14:30", and bare hours.
pub fn normalize_time(text: &str) -> Result<NaiveTime, ValidationError> {
    let cleaned = text.trim().to_lowercase().replace('.', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(ValidationError::Unparseable("time"));
    }

    let (body, meridiem) = if let Some(rest) = cleaned.strip_suffix("am") {
        (rest.trim(), Some(false))
    } else if let Some(rest) = cleaned.strip_suffix("pm") {
        (rest.trim(), Some(true))
    } else {
        (cleaned, None)
    };

    let (hour_str, minute_str) = match body.split_once(':') {
        Some((h, m)) => (h.trim(), m.trim()),
        None => (body, "0"),
    };

    let hour: u32 = hour_str
        .parse()
        .map_err(|_| ValidationError::Unparseable("time"))?;
    let minute: u32 = minute_str
        .parse()
        .map_err(|_| ValidationError::Unparseable("time"))?;

    let hour = match meridiem {
        Some(pm) => {
            if hour == 0 || hour > 12 {
                return Err(ValidationError::Unparseable("time"));
            }
            (hour % 12) + if pm { 12 } else { 0 }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ValidationError::Unparseable("time"))
}

/// Accepts ISO dates, DD/MM/YYYY, month-name phrasings ("Jan 10",
/// "10th January 2026"), relative words, and bare day numbers.
pub fn normalize_date(text: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return Err(ValidationError::Unparseable("date"));
    }

    if lower.contains("tomorrow") {
        return Ok(today + Duration::days(1));
    }
    if lower.contains("today") {
        return Ok(today);
    }
    if lower.contains("next week") {
        return Ok(today + Duration::days(7));
    }

    let tokens: Vec<String> = lower
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '/' && c != '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    // Explicit numeric formats first.
    for token in &tokens {
        for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(token, fmt) {
                return Ok(date);
            }
        }
    }

    if let Some(date) = parse_month_name(&tokens, today) {
        return Ok(date);
    }

    // A lone day number means "the next time that day of the month occurs".
    for token in &tokens {
        if let Some(day) = parse_day_number(token) {
            if let Some(date) = next_occurrence_of_day(day, today) {
                return Ok(date);
            }
        }
    }

    Err(ValidationError::Unparseable("date"))
}

const MONTHS: [(&str, u32); 12] = [
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

fn parse_month_name(tokens: &[String], today: NaiveDate) -> Option<NaiveDate> {
    let month_at = |i: usize| -> Option<u32> {
        MONTHS
            .iter()
            .find(|(prefix, _)| tokens[i].starts_with(prefix))
            .map(|(_, n)| *n)
    };

    for (i, _) in tokens.iter().enumerate() {
        let Some(month) = month_at(i) else { continue };

        // Day may sit on either side of the month word.
        let day = tokens
            .get(i + 1)
            .and_then(|t| parse_day_number(t))
            .or_else(|| i.checked_sub(1).and_then(|j| parse_day_number(&tokens[j])))?;

        // An explicit 4-digit year anywhere nearby wins; otherwise infer,
        // rolling a past date into next year.
        let year = tokens
            .iter()
            .find_map(|t| t.parse::<i32>().ok().filter(|y| (2000..3000).contains(y)));

        return match year {
            Some(y) => NaiveDate::from_ymd_opt(y, month, day),
            None => {
                let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)?;
                if candidate < today {
                    NaiveDate::from_ymd_opt(today.year() + 1, month, day)
                } else {
                    Some(candidate)
                }
            }
        };
    }
    None
}

/// "10", "10th", "3rd" → 10, 10, 3.
fn parse_day_number(token: &str) -> Option<u32> {
    let stripped = token
        .strip_suffix("st")
        .or_else(|| token.strip_suffix("nd"))
        .or_else(|| token.strip_suffix("rd"))
        .or_else(|| token.strip_suffix("th"))
        .unwrap_or(token);
    let day: u32 = stripped.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

fn next_occurrence_of_day(day: u32, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(date) = NaiveDate::from_ymd_opt(today.year(), today.month(), day) {
        if date >= today {
            return Some(date);
        }
    }
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn human_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// "10:00 AM" without a leading zero on the hour.
pub fn human_time(time: NaiveTime) -> String {
    use chrono::Timelike;
    let (pm, hour12) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour12,
        time.minute(),
        if pm { "PM" } else { "AM" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_business_hours_rejects_sunday() {
        // 2026-09-06 is a Sunday
        assert_eq!(
            business_hours(d("2026-09-06"), t(10, 0)),
            Err(ValidationError::OutOfHours)
        );
    }

    #[test]
    fn test_business_hours_boundaries() {
        let monday = d("2026-08-31");
        assert!(business_hours(monday, t(9, 0)).is_ok());
        assert!(business_hours(monday, t(16, 59)).is_ok());
        assert_eq!(
            business_hours(monday, t(8, 59)),
            Err(ValidationError::OutOfHours)
        );
        assert_eq!(
            business_hours(monday, t(17, 0)),
            Err(ValidationError::OutOfHours)
        );
    }

    #[test]
    fn test_business_hours_accepts_saturday() {
        assert!(business_hours(d("2026-09-05"), t(12, 30)).is_ok());
    }

    #[test]
    fn test_booking_window() {
        let today = d("2026-08-30");
        assert!(booking_window(d("2026-09-01"), today, 3).is_ok());
        assert!(booking_window(today, today, 3).is_ok());
        assert_eq!(
            booking_window(d("2026-09-03"), today, 3),
            Ok(())
        );
        assert_eq!(
            booking_window(d("2026-09-04"), today, 3),
            Err(ValidationError::OutOfWindow { max_days: 3 })
        );
        assert_eq!(
            booking_window(d("2026-08-29"), today, 3),
            Err(ValidationError::OutOfWindow { max_days: 3 })
        );
    }

    #[test]
    fn test_normalize_time_formats() {
        assert_eq!(normalize_time("11:00 AM").unwrap(), t(11, 0));
        assert_eq!(normalize_time("11am").unwrap(), t(11, 0));
        assert_eq!(normalize_time("2:15 p.m.").unwrap(), t(14, 15));
        assert_eq!(normalize_time("14:30").unwrap(), t(14, 30));
        assert_eq!(normalize_time("12 pm").unwrap(), t(12, 0));
        assert_eq!(normalize_time("12 am").unwrap(), t(0, 0));
        assert_eq!(normalize_time("9").unwrap(), t(9, 0));
    }

    #[test]
    fn test_normalize_time_rejects_garbage() {
        assert!(normalize_time("whenever").is_err());
        assert!(normalize_time("25:00").is_err());
        assert!(normalize_time("13 pm").is_err());
    }

    #[test]
    fn test_normalize_date_formats() {
        let today = d("2026-08-30");
        assert_eq!(normalize_date("2026-09-02", today).unwrap(), d("2026-09-02"));
        assert_eq!(normalize_date("tomorrow", today).unwrap(), d("2026-08-31"));
        assert_eq!(normalize_date("today please", today).unwrap(), today);
        assert_eq!(normalize_date("next week", today).unwrap(), d("2026-09-06"));
        assert_eq!(
            normalize_date("02/09/2026", today).unwrap(),
            d("2026-09-02")
        );
        assert_eq!(
            normalize_date("September 2nd", today).unwrap(),
            d("2026-09-02")
        );
        assert_eq!(
            normalize_date("2 September 2026", today).unwrap(),
            d("2026-09-02")
        );
        // A month-day already past this year rolls into next year.
        assert_eq!(
            normalize_date("Jan 10", today).unwrap(),
            d("2027-01-10")
        );
    }

    #[test]
    fn test_normalize_date_bare_day() {
        let today = d("2026-08-30");
        assert_eq!(normalize_date("the 31st", today).unwrap(), d("2026-08-31"));
        // Day already past this month rolls into next month.
        assert_eq!(normalize_date("the 5th", today).unwrap(), d("2026-09-05"));
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        assert!(normalize_date("sometime soon", d("2026-08-30")).is_err());
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("555-123-4567").unwrap(), "5551234567");
        assert!(normalize_phone("call me").is_err());
    }

    #[test]
    fn test_complete_per_intent() {
        let mut draft = AppointmentDraft {
            name: Some("John Smith".into()),
            phone: Some("5551234".into()),
            date: Some(d("2026-09-01")),
            time: Some(t(10, 0)),
            reason: Some("cleaning".into()),
            ..Default::default()
        };
        assert!(complete(&draft, FlowIntent::Book, PatientKind::New).is_ok());
        assert_eq!(
            complete(&draft, FlowIntent::Reschedule, PatientKind::Unset),
            Err(ValidationError::Incomplete("new_date"))
        );
        assert_eq!(
            complete(&draft, FlowIntent::Cancel, PatientKind::Unset),
            Err(ValidationError::Incomplete("customer_id"))
        );

        draft.reason = None;
        assert_eq!(
            complete(&draft, FlowIntent::Book, PatientKind::New),
            Err(ValidationError::Incomplete("reason"))
        );
    }

    #[test]
    fn test_human_time() {
        assert_eq!(human_time(t(9, 0)), "9:00 AM");
        assert_eq!(human_time(t(14, 5)), "2:05 PM");
        assert_eq!(human_time(t(0, 30)), "12:30 AM");
        assert_eq!(human_time(t(12, 0)), "12:00 PM");
    }
}
