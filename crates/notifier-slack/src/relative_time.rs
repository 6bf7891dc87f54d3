//! 사람이 읽는 상대 시간 표현 ("3 minutes ago").

use chrono::{DateTime, Utc};

const SECONDS_PER_MONTH: f64 = 30.436875 * 86_400.0;
const SECONDS_PER_YEAR: f64 = 365.2425 * 86_400.0;

/// `then`이 `now` 기준으로 얼마나 전(또는 후)인지 표현합니다.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = (now - then).num_milliseconds();
    let phrase = humanize((elapsed_ms.unsigned_abs() as f64) / 1000.0);

    if elapsed_ms < 0 {
        format!("in {}", phrase)
    } else {
        format!("{} ago", phrase)
    }
}

/// 현재 시각 기준 상대 시간.
pub fn from_now(then: DateTime<Utc>) -> String {
    time_ago(then, Utc::now())
}

fn humanize(secs: f64) -> String {
    let seconds = secs.round();
    let minutes = (secs / 60.0).round();
    let hours = (secs / 3_600.0).round();
    let days = (secs / 86_400.0).round();
    let months = (secs / SECONDS_PER_MONTH).round();
    let years = (secs / SECONDS_PER_YEAR).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{} minutes", minutes)
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{} hours", hours)
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{} days", days)
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{} months", months)
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{} years", years)
    }
}
