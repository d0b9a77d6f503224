//! Field derivation from the parameter bag.
//!
//! Each heuristic is a small pure function. The due-date fallbacks form an
//! ordered chain; the first extractor that yields a value wins.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;

use super::{
    calendar::{at, default_due_time, end_of_day, wib, wib_date},
    params::{pick_first, ParamBag},
};
use crate::{task_priority::TaskPriority, task_status::TaskStatus};

pub const DEFAULT_COURSE: &str = "umum";

/// Parameter keys that may carry a task title, in preference order.
pub const TITLE_KEYS: &[&str] = &["title", "task", "tugas", "task_title", "any", "task-name", "task_name"];

const DATE_TIME_KEYS: &[&str] = &["date-time", "date_time", "dateTime"];
const DATE_TIME_FIELDS: &[&str] = &["startDateTime", "date_time", "dateTime", "start", "value"];
const DATE_KEYS: &[&str] = &["date", "due_date"];
const TIME_KEY: &str = "time";

// ── Due date chain ─────────────────────────────────────────────

pub type DueExtractor = fn(&ParamBag, &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>>;

/// Tried in order. The last entry always yields.
pub const DUE_CHAIN: &[(&str, DueExtractor)] = &[
    ("date_time", structured_date_time),
    ("date_only", date_only),
    ("time_today", time_today),
    ("end_of_today", end_of_today),
];

pub fn resolve_due(params: &ParamBag, now: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    for (source, extractor) in DUE_CHAIN {
        if let Some(due) = extractor(params, now) {
            tracing::debug!(source, due = %due, "resolved due timestamp");
            return due;
        }
    }
    end_of_day(wib_date(now))
}

/// WIB calendar day the request is about.
pub fn resolve_day(params: &ParamBag, now: &DateTime<FixedOffset>) -> NaiveDate {
    wib_date(&resolve_due(params, now))
}

/// A `@sys.date-time` slot: ISO string, array of them, or a range object.
pub fn structured_date_time(params: &ParamBag, _now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    DATE_TIME_KEYS
        .iter()
        .filter_map(|key| params.get(key))
        .find_map(|value| match pick_first(value) {
            Value::String(s) => parse_instant(s),
            Value::Object(fields) => DATE_TIME_FIELDS
                .iter()
                .filter_map(|f| fields.get(*f).and_then(Value::as_str))
                .find_map(parse_instant),
            _ => None,
        })
}

/// A date-only slot, at the `time` slot's clock time if there is one, else 23:59.
pub fn date_only(params: &ParamBag, _now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let date = DATE_KEYS
        .iter()
        .filter_map(|key| params.text(key))
        .find_map(|raw| parse_date(&raw))?;
    let time = params
        .text(TIME_KEY)
        .and_then(|raw| parse_clock(&raw))
        .unwrap_or_else(default_due_time);
    Some(at(date, time))
}

/// Only a clock time: today at that time.
pub fn time_today(params: &ParamBag, now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let time = params.text(TIME_KEY).and_then(|raw| parse_clock(&raw))?;
    Some(at(wib_date(now), time))
}

pub fn end_of_today(_params: &ParamBag, now: &DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    Some(end_of_day(wib_date(now)))
}

/// RFC 3339, naive local (taken as WIB), or bare date (taken as 23:59 WIB).
pub fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&wib()));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at(naive.date(), naive.time()));
        }
    }
    parse_date(raw).map(end_of_day)
}

/// `YYYY-MM-DD`, ignoring anything from a `T` onwards.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Clock time from a `@sys.time` value ("…T14:00:00+07:00") or "14:00" / "14.00".
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&wib()).time());
    }
    ["%H:%M:%S", "%H:%M", "%H.%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
}

// ── Course ─────────────────────────────────────────────────────

static COURSE_FILLERS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\b(mata ?kuliah|matakuliah)\b", ""),
        (r"\b(tugas)(nya)?\b", ""),
        (r"\b(untuk|tentang|mengenai)\b", ""),
        (r"[:\-–—]", " "),
        (r"[^a-z0-9\s]", ""),
        (r"\s+", " "),
    ]
    .into_iter()
    .filter_map(|(source, replacement)| Regex::new(source).ok().map(|re| (re, replacement)))
    .collect()
});

/// Lowercase, drop filler words and punctuation, collapse whitespace. May be empty.
pub fn sanitize_course(raw: &str) -> String {
    let mut course = raw.trim().to_lowercase();
    for (pattern, replacement) in COURSE_FILLERS.iter() {
        course = pattern.replace_all(&course, *replacement).into_owned();
    }
    course.trim().to_string()
}

/// Storage key for a new task's course; "umum" when nothing usable is left.
pub fn course_key(raw: Option<&str>) -> String {
    let course = raw.map(sanitize_course).unwrap_or_default();
    if course.is_empty() {
        DEFAULT_COURSE.to_string()
    } else {
        course
    }
}

// ── Priority / status / title ──────────────────────────────────

/// The `priority` slot if filled (anything unknown → medium), else a high or
/// low word found in the utterance, else medium.
pub fn resolve_priority(params: &ParamBag, utterance: &str) -> TaskPriority {
    if let Some(raw) = params.text("priority") {
        return TaskPriority::from_param(&raw);
    }
    utterance
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|word| TaskPriority::from_word(word).filter(|p| *p != TaskPriority::Medium))
        .unwrap_or_default()
}

/// The `status` slot if it names a known status, else what the utterance rule
/// captured, else done.
pub fn resolve_status(params: &ParamBag, from_utterance: Option<TaskStatus>) -> TaskStatus {
    params
        .text("status")
        .and_then(|raw| TaskStatus::from_word(&raw))
        .or(from_utterance)
        .unwrap_or(TaskStatus::Done)
}

/// An explicit status filter, if the slot names a known status.
pub fn status_filter(params: &ParamBag) -> Option<TaskStatus> {
    params.text("status").and_then(|raw| TaskStatus::from_word(&raw))
}

pub fn title_param(params: &ParamBag) -> Option<String> {
    params.first_text(TITLE_KEYS)
}
