//! Best-effort timestamps as observed on the scraped page.
//!
//! Scraped timestamps are arbitrary strings. [`ObservedTimestamp`] keeps the
//! raw text and, when one of the supported formats matches, the parsed UTC
//! instant. Comparisons only ever use the parsed instant; a timestamp that
//! failed to parse is "unordered" and every policy that depends on ordering
//! has an explicit branch for it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Shortest digit run read as epoch milliseconds (early 2001 onwards).
/// Shorter runs such as a bare year stay unordered.
const MIN_EPOCH_MILLIS_DIGITS: usize = 12;

/// A scraped timestamp that may or may not be comparable.
///
/// # Examples
///
/// ```
/// use chat_aggregator::chat::domain::ObservedTimestamp;
///
/// let parsed = ObservedTimestamp::parse("2024-05-01T10:00:00Z");
/// assert!(parsed.is_comparable());
///
/// let garbage = ObservedTimestamp::parse("yesterday-ish");
/// assert!(!garbage.is_comparable());
/// assert_eq!(garbage.raw(), "yesterday-ish");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ObservedTimestamp {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl ObservedTimestamp {
    /// Parses a raw scraped timestamp.
    ///
    /// Accepts RFC 3339, RFC 2822, naive `YYYY-MM-DD HH:MM:SS[.f]` (with a
    /// space or `T` separator, read as UTC), a bare `YYYY-MM-DD` date, and
    /// integral epoch milliseconds of at least twelve digits. Never fails: unrecognised input yields an
    /// unordered timestamp that still remembers its raw text.
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(raw.trim());
        Self { raw, instant }
    }

    /// Creates a timestamp from a known instant.
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self {
            raw: instant.to_rfc3339(),
            instant: Some(instant),
        }
    }

    /// Returns the text exactly as it was scraped.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed instant, if the raw text was recognised.
    #[must_use]
    pub const fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    /// Returns `true` if the timestamp parsed and can be ordered.
    #[must_use]
    pub const fn is_comparable(&self) -> bool {
        self.instant.is_some()
    }

    /// Classifies this timestamp against the latest one seen so far.
    ///
    /// Parse failures on either side are fail-open: they yield
    /// [`Novelty::Unordered`], which counts as novel.
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_aggregator::chat::domain::{Novelty, ObservedTimestamp};
    ///
    /// let earlier = ObservedTimestamp::parse("2024-05-01T10:00:00Z");
    /// let later = ObservedTimestamp::parse("2024-05-01T10:05:00Z");
    ///
    /// assert_eq!(later.novelty_against(Some(&earlier)), Novelty::Newer);
    /// assert_eq!(earlier.novelty_against(Some(&later)), Novelty::NotNewer);
    /// assert_eq!(earlier.novelty_against(None), Novelty::First);
    /// ```
    #[must_use]
    pub fn novelty_against(&self, latest: Option<&Self>) -> Novelty {
        let Some(latest) = latest else {
            return Novelty::First;
        };
        match (self.instant, latest.instant) {
            (Some(candidate), Some(marker)) if candidate > marker => Novelty::Newer,
            (Some(_), Some(_)) => Novelty::NotNewer,
            _ => Novelty::Unordered,
        }
    }

    /// Oldest-first total order.
    ///
    /// Comparable timestamps are ordered by instant; unordered ones sort
    /// after every comparable one and compare equal to each other, so stable
    /// sorts keep their relative position.
    #[must_use]
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        match (self.instant, other.instant) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Newest-first total order. Unordered timestamps still sort last.
    #[must_use]
    pub fn recency_cmp(&self, other: &Self) -> Ordering {
        match (self.instant, other.instant) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(parsed) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(parsed.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }
    if raw.len() >= MIN_EPOCH_MILLIS_DIGITS && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }
    None
}

impl From<String> for ObservedTimestamp {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for ObservedTimestamp {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<ObservedTimestamp> for String {
    fn from(timestamp: ObservedTimestamp) -> Self {
        timestamp.raw
    }
}

impl From<DateTime<Utc>> for ObservedTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::from_instant(instant)
    }
}

impl fmt::Display for ObservedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Outcome of comparing an incoming timestamp with the recency marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Novelty {
    /// No marker had been recorded yet.
    First,
    /// Both sides parsed and the candidate is strictly later.
    Newer,
    /// At least one side failed to parse; treated as novel.
    Unordered,
    /// Both sides parsed and the candidate is not later.
    NotNewer,
}

impl Novelty {
    /// Returns `true` for every outcome except [`Novelty::NotNewer`].
    #[must_use]
    pub const fn is_novel(self) -> bool {
        !matches!(self, Self::NotNewer)
    }
}
