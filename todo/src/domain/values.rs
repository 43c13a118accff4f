//! Validated value objects.
//!
//! Every type here can only be obtained through its smart constructor, which
//! returns `Err(message)` instead of panicking when the input violates an
//! invariant. The raw primitive is recovered with `as_str` / `into_inner`.

use chrono::{DateTime, SecondsFormat, Utc};
use effect_todo_core::environment::Clock;
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Prefix every todo identifier starts with.
pub const TODO_ID_PREFIX: &str = "todo-";

/// Maximum title length, in characters, after trimming.
///
/// Counted in Unicode scalar values (`char`s), not UTF-16 code units, so a
/// character outside the Basic Multilingual Plane such as an emoji counts
/// once where a UTF-16 count would see two.
pub const TITLE_MAX_CHARS: usize = 100;

/// Maximum description length, in characters.
///
/// Counted in Unicode scalar values, like [`TITLE_MAX_CHARS`].
pub const DESCRIPTION_MAX_CHARS: usize = 500;

const ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Unique identifier for a todo.
///
/// Generated identifiers look like `todo-1735689600000-k3j9x0a`: the prefix,
/// the creation time in Unix milliseconds and a random base-36 suffix.
/// Parsing only checks the prefix.
///
/// # Examples
///
/// ```
/// use effect_todo::domain::TodoId;
///
/// let id = TodoId::parse("todo-1-abc").unwrap();
/// assert_eq!(id.as_str(), "todo-1-abc");
///
/// assert_eq!(TodoId::parse("task-1").unwrap_err(), "Invalid TodoId");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Generate a fresh identifier stamped with the clock's current time.
    #[must_use]
    pub fn generate(clock: &dyn Clock) -> Self {
        let millis = clock.now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("{TODO_ID_PREFIX}{millis}-{suffix}"))
    }

    /// Parse an identifier received from outside the domain.
    ///
    /// # Errors
    ///
    /// Returns `"Invalid TodoId"` if `value` does not start with [`TODO_ID_PREFIX`].
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.starts_with(TODO_ID_PREFIX) {
            Ok(Self(value.to_string()))
        } else {
            Err("Invalid TodoId".to_string())
        }
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TodoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Todo title: trimmed, non-empty, at most [`TITLE_MAX_CHARS`] characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Validate and trim a title.
    ///
    /// # Errors
    ///
    /// - `"Title required"` if the title is empty after trimming
    /// - `"Title too long"` if the trimmed title exceeds [`TITLE_MAX_CHARS`]
    pub fn create(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("Title required".to_string());
        }
        if trimmed.chars().count() > TITLE_MAX_CHARS {
            return Err("Title too long".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TodoTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional free-text description.
///
/// Missing, empty and whitespace-only input all normalize to `None`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TodoDescription(String);

impl TodoDescription {
    /// Validate an optional description.
    ///
    /// The length limit applies to the input as given; the stored value is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `"Description too long"` if the input exceeds
    /// [`DESCRIPTION_MAX_CHARS`] characters.
    pub fn create(value: Option<&str>) -> Result<Option<Self>, String> {
        let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
            return Ok(None);
        };
        if raw.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err("Description too long".to_string());
        }
        Ok(Some(Self(raw.trim().to_string())))
    }

    /// Get the description as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Task priority level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait
    Low,
    /// Default when nothing is specified
    #[default]
    Medium,
    /// Do first
    High,
}

impl Priority {
    /// Validate an optional priority name.
    ///
    /// `None` and the empty string default to [`Priority::Medium`]. Names are
    /// matched exactly (`"Low"`, `"Medium"`, `"High"`).
    ///
    /// # Errors
    ///
    /// Returns `"Invalid priority"` for any other value.
    pub fn create(value: Option<&str>) -> Result<Self, String> {
        match value {
            None | Some("") => Ok(Self::default()),
            Some("Low") => Ok(Self::Low),
            Some("Medium") => Ok(Self::Medium),
            Some("High") => Ok(Self::High),
            Some(_) => Err("Invalid priority".to_string()),
        }
    }

    /// The priority name as it appears at the boundary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An instant in domain time.
///
/// Only obtainable from a [`Clock`]; serialized as an RFC 3339 string with
/// millisecond precision, e.g. `2025-01-01T00:00:00.000Z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Read the current instant from `clock`.
    #[must_use]
    pub fn now(clock: &dyn Clock) -> Self {
        Self(clock.now())
    }

    /// Format as an ISO-8601 string.
    #[must_use]
    pub fn to_iso(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// The underlying `DateTime`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use effect_todo_testing::test_clock;
    use proptest::prelude::*;

    #[test]
    fn test_generated_id_has_expected_shape() {
        let id = TodoId::generate(&test_clock());
        let rest = id.as_str().strip_prefix(TODO_ID_PREFIX).unwrap();
        let (millis, suffix) = rest.split_once('-').unwrap();

        assert_eq!(millis, "1735689600000");
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let clock = test_clock();
        assert_ne!(TodoId::generate(&clock), TodoId::generate(&clock));
    }

    #[test]
    fn test_id_parse_only_checks_prefix() {
        assert!(TodoId::parse("todo-nonexistent-abc").is_ok());
        assert_eq!(TodoId::parse("not-a-valid-id"), Err("Invalid TodoId".to_string()));
        assert_eq!(TodoId::parse(""), Err("Invalid TodoId".to_string()));
    }

    #[test]
    fn test_title_is_trimmed() {
        let title = TodoTitle::create("  Buy milk  ").unwrap();
        assert_eq!(title.as_str(), "Buy milk");
    }

    #[test]
    fn test_title_rejects_blank() {
        assert_eq!(TodoTitle::create(""), Err("Title required".to_string()));
        assert_eq!(TodoTitle::create("   "), Err("Title required".to_string()));
    }

    #[test]
    fn test_title_length_bound() {
        assert!(TodoTitle::create(&"a".repeat(100)).is_ok());
        assert_eq!(
            TodoTitle::create(&"a".repeat(101)),
            Err("Title too long".to_string())
        );
        // Padding does not count once trimmed
        assert!(TodoTitle::create(&format!("  {}  ", "a".repeat(100))).is_ok());
    }

    #[test]
    fn test_lengths_count_chars_not_utf16_units() {
        assert!(TodoTitle::create(&"\u{1F680}".repeat(100)).is_ok());
        assert!(TodoTitle::create(&"\u{1F680}".repeat(101)).is_err());
        assert!(TodoDescription::create(Some(&"\u{1F4DD}".repeat(500))).is_ok());
    }

    #[test]
    fn test_description_normalizes_blank_to_none() {
        assert_eq!(TodoDescription::create(None), Ok(None));
        assert_eq!(TodoDescription::create(Some("")), Ok(None));
        assert_eq!(TodoDescription::create(Some("   ")), Ok(None));
    }

    #[test]
    fn test_description_is_trimmed_and_bounded() {
        let description = TodoDescription::create(Some(" two litres ")).unwrap().unwrap();
        assert_eq!(description.as_str(), "two litres");

        assert!(TodoDescription::create(Some(&"d".repeat(500))).is_ok());
        assert_eq!(
            TodoDescription::create(Some(&"d".repeat(501))),
            Err("Description too long".to_string())
        );
    }

    #[test]
    fn test_priority_defaults_and_rejects_unknown() {
        assert_eq!(Priority::create(None), Ok(Priority::Medium));
        assert_eq!(Priority::create(Some("")), Ok(Priority::Medium));
        assert_eq!(Priority::create(Some("High")), Ok(Priority::High));
        assert_eq!(Priority::create(Some("Low")), Ok(Priority::Low));
        assert_eq!(Priority::create(Some("high")), Err("Invalid priority".to_string()));
        assert_eq!(Priority::create(Some("Invalid")), Err("Invalid priority".to_string()));
    }

    #[test]
    fn test_timestamp_iso_format() {
        let at = Timestamp::now(&test_clock());
        assert_eq!(at.to_iso(), "2025-01-01T00:00:00.000Z");
        assert_eq!(
            serde_json::to_string(&at).unwrap(),
            "\"2025-01-01T00:00:00.000Z\""
        );
    }

    proptest! {
        #[test]
        fn prop_valid_titles_roundtrip_trimmed(title in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,98}[a-zA-Z0-9]") {
            let created = TodoTitle::create(&format!("  {title}\t")).unwrap();
            prop_assert_eq!(created.as_str(), title.trim());
        }

        #[test]
        fn prop_titles_never_exceed_bound(raw in ".{0,200}") {
            if let Ok(title) = TodoTitle::create(&raw) {
                prop_assert!(!title.as_str().is_empty());
                prop_assert!(title.as_str().chars().count() <= TITLE_MAX_CHARS);
            }
        }

        #[test]
        fn prop_ids_without_prefix_are_rejected(raw in "[a-z]{0,3}[0-9-]{0,10}") {
            prop_assume!(!raw.starts_with(TODO_ID_PREFIX));
            prop_assert!(TodoId::parse(&raw).is_err());
        }
    }
}
