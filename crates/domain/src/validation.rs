//! Field rules shared by the catalog aggregates.

use chrono::{DateTime, SubsecRound, Utc};

use crate::notification::Notification;

/// Longest accepted name or title, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Current time, truncated to the microsecond precision the relational
/// store keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Records an error if `value` is blank or longer than [`MAX_NAME_LENGTH`].
pub fn validate_name(notification: &mut Notification, field: &str, value: &str) {
    if value.trim().is_empty() {
        notification.add_error(format!("{field} should not be empty"), Some(field));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        notification.add_error(
            format!("{field} must be shorter than or equal to {MAX_NAME_LENGTH} characters"),
            Some(field),
        );
    }
}

/// Records an error if `values` is empty.
pub fn validate_not_empty<T>(notification: &mut Notification, field: &str, values: &[T]) {
    if values.is_empty() {
        notification.add_error(format!("{field} should not be empty"), Some(field));
    }
}

/// Appends `value` unless already present.
pub fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Returns `values` without repeats, keeping first occurrences.
pub fn dedup<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut unique = Vec::new();
    for value in values {
        push_unique(&mut unique, value);
    }
    unique
}
