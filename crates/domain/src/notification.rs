//! Per-operation accumulator of validation errors.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    /// An error not tied to any field.
    Message(String),
    /// Ordered, de-duplicated messages for one field.
    Field { field: String, messages: Vec<String> },
}

/// Collects field-keyed validation errors for one operation.
///
/// Once any error is recorded the owning operation must not reach
/// persistence; [`Notification::has_errors`] is the check to use.
/// Serializes to a list where each element is either a bare message or a
/// single-key `{ field: [messages] }` object, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    entries: Vec<Entry>,
}

impl Notification {
    /// Creates an empty notification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one error, either to `field` or to the bare-error list.
    ///
    /// A message already present for the same field (or already present as
    /// a bare error) is not duplicated.
    pub fn add_error(&mut self, message: impl Into<String>, field: Option<&str>) {
        let message = message.into();
        match field {
            Some(field) => {
                let existing = self.entries.iter_mut().find_map(|entry| match entry {
                    Entry::Field { field: f, messages } if f == field => Some(messages),
                    _ => None,
                });
                match existing {
                    Some(messages) => {
                        if !messages.contains(&message) {
                            messages.push(message);
                        }
                    }
                    None => self.entries.push(Entry::Field {
                        field: field.to_string(),
                        messages: vec![message],
                    }),
                }
            }
            None => {
                let present = self
                    .entries
                    .iter()
                    .any(|entry| matches!(entry, Entry::Message(m) if *m == message));
                if !present {
                    self.entries.push(Entry::Message(message));
                }
            }
        }
    }

    /// Appends several errors at once, keeping any errors recorded earlier.
    pub fn set_error<I, S>(&mut self, messages: I, field: Option<&str>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            self.add_error(message, field);
        }
    }

    /// Copies every error of `other` into this notification.
    pub fn copy_errors(&mut self, other: &Notification) {
        for entry in &other.entries {
            match entry {
                Entry::Message(message) => self.add_error(message.clone(), None),
                Entry::Field { field, messages } => {
                    self.set_error(messages.iter().cloned(), Some(field.as_str()))
                }
            }
        }
    }

    /// Returns true if any error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns the messages recorded for `field`, if any.
    pub fn field_errors(&self, field: &str) -> Option<&[String]> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Field { field: f, messages } if f == field => Some(messages.as_slice()),
            _ => None,
        })
    }

    /// Returns the bare (non-field) messages.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(m) => Some(m.as_str()),
            Entry::Field { .. } => None,
        })
    }

    /// Returns the JSON list form of the recorded errors.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            match entry {
                Entry::Message(m) => write!(f, "{m}")?,
                Entry::Field { field, messages } => write!(f, "{field}: {}", messages.join(", "))?,
            }
        }
        Ok(())
    }
}

struct FieldEntry<'a> {
    field: &'a str,
    messages: &'a [String],
}

impl Serialize for FieldEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field, self.messages)?;
        map.end()
    }
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            match entry {
                Entry::Message(m) => seq.serialize_element(m)?,
                Entry::Field { field, messages } => seq.serialize_element(&FieldEntry {
                    field,
                    messages,
                })?,
            }
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_without_errors() {
        let notification = Notification::new();
        assert!(!notification.has_errors());
        assert_eq!(notification.to_json(), json!([]));
    }

    #[test]
    fn add_error_appends_to_field_without_duplicates() {
        let mut notification = Notification::new();
        notification.add_error("name is required", Some("name"));
        notification.add_error("name is required", Some("name"));
        notification.add_error("name is too long", Some("name"));

        assert!(notification.has_errors());
        assert_eq!(
            notification.field_errors("name").unwrap(),
            ["name is required", "name is too long"]
        );
    }

    #[test]
    fn set_error_keeps_prior_errors() {
        let mut notification = Notification::new();
        notification.add_error("first", Some("categories_id"));
        notification.set_error(["second", "third"], Some("categories_id"));

        assert_eq!(
            notification.field_errors("categories_id").unwrap(),
            ["first", "second", "third"]
        );
    }

    #[test]
    fn bare_errors_are_kept_apart_from_fields() {
        let mut notification = Notification::new();
        notification.add_error("something broke", None);
        notification.set_error(["a", "b"], None);

        assert_eq!(
            notification.messages().collect::<Vec<_>>(),
            ["something broke", "a", "b"]
        );
        assert!(notification.field_errors("something broke").is_none());
    }

    #[test]
    fn to_json_preserves_insertion_order() {
        let mut notification = Notification::new();
        notification.add_error("name is required", Some("name"));
        notification.add_error("bare error", None);
        notification.add_error("must be a valid UUID", Some("categories_id"));
        notification.add_error("name is too long", Some("name"));

        assert_eq!(
            notification.to_json(),
            json!([
                { "name": ["name is required", "name is too long"] },
                "bare error",
                { "categories_id": ["must be a valid UUID"] },
            ])
        );
    }

    #[test]
    fn copy_errors_merges_both_kinds() {
        let mut source = Notification::new();
        source.add_error("x", Some("title"));
        source.add_error("y", None);

        let mut target = Notification::new();
        target.add_error("z", Some("title"));
        target.copy_errors(&source);

        assert_eq!(target.field_errors("title").unwrap(), ["z", "x"]);
        assert_eq!(target.messages().collect::<Vec<_>>(), ["y"]);
    }

    #[test]
    fn display_joins_entries() {
        let mut notification = Notification::new();
        notification.add_error("too long", Some("name"));
        notification.add_error("oops", None);
        assert_eq!(notification.to_string(), "name: too long; oops");
    }
}
