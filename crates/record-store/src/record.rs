use chrono::{DateTime, Utc};
use common::RecordId;
use serde::{Deserialize, Serialize};

/// A single person record.
///
/// `name` is optional: absence is a valid state distinct from an empty
/// string. Records created through the mutation path always carry a name;
/// rows seeded directly into a store may not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identity, assigned at creation and never changed.
    pub id: RecordId,

    /// Display name, if one was ever set.
    pub name: Option<String>,

    /// Age in years. Defaults to 0 when unset.
    pub age: i16,

    /// When the record was first created.
    pub created_at: DateTime<Utc>,

    /// When the record was last overwritten.
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Creates a named person with a fresh identity.
    pub fn new(name: impl Into<String>, age: i16) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            name: Some(name.into()),
            age,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a person without a name.
    pub fn unnamed(age: i16) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            name: None,
            age,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the name as a string slice, if present.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns a copy with both mutable fields overwritten and
    /// `updated_at` refreshed. Identity and `created_at` are preserved.
    pub fn overwritten(&self, name: impl Into<String>, age: i16) -> Self {
        Self {
            id: self.id,
            name: Some(name.into()),
            age,
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_unique_ids() {
        let a = Person::new("Alice", 30);
        let b = Person::new("Alice", 30);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn new_sets_name_and_age() {
        let p = Person::new("Alice", 30);
        assert_eq!(p.name(), Some("Alice"));
        assert_eq!(p.age, 30);
    }

    #[test]
    fn unnamed_has_no_name() {
        let p = Person::unnamed(12);
        assert_eq!(p.name, None);
        assert_eq!(p.age, 12);
    }

    #[test]
    fn overwritten_preserves_identity_and_created_at() {
        let p = Person::new("bob", 25);
        let q = p.overwritten("Bobby", 26);
        assert_eq!(q.id, p.id);
        assert_eq!(q.created_at, p.created_at);
        assert_eq!(q.name(), Some("Bobby"));
        assert_eq!(q.age, 26);
        assert!(q.updated_at >= p.updated_at);
    }

    #[test]
    fn serialization_roundtrip() {
        let p = Person::new("Carol", 40);
        let json = serde_json::to_string(&p).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
