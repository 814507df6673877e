use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::record::Person;

/// Folds text for case- and diacritic-insensitive comparison.
///
/// Decomposes (NFKD), drops combining marks, then lowercases, so that
/// "José" folds to "jose".
pub fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Describes a single fetch against a record store.
///
/// Filters combine with logical AND. Filtering and sorting are applied
/// before `offset`/`limit`.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Keep only records whose name contains this text, folded.
    /// `None` or an empty string means no name filter. Records without
    /// a name never match a name filter.
    pub name_contains: Option<String>,

    /// Keep only records with `age >= min_age`.
    pub min_age: Option<i16>,

    /// Sort direction for the name key. Unnamed records sort before
    /// named ones when ascending.
    pub ascending: bool,

    /// Maximum number of records to return.
    pub limit: Option<usize>,

    /// Number of records to skip after filtering and sorting.
    pub offset: usize,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            name_contains: None,
            min_age: None,
            ascending: true,
            limit: None,
            offset: 0,
        }
    }
}

impl FetchRequest {
    /// Creates a request with no filters, ascending sort, no paging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters to records whose name contains the given text.
    pub fn name_contains(mut self, text: impl Into<String>) -> Self {
        self.name_contains = Some(text.into());
        self
    }

    /// Filters to records at or above the given age.
    pub fn min_age(mut self, min_age: i16) -> Self {
        self.min_age = Some(min_age);
        self
    }

    /// Sets the sort direction for the name key.
    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Caps the number of records returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many records before returning results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns true if the record survives every filter in this request.
    pub fn matches(&self, person: &Person) -> bool {
        if let Some(needle) = self.name_contains.as_deref()
            && !needle.is_empty()
        {
            match person.name() {
                Some(name) if fold(name).contains(&fold(needle)) => {}
                _ => return false,
            }
        }
        if let Some(min_age) = self.min_age
            && person.age < min_age
        {
            return false;
        }
        true
    }
}
