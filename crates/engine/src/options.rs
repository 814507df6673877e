use record_store::FetchRequest;

/// Builder for query configurations.
///
/// Mirrors the knobs a list screen exposes: a search box, a minimum-age
/// filter, a sort toggle, and paging. Filters combine with logical AND.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Keep only records whose name contains this text, case- and
    /// diacritic-insensitively. `None` or empty means no name filter.
    pub search_text: Option<String>,

    /// Keep only records with `age >= min_age`.
    pub min_age: Option<i16>,

    /// Sort surviving records by name ascending (default) or descending.
    pub sort_ascending: bool,

    /// Cap on the number of records returned per call.
    pub limit: Option<usize>,

    /// Records to skip, after filtering and sorting, before taking `limit`.
    pub offset: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            search_text: None,
            min_age: None,
            sort_ascending: true,
            limit: None,
            offset: 0,
        }
    }
}

impl QueryOptions {
    /// Creates options with no filters, ascending sort, no paging.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by name substring.
    pub fn search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Filters by minimum age (inclusive).
    pub fn min_age(mut self, min_age: i16) -> Self {
        self.min_age = Some(min_age);
        self
    }

    /// Sets the name sort direction.
    pub fn sort_ascending(mut self, ascending: bool) -> Self {
        self.sort_ascending = ascending;
        self
    }

    /// Limits the number of records returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many records before returning results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Translates these options into a store fetch request.
    ///
    /// An absent or empty search text produces no name filter.
    pub fn to_request(&self) -> FetchRequest {
        let mut request = FetchRequest::new()
            .ascending(self.sort_ascending)
            .offset(self.offset);
        if let Some(text) = self.search_text.as_deref()
            && !text.is_empty()
        {
            request = request.name_contains(text);
        }
        if let Some(min_age) = self.min_age {
            request = request.min_age(min_age);
        }
        if let Some(limit) = self.limit {
            request = request.limit(limit);
        }
        request
    }
}
