use record_store::{Person, RecordStore};

use crate::error::Result;
use crate::options::QueryOptions;
use crate::query::QueryEngine;

/// Stateful pagination over a query engine.
///
/// Accumulates pages across successive [`load_next_page`] calls without
/// duplicating or dropping records: the first page replaces the
/// accumulation, later pages append. A page shorter than `page_size`
/// signals end-of-data; further calls are no-ops until [`reset`].
/// Accumulation is cursor-local state; it is never inferred from the
/// offset of an individual fetch.
///
/// [`load_next_page`]: PageCursor::load_next_page
/// [`reset`]: PageCursor::reset
pub struct PageCursor<S: RecordStore> {
    engine: QueryEngine<S>,
    options: QueryOptions,
    page_size: usize,
    current_offset: usize,
    accumulated: Vec<Person>,
    exhausted: bool,
}

impl<S: RecordStore> PageCursor<S> {
    /// Creates a cursor over the engine with the given filter/sort options.
    ///
    /// The options' own `limit`/`offset` are ignored; the cursor controls
    /// paging. Panics if `page_size` is zero.
    pub fn new(engine: QueryEngine<S>, options: QueryOptions, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        let options = QueryOptions {
            limit: None,
            offset: 0,
            ..options
        };
        Self {
            engine,
            options,
            page_size,
            current_offset: 0,
            accumulated: Vec::new(),
            exhausted: false,
        }
    }

    /// Fetches the next page and folds it into the accumulation.
    ///
    /// Returns the newly fetched page (empty once exhausted). On error the
    /// cursor state is unchanged and the call can be retried.
    pub async fn load_next_page(&mut self) -> Result<Vec<Person>> {
        if self.exhausted {
            return Ok(Vec::new());
        }

        let options = self
            .options
            .clone()
            .limit(self.page_size)
            .offset(self.current_offset);
        let page = self.engine.query(options).await?;

        if self.current_offset == 0 {
            self.accumulated = page.clone();
        } else {
            self.accumulated.extend(page.iter().cloned());
        }
        if !page.is_empty() {
            self.current_offset += self.page_size;
        }
        if page.len() < self.page_size {
            self.exhausted = true;
        }

        Ok(page)
    }

    /// Returns every record accumulated so far, in query order.
    pub fn records(&self) -> &[Person] {
        &self.accumulated
    }

    /// Returns false once a short or empty page marked the end of data.
    pub fn has_more(&self) -> bool {
        !self.exhausted
    }

    /// Returns the number of records accumulated so far.
    pub fn loaded(&self) -> usize {
        self.accumulated.len()
    }

    /// Returns the configured page size.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Rewinds to the first page and clears the accumulation.
    pub fn reset(&mut self) {
        self.current_offset = 0;
        self.accumulated.clear();
        self.exhausted = false;
    }
}
