use std::sync::Arc;

use common::RecordId;
use record_store::{Person, RecordStore};
use tokio::sync::Mutex;

use crate::error::{EngineError, Result};
use crate::query::QueryEngine;

/// Result of a successful mutation.
#[derive(Debug)]
pub struct MutationResult {
    /// The created or updated record. `None` for deletes.
    pub record: Option<Person>,

    /// The refreshed result set: the last remembered query re-run at
    /// offset 0 against the post-mutation store.
    pub results: Vec<Person>,
}

/// Applies create/update/delete operations and keeps query results fresh.
///
/// Input is validated before any store call. Every mutation is followed by
/// a commit; a failed commit rolls the working state back to its
/// pre-mutation shape before the error is returned. Mutate+commit
/// sequences are serialized behind a lock so concurrent callers cannot
/// interleave lost updates.
pub struct MutationService<S: RecordStore> {
    engine: QueryEngine<S>,
    gate: Arc<Mutex<()>>,
}

impl<S: RecordStore + Clone> Clone for MutationService<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S: RecordStore> MutationService<S> {
    /// Creates a mutation service sharing the given engine.
    pub fn new(engine: QueryEngine<S>) -> Self {
        Self {
            engine,
            gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the engine this service refreshes through.
    pub fn engine(&self) -> &QueryEngine<S> {
        &self.engine
    }

    /// Creates a new person from raw text input.
    ///
    /// The name is trimmed and must be non-empty; the age is trimmed and
    /// must parse as a non-negative 16-bit integer. Validation failures
    /// reject the call before any store operation.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, name: &str, age: &str) -> Result<MutationResult> {
        let name = validated_name(name)?;
        let age = parsed_age(age)?;

        let record = {
            let _guard = self.gate.lock().await;
            let record = Person::new(name, age);
            self.engine
                .timed(self.engine.store().insert(record.clone()))
                .await?;
            self.commit_or_roll_back().await?;
            record
        };

        metrics::counter!("engine_mutations").increment(1);
        let results = self.engine.refresh().await?;
        Ok(MutationResult {
            record: Some(record),
            results,
        })
    }

    /// Overwrites both fields of an existing person.
    ///
    /// Fails with `NotFound` if the id is unknown. Name and age are
    /// overwritten together or not at all; identity and `created_at` are
    /// preserved, `updated_at` is refreshed.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: RecordId, new_name: &str, new_age: &str) -> Result<MutationResult> {
        let name = validated_name(new_name)?;
        let age = parsed_age(new_age)?;

        let record = {
            let _guard = self.gate.lock().await;
            let existing = self
                .engine
                .timed(self.engine.store().get(id))
                .await?
                .ok_or(EngineError::NotFound(id))?;
            let record = existing.overwritten(name, age);
            self.engine
                .timed(self.engine.store().update(record.clone()))
                .await?;
            self.commit_or_roll_back().await?;
            record
        };

        metrics::counter!("engine_mutations").increment(1);
        let results = self.engine.refresh().await?;
        Ok(MutationResult {
            record: Some(record),
            results,
        })
    }

    /// Removes a person from the store.
    ///
    /// Fails with `NotFound` if the id is unknown. The refreshed result
    /// set no longer contains the record.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: RecordId) -> Result<MutationResult> {
        {
            let _guard = self.gate.lock().await;
            self.engine.timed(self.engine.store().delete(id)).await?;
            self.commit_or_roll_back().await?;
        }

        metrics::counter!("engine_mutations").increment(1);
        let results = self.engine.refresh().await?;
        Ok(MutationResult {
            record: None,
            results,
        })
    }

    /// Removes every person from the store. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<MutationResult> {
        {
            let _guard = self.gate.lock().await;
            self.engine.timed(self.engine.store().delete_all()).await?;
            self.commit_or_roll_back().await?;
        }

        metrics::counter!("engine_mutations").increment(1);
        let results = self.engine.refresh().await?;
        Ok(MutationResult {
            record: None,
            results,
        })
    }

    /// Commits staged changes; on failure, rolls the working state back
    /// and returns the commit error.
    async fn commit_or_roll_back(&self) -> Result<()> {
        let store = self.engine.store();
        match self.engine.timed(store.commit()).await {
            Ok(()) => Ok(()),
            Err(commit_err) => {
                if let Err(rollback_err) = self.engine.timed(store.rollback()).await {
                    tracing::warn!(
                        error = %rollback_err,
                        "rollback after failed commit also failed"
                    );
                }
                metrics::counter!("engine_rollbacks").increment(1);
                Err(commit_err)
            }
        }
    }
}

fn validated_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::EmptyName);
    }
    Ok(name.to_string())
}

fn parsed_age(age: &str) -> Result<i16> {
    match age.trim().parse::<i16>() {
        Ok(age) if age >= 0 => Ok(age),
        _ => Err(EngineError::InvalidAge {
            input: age.to_string(),
        }),
    }
}
