//! In-memory company store.
//!
//! Implements the same [`EntityStore`] contract as the DuckDB store,
//! including batch-atomic commits and case-insensitive symbol uniqueness,
//! so tests and zero-setup tooling can run without a database file.

use std::collections::HashSet;
use std::sync::Mutex;

use esglens_core::{Company, CompanyField, Filter};

use crate::repository::{EntityStore, StagedOp};
use crate::StoreError;

struct MemoryState {
    rows: Vec<Company>,
    next_id: i64,
}

/// Volatile [`EntityStore`] backed by a vector under a mutex.
///
/// Natural order is insertion order, which equals ascending id because ids
/// come from a counter that never decreases; deleted ids are not reissued.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                rows: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore<Company> for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<Company>, StoreError> {
        let state = self.lock();
        Ok(state.rows.clone())
    }

    fn fetch_by_id(&self, id: i64) -> Result<Option<Company>, StoreError> {
        let state = self.lock();
        Ok(state.rows.iter().find(|row| row.id == Some(id)).cloned())
    }

    fn fetch_where(&self, filter: &Filter<CompanyField>) -> Result<Vec<Company>, StoreError> {
        let state = self.lock();
        Ok(state
            .rows
            .iter()
            .filter(|row| filter.matches(*row))
            .cloned()
            .collect())
    }

    fn count_where(&self, filter: Option<&Filter<CompanyField>>) -> Result<u64, StoreError> {
        let state = self.lock();
        let count = match filter {
            Some(filter) => state.rows.iter().filter(|row| filter.matches(*row)).count(),
            None => state.rows.len(),
        };
        Ok(count as u64)
    }

    fn commit(&self, batch: Vec<StagedOp<Company>>) -> Result<u64, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut state = self.lock();

        // Apply to a working copy; the live rows change only if the whole
        // batch succeeds.
        let mut working = state.rows.clone();
        let mut next_id = state.next_id;
        let mut affected = 0u64;

        for op in batch {
            match op {
                StagedOp::Add(mut company) => {
                    company.id = Some(next_id);
                    next_id += 1;
                    working.push(company);
                    affected += 1;
                }
                StagedOp::Update(company) => {
                    let Some(id) = company.id else {
                        return Err(StoreError::MissingId);
                    };
                    if let Some(existing) =
                        working.iter_mut().find(|row| row.id == Some(id))
                    {
                        // created_at is write-once; keep the stored stamp.
                        let created_at = existing.created_at;
                        *existing = company;
                        existing.created_at = created_at;
                        affected += 1;
                    }
                }
                StagedOp::Delete(company) => {
                    let Some(id) = company.id else {
                        return Err(StoreError::MissingId);
                    };
                    let before = working.len();
                    working.retain(|row| row.id != Some(id));
                    affected += (before - working.len()) as u64;
                }
            }
        }

        ensure_unique_symbols(&working)?;

        state.rows = working;
        state.next_id = next_id;
        Ok(affected)
    }
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().expect("memory store mutex poisoned")
    }
}

fn ensure_unique_symbols(rows: &[Company]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for row in rows {
        let normalized = row.symbol.as_str().to_ascii_uppercase();
        if !seen.insert(normalized) {
            return Err(StoreError::Conflict {
                symbol: row.symbol.as_str().to_owned(),
            });
        }
    }
    Ok(())
}
