use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared flag that lets a caller abort contact-graph construction.
///
/// Builders poll the token once per residue pair; clones observe the same flag. A token
/// made with [`CancellationToken::child`] also reports cancellation once any of its
/// ancestors is cancelled, while cancelling the child leaves the ancestors untouched.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    ancestors: Vec<Arc<AtomicBool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new token scoped under this one.
    pub fn child(&self) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(Arc::clone(&self.cancelled));
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            ancestors,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self
                .ancestors
                .iter()
                .any(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Cancellation scopes for a batch of structures.
///
/// Each structure gets its own child of a batch-wide token, so one structure can be
/// abandoned without touching the others, and [`BatchCancellation::cancel_all`] still
/// stops everything. Scopes are created on first use, which means a structure can be
/// cancelled before its build starts.
#[derive(Debug, Default)]
pub struct BatchCancellation {
    batch: CancellationToken,
    structures: Mutex<HashMap<String, CancellationToken>>,
}

impl BatchCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token that the build of `structure_id` polls.
    pub fn token_for(&self, structure_id: &str) -> CancellationToken {
        let mut structures = self
            .structures
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        structures
            .entry(structure_id.to_string())
            .or_insert_with(|| self.batch.child())
            .clone()
    }

    pub fn cancel_structure(&self, structure_id: &str) {
        self.token_for(structure_id).cancel();
    }

    pub fn cancel_all(&self) {
        self.batch.cancel();
    }

    pub fn is_cancelled(&self, structure_id: &str) -> bool {
        self.token_for(structure_id).is_cancelled()
    }
}
