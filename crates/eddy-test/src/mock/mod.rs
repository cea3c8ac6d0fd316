//! Mock implementations of the external services used by the pipeline.
//!
//! The mocks are deterministic: the same inputs always produce the same
//! outputs, so results of the pure composition steps can be compared across
//! calls.

mod embedding;
mod generation;
mod index;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use embedding::MockEmbedder;
pub use generation::{MockGenerativeModel, mock_response};
pub use index::MockVectorIndex;

/// Locks a mutex, recovering the data if a panicking test poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
