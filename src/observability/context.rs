//! Thread-local run context for crash reports.
//!
//! The CLI marks which phase of a run is active; the panic hook reads it so
//! a crash report says whether the failure happened while reading input,
//! embedding, clustering or writing output.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static ITEMS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static ITEMS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_PHASE: RefCell<Option<RunPhase>> = const { RefCell::new(None) };
}

/// Major stages of a densegroup run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Reading the input CSV
    ReadingInput,
    /// Acquiring embeddings
    Embedding,
    /// Loading or writing the vector store
    Storing,
    /// Density clustering
    Clustering,
    /// Naming and merging clusters
    Naming,
    /// Writing record files
    OutputGeneration,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadingInput => write!(f, "reading_input"),
            Self::Embedding => write!(f, "embedding"),
            Self::Storing => write!(f, "storing"),
            Self::Clustering => write!(f, "clustering"),
            Self::Naming => write!(f, "naming"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// Restores the previous phase on drop.
pub struct PhaseGuard {
    previous: Option<RunPhase>,
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        CURRENT_PHASE.with(|phase| *phase.borrow_mut() = self.previous);
    }
}

/// Mark `phase` as active until the returned guard drops.
#[must_use]
pub fn set_phase(phase: RunPhase) -> PhaseGuard {
    CURRENT_PHASE.with(|current| PhaseGuard {
        previous: current.borrow_mut().replace(phase),
    })
}

#[must_use]
pub fn current_phase() -> Option<RunPhase> {
    CURRENT_PHASE.with(|phase| *phase.borrow())
}

pub fn set_progress(processed: usize, total: usize) {
    ITEMS_PROCESSED.store(processed, Ordering::Relaxed);
    ITEMS_TOTAL.store(total, Ordering::Relaxed);
}

/// `(processed, total)` item counters.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        ITEMS_PROCESSED.load(Ordering::Relaxed),
        ITEMS_TOTAL.load(Ordering::Relaxed),
    )
}
