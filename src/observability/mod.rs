//! Logging and crash reporting.
//!
//! - **Tracing**: [`init_tracing`] installs the stderr subscriber
//! - **Run context**: [`set_phase`] marks the active stage for crash reports
//! - **Panic hook**: [`install_panic_hook`] prints the report
//!
//! ```ignore
//! use densegroup::observability::{init_tracing, install_panic_hook, set_phase, RunPhase};
//!
//! init_tracing(verbosity);
//! install_panic_hook();
//! let _phase = set_phase(RunPhase::Clustering);
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{current_phase, get_progress, set_phase, set_progress, PhaseGuard, RunPhase};
pub use panic_hook::install_panic_hook;
pub use self::tracing::{default_directive, init_tracing};
