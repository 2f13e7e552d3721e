//! Console-side plumbing around the engine: the per-page controller, search
//! debouncing and stock collaborator implementations

pub mod controller;
pub mod debounce;
pub mod notify;

pub use controller::{DEFAULT_REQUEST_TIMEOUT, DeleteOutcome, ListController, ListStatus, LoadState};
pub use debounce::Debouncer;
pub use notify::{AutoConfirm, RecordingNotifier, TracingNotifier};
