//! Watch loop: follow podman's journal and the Konsole settings file, and
//! run one synchronization pass at a time whenever either changes.

mod error;
pub mod journal;
mod logging;
mod runtime;

pub use error::DaemonError;
pub use journal::ContainerEvent;
pub use logging::init_tracing;
pub use runtime::{run, start_blocking, PassFn, Trigger, DEBOUNCE_WINDOW};
