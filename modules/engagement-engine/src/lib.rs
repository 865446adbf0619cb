pub mod aggregate;
pub mod classify;
pub mod flatten;
pub mod ledger;
pub mod registry;
pub mod sink;
pub mod sources;
pub mod trigger;
pub mod types;
pub mod watcher;

pub use aggregate::{aggregate, aggregate_at};
pub use classify::classify;
pub use flatten::flatten;
pub use ledger::Ledger;
pub use registry::PostRegistry;
pub use types::{CycleKind, CycleOutcome, CycleReport, WatchState};
pub use watcher::Watcher;
