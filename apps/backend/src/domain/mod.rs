//! Domain layer: pure draft logic types and helpers.

pub mod draft;
pub mod pool;
pub mod selection;

#[cfg(test)]
mod tests_order_props;

pub use draft::{DraftRecord, TurnCursor};
pub use pool::{PoolEntry, PoolSnapshot};
pub use selection::{RosterDelta, Selection, SelectionSource};

/// Identifiers are opaque document ids assigned by the data gateway.
pub type DraftId = String;
pub type LeagueId = String;
pub type PeriodId = String;
pub type TeamId = String;
pub type GolferId = String;
