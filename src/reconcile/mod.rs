//! Translation between externally owned path lists and the internal id sets.
//!
//! Callers only ever see paths. Ancestor expansion turns paths into the ids
//! needed to show them, the orphan filter hides ids below collapsed
//! directories, and [`TreeState`] ties both together.

mod expansion;
mod orphans;
mod state_source;
mod tree_state;

pub use expansion::{ExpansionCache, expand_with_ancestors, expand_with_ancestors_cached};
pub use orphans::{filter_orphaned, is_orphaned};
pub use state_source::{ChangeCallback, StateSource};
pub use tree_state::{TreeOptions, TreeState};
