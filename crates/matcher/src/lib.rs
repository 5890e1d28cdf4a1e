//! # anchorwall Matcher
//!
//! Assigns content items to anchors by tag.
//!
//! ## Pieces
//!
//! - [`tag::extract_key`]: raw tag string → match key
//! - [`AnchorCatalog`]: candidate lookup and pass-scoped occupancy
//! - [`AssignmentReconstructor`]: what is probably on display already
//! - [`AssignmentEngine`]: batch passes and single-anchor matching
//! - [`SessionTracker`]: content first seen during this run
//! - [`MatchRuntime`]: snapshots, pass serialization and events
//! - [`TimeoutSurface`]: bounds render calls at the collaborator boundary

pub mod catalog;
pub mod engine;
pub mod reconstruct;
pub mod runtime;
pub mod selector;
pub mod session;
pub mod surface;
pub mod tag;

#[cfg(test)]
mod test_helpers;

pub use catalog::{AnchorCatalog, Occupancy};
pub use engine::{
    AssignmentEngine, ItemOutcome, MatchAttempt, PassResult, PassStatus, SingleAnchorOutcome,
};
pub use reconstruct::AssignmentReconstructor;
pub use runtime::MatchRuntime;
pub use selector::{AnchorSelector, FirstCandidate};
pub use session::{FirstSeen, SessionTracker};
pub use surface::TimeoutSurface;
pub use tag::extract_key;
