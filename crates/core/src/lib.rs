//! # anchorwall Core
//!
//! Domain types, collaborator traits, and error definitions for the anchorwall
//! content-to-anchor assignment engine. This crate has **no runtime
//! dependencies** beyond serde/tokio sync primitives; it defines the domain
//! model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Everything the engine talks to (content source, asset cache, rendering
//! surface, anchor store, binding ledger) is a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping HTTP/file/in-memory implementations via configuration
//! - Driving the engine in tests with scripted collaborators
//! - A clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod content;
pub mod anchor;
pub mod binding;
pub mod source;
pub mod render;
pub mod store;
pub mod ledger;
pub mod event;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use content::{ContentId, ContentItem, MatchKey, Orientation};
pub use anchor::{Anchor, AnchorId, AnchorKind};
pub use binding::{Binding, CommitReport, CommitStep, StepOutcome};
pub use source::{AssetCache, ContentSource};
pub use render::{Asset, RenderSurface};
pub use store::AnchorStore;
pub use ledger::{BindingLedger, LedgerEntry};
pub use event::{DomainEvent, EventBus};
