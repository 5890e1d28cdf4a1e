//! Error types for the anchorwall domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator boundary has its own error enum. Expected matching
//! outcomes (no key, no candidate, failed render) are *not* errors; they are
//! reported through pass results.

use thiserror::Error;

/// The top-level error type for all anchorwall operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Content source errors ---
    #[error("Content source error: {0}")]
    Source(#[from] SourceError),

    // --- Asset cache errors ---
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    // --- Anchor store errors ---
    #[error("Anchor store error: {0}")]
    Anchor(#[from] AnchorError),

    // --- Ledger errors ---
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    // --- Upstream data corruption ---
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Content endpoint returned status {status_code}: {message}")]
    Http { status_code: u16, message: String },

    #[error("Failed to parse content payload: {0}")]
    Parse(String),

    #[error("Content source not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Clone, Error)]
pub enum AssetError {
    #[error("Failed to read asset {path}: {reason}")]
    Read { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("Anchor storage error: {0}")]
    Storage(String),

    #[error("Anchor not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger storage error: {0}")]
    Storage(String),

    #[error("Ledger serialization error: {0}")]
    Serialization(String),
}

/// Violations of the data contract between the engine and its upstream
/// collaborators. Fatal for the single offending entity, never for a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("content item '{name}' has a blank identifier")]
    BlankContentId { name: String },

    #[error("anchor {anchor_id} has no resolvable name")]
    BlankAnchorName { anchor_id: String },

    #[error("content id '{content_id}' appears more than once in one pass")]
    DuplicateContent { content_id: String },
}
