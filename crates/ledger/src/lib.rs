//! Binding ledger implementations for anchorwall.

pub mod noop;
pub mod in_memory;
pub mod file_backend;

pub use noop::NoopLedger;
pub use in_memory::InMemoryLedger;
pub use file_backend::FileLedger;

use anchorwall_config::LedgerConfig;
use anchorwall_core::ledger::BindingLedger;
use std::path::PathBuf;
use std::sync::Arc;

/// Build the ledger backend named in the configuration.
///
/// Unknown names fall back to the no-op ledger; the config layer rejects
/// them before this is reached.
pub fn from_config(config: &LedgerConfig) -> Arc<dyn BindingLedger> {
    match config.backend.as_str() {
        "file" => Arc::new(FileLedger::new(PathBuf::from(&config.path))),
        "memory" => Arc::new(InMemoryLedger::new()),
        _ => Arc::new(NoopLedger),
    }
}
