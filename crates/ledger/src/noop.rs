//! No-op ledger: remembers nothing; the reconstructor falls back to its heuristic.

use anchorwall_core::anchor::AnchorId;
use anchorwall_core::error::LedgerError;
use anchorwall_core::ledger::{BindingLedger, LedgerEntry};
use async_trait::async_trait;

pub struct NoopLedger;

#[async_trait]
impl BindingLedger for NoopLedger {
    fn name(&self) -> &str { "none" }

    async fn record(&self, _entry: LedgerEntry) -> Result<(), LedgerError> {
        Ok(())
    }

    async fn get(&self, _anchor_id: &AnchorId) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(None)
    }

    async fn remove(&self, _anchor_id: &AnchorId) -> Result<bool, LedgerError> {
        Ok(false)
    }

    async fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        Ok(vec![])
    }

    async fn count(&self) -> Result<usize, LedgerError> {
        Ok(0)
    }

    async fn clear(&self) -> Result<(), LedgerError> {
        Ok(())
    }
}
