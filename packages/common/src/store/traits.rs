use async_trait::async_trait;
use serde_json::Value;

use super::error::StoreError;

/// Update function applied inside [`DocumentStore::transact`].
///
/// Receives the current node value (`None` when the node is absent) and
/// returns the value to commit. It may be invoked multiple times per call
/// when concurrent writers conflict, so it must be pure and side-effect-free.
pub type TransactFn<'a> = &'a (dyn Fn(Option<&Value>) -> Value + Send + Sync);

/// Path-addressed JSON document store.
///
/// Paths are `/`-separated segments addressing nodes inside a single JSON
/// tree (e.g. `limits/customQuotas/alice`). Reading through a missing
/// intermediate node yields `None`; writes create intermediate objects as
/// needed.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Snapshot read of the node at `path`. No staleness guarantee beyond
    /// "was true at some point during the call".
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the node at `path`. Only for single-owner writers; contended
    /// nodes must go through [`transact`](DocumentStore::transact).
    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Atomically apply `apply` to the node at `path` and commit the result.
    ///
    /// Commits are linearizable per path: no two transactions on the same
    /// path commit based on the same stale snapshot. Conflicts with
    /// concurrent writers are retried internally and silently, with no
    /// caller-visible partial effects; the caller observes exactly one
    /// committed value, which is returned.
    async fn transact(&self, path: &str, apply: TransactFn<'_>) -> Result<Value, StoreError>;
}
