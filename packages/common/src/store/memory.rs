use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::StoreError;
use super::traits::{DocumentStore, TransactFn};

/// In-memory [`DocumentStore`] holding a single versioned JSON tree.
///
/// `transact` runs an optimistic compare-and-swap loop: it snapshots the node
/// together with the tree version, applies the update function outside the
/// write lock, and commits only if no other writer committed in between,
/// retrying otherwise.
pub struct MemoryStore {
    inner: RwLock<Versioned>,
}

struct Versioned {
    version: u64,
    root: Value,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Versioned {
                version: 0,
                root: Value::Object(Map::new()),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let guard = self.inner.read().map_err(|_| poisoned())?;
        Ok(node_at(&guard.root, path).cloned())
    }

    async fn write(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        set_node(&mut guard.root, path, value);
        guard.version += 1;
        Ok(())
    }

    async fn transact(&self, path: &str, apply: TransactFn<'_>) -> Result<Value, StoreError> {
        loop {
            let (version, snapshot) = {
                let guard = self.inner.read().map_err(|_| poisoned())?;
                (guard.version, node_at(&guard.root, path).cloned())
            };
            let next = apply(snapshot.as_ref());

            let mut guard = self.inner.write().map_err(|_| poisoned())?;
            if guard.version == version {
                set_node(&mut guard.root, path, next.clone());
                guard.version += 1;
                return Ok(next);
            }
            // Another writer committed first; rerun against the fresh snapshot.
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".into())
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn node_at<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(root, |node, seg| node.get(seg))
}

fn set_node(root: &mut Value, path: &str, value: Value) {
    let segs: Vec<&str> = segments(path).collect();
    let Some((last, parents)) = segs.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for seg in parents {
        node = as_object(node)
            .entry(seg.to_string())
            .or_insert(Value::Null);
    }
    as_object(node).insert(last.to_string(), value);
}

/// Coerce a node into an object, replacing any scalar in the way.
fn as_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}
