//! Per-channel Momentum and Threat pools.
//!
//! The tracker keeps every pool in memory and writes the whole map through a
//! [`PoolStore`] after each change. The in-memory state is authoritative: a
//! failed write is logged, the tracker is marked dirty, and the next change
//! (or an explicit [`MomentumTracker::flush`]) writes again.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dune_mechanics::RollResult;

use crate::config::MOMENTUM_FILE;
use crate::error::{TableError, TableResult};
use crate::store;

/// Every pool, keyed by channel id.
pub type PoolMap = BTreeMap<String, MomentumPool>;

/// The shared Momentum and Threat of one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumPool {
    /// Channel the pool belongs to.
    pub channel_id: String,
    /// Player-side resource.
    pub momentum: u32,
    /// Gamemaster-side resource.
    pub threat: u32,
    /// When the pool last changed; `None` for a pool never written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl MomentumPool {
    /// An empty pool for a channel.
    pub fn empty(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            momentum: 0,
            threat: 0,
            last_updated: None,
        }
    }
}

impl fmt::Display for MomentumPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Momentum: {} | Threat: {}", self.momentum, self.threat)
    }
}

/// Backing storage for the pool map.
pub trait PoolStore {
    /// Load every stored pool.
    fn load(&self) -> TableResult<PoolMap>;
    /// Replace the stored pools with `pools`.
    fn save(&self, pools: &PoolMap) -> TableResult<()>;
}

/// Pools kept in a JSON object file, keyed by channel id.
#[derive(Debug, Clone)]
pub struct JsonPoolStore {
    path: PathBuf,
}

impl JsonPoolStore {
    /// Store pools in the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store pools in the standard file inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(MOMENTUM_FILE))
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PoolStore for JsonPoolStore {
    fn load(&self) -> TableResult<PoolMap> {
        Ok(store::load_json(&self.path)?.unwrap_or_default())
    }

    fn save(&self, pools: &PoolMap) -> TableResult<()> {
        store::save_json(&self.path, pools)
    }
}

/// Pools kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryPoolStore {
    pools: RefCell<PoolMap>,
}

impl MemoryPoolStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of what has been saved so far.
    pub fn snapshot(&self) -> PoolMap {
        self.pools.borrow().clone()
    }
}

impl PoolStore for MemoryPoolStore {
    fn load(&self) -> TableResult<PoolMap> {
        Ok(self.snapshot())
    }

    fn save(&self, pools: &PoolMap) -> TableResult<()> {
        *self.pools.borrow_mut() = pools.clone();
        Ok(())
    }
}

/// Momentum/Threat bookkeeping for every channel.
#[derive(Debug)]
pub struct MomentumTracker<S: PoolStore> {
    store: S,
    pools: PoolMap,
    dirty: bool,
}

impl<S: PoolStore> MomentumTracker<S> {
    /// Load the stored pools and start tracking them.
    pub fn open(store: S) -> TableResult<Self> {
        let pools = store.load()?;
        tracing::debug!(channels = pools.len(), "loaded momentum pools");
        Ok(Self {
            store,
            pools,
            dirty: false,
        })
    }

    /// The pool for a channel, or an empty one. Never writes.
    pub fn get(&self, channel_id: &str) -> MomentumPool {
        self.pools
            .get(channel_id)
            .cloned()
            .unwrap_or_else(|| MomentumPool::empty(channel_id))
    }

    /// Apply signed deltas to both resources. Results are clamped at zero.
    pub fn update(
        &mut self,
        channel_id: &str,
        momentum_delta: i32,
        threat_delta: i32,
    ) -> MomentumPool {
        self.mutate(channel_id, |pool| {
            pool.momentum = pool.momentum.saturating_add_signed(momentum_delta);
            pool.threat = pool.threat.saturating_add_signed(threat_delta);
        })
    }

    /// Zero both resources for a channel.
    pub fn reset(&mut self, channel_id: &str) -> MomentumPool {
        tracing::info!(channel_id, "resetting momentum pool");
        self.mutate(channel_id, |pool| {
            pool.momentum = 0;
            pool.threat = 0;
        })
    }

    /// Spend Momentum. Fails without changing anything if the pool is short.
    pub fn spend_momentum(&mut self, channel_id: &str, amount: u32) -> TableResult<MomentumPool> {
        let available = self.get(channel_id).momentum;
        if amount > available {
            return Err(TableError::InsufficientMomentum {
                available,
                requested: amount,
            });
        }
        Ok(self.mutate(channel_id, |pool| pool.momentum -= amount))
    }

    /// Add the Momentum and Threat a roll generated.
    pub fn apply_roll(&mut self, channel_id: &str, result: &RollResult) -> MomentumPool {
        self.mutate(channel_id, |pool| {
            pool.momentum = pool.momentum.saturating_add(result.momentum_generated);
            pool.threat = pool.threat.saturating_add(result.threat_generated);
        })
    }

    /// Every tracked pool.
    pub fn all(&self) -> &PoolMap {
        &self.pools
    }

    /// Write the current pools to the store.
    pub fn flush(&mut self) -> TableResult<()> {
        self.store.save(&self.pools)?;
        self.dirty = false;
        Ok(())
    }

    /// True when the store is behind the in-memory pools.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn mutate(&mut self, channel_id: &str, change: impl FnOnce(&mut MomentumPool)) -> MomentumPool {
        let pool = self
            .pools
            .entry(channel_id.to_string())
            .or_insert_with(|| MomentumPool::empty(channel_id));
        change(pool);
        pool.last_updated = Some(Utc::now());
        let pool = pool.clone();
        tracing::debug!(
            channel_id,
            momentum = pool.momentum,
            threat = pool.threat,
            "momentum pool updated"
        );
        self.dirty = true;
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to save momentum pools; keeping in-memory state");
        }
        pool
    }
}
