// Component pool: concurrent registry of the components on one side of a splitter
//
// Writers (call-control threads) publish a fresh copy of the entry list through
// an ArcSwap; the mixing hot path only ever loads the current snapshot. A pass
// keeps its snapshot alive for as long as it iterates, so removal during a pass
// never frees anything the pass can still reach.

use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::audio::component::AudioComponent;
use crate::audio::types::ComponentId;

/// A registered component
#[derive(Clone)]
pub struct PoolEntry {
    pub id: ComponentId,
    pub component: Arc<dyn AudioComponent>,
}

impl std::fmt::Debug for PoolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolEntry").field("id", &self.id).finish()
    }
}

/// Lock-free id -> component registry with snapshot iteration
pub struct ComponentPool {
    name: &'static str,
    entries: ArcSwap<Vec<PoolEntry>>,
}

impl ComponentPool {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Add a component, replacing any entry already registered under `id`
    pub fn register(&self, id: ComponentId, component: Arc<dyn AudioComponent>) {
        let previous = self.entries.rcu(|current| {
            let mut next: Vec<PoolEntry> = Vec::with_capacity(current.len() + 1);
            let mut replaced = false;
            for entry in current.iter() {
                if entry.id == id {
                    next.push(PoolEntry {
                        id,
                        component: component.clone(),
                    });
                    replaced = true;
                } else {
                    next.push(entry.clone());
                }
            }
            if !replaced {
                next.push(PoolEntry {
                    id,
                    component: component.clone(),
                });
            }
            next
        });

        if previous.iter().any(|entry| entry.id == id) {
            debug!("🔁 {}: Replaced component {}", self.name, id);
        } else {
            info!(
                "➕ {}: Registered component {} (total: {})",
                self.name,
                id,
                previous.len() + 1
            );
        }
    }

    /// Remove the component registered under `id`. Returns whether an entry
    /// was removed; removing an absent id is a no-op.
    pub fn remove(&self, id: ComponentId) -> bool {
        if !self.contains(id) {
            return false;
        }

        let previous = self.entries.rcu(|current| {
            current
                .iter()
                .filter(|entry| entry.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });

        let removed = previous.iter().any(|entry| entry.id == id);
        if removed {
            info!(
                "➖ {}: Released component {} (total: {})",
                self.name,
                id,
                previous.len() - 1
            );
        }
        removed
    }

    /// Drop every registration
    pub fn clear(&self) {
        let previous = self.entries.swap(Arc::new(Vec::new()));
        if !previous.is_empty() {
            info!("🧹 {}: Cleared {} components", self.name, previous.len());
        }
    }

    /// Snapshot the live entries for one mixing pass
    pub fn begin_pass(&self) -> PoolPass {
        PoolPass {
            snapshot: self.entries.load_full(),
        }
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.entries.load().iter().any(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    pub fn ids(&self) -> Vec<ComponentId> {
        self.entries.load().iter().map(|entry| entry.id).collect()
    }
}

impl std::fmt::Debug for ComponentPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentPool")
            .field("name", &self.name)
            .field("len", &self.len())
            .finish()
    }
}

/// Cursor over the entries that were live when the pass began
pub struct PoolPass {
    snapshot: Arc<Vec<PoolEntry>>,
}

impl PoolPass {
    pub fn iter(&self) -> std::slice::Iter<'_, PoolEntry> {
        self.snapshot.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

impl<'a> IntoIterator for &'a PoolPass {
    type Item = &'a PoolEntry;
    type IntoIter = std::slice::Iter<'a, PoolEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
