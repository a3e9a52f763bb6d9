//! 临时目的地注册表
//! Temporary destination registry
//!
//! 供连接实现使用：记录自己创建的临时目的地，并在拆除时注销。
//! For connection implementations: tracks the temporary destinations a
//! connection created and forgets them on teardown.

use super::DestinationType;
use crate::id::DestinationId;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct TemporaryDestinationRegistry {
    entries: DashMap<DestinationId, DestinationType>,
}

impl TemporaryDestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already registered.
    pub fn register(&self, id: DestinationId, kind: DestinationType) -> bool {
        self.entries.insert(id, kind).is_none()
    }

    /// Returns false if the id was not registered.
    pub fn deregister(&self, id: &DestinationId) -> bool {
        self.entries.remove(id).is_some()
    }

    pub fn contains(&self, id: &DestinationId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn kind_of(&self, id: &DestinationId) -> Option<DestinationType> {
        self.entries.get(id).map(|entry| *entry.value())
    }

    pub fn ids(&self) -> Vec<DestinationId> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
