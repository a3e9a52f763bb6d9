//! 临时目的地
//! Temporary destinations
//!
//! 临时目的地与创建它的连接之间是弱关联：连接并不拥有目的地的生命周期，
//! 但目的地需要连接的配合才能在服务端注销自身。删除在持有锁期间完成
//! “取出、拆除、失败时放回”，因此并发的 `delete` 会等待前一次的结果。
//! 只有通过 `create` 创建的句柄在 drop 时自动删除；按ID或名称重建的句柄
//! 只是引用别处拥有的目的地。
//!
//! A temporary destination is weakly associated with the connection that
//! created it: the connection does not own the destination's lifetime, but the
//! destination needs the connection to deregister itself server-side. Delete
//! takes the connection reference out, tears down and puts the reference back
//! on failure, all under one lock, so a concurrent `delete` waits for the
//! outcome of the one in flight. Only handles made by `create` delete on drop;
//! handles rebuilt from an id or a name refer to a destination owned elsewhere.

use super::{
    DestinationType,
    name::{ValidateName, check_queue_name, check_topic_name},
};
use crate::{connection::Connection, error::Result, id::DestinationId};
use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicBool, Ordering},
    },
};
use tracing::{debug, warn};

/// State shared by every handle of one temporary destination.
///
/// 同一临时目的地所有句柄共享的状态。
pub struct TemporaryDestination {
    id: DestinationId,
    name: Arc<str>,
    kind: DestinationType,
    /// 删除后清空
    /// Cleared on delete
    connection: Mutex<Option<Weak<dyn Connection>>>,
    deleted: AtomicBool,
    /// 为 true 时 drop 会删除目的地
    /// Deletes on drop when true
    owned: bool,
}

impl fmt::Debug for TemporaryDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryDestination")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("deleted", &self.is_deleted())
            .field("owned", &self.owned)
            .finish()
    }
}

impl TemporaryDestination {
    fn new(
        connection: &Arc<dyn Connection>,
        kind: DestinationType,
        id: DestinationId,
        name: String,
        owned: bool,
    ) -> Self {
        Self {
            id,
            name: Arc::from(name),
            kind,
            connection: Mutex::new(Some(Arc::downgrade(connection))),
            deleted: AtomicBool::new(false),
            owned,
        }
    }

    pub fn id(&self) -> &DestinationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn destination_type(&self) -> DestinationType {
        self.kind
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::Acquire)
    }

    /// 该句柄是否由 `create` 创建并负责在 drop 时删除。
    /// Whether this handle came from `create` and deletes the destination on drop.
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// 所属连接；删除后或连接已释放时返回 `None`。
    /// The owning connection; `None` once deleted or after the connection is gone.
    pub fn connection(&self) -> Option<Arc<dyn Connection>> {
        self.slot().as_ref().and_then(Weak::upgrade)
    }

    /// 删除临时目的地
    /// Delete the temporary destination
    ///
    /// The first call asks the owning connection to destroy the destination
    /// server-side and clears the connection reference; later calls find the
    /// reference gone and do nothing. The lock is held across the teardown, so
    /// a concurrent caller waits for it: if it failed, the reference is back
    /// in place and the waiting caller makes its own attempt.
    ///
    /// A handle rebuilt with `with_id`, `with_name` or `from_name` has its own
    /// state: deleting through it tears the destination down, but the handle
    /// from `create` still reports it live. Delete through one of them only.
    pub fn delete(&self) -> Result<()> {
        let mut slot = self.slot();
        let Some(connection) = slot.take() else {
            return Ok(());
        };

        let Some(owner) = connection.upgrade() else {
            self.deleted.store(true, Ordering::Release);
            debug!(id = %self.id, "Owning connection already released, nothing to tear down");
            return Ok(());
        };

        match owner.destroy_temporary_destination(self) {
            Ok(()) => {
                self.deleted.store(true, Ordering::Release);
                debug!(id = %self.id, kind = %self.kind, "Temporary destination deleted");
                Ok(())
            }
            Err(err) => {
                *slot = Some(connection);
                Err(err)
            }
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Weak<dyn Connection>>> {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TemporaryDestination {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        if let Err(err) = self.delete() {
            warn!(id = %self.id, error = %err, "Failed to delete temporary destination on drop");
        }
    }
}

macro_rules! temporary_variant {
    ($(#[$meta:meta])* $variant:ident, $kind:expr, $name_accessor:ident, $check:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $variant {
            inner: Arc<TemporaryDestination>,
        }

        impl $variant {
            /// 由连接分配新ID并创建；返回的句柄拥有该目的地
            /// Create with a fresh id allocated by the connection; the handle
            /// owns the destination and deletes it on drop
            pub fn create(connection: &Arc<dyn Connection>) -> Result<Self> {
                let id = connection.next_temporary_destination_id($kind);
                let name = id.to_string();
                Self::build(connection, id, name, true)
            }

            /// Rebuilds a handle from an id; the name is the id's string form.
            pub fn with_id(connection: &Arc<dyn Connection>, id: DestinationId) -> Result<Self> {
                let name = id.to_string();
                Self::with_name(connection, id, name)
            }

            /// The id is derived from the name. Used for destinations that
            /// arrive without an id of their own.
            pub fn from_name(
                connection: &Arc<dyn Connection>,
                name: impl Into<String>,
            ) -> Result<Self> {
                let name = name.into();
                let id = DestinationId::from(name.as_str());
                Self::with_name(connection, id, name)
            }

            /// 重建的句柄不会在 drop 时删除目的地。
            /// Rebuilt handles do not delete the destination on drop.
            pub fn with_name(
                connection: &Arc<dyn Connection>,
                id: DestinationId,
                name: impl Into<String>,
            ) -> Result<Self> {
                Self::build(connection, id, name.into(), false)
            }

            fn build(
                connection: &Arc<dyn Connection>,
                id: DestinationId,
                name: String,
                owned: bool,
            ) -> Result<Self> {
                Self::validate_name(&name)?;
                Ok(Self {
                    inner: Arc::new(TemporaryDestination::new(connection, $kind, id, name, owned)),
                })
            }

            pub fn $name_accessor(&self) -> &str {
                self.inner.name()
            }
        }

        impl ValidateName for $variant {
            fn validate_name(name: &str) -> Result<()> {
                $check(name)
            }
        }

        impl Deref for $variant {
            type Target = TemporaryDestination;

            fn deref(&self) -> &TemporaryDestination {
                &self.inner
            }
        }

        impl PartialEq for $variant {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.inner, &other.inner) || self.inner.id == other.inner.id
            }
        }

        impl Eq for $variant {}

        impl Hash for $variant {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.inner.id.hash(state);
            }
        }
    };
}

temporary_variant!(
    /// A temporary queue. Compared by destination id.
    /// 临时队列。按目的地ID比较。
    TemporaryQueue,
    DestinationType::TemporaryQueue,
    queue_name,
    check_queue_name
);

temporary_variant!(
    /// A temporary topic. Compared by destination id.
    /// 临时主题。按目的地ID比较。
    TemporaryTopic,
    DestinationType::TemporaryTopic,
    topic_name,
    check_topic_name
);
