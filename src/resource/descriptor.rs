//! 资源描述符模块 - 管理资源的身份信息
//! Resource Descriptor Module - Manages resource identity information
//!
//! 每个存活的资源恰好拥有一个描述符。描述符在资源构造时创建，之后不可变，
//! 可以在线程之间自由共享而无需同步。
//!
//! Every live resource owns exactly one descriptor. It is created when the
//! resource is constructed, immutable afterwards, and freely shared between
//! threads without synchronization.

use crate::id::{IdGenerator, ResourceId, process_ids};

/// Identity information a resource exposes to the lifecycle machine.
///
/// Connections, sessions and links carry different descriptors; they only
/// have to agree on how to report the id.
///
/// 资源向生命周期状态机暴露的身份信息。
pub trait ResourceInfo: Send + Sync {
    /// 获取资源ID
    /// Get the resource id
    fn id(&self) -> &ResourceId;
}

/// The basic descriptor: an id and nothing else.
/// 基础描述符：只有一个ID。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceDescriptor {
    id: ResourceId,
}

impl ResourceDescriptor {
    /// 使用给定ID创建描述符
    /// Create a descriptor with the given id
    pub fn new(id: ResourceId) -> Self {
        Self { id }
    }

    /// 使用进程级生成器分配一个新ID
    /// Allocate a fresh id from the process-wide generator
    pub fn generate() -> Self {
        Self::new(process_ids().next_resource_id())
    }

    /// 使用连接级生成器分配一个新ID
    /// Allocate a fresh id from a connection-scoped generator
    pub fn from_generator(ids: &IdGenerator) -> Self {
        Self::new(ids.next_resource_id())
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }
}

impl ResourceInfo for ResourceDescriptor {
    fn id(&self) -> &ResourceId {
        &self.id
    }
}
