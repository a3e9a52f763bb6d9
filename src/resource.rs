//! 资源生命周期管理模块
//! Resource Lifecycle Management Module
//!
//! 该模块提供协议资源（连接、会话、消费者、生产者）共用的启动/停止状态机、
//! 状态定义和资源描述符。
//!
//! This module provides the start/stop state machine, the state definitions and
//! the resource descriptor shared by every protocol-bearing resource
//! (connection, session, consumer, producer).

mod descriptor;
mod lifecycle;
mod state;


pub use descriptor::{ResourceDescriptor, ResourceInfo};
pub use lifecycle::{LifecycleWatcher, ManagedResource, ResourceLifecycle};
pub use state::ResourceState;
