//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use crate::id::ResourceId;
use thiserror::Error;

/// Boxed failure returned by the hooks a concrete resource supplies.
///
/// 具体资源提供的钩子所返回的装箱错误。
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why the transformer could not map a foreign destination.
///
/// 转换器无法映射外部目的地的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The declared kind is not one of the four known destination kinds.
    /// 声明的类型不是已知的四种目的地类型之一。
    UnrecognizedKind,
    /// The kind-appropriate name accessor returned nothing or an empty string.
    /// 对应类型的名称访问器返回空值或空字符串。
    MissingName,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedKind => f.write_str("unrecognized kind"),
            Self::MissingName => f.write_str("missing name"),
        }
    }
}

/// The primary error type for the messaging client core.
/// 消息客户端核心的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// An operation was attempted on a permanently closed resource.
    /// 在已永久关闭的资源上尝试了操作。
    #[error("resource {0} is closed")]
    ClosedResource(ResourceId),

    /// The resource's start hook failed. The state was rolled back to `Stopped`.
    /// 资源的启动钩子失败，状态已回滚到 `Stopped`。
    #[error("failed to start resource {id}")]
    StartFailed {
        id: ResourceId,
        #[source]
        source: BoxError,
    },

    /// The resource's stop hook failed. The state was rolled back to `Started`.
    /// 资源的停止钩子失败，状态已回滚到 `Started`。
    #[error("failed to stop resource {id}")]
    StopFailed {
        id: ResourceId,
        #[source]
        source: BoxError,
    },

    /// A destination name was rejected at construction time.
    /// 目的地名称在构造时被拒绝。
    #[error("invalid destination name {name:?}: {reason}")]
    InvalidDestinationName { name: String, reason: &'static str },

    /// A foreign destination could not be mapped onto a concrete destination.
    /// 外部目的地无法映射为具体目的地。
    #[error("unresolved destination: {reason} (kind {kind:?})")]
    UnresolvedDestination {
        reason: UnresolvedReason,
        kind: String,
    },

    /// The protocol layer behind a connection reported a failure.
    /// 连接背后的协议层报告了失败。
    #[error("protocol error: {0}")]
    Protocol(String),

    /// An internal channel for communication between tasks was closed unexpectedly.
    /// 用于任务间通信的内部通道意外关闭。
    #[error("Internal channel is broken")]
    ChannelClosed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;
