//! 连接协作者接口。
//! The connection collaborator interface.
//!
//! 协议引擎和网络传输不在本库范围内；临时目的地只需要连接提供下面两项能力。
//! The protocol engine and transport live elsewhere; temporary destinations
//! only need the two capabilities below from a connection.

use crate::{
    destination::{DestinationType, TemporaryDestination},
    error::Result,
    id::DestinationId,
};

/// What a temporary destination needs from the connection that owns it.
///
/// 临时目的地对其所属连接的需求。
pub trait Connection: Send + Sync {
    /// Allocates the id of a new temporary destination of `kind`.
    /// 为新的 `kind` 类型临时目的地分配ID。
    fn next_temporary_destination_id(&self, kind: DestinationType) -> DestinationId;

    /// Destroys the destination server-side. Called from `delete` or from the
    /// drop of the last owning handle, and never again once it has succeeded.
    /// Runs while the destination holds its own lock, so it must not call
    /// [`TemporaryDestination::connection`] or `delete` on `destination`.
    /// 在服务端销毁目的地。成功之后不会再次调用。
    fn destroy_temporary_destination(&self, destination: &TemporaryDestination) -> Result<()>;
}
