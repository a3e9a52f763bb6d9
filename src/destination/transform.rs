//! 外部目的地转换
//! Foreign destination transformation
//!
//! 调用者可能传入由同一抽象消息API的其他实现构造的目的地。转换器把它们
//! 映射为本库的具体目的地类型，之后才交给协议层。
//!
//! Callers may hand in destinations built by another implementation of the
//! same abstract messaging API. The transformer maps them onto this crate's
//! concrete destination type before they reach the protocol layer.

use super::{Destination, DestinationType, Queue, TemporaryQueue, TemporaryTopic, Topic};
use crate::{
    connection::Connection,
    error::{Error, Result, UnresolvedReason},
};
use std::sync::Arc;
use tracing::trace;

/// The abstract destination capability: a declared kind plus kind-specific
/// name accessors.
///
/// 抽象目的地能力：声明的类型以及按类型区分的名称访问器。
pub trait AbstractDestination: Send + Sync {
    /// The declared kind as a capability symbol, e.g. `"temporary-queue"`.
    /// See [`DestinationType::capability`].
    fn destination_kind(&self) -> &str;

    fn queue_name(&self) -> Option<&str> {
        None
    }

    fn topic_name(&self) -> Option<&str> {
        None
    }

    /// 本库的具体目的地返回自身。
    /// Concrete destinations of this crate return themselves.
    fn as_destination(&self) -> Option<&Destination> {
        None
    }
}

impl AbstractDestination for Destination {
    fn destination_kind(&self) -> &str {
        self.destination_type().capability()
    }

    fn queue_name(&self) -> Option<&str> {
        self.is_queue().then(|| self.name())
    }

    fn topic_name(&self) -> Option<&str> {
        self.is_topic().then(|| self.name())
    }

    fn as_destination(&self) -> Option<&Destination> {
        Some(self)
    }
}

fn unresolved(reason: UnresolvedReason, kind: &str) -> Error {
    Error::UnresolvedDestination {
        reason,
        kind: kind.to_string(),
    }
}

/// Maps `destination` onto a concrete [`Destination`] bound to `connection`.
///
/// - a concrete destination is returned as-is (a shared handle, not revalidated);
/// - a foreign temporary destination becomes a rebuilt handle that does not
///   delete the destination when dropped;
/// - `None` passes through;
/// - an unknown kind or a missing name fails with `UnresolvedDestination`.
///
/// 将外部目的地映射为绑定到 `connection` 的具体目的地。
pub fn transform(
    connection: &Arc<dyn Connection>,
    destination: Option<&dyn AbstractDestination>,
) -> Result<Option<Destination>> {
    let Some(destination) = destination else {
        return Ok(None);
    };

    if let Some(native) = destination.as_destination() {
        return Ok(Some(native.clone()));
    }

    let declared = destination.destination_kind();
    let kind = DestinationType::from_capability(declared)
        .ok_or_else(|| unresolved(UnresolvedReason::UnrecognizedKind, declared))?;

    let name = match kind {
        DestinationType::Queue | DestinationType::TemporaryQueue => destination.queue_name(),
        DestinationType::Topic | DestinationType::TemporaryTopic => destination.topic_name(),
    };
    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(unresolved(UnresolvedReason::MissingName, declared)),
    };

    let resolved = match kind {
        DestinationType::Queue => Destination::Queue(Queue::new(name)?),
        DestinationType::TemporaryQueue => {
            Destination::TemporaryQueue(TemporaryQueue::from_name(connection, name)?)
        }
        DestinationType::Topic => Destination::Topic(Topic::new(name)?),
        DestinationType::TemporaryTopic => {
            Destination::TemporaryTopic(TemporaryTopic::from_name(connection, name)?)
        }
    };

    trace!(destination = %resolved, "Foreign destination resolved");
    Ok(Some(resolved))
}
