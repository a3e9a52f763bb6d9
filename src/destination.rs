//! 目的地模型：队列与主题，持久与临时。
//! The destination model: queues and topics, durable and temporary.
//!
//! 持久目的地是无状态的值，按名称和类型比较。临时目的地由连接创建，按ID比较，
//! 并在删除时请求所属连接拆除服务端对象。
//!
//! Durable destinations are stateless values compared by name and type.
//! Temporary destinations are created by a connection, compared by id, and ask
//! their owning connection to tear down the server-side object on delete.

mod durable;
mod name;
mod registry;
mod temporary;
mod transform;


pub use durable::{Queue, Topic};
pub use name::{MAX_NAME_LENGTH, ValidateName};
pub use registry::TemporaryDestinationRegistry;
pub use temporary::{TemporaryDestination, TemporaryQueue, TemporaryTopic};
pub use transform::{AbstractDestination, transform};

use crate::id::DestinationId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The resolved type of a destination.
///
/// 目的地的解析类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationType {
    Queue,
    Topic,
    TemporaryQueue,
    TemporaryTopic,
}

impl DestinationType {
    pub fn is_queue(self) -> bool {
        matches!(self, Self::Queue | Self::TemporaryQueue)
    }

    pub fn is_topic(self) -> bool {
        !self.is_queue()
    }

    pub fn is_temporary(self) -> bool {
        matches!(self, Self::TemporaryQueue | Self::TemporaryTopic)
    }

    /// The capability symbol a destination declares for this type.
    /// 目的地为此类型声明的能力符号。
    pub fn capability(self) -> &'static str {
        match self {
            Self::Queue => "queue",
            Self::Topic => "topic",
            Self::TemporaryQueue => "temporary-queue",
            Self::TemporaryTopic => "temporary-topic",
        }
    }

    /// 解析能力符号；未知符号返回 `None`。
    /// Parses a capability symbol; unknown symbols yield `None`.
    pub fn from_capability(symbol: &str) -> Option<Self> {
        match symbol {
            "queue" => Some(Self::Queue),
            "topic" => Some(Self::Topic),
            "temporary-queue" => Some(Self::TemporaryQueue),
            "temporary-topic" => Some(Self::TemporaryTopic),
            _ => None,
        }
    }

    pub(crate) fn hash_code(self) -> i32 {
        match self {
            Self::Queue => 1,
            Self::Topic => 2,
            Self::TemporaryQueue => 3,
            Self::TemporaryTopic => 4,
        }
    }
}

impl fmt::Display for DestinationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.capability())
    }
}

/// Polynomial string hash (`h = 31 * h + c`), stable across runs.
pub(crate) fn string_hash(value: &str) -> i32 {
    value
        .chars()
        .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32))
}

/// An addressable endpoint.
///
/// Cloning is cheap: durable variants share their name, temporary variants
/// share their state, so every clone of a temporary destination refers to the
/// same server-side object.
///
/// 可寻址的端点。克隆开销很小。
#[derive(Debug, Clone)]
pub enum Destination {
    Queue(Queue),
    Topic(Topic),
    TemporaryQueue(TemporaryQueue),
    TemporaryTopic(TemporaryTopic),
}

impl Destination {
    pub fn destination_type(&self) -> DestinationType {
        match self {
            Self::Queue(_) => DestinationType::Queue,
            Self::Topic(_) => DestinationType::Topic,
            Self::TemporaryQueue(_) => DestinationType::TemporaryQueue,
            Self::TemporaryTopic(_) => DestinationType::TemporaryTopic,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Queue(queue) => queue.queue_name(),
            Self::Topic(topic) => topic.topic_name(),
            Self::TemporaryQueue(queue) => queue.queue_name(),
            Self::TemporaryTopic(topic) => topic.topic_name(),
        }
    }

    pub fn is_queue(&self) -> bool {
        self.destination_type().is_queue()
    }

    pub fn is_topic(&self) -> bool {
        self.destination_type().is_topic()
    }

    pub fn is_temporary(&self) -> bool {
        self.destination_type().is_temporary()
    }

    /// 临时目的地的共享状态；持久目的地返回 `None`。
    /// Shared state of a temporary destination; `None` for durable ones.
    pub fn as_temporary(&self) -> Option<&TemporaryDestination> {
        match self {
            Self::TemporaryQueue(queue) => Some(queue),
            Self::TemporaryTopic(topic) => Some(topic),
            Self::Queue(_) | Self::Topic(_) => None,
        }
    }

    pub fn destination_id(&self) -> Option<&DestinationId> {
        self.as_temporary().map(TemporaryDestination::id)
    }

    /// `hash(name) * 31 + hash(type)` for durable destinations, `hash(id)` for
    /// temporary ones.
    pub fn hash_code(&self) -> i32 {
        match self.as_temporary() {
            Some(temporary) => string_hash(temporary.id().as_str()),
            None => string_hash(self.name())
                .wrapping_mul(31)
                .wrapping_add(self.destination_type().hash_code()),
        }
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Queue(a), Self::Queue(b)) => a == b,
            (Self::Topic(a), Self::Topic(b)) => a == b,
            (Self::TemporaryQueue(a), Self::TemporaryQueue(b)) => a == b,
            (Self::TemporaryTopic(a), Self::TemporaryTopic(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Destination {}

impl Hash for Destination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queue(queue) => write!(f, "queue://{}", queue.queue_name()),
            Self::Topic(topic) => write!(f, "topic://{}", topic.topic_name()),
            Self::TemporaryQueue(queue) => write!(f, "temp-queue://{}", queue.id()),
            Self::TemporaryTopic(topic) => write!(f, "temp-topic://{}", topic.id()),
        }
    }
}

impl From<Queue> for Destination {
    fn from(value: Queue) -> Self {
        Self::Queue(value)
    }
}

impl From<Topic> for Destination {
    fn from(value: Topic) -> Self {
        Self::Topic(value)
    }
}

impl From<TemporaryQueue> for Destination {
    fn from(value: TemporaryQueue) -> Self {
        Self::TemporaryQueue(value)
    }
}

impl From<TemporaryTopic> for Destination {
    fn from(value: TemporaryTopic) -> Self {
        Self::TemporaryTopic(value)
    }
}
