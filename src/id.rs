//! 标识符类型与生成器
//! Identifier types and generators
//!
//! 资源ID与临时目的地ID是两种互不相关的标识符，但都由同一个按连接划分的
//! 生成器分配，因此在该连接范围内保持唯一。
//!
//! Resource ids and temporary destination ids are unrelated identifiers, but
//! both are handed out by the same connection-scoped generator and are
//! therefore unique within that connection.

use crate::config::Config;
use crate::destination::DestinationType;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Identifier of a resource instance. Cheap to clone.
///
/// 资源实例的标识符。克隆开销很小。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(Arc<str>);

/// Identifier of a temporary destination. It embeds the generator prefix, so it
/// stays addressable outside the connection that created it.
///
/// 临时目的地的标识符。其中嵌入了生成器前缀，因此在创建它的连接之外仍可寻址。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationId(Arc<str>);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DestinationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&str> for DestinationId {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for DestinationId {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static PROCESS_IDS: LazyLock<IdGenerator> =
    LazyLock::new(|| IdGenerator::new(format!("ID:{:016x}", rand::random::<u64>())));

/// The generator shared by the whole process.
///
/// 整个进程共享的生成器。
pub fn process_ids() -> &'static IdGenerator {
    &PROCESS_IDS
}

/// Hands out identifiers of the form `<prefix>:<seq>`.
///
/// 分配形如 `<prefix>:<seq>` 的标识符。
#[derive(Debug)]
pub struct IdGenerator {
    prefix: Arc<str>,
    temporary_queue_prefix: Arc<str>,
    temporary_topic_prefix: Arc<str>,
    sequence: AtomicU64,
}

impl IdGenerator {
    /// 使用给定前缀和默认的临时目的地段创建生成器
    /// Creates a generator with the given prefix and default temporary segments
    pub fn new(prefix: impl Into<String>) -> Self {
        let defaults = Config::default().destinations;
        Self {
            prefix: Arc::from(prefix.into()),
            temporary_queue_prefix: Arc::from(defaults.temporary_queue_prefix),
            temporary_topic_prefix: Arc::from(defaults.temporary_topic_prefix),
            sequence: AtomicU64::new(0),
        }
    }

    /// 根据配置创建生成器。未配置客户端ID时使用随机后缀。
    /// Creates a generator from configuration. Falls back to a random suffix
    /// when no client id is configured.
    pub fn from_config(config: &Config) -> Self {
        let prefix = match &config.client_id {
            Some(client_id) => format!("ID:{client_id}"),
            None => format!("ID:kestrel-{:08x}", rand::random::<u32>()),
        };
        Self {
            prefix: Arc::from(prefix),
            temporary_queue_prefix: Arc::from(config.destinations.temporary_queue_prefix.as_str()),
            temporary_topic_prefix: Arc::from(config.destinations.temporary_topic_prefix.as_str()),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 分配下一个资源ID
    /// Allocates the next resource id
    pub fn next_resource_id(&self) -> ResourceId {
        ResourceId::from(format!("{}:{}", self.prefix, self.next_sequence()))
    }

    /// 为给定类型的临时目的地分配下一个ID
    /// Allocates the next id for a temporary destination of the given kind
    ///
    /// Durable kinds share the queue segment; callers only ask for temporary kinds.
    pub fn next_destination_id(&self, kind: DestinationType) -> DestinationId {
        let segment = match kind {
            DestinationType::TemporaryTopic | DestinationType::Topic => {
                &self.temporary_topic_prefix
            }
            DestinationType::TemporaryQueue | DestinationType::Queue => {
                &self.temporary_queue_prefix
            }
        };
        DestinationId::from(format!("{}:{}:{}", self.prefix, segment, self.next_sequence()))
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}
