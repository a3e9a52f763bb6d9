//! 定义了消息客户端的可配置参数。
//! Defines configurable parameters for the messaging client.

/// A structure containing all configurable parameters for a client.
///
/// 包含客户端所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct Config {
    /// The client id. When set, it seeds every identifier a connection hands out.
    /// 客户端ID。设置后，连接分配的所有标识符都以它为前缀。
    pub client_id: Option<String>,

    /// Destination-related parameters.
    /// 目的地相关参数。
    pub destinations: DestinationConfig,

    /// Tracing filter used when `RUST_LOG` is not set.
    /// 未设置 `RUST_LOG` 时使用的 tracing 过滤器。
    pub log_filter: String,
}

/// Destination-related parameters.
///
/// 目的地相关参数。
#[derive(Debug, Clone)]
pub struct DestinationConfig {
    /// Segment inserted into generated temporary queue ids.
    /// 生成的临时队列ID中插入的段。
    pub temporary_queue_prefix: String,
    /// Segment inserted into generated temporary topic ids.
    /// 生成的临时主题ID中插入的段。
    pub temporary_topic_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            destinations: DestinationConfig::default(),
            log_filter: "warn".to_string(),
        }
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            temporary_queue_prefix: "TempQueue".to_string(),
            temporary_topic_prefix: "TempTopic".to_string(),
        }
    }
}
