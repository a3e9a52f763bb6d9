//! 持久目的地：按需创建的无状态值。
//! Durable destinations: stateless values created on demand.

use super::name::{ValidateName, check_queue_name, check_topic_name};
use crate::error::Result;
use std::sync::Arc;

/// A durable queue. Equal to any other queue with the same name.
/// 持久队列。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Queue {
    name: Arc<str>,
}

/// A durable topic. Equal to any other topic with the same name.
/// 持久主题。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    name: Arc<str>,
}

impl Queue {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        Ok(Self {
            name: Arc::from(name),
        })
    }

    pub fn queue_name(&self) -> &str {
        &self.name
    }
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate_name(&name)?;
        Ok(Self {
            name: Arc::from(name),
        })
    }

    pub fn topic_name(&self) -> &str {
        &self.name
    }
}

impl ValidateName for Queue {
    fn validate_name(name: &str) -> Result<()> {
        check_queue_name(name)
    }
}

impl ValidateName for Topic {
    fn validate_name(name: &str) -> Result<()> {
        check_topic_name(name)
    }
}
