//! 目的地名称校验
//! Destination name validation

use crate::error::{Error, Result};

/// Longest accepted destination name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Name grammar of one destination variant. Runs once, before the value is
/// constructed, so an invalid destination is never observable.
///
/// 单个目的地变体的名称语法。
pub trait ValidateName {
    fn validate_name(name: &str) -> Result<()>;
}

fn invalid(name: &str, reason: &'static str) -> Error {
    Error::InvalidDestinationName {
        name: name.to_string(),
        reason,
    }
}

/// Rules shared by every variant: non-empty, bounded, no control characters.
pub(crate) fn check_queue_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "name is empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(invalid(name, "name is longer than 255 characters"));
    }
    if name.chars().any(char::is_control) {
        return Err(invalid(name, "name contains control characters"));
    }
    Ok(())
}

/// 主题名称还会被用作路由键，因此不允许空白字符。
/// Topic names double as routing keys and may not contain whitespace.
pub(crate) fn check_topic_name(name: &str) -> Result<()> {
    check_queue_name(name)?;
    if name.chars().any(char::is_whitespace) {
        return Err(invalid(name, "topic name contains whitespace"));
    }
    Ok(())
}
