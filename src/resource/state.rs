//! Defines the lifecycle states of a resource.
//!
//! 定义资源的生命周期状态。

use std::fmt;

/// The lifecycle state of a resource.
/// 资源的生命周期状态。
///
/// `Starting` and `Stopping` are transient: only the caller that entered them
/// can observe them as its own state, and they always resolve to `Started` or
/// `Stopped` before that caller returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResourceState {
    /// The resource is not running. Initial state.
    /// 资源未运行。初始状态。
    Stopped = 0,

    /// A caller won the start transition and is running the start hook.
    /// 某个调用者赢得了启动转换，正在执行启动钩子。
    Starting = 1,

    /// The resource is running.
    /// 资源正在运行。
    Started = 2,

    /// A caller won the stop transition and is running the stop hook.
    /// 某个调用者赢得了停止转换，正在执行停止钩子。
    Stopping = 3,
}

impl ResourceState {
    pub(crate) fn as_raw(self) -> u8 {
        self as u8
    }

    pub(crate) fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Stopped,
            1 => Self::Starting,
            2 => Self::Started,
            3 => Self::Stopping,
            other => {
                debug_assert!(false, "invalid resource state encoding: {other}");
                Self::Stopped
            }
        }
    }

    /// Returns true for `Stopped` and `Started`.
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Stopped | Self::Started)
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "Stopped",
            Self::Starting => "Starting",
            Self::Started => "Started",
            Self::Stopping => "Stopping",
        };
        f.write_str(name)
    }
}
