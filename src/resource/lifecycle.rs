//! 资源生命周期状态机 - 统一管理资源的启动与停止
//! Resource Lifecycle Machine - Unified start/stop management for resources
//!
//! 连接、会话、消费者和生产者都通过实现 [`ManagedResource`] 并持有一个
//! [`ResourceLifecycle`] 来获得 `start`/`stop`。状态机本身只负责状态簿记：
//! 每次转换一次比较并交换，外加一次无条件的最终写入。
//!
//! Connections, sessions, consumers and producers get `start`/`stop` by
//! implementing [`ManagedResource`] and holding a [`ResourceLifecycle`]. The
//! machine only does the bookkeeping: one compare-and-swap per transition plus
//! one unconditional write to finalize it.
//!
//! A caller that loses the compare-and-swap returns immediately without error.
//! It must not assume the resource is started when its call returns; use
//! [`ResourceLifecycle::subscribe`] to wait for a resting state instead.

use super::{descriptor::ResourceInfo, state::ResourceState};
use crate::{
    error::{BoxError, Error, Result},
    id::ResourceId,
};
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::watch;
use tracing::trace;

/// 一次转换的参数
/// Parameters of one transition
struct Transition {
    name: &'static str,
    from: ResourceState,
    via: ResourceState,
    target: ResourceState,
    rollback: ResourceState,
    wrap: fn(ResourceId, BoxError) -> Error,
}

const START: Transition = Transition {
    name: "start",
    from: ResourceState::Stopped,
    via: ResourceState::Starting,
    target: ResourceState::Started,
    rollback: ResourceState::Stopped,
    wrap: |id, source| Error::StartFailed { id, source },
};

const STOP: Transition = Transition {
    name: "stop",
    from: ResourceState::Started,
    via: ResourceState::Stopping,
    target: ResourceState::Stopped,
    rollback: ResourceState::Started,
    wrap: |id, source| Error::StopFailed { id, source },
};

/// The state field of one resource, plus a channel publishing resting states.
///
/// 单个资源的状态字段，以及发布静止状态的通道。
pub struct ResourceLifecycle {
    /// 当前状态（`ResourceState` 的原始编码）
    /// Current state (raw encoding of `ResourceState`)
    state: AtomicU8,
    /// 每次转换完成后发布最终状态
    /// Publishes the final state after every transition
    notifier: watch::Sender<ResourceState>,
}

impl std::fmt::Debug for ResourceLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLifecycle")
            .field("state", &self.state())
            .field("watchers", &self.notifier.receiver_count())
            .finish()
    }
}

impl Default for ResourceLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLifecycle {
    /// 创建处于 `Stopped` 状态的生命周期
    /// Create a lifecycle in the `Stopped` state
    pub fn new() -> Self {
        let (notifier, _) = watch::channel(ResourceState::Stopped);
        Self {
            state: AtomicU8::new(ResourceState::Stopped.as_raw()),
            notifier,
        }
    }

    /// 获取当前状态
    /// Get the current state
    pub fn state(&self) -> ResourceState {
        ResourceState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// 是否处于已启动状态
    /// Whether the state is `Started`
    pub fn is_started(&self) -> bool {
        self.state() == ResourceState::Started
    }

    /// 订阅静止状态的变化
    /// Subscribe to resting-state changes
    pub fn subscribe(&self) -> LifecycleWatcher {
        LifecycleWatcher {
            receiver: self.notifier.subscribe(),
        }
    }

    fn try_begin(&self, transition: &Transition) -> bool {
        self.state
            .compare_exchange(
                transition.from.as_raw(),
                transition.via.as_raw(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    fn finish(&self, state: ResourceState) {
        self.state.store(state.as_raw(), Ordering::Release);
        self.notifier.send_replace(state);
    }

    /// Runs `body` as the sole executor of `transition`. The caller must have
    /// won `try_begin` first.
    fn run_transition<F>(&self, id: &ResourceId, transition: &Transition, body: F) -> Result<()>
    where
        F: FnOnce() -> std::result::Result<(), BoxError>,
    {
        trace!(
            id = %id,
            transition = transition.name,
            from = %transition.from,
            to = %transition.via,
            "Resource transition begun"
        );

        let mut guard = FinalizeGuard {
            lifecycle: self,
            id,
            outcome: transition.rollback,
        };

        match body() {
            Ok(()) => {
                guard.outcome = transition.target;
                Ok(())
            }
            Err(err) => Err(translate(err, |source| (transition.wrap)(id.clone(), source))),
        }
    }
}

/// 在任何退出路径（包括 panic 展开）上写入最终状态
/// Writes the final state on every exit path, unwinding included
struct FinalizeGuard<'a> {
    lifecycle: &'a ResourceLifecycle,
    id: &'a ResourceId,
    outcome: ResourceState,
}

impl Drop for FinalizeGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.finish(self.outcome);
        trace!(id = %self.id, state = %self.outcome, "Resource transition finalized");
    }
}

/// Failures that are already crate errors pass through; anything else is
/// wrapped so the cause stays reachable through `source()`.
fn translate(err: BoxError, wrap: impl FnOnce(BoxError) -> Error) -> Error {
    match err.downcast::<Error>() {
        Ok(native) => *native,
        Err(other) => wrap(other),
    }
}

/// A resource driven by the lifecycle machine.
///
/// Implementors supply the descriptor, the lifecycle field and three hooks;
/// `start`, `stop`, `is_started` and `id` come for free.
///
/// 由生命周期状态机驱动的资源。
pub trait ManagedResource {
    /// 资源的描述符类型
    /// Descriptor type of the resource
    type Info: ResourceInfo;

    /// 获取资源描述符
    /// Get the resource descriptor
    fn info(&self) -> &Self::Info;

    /// 获取驱动该资源的生命周期状态机
    /// Get the lifecycle machine driving this resource
    fn lifecycle(&self) -> &ResourceLifecycle;

    /// Protocol-specific start work. Never called concurrently with itself or
    /// with `stop_resource` on the same instance.
    fn start_resource(&self) -> std::result::Result<(), BoxError>;

    /// Protocol-specific stop work.
    fn stop_resource(&self) -> std::result::Result<(), BoxError>;

    /// Fails with [`Error::ClosedResource`] once the resource is permanently closed.
    fn ensure_open(&self) -> Result<()>;

    /// 获取资源ID
    /// Get the resource id
    fn id(&self) -> &ResourceId {
        self.info().id()
    }

    /// 资源是否已启动
    /// Whether the resource is started
    fn is_started(&self) -> bool {
        self.lifecycle().is_started()
    }

    /// 启动资源
    /// Start the resource
    ///
    /// A no-op when the resource is already started or another caller is in
    /// the middle of a transition.
    fn start(&self) -> Result<()> {
        self.ensure_open()?;
        let lifecycle = self.lifecycle();
        if lifecycle.is_started() || !lifecycle.try_begin(&START) {
            trace!(id = %self.id(), state = %lifecycle.state(), "Start skipped");
            return Ok(());
        }
        lifecycle.run_transition(self.id(), &START, || self.start_resource())
    }

    /// 停止资源
    /// Stop the resource
    ///
    /// Only a resource that is exactly `Started` is stopped; any other state
    /// makes this a no-op.
    fn stop(&self) -> Result<()> {
        self.ensure_open()?;
        let lifecycle = self.lifecycle();
        if !lifecycle.try_begin(&STOP) {
            trace!(id = %self.id(), state = %lifecycle.state(), "Stop skipped");
            return Ok(());
        }
        lifecycle.run_transition(self.id(), &STOP, || self.stop_resource())
    }
}

/// Waits for the lifecycle to reach a resting state.
///
/// 等待生命周期到达某个静止状态。
#[derive(Debug, Clone)]
pub struct LifecycleWatcher {
    receiver: watch::Receiver<ResourceState>,
}

impl LifecycleWatcher {
    /// The last resting state published.
    pub fn current(&self) -> ResourceState {
        *self.receiver.borrow()
    }

    /// 等待直到生命周期发布 `target`；如果已经处于该状态则立即返回。
    /// Waits until the lifecycle publishes `target`; returns at once if it
    /// already has.
    pub async fn wait_for(&mut self, target: ResourceState) -> Result<()> {
        self.receiver
            .wait_for(|state| *state == target)
            .await
            .map(|_| ())
            .map_err(|_| Error::ChannelClosed)
    }

    /// 等待下一次发布
    /// Waits for the next publication
    pub async fn changed(&mut self) -> Result<ResourceState> {
        self.receiver
            .changed()
            .await
            .map_err(|_| Error::ChannelClosed)?;
        Ok(*self.receiver.borrow_and_update())
    }
}
