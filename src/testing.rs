//! 测试辅助工具模块
//! Test utilities module

#![cfg(test)]

use crate::connection::Connection;
use crate::destination::{DestinationType, TemporaryDestination, TemporaryDestinationRegistry};
use crate::error::{BoxError, Error, Result};
use crate::id::{DestinationId, IdGenerator};
use crate::resource::{ManagedResource, ResourceDescriptor, ResourceLifecycle, ResourceState};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// How a scripted hook should fail.
#[derive(Debug, Clone, Copy)]
pub enum HookFailure {
    /// A plain error that is not a crate error; the machine must wrap it.
    Foreign(&'static str),
    /// A crate error; the machine must pass it through.
    Native(&'static str),
    Panic(&'static str),
}

/// Behaviour of the start/stop hooks of a [`TestResource`].
#[derive(Debug, Default, Clone)]
pub struct HookScript {
    pub fail_start: Option<HookFailure>,
    pub fail_stop: Option<HookFailure>,
    pub delay: Duration,
}

/// A resource whose hooks count calls, track overlap and fail on demand.
#[derive(Debug)]
pub struct TestResource {
    descriptor: ResourceDescriptor,
    lifecycle: ResourceLifecycle,
    closed: AtomicBool,
    script: Mutex<HookScript>,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    observed: Mutex<Vec<ResourceState>>,
}

impl TestResource {
    pub fn new() -> Self {
        Self::with_script(HookScript::default())
    }

    pub fn with_script(script: HookScript) -> Self {
        Self {
            descriptor: ResourceDescriptor::generate(),
            lifecycle: ResourceLifecycle::new(),
            closed: AtomicBool::new(false),
            script: Mutex::new(script),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            observed: Mutex::new(Vec::new()),
        }
    }

    pub fn set_script(&self, script: HookScript) {
        *self.script.lock().unwrap() = script;
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    /// Highest number of hook bodies that ever ran at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// States observed from inside the hooks, in call order.
    pub fn observed_states(&self) -> Vec<ResourceState> {
        self.observed.lock().unwrap().clone()
    }

    fn run_hook(
        &self,
        calls: &AtomicUsize,
        failure: Option<HookFailure>,
        delay: Duration,
    ) -> std::result::Result<(), BoxError> {
        calls.fetch_add(1, Ordering::SeqCst);
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        self.observed.lock().unwrap().push(self.lifecycle.state());
        thread::sleep(delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match failure {
            None => Ok(()),
            Some(HookFailure::Foreign(message)) => Err(message.into()),
            Some(HookFailure::Native(message)) => {
                Err(Box::new(Error::Protocol(message.to_string())))
            }
            Some(HookFailure::Panic(message)) => panic!("{message}"),
        }
    }
}

impl ManagedResource for TestResource {
    type Info = ResourceDescriptor;

    fn info(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    fn lifecycle(&self) -> &ResourceLifecycle {
        &self.lifecycle
    }

    fn start_resource(&self) -> std::result::Result<(), BoxError> {
        let script = self.script.lock().unwrap().clone();
        self.run_hook(&self.start_calls, script.fail_start, script.delay)
    }

    fn stop_resource(&self) -> std::result::Result<(), BoxError> {
        let script = self.script.lock().unwrap().clone();
        self.run_hook(&self.stop_calls, script.fail_stop, script.delay)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ClosedResource(self.id().clone()));
        }
        Ok(())
    }
}

/// A connection that records every teardown it is asked to perform.
#[derive(Debug)]
pub struct MockConnection {
    ids: IdGenerator,
    registry: TemporaryDestinationRegistry,
    destroyed: Mutex<Vec<DestinationId>>,
    destroy_attempts: AtomicUsize,
    fail_destroy: AtomicBool,
    destroy_delay_ms: AtomicU64,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ids: IdGenerator::new("ID:mock"),
            registry: TemporaryDestinationRegistry::new(),
            destroyed: Mutex::new(Vec::new()),
            destroy_attempts: AtomicUsize::new(0),
            fail_destroy: AtomicBool::new(false),
            destroy_delay_ms: AtomicU64::new(0),
        })
    }

    pub fn as_dyn(self: &Arc<Self>) -> Arc<dyn Connection> {
        self.clone()
    }

    pub fn registry(&self) -> &TemporaryDestinationRegistry {
        &self.registry
    }

    pub fn destroyed(&self) -> Vec<DestinationId> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn destroy_attempts(&self) -> usize {
        self.destroy_attempts.load(Ordering::SeqCst)
    }

    pub fn set_fail_destroy(&self, fail: bool) {
        self.fail_destroy.store(fail, Ordering::SeqCst);
    }

    pub fn set_destroy_delay(&self, delay: Duration) {
        self.destroy_delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Connection for MockConnection {
    fn next_temporary_destination_id(&self, kind: DestinationType) -> DestinationId {
        let id = self.ids.next_destination_id(kind);
        self.registry.register(id.clone(), kind);
        id
    }

    fn destroy_temporary_destination(&self, destination: &TemporaryDestination) -> Result<()> {
        self.destroy_attempts.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(self.destroy_delay_ms.load(Ordering::SeqCst)));
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(Error::Protocol("broker refused to delete".to_string()));
        }
        self.registry.deregister(destination.id());
        self.destroyed.lock().unwrap().push(destination.id().clone());
        Ok(())
    }
}
