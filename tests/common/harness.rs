//! tests/common/harness.rs
use kestrel_messaging::{
    config::Config,
    connection::Connection,
    destination::{DestinationType, TemporaryDestination, TemporaryDestinationRegistry},
    error::{BoxError, Error, Result},
    id::{DestinationId, IdGenerator, ResourceId},
    resource::{ManagedResource, ResourceInfo, ResourceLifecycle},
};
use std::sync::{
    Arc, Mutex, Once,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("{},kestrel_messaging=trace", Config::default().log_filter)
        });
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::FULL)
            .with_test_writer()
            .init();
    });
}

/// A connection that hands out ids from its own generator and records teardowns.
pub struct RecordingConnection {
    ids: IdGenerator,
    registry: TemporaryDestinationRegistry,
    teardowns: AtomicUsize,
}

impl RecordingConnection {
    pub fn new(config: &Config) -> Arc<Self> {
        Arc::new(Self {
            ids: IdGenerator::from_config(config),
            registry: TemporaryDestinationRegistry::new(),
            teardowns: AtomicUsize::new(0),
        })
    }

    pub fn as_dyn(self: &Arc<Self>) -> Arc<dyn Connection> {
        self.clone()
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn registry(&self) -> &TemporaryDestinationRegistry {
        &self.registry
    }

    pub fn teardowns(&self) -> usize {
        self.teardowns.load(Ordering::SeqCst)
    }
}

impl Connection for RecordingConnection {
    fn next_temporary_destination_id(&self, kind: DestinationType) -> DestinationId {
        let id = self.ids.next_destination_id(kind);
        self.registry.register(id.clone(), kind);
        id
    }

    fn destroy_temporary_destination(&self, destination: &TemporaryDestination) -> Result<()> {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
        if !self.registry.deregister(destination.id()) {
            return Err(Error::Protocol(format!(
                "unknown temporary destination {}",
                destination.id()
            )));
        }
        Ok(())
    }
}

/// Descriptor of a session: its own id plus the id of its connection.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: ResourceId,
    pub connection_id: ResourceId,
}

impl ResourceInfo for SessionInfo {
    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// A session-like resource whose begin/end work takes a while.
pub struct Session {
    info: SessionInfo,
    lifecycle: ResourceLifecycle,
    closed: AtomicBool,
    begin_latency: Duration,
    begins: AtomicUsize,
    ends: AtomicUsize,
    refuse_begin: Mutex<Option<&'static str>>,
}

impl Session {
    pub fn new(
        connection: &RecordingConnection,
        connection_id: ResourceId,
        begin_latency: Duration,
    ) -> Self {
        Self {
            info: SessionInfo {
                id: connection.ids().next_resource_id(),
                connection_id,
            },
            lifecycle: ResourceLifecycle::new(),
            closed: AtomicBool::new(false),
            begin_latency,
            begins: AtomicUsize::new(0),
            ends: AtomicUsize::new(0),
            refuse_begin: Mutex::new(None),
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn refuse_begin(&self, reason: Option<&'static str>) {
        *self.refuse_begin.lock().unwrap() = reason;
    }

    pub fn begins(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }

    pub fn ends(&self) -> usize {
        self.ends.load(Ordering::SeqCst)
    }
}

impl ManagedResource for Session {
    type Info = SessionInfo;

    fn info(&self) -> &SessionInfo {
        &self.info
    }

    fn lifecycle(&self) -> &ResourceLifecycle {
        &self.lifecycle
    }

    fn start_resource(&self) -> std::result::Result<(), BoxError> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.begin_latency);
        match *self.refuse_begin.lock().unwrap() {
            Some(reason) => Err(reason.into()),
            None => Ok(()),
        }
    }

    fn stop_resource(&self) -> std::result::Result<(), BoxError> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ClosedResource(self.id().clone()));
        }
        Ok(())
    }
}
