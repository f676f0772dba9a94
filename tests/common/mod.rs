//! Shared utilities for integration tests.

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use tutorial_server::store::{connect_within, Connector, StoreError, StoreResult};
use tutorial_server::Database;

/// Start a TCP listener that accepts and immediately drops connections,
/// standing in for a reachable store. Returns its address.
#[allow(dead_code)]
pub async fn start_store_stub() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => drop(socket),
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Connector that fails a fixed number of times before succeeding.
#[allow(dead_code)]
pub struct FlakyConnector {
    failures: u32,
    attempts: AtomicU32,
}

#[allow(dead_code)]
impl FlakyConnector {
    pub fn failing(failures: u32) -> Self {
        Self {
            failures,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn always_failing() -> Self {
        Self::failing(u32::MAX)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for FlakyConnector {
    type Handle = Database;

    async fn connect(&self) -> StoreResult<Database> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            Err(StoreError::Unavailable {
                endpoint: "flaky:27017".to_string(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            })
        } else {
            Ok(Database::in_memory("flaky"))
        }
    }
}

/// Connector whose connection never completes, bounded by a deadline.
#[allow(dead_code)]
pub struct StalledConnector {
    pub deadline: Duration,
    attempts: AtomicU32,
}

#[allow(dead_code)]
impl StalledConnector {
    pub fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            attempts: AtomicU32::new(0),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for StalledConnector {
    type Handle = Database;

    async fn connect(&self) -> StoreResult<Database> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        connect_within(
            "stalled:27017",
            self.deadline,
            std::future::pending::<io::Result<Database>>(),
        )
        .await
    }
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogBuffer {
    /// Subscriber writing plain `LEVEL message fields` lines into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let buffer = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || buffer.clone())
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_max_level(tracing::Level::TRACE)
            .finish()
    }

    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(|l| l.trim().to_string())
            .collect()
    }

    /// Lines logged at `level` ("INFO", "WARN", ...).
    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.starts_with(level))
            .collect()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Recorder keeping counter totals keyed as `name{label=value,...}`.
#[derive(Default)]
pub struct CountingRecorder {
    counters: Mutex<HashMap<String, Arc<AtomicU64>>>,
}

#[allow(dead_code)]
impl CountingRecorder {
    pub fn counter(&self, key: &str) -> u64 {
        self.counters
            .lock()
            .unwrap()
            .get(key)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        let labels: Vec<String> = key
            .labels()
            .map(|l| format!("{}={}", l.key(), l.value()))
            .collect();
        let name = format!("{}{{{}}}", key.name(), labels.join(","));
        let counter = self
            .counters
            .lock()
            .unwrap()
            .entry(name)
            .or_default()
            .clone();
        Counter::from_arc(counter)
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}
