//! ConnectivityMonitor - process-wide online/offline state.
//!
//! The state lives in a single atomic. Exactly one background task writes
//! it (fed by a [`PathMonitor`]); any number of in-flight requests read it
//! without locking. Before the first update arrives the monitor reports
//! online, so a cold start never blocks on a probe.

use crate::config::ConnectivityConfig;
use crate::error::{Result, TmdbError};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Reachability of the network path, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    /// The path is usable.
    Satisfied = 0,
    /// No usable path.
    Unsatisfied = 1,
    /// A path exists but must be brought up first (e.g. VPN on demand).
    RequiresConnection = 2,
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathStatus::Satisfied => write!(f, "satisfied"),
            PathStatus::Unsatisfied => write!(f, "unsatisfied"),
            PathStatus::RequiresConnection => write!(f, "requires_connection"),
        }
    }
}

/// Snapshot of connectivity at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectivityState {
    pub is_online: bool,
    pub detail: PathStatus,
}

impl From<PathStatus> for ConnectivityState {
    fn from(detail: PathStatus) -> Self {
        Self {
            is_online: detail == PathStatus::Satisfied,
            detail,
        }
    }
}

/// Atomic wrapper for PathStatus.
struct AtomicPathStatus(AtomicU8);

impl AtomicPathStatus {
    fn new(status: PathStatus) -> Self {
        Self(AtomicU8::new(status as u8))
    }

    fn decode(raw: u8) -> PathStatus {
        match raw {
            0 => PathStatus::Satisfied,
            1 => PathStatus::Unsatisfied,
            _ => PathStatus::RequiresConnection,
        }
    }

    fn load(&self) -> PathStatus {
        Self::decode(self.0.load(Ordering::SeqCst))
    }

    fn swap(&self, status: PathStatus) -> PathStatus {
        Self::decode(self.0.swap(status as u8, Ordering::SeqCst))
    }
}

/// Source of path-change notifications.
#[async_trait]
pub trait PathMonitor: Send + 'static {
    /// Wait for the next path update. `None` ends the subscription; the
    /// last delivered status then stays in effect.
    async fn next_update(&mut self) -> Option<PathStatus>;
}

#[async_trait]
impl PathMonitor for mpsc::Receiver<PathStatus> {
    async fn next_update(&mut self) -> Option<PathStatus> {
        self.recv().await
    }
}

#[async_trait]
impl PathMonitor for mpsc::UnboundedReceiver<PathStatus> {
    async fn next_update(&mut self) -> Option<PathStatus> {
        self.recv().await
    }
}

/// Path monitor that probes URLs periodically and reports changes.
///
/// Any HTTP response, whatever its status, counts as a working path; only
/// transport failures on every probe URL count as offline.
pub struct ProbePathMonitor {
    client: reqwest::Client,
    probe_urls: Vec<String>,
    interval: Duration,
    last: Option<PathStatus>,
}

impl ProbePathMonitor {
    pub fn new() -> Result<Self> {
        Self::with_config(
            ConnectivityConfig::default_probe_urls(),
            ConnectivityConfig::PROBE_INTERVAL,
            ConnectivityConfig::PROBE_TIMEOUT,
        )
    }

    pub fn with_config(
        probe_urls: Vec<String>,
        interval: Duration,
        probe_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(probe_timeout)
            .build()
            .map_err(|e| TmdbError::Config {
                message: format!("Failed to create probe client: {}", e),
            })?;
        Ok(Self {
            client,
            probe_urls,
            interval,
            last: None,
        })
    }

    async fn probe(&self) -> PathStatus {
        for url in &self.probe_urls {
            match self.client.head(url).send().await {
                Ok(resp) => {
                    debug!("Probe {} answered {}", url, resp.status());
                    return PathStatus::Satisfied;
                }
                Err(e) => debug!("Probe {} failed: {}", url, e.without_url()),
            }
        }
        PathStatus::Unsatisfied
    }
}

#[async_trait]
impl PathMonitor for ProbePathMonitor {
    async fn next_update(&mut self) -> Option<PathStatus> {
        loop {
            if self.last.is_some() {
                tokio::time::sleep(self.interval).await;
            }
            let status = self.probe().await;
            if self.last != Some(status) {
                self.last = Some(status);
                return Some(status);
            }
        }
    }
}

/// Process-wide connectivity flag, updated asynchronously.
pub struct ConnectivityMonitor {
    status: Arc<AtomicPathStatus>,
    updater: Mutex<Option<JoinHandle<()>>>,
}

impl ConnectivityMonitor {
    /// Monitor that reports online and never changes.
    pub fn new() -> Self {
        Self::with_status(PathStatus::Satisfied)
    }

    /// Monitor fixed at `status` with no update source.
    pub fn with_status(status: PathStatus) -> Self {
        Self {
            status: Arc::new(AtomicPathStatus::new(status)),
            updater: Mutex::new(None),
        }
    }

    /// Subscribe to `source` and apply each update it delivers.
    ///
    /// Spawns the single writer task on the current tokio runtime; must be
    /// called from within one.
    pub fn start<M: PathMonitor>(mut source: M) -> Self {
        let monitor = Self::new();
        let status = Arc::clone(&monitor.status);

        let handle = tokio::spawn(async move {
            debug!("Connectivity monitoring started");
            while let Some(next) = source.next_update().await {
                let previous = status.swap(next);
                if previous == next {
                    continue;
                }
                match next {
                    PathStatus::Satisfied => info!("Network status: connected"),
                    other => warn!("Network status: disconnected ({})", other),
                }
            }
            debug!("Connectivity source closed; keeping last known state");
        });

        *monitor.lock_updater() = Some(handle);
        monitor
    }

    /// Most recently observed state. Never blocks.
    pub fn current_state(&self) -> ConnectivityState {
        self.status.load().into()
    }

    pub fn is_online(&self) -> bool {
        self.current_state().is_online
    }

    /// Whether an update task is still attached.
    pub fn is_monitoring(&self) -> bool {
        self.lock_updater()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Detach from the update source. The current state is kept.
    pub fn stop(&self) {
        if let Some(handle) = self.lock_updater().take() {
            handle.abort();
        }
    }

    fn lock_updater(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.updater.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectivityMonitor")
            .field("state", &self.current_state())
            .field("monitoring", &self.is_monitoring())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn wait_for(monitor: &ConnectivityMonitor, expected: PathStatus) {
        for _ in 0..200 {
            if monitor.current_state().detail == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!(
            "monitor never reached {:?}, still {:?}",
            expected,
            monitor.current_state()
        );
    }

    #[test]
    fn test_default_is_optimistically_online() {
        let monitor = ConnectivityMonitor::new();
        let state = monitor.current_state();
        assert!(state.is_online);
        assert_eq!(state.detail, PathStatus::Satisfied);
        assert!(!monitor.is_monitoring());
    }

    #[test]
    fn test_only_satisfied_is_online() {
        assert!(!ConnectivityMonitor::with_status(PathStatus::Unsatisfied).is_online());
        assert!(!ConnectivityMonitor::with_status(PathStatus::RequiresConnection).is_online());
        assert!(ConnectivityMonitor::with_status(PathStatus::Satisfied).is_online());
    }

    #[tokio::test]
    async fn test_updates_are_applied() {
        let (tx, rx) = mpsc::channel(8);
        let monitor = ConnectivityMonitor::start(rx);
        assert!(monitor.is_online());

        tx.send(PathStatus::Unsatisfied).await.unwrap();
        wait_for(&monitor, PathStatus::Unsatisfied).await;
        assert!(!monitor.is_online());

        tx.send(PathStatus::RequiresConnection).await.unwrap();
        wait_for(&monitor, PathStatus::RequiresConnection).await;

        tx.send(PathStatus::Satisfied).await.unwrap();
        wait_for(&monitor, PathStatus::Satisfied).await;
        assert!(monitor.is_online());
    }

    #[tokio::test]
    async fn test_closed_source_keeps_last_state() {
        let (tx, rx) = mpsc::unbounded_channel();
        let monitor = ConnectivityMonitor::start(rx);
        tx.send(PathStatus::Unsatisfied).unwrap();
        wait_for(&monitor, PathStatus::Unsatisfied).await;

        drop(tx);
        for _ in 0..200 {
            if !monitor.is_monitoring() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(!monitor.is_monitoring());
        assert_eq!(monitor.current_state().detail, PathStatus::Unsatisfied);
    }

    #[tokio::test]
    async fn test_stop_detaches_source() {
        let (tx, rx) = mpsc::channel(8);
        let monitor = ConnectivityMonitor::start(rx);
        assert!(monitor.is_monitoring());

        monitor.stop();
        assert!(!monitor.is_monitoring());
        tokio::task::yield_now().await;

        // The receiver is dropped with the aborted task.
        let _ = tx.send(PathStatus::Unsatisfied).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(monitor.is_online());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_are_consistent() {
        let (tx, rx) = mpsc::channel(64);
        let monitor = Arc::new(ConnectivityMonitor::start(rx));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let monitor = Arc::clone(&monitor);
                tokio::spawn(async move {
                    for _ in 0..1_000 {
                        let state = monitor.current_state();
                        assert_eq!(state.is_online, state.detail == PathStatus::Satisfied);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for i in 0..50 {
            let status = if i % 2 == 0 {
                PathStatus::Unsatisfied
            } else {
                PathStatus::Satisfied
            };
            tx.send(status).await.unwrap();
        }

        for reader in readers {
            reader.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_probe_reports_unreachable_host() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut probe = ProbePathMonitor::with_config(
            vec![format!("http://127.0.0.1:{}/", port)],
            Duration::from_secs(60),
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(probe.next_update().await, Some(PathStatus::Unsatisfied));
    }
}
