//! Shared helpers for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use centime::cache::CollectionSource;
use centime::error::GatewayResult;

pub type Responder = oneshot::Sender<GatewayResult<Vec<String>>>;

/// A collection source the test drives by hand: every `list()` call parks on
/// a oneshot channel until the test sends the outcome, making fetch timing
/// fully deterministic.
pub struct ScriptedSource {
    requests: mpsc::UnboundedSender<Responder>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Responder>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                requests: tx,
                calls: AtomicUsize::new(0),
            }),
            rx,
        )
    }

    /// Number of fetches dispatched so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionSource<String> for ScriptedSource {
    async fn list(&self) -> GatewayResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.requests.send(tx).ok();
        rx.await.unwrap_or_else(|_| Ok(Vec::new()))
    }
}

/// Poll `cond` until it holds, panicking after a generous timeout.
pub async fn wait_until<F: Fn() -> bool>(what: &str, cond: F) {
    for _ in 0..400 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("timed out waiting for: {}", what);
}

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "centime=debug".into()))
        .with_test_writer()
        .try_init()
        .ok();
}
