//! Background sync task

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::SyncOrchestrator;
use crate::notify::NotificationSink;
use crate::persistence::KeyValueStore;
use crate::remote::RemoteSource;

/// Handle to a running periodic sync task
///
/// Dropping the handle aborts the task; [`PeriodicSync::shutdown`] stops it
/// after any in-flight cycle finishes.
#[derive(Debug)]
pub struct PeriodicSync {
    trigger: mpsc::Sender<()>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PeriodicSync {
    /// Request a sync outside the timer
    ///
    /// Requests made while one is already queued collapse into it. Returns
    /// false once the task has stopped.
    pub fn trigger(&self) -> bool {
        match self.trigger.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => false,
        }
    }

    /// Stop the task and wait for it to exit
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                tracing::warn!("Periodic sync task ended abnormally: {error}");
            }
        }
    }
}

impl Drop for PeriodicSync {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn the periodic sync loop; `None` disables the timer but keeps manual triggers
pub fn spawn_periodic<K, R, N>(
    orchestrator: Arc<SyncOrchestrator<K, R, N>>,
    period: Option<Duration>,
) -> PeriodicSync
where
    K: KeyValueStore + Send + 'static,
    R: RemoteSource + Send + Sync + 'static,
    N: NotificationSink + Send + Sync + 'static,
{
    let (trigger_tx, trigger_rx) = mpsc::channel(1);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(run_periodic(orchestrator, period, trigger_rx, shutdown_rx));

    PeriodicSync {
        trigger: trigger_tx,
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}

async fn run_periodic<K, R, N>(
    orchestrator: Arc<SyncOrchestrator<K, R, N>>,
    period: Option<Duration>,
    mut trigger: mpsc::Receiver<()>,
    mut shutdown: oneshot::Receiver<()>,
) where
    K: KeyValueStore + Send + 'static,
    R: RemoteSource + Send + Sync + 'static,
    N: NotificationSink + Send + Sync + 'static,
{
    let mut ticker = period.map(|period| {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    match period {
        Some(period) => tracing::info!("Periodic sync every {period:?}"),
        None => tracing::info!("Automatic sync disabled; waiting for manual triggers"),
    }

    loop {
        let reason = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            Some(()) = trigger.recv() => "manual",
            () = next_tick(ticker.as_mut()) => "interval",
        };

        tracing::debug!("Starting {reason} sync");
        if let Err(error) = orchestrator.sync_now().await {
            tracing::debug!("{reason} sync failed: {error}");
        }
    }

    tracing::debug!("Periodic sync stopped");
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
