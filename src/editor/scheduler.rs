//! Background polling with one-tick suppression after user activity

use futures::future::BoxFuture;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub type RefreshFn = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Sender half handed to mutation handlers.
///
/// The scheduler task owns the interaction flag; handlers only announce
/// that the user did something.
#[derive(Debug, Clone)]
pub struct ActivitySignal {
    tx: mpsc::UnboundedSender<()>,
}

impl ActivitySignal {
    /// Skip the next scheduled refresh
    pub fn notify(&self) {
        // The scheduler may already be torn down; nothing left to skip then
        let _ = self.tx.send(());
    }
}

/// Periodically runs a refresh function for the lifetime of a view
pub struct AutoRefresh {
    name: &'static str,
    interval: Duration,
    refresh: RefreshFn,
    tx: mpsc::UnboundedSender<()>,
    rx: Option<mpsc::UnboundedReceiver<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutoRefresh {
    pub fn new<F>(name: &'static str, interval: Duration, refresh: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            name,
            interval,
            refresh: Arc::new(refresh),
            tx,
            rx: Some(rx),
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn activity(&self) -> ActivitySignal {
        ActivitySignal { tx: self.tx.clone() }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawn the polling loop. The first refresh happens one interval from
    /// now. Returns `false` if this scheduler was already started.
    pub fn start(&mut self) -> bool {
        let Some(mut activity) = self.rx.take() else {
            warn!("{}: auto-refresh already started", self.name);
            return false;
        };

        let name = self.name;
        let period = self.interval;
        let refresh = Arc::clone(&self.refresh);

        info!("{}: auto-refresh every {}ms", name, period.as_millis());
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut interacted = false;

            loop {
                tokio::select! {
                    biased;

                    message = activity.recv() => match message {
                        Some(()) => interacted = true,
                        // Every sender is gone, including our own: the owner was dropped
                        None => break,
                    },
                    _ = ticker.tick() => {
                        if interacted {
                            debug!("{}: skipping refresh after user activity", name);
                            interacted = false;
                        } else {
                            refresh().await;
                        }
                    }
                }
            }
        }));

        true
    }

    /// Cancel the loop. No refresh starts after this returns.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("{}: auto-refresh stopped", self.name);
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}
