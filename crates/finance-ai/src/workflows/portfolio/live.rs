//! Live dashboard feed: periodic partial-state patches fanned out to subscribers.

use std::time::Duration;

use serde_json::{json, Map, Value};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::LiveFeedConfig;

use super::catalog::{DashboardSnapshot, DashboardStats};

const FEED_CAPACITY: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("dashboard patch must be a JSON object")]
    NotAnObject,
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Client-side view of the dashboard that patches are merged into.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    fields: Map<String, Value>,
}

impl DashboardState {
    pub fn from_snapshot(snapshot: &DashboardSnapshot) -> Result<Self, PatchError> {
        match serde_json::to_value(snapshot)? {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(PatchError::NotAnObject),
        }
    }

    /// Shallow merge: each top-level key in `patch` replaces the current value wholesale.
    pub fn apply_patch(&mut self, patch: Value) -> Result<(), PatchError> {
        let Value::Object(patch) = patch else {
            return Err(PatchError::NotAnObject);
        };
        self.fields.extend(patch);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

pub fn stats_patch(stats: &DashboardStats) -> Value {
    json!({ "stats": stats })
}

/// Broadcast hub for dashboard patches. Subscribers that fall behind the channel capacity
/// observe `Lagged` and are expected to disconnect.
#[derive(Debug, Clone)]
pub struct LiveFeed {
    sender: broadcast::Sender<Value>,
    interval: Duration,
}

impl LiveFeed {
    pub fn new(config: LiveFeedConfig) -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            sender,
            interval: config.interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Send a patch to current subscribers, returning how many received it.
    pub fn publish(&self, patch: Value) -> usize {
        self.sender.send(patch).unwrap_or(0)
    }

    /// Publish `source()` every interval, first one interval after the call, until cancelled.
    pub fn spawn<F>(&self, source: F, cancel: CancellationToken) -> JoinHandle<()>
    where
        F: Fn() -> Value + Send + 'static,
    {
        let feed = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + feed.interval, feed.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(interval_ms = feed.interval.as_millis() as u64, "live dashboard feed started");

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!("live dashboard feed stopped");
                        return;
                    }
                    _ = ticker.tick() => {
                        let delivered = feed.publish(source());
                        debug!(delivered, "dashboard patch published");
                    }
                }
            }
        })
    }
}
