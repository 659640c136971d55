//! Presence heartbeat: tells the server this client is online.
//!
//! Independent of which chat is active. Posts on a fixed interval, posts
//! immediately when the terminal regains focus, and posts on user-activity
//! signals debounced to a minimum gap so typing bursts do not flood the
//! server.

use std::time::Duration;

use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
    time::{Instant, MissedTickBehavior},
};

use super::client::HttpChatApi;

const PRESENCE_LOOP_STOPPED: &str = "PRESENCE_LOOP_STOPPED";
const PRESENCE_UPDATE_FAILED: &str = "PRESENCE_UPDATE_FAILED";

/// What triggered an out-of-band presence post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceSignal {
    /// Keyboard or pointer activity; debounced.
    Activity,
    /// Terminal regained focus; posts immediately.
    Focus,
}

/// Cheap cloneable handle for waking the heartbeat from the shell thread.
#[derive(Debug, Clone)]
pub struct PresenceHandle {
    signal_tx: mpsc::UnboundedSender<PresenceSignal>,
}

impl PresenceHandle {
    pub fn touch(&self, signal: PresenceSignal) {
        let _ = self.signal_tx.send(signal);
    }
}

#[derive(Debug)]
pub struct PresenceHeartbeat {
    stop_tx: Option<watch::Sender<bool>>,
}

impl PresenceHeartbeat {
    pub fn start(
        handle: &Handle,
        api: HttpChatApi,
        interval: Duration,
        debounce: Duration,
    ) -> (Self, PresenceHandle) {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        handle.spawn(run_heartbeat(api, interval, debounce, signal_rx, stop_rx));

        (
            Self {
                stop_tx: Some(stop_tx),
            },
            PresenceHandle { signal_tx },
        )
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

impl Drop for PresenceHeartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Whether an activity signal should post now, given the last post time.
fn activity_post_due(last_post: Option<Instant>, debounce: Duration) -> bool {
    last_post
        .map(|posted| posted.elapsed() >= debounce)
        .unwrap_or(true)
}

async fn run_heartbeat(
    api: HttpChatApi,
    interval: Duration,
    debounce: Duration,
    mut signal_rx: mpsc::UnboundedReceiver<PresenceSignal>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_post: Option<Instant> = None;

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::info!(code = PRESENCE_LOOP_STOPPED, "presence heartbeat stopped");
                    return;
                }
            }
            _ = ticker.tick() => {
                post_presence(&api, &mut last_post).await;
            }
            Some(signal) = signal_rx.recv() => {
                let due = match signal {
                    PresenceSignal::Focus => true,
                    PresenceSignal::Activity => activity_post_due(last_post, debounce),
                };
                if due {
                    post_presence(&api, &mut last_post).await;
                }
            }
        }
    }
}

async fn post_presence(api: &HttpChatApi, last_post: &mut Option<Instant>) {
    match api.update_status().await {
        Ok(()) => *last_post = Some(Instant::now()),
        Err(error) => {
            tracing::warn!(
                code = PRESENCE_UPDATE_FAILED,
                error = %error,
                "presence update not delivered"
            );
        }
    }
}
