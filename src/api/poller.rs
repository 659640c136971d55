//! Cancellable polling loop for the active conversation.
//!
//! One spawned task per selection: every tick fetches messages and chat info
//! concurrently and ships the raw snapshot, tagged with the loop's
//! (chat id, generation), to the shell. Ticks are single-flight by
//! construction: the next tick is not processed until the previous fetch has
//! settled, and a missed tick is delayed, never bunched. A failed tick is
//! logged and skipped; the interval itself is the retry mechanism.

use std::{sync::mpsc::Sender, time::Duration};

use tokio::{runtime::Handle, sync::watch, time::MissedTickBehavior};

use crate::domain::events::{AppEvent, PollSnapshot};

use super::client::HttpChatApi;

const POLL_LOOP_STARTED: &str = "POLL_LOOP_STARTED";
const POLL_LOOP_STOPPED: &str = "POLL_LOOP_STOPPED";
const POLL_TICK_FAILED: &str = "POLL_TICK_FAILED";
const POLL_EVENT_CHANNEL_CLOSED: &str = "POLL_EVENT_CHANNEL_CLOSED";

#[derive(Debug)]
pub struct PollingLoop {
    stop_tx: Option<watch::Sender<bool>>,
}

impl PollingLoop {
    pub fn start(
        handle: &Handle,
        api: HttpChatApi,
        chat_id: i64,
        generation: u64,
        interval: Duration,
        event_tx: Sender<AppEvent>,
    ) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        handle.spawn(run_loop(
            api, chat_id, generation, interval, event_tx, stop_rx,
        ));

        tracing::info!(
            code = POLL_LOOP_STARTED,
            chat_id,
            generation,
            interval_ms = interval.as_millis() as u64,
            "polling loop started"
        );

        Self {
            stop_tx: Some(stop_tx),
        }
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

impl Drop for PollingLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(
    api: HttpChatApi,
    chat_id: i64,
    generation: u64,
    interval: Duration,
    event_tx: Sender<AppEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The selection already rendered a fresh snapshot; consume the immediate
    // first tick so the loop starts one interval later.
    ticker.tick().await;

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    tracing::info!(
                        code = POLL_LOOP_STOPPED,
                        chat_id,
                        generation,
                        "polling loop stopped"
                    );
                    return;
                }
            }
            _ = ticker.tick() => {
                let (messages, info) =
                    tokio::join!(api.chat_messages(chat_id), api.chat_info(chat_id));

                match (messages, info) {
                    (Ok(messages), Ok(info)) => {
                        let snapshot = PollSnapshot {
                            generation,
                            chat_id,
                            messages,
                            info,
                        };
                        if event_tx.send(AppEvent::Poll(snapshot)).is_err() {
                            tracing::debug!(
                                code = POLL_EVENT_CHANNEL_CLOSED,
                                chat_id,
                                "shell gone, polling loop exiting"
                            );
                            return;
                        }
                    }
                    (messages, info) => {
                        let error = messages.err().or(info.err());
                        tracing::warn!(
                            code = POLL_TICK_FAILED,
                            chat_id,
                            generation,
                            error = ?error,
                            "poll tick failed, skipping"
                        );
                    }
                }
            }
        }
    }
}

/// [`crate::usecases::contracts::PollDriver`] backed by tokio tasks. Holds at
/// most one running loop; restarting stops the previous one first.
pub struct TokioPollDriver {
    handle: Handle,
    api: HttpChatApi,
    interval: Duration,
    event_tx: Sender<AppEvent>,
    current: Option<PollingLoop>,
}

impl TokioPollDriver {
    pub fn new(
        handle: Handle,
        api: HttpChatApi,
        interval: Duration,
        event_tx: Sender<AppEvent>,
    ) -> Self {
        Self {
            handle,
            api,
            interval,
            event_tx,
            current: None,
        }
    }
}

impl crate::usecases::contracts::PollDriver for TokioPollDriver {
    fn restart(&mut self, chat_id: i64, generation: u64) {
        self.stop();
        self.current = Some(PollingLoop::start(
            &self.handle,
            self.api.clone(),
            chat_id,
            generation,
            self.interval,
            self.event_tx.clone(),
        ));
    }

    fn stop(&mut self) {
        if let Some(mut polling_loop) = self.current.take() {
            polling_loop.stop();
        }
    }

    fn is_running(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::contracts::PollDriver;

    fn unreachable_api() -> HttpChatApi {
        // Reserved TEST-NET-1 address: connections never succeed, every tick
        // is a logged skip.
        HttpChatApi::new("http://192.0.2.1:9").expect("client should build")
    }

    #[test]
    fn driver_tracks_exactly_one_running_loop() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime should build");
        let (event_tx, _event_rx) = std::sync::mpsc::channel();
        let mut driver = TokioPollDriver::new(
            runtime.handle().clone(),
            unreachable_api(),
            Duration::from_millis(50),
            event_tx,
        );

        assert!(!driver.is_running());

        driver.restart(1, 1);
        assert!(driver.is_running());

        driver.restart(2, 2);
        assert!(driver.is_running());

        driver.stop();
        assert!(!driver.is_running());
    }

    #[test]
    fn failed_ticks_produce_no_events() {
        let runtime = tokio::runtime::Runtime::new().expect("runtime should build");
        let (event_tx, event_rx) = std::sync::mpsc::channel();
        let mut polling_loop = PollingLoop::start(
            runtime.handle(),
            unreachable_api(),
            1,
            1,
            Duration::from_millis(5),
            event_tx,
        );

        std::thread::sleep(Duration::from_millis(50));
        polling_loop.stop();

        assert!(event_rx.try_recv().is_err());
    }
}
