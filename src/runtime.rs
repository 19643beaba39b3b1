//! Session runtime
//!
//! Owns the single [`SessionState`] and applies events one at a time, each to completion.
//! Events arrive on an mpsc channel from the UI, the dataset fetch and the map layer.
//! The tick interval only exists while the timer is running: it is created when the
//! timer starts and dropped when it stops, so no tick is ever delivered to a stopped timer.

use {
    crate::{
        bridge::MapBridge,
        days,
        state::{reduce, Event, SessionState},
        view::{render_model, RenderModel},
    },
    std::time::Duration,
    tokio::{
        sync::{mpsc, watch},
        time::{interval_at, Instant, Interval, MissedTickBehavior},
    },
};

pub struct Runtime {
    state: SessionState,
    events: mpsc::Receiver<Event>,
    model_tx: watch::Sender<RenderModel>,
    bridges: Vec<Box<dyn MapBridge>>,
    tick_interval: Duration,
    ticker: Option<Interval>,
}

impl Runtime {
    /// Create a runtime with an empty session; returns the render-model receiver for the UI
    pub fn new(
        events: mpsc::Receiver<Event>,
        tick_interval: Duration,
    ) -> (Self, watch::Receiver<RenderModel>) {
        let state = SessionState::new();
        let (model_tx, model_rx) = watch::channel(render_model(&state));

        let runtime = Self {
            state,
            events,
            model_tx,
            bridges: Vec::new(),
            tick_interval,
            ticker: None,
        };
        (runtime, model_rx)
    }

    pub fn with_bridge(mut self, bridge: Box<dyn MapBridge>) -> Self {
        self.bridges.push(bridge);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event and publish the result
    pub fn apply(&mut self, event: Event) {
        let was_running = self.state.timer_running;
        let loading = matches!(event, Event::DatasetLoaded(_));

        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);

        if loading {
            log::info!(
                "📊 Loaded {} postcodes, {} to {}, sources: {:?}",
                self.state.dataset.len(),
                days::format_day(self.state.dates.min),
                days::format_day(self.state.dates.max),
                self.state.sources.keys().collect::<Vec<_>>()
            );
        }
        if was_running != self.state.timer_running {
            log::debug!(
                "⏱️  Timer {} at {}",
                if self.state.timer_running { "started" } else { "stopped" },
                self.state.date_input
            );
        }

        self.sync_ticker();
        self.publish();
    }

    fn sync_ticker(&mut self) {
        match (self.state.timer_running, self.ticker.is_some()) {
            (true, false) => {
                let mut ticker =
                    interval_at(Instant::now() + self.tick_interval, self.tick_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.ticker = Some(ticker);
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    fn publish(&mut self) {
        self.model_tx.send_replace(render_model(&self.state));

        for bridge in &mut self.bridges {
            if let Err(e) = bridge.emit(&self.state.view) {
                log::warn!("Failed to publish view to map layer: {}", e);
            }
        }
    }

    /// Process events until `Shutdown` or every sender is gone; returns the final state
    pub async fn run(mut self) -> SessionState {
        log::info!("Session runtime started");
        self.publish();

        loop {
            let next = tokio::select! {
                received = self.events.recv() => received,
                _ = next_tick(&mut self.ticker) => Some(Event::TimerTick),
            };

            match next {
                None | Some(Event::Shutdown) => break,
                Some(event) => self.apply(event),
            }
        }

        log::info!("Session runtime stopped");
        self.state
    }
}

/// Resolves on the next tick, or never when the timer is stopped
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
