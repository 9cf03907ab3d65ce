//! Periodic offer notifications.
//!
//! While running, the notifier owns one background task. The task fetches a
//! private copy of the catalog, shows an offer right away, then shows another
//! one every interval. The active country is read from a watch channel at the
//! start of every cycle.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use vitrine_catalog::ProductSource;
use vitrine_core::{Country, NotifyPreference, Product};

use crate::chime::{Chime, ChimePlayer};
use crate::offer::{pick_offer, OfferRotation};
use crate::toast::{Toast, ToastBoard, ToastContent};

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub interval: Duration,
    pub checkout_path: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(25),
            checkout_path: "checkout.html".to_string(),
        }
    }
}

#[derive(Default)]
struct CycleState {
    /// `None` until a fetch succeeds.
    products: Option<Vec<Product>>,
    rotation: OfferRotation,
}

struct Inner {
    source: Arc<dyn ProductSource>,
    board: Arc<ToastBoard>,
    chime: Arc<dyn ChimePlayer>,
    country: watch::Receiver<Country>,
    config: NotifierConfig,
    state: AsyncMutex<CycleState>,
}

impl Inner {
    async fn refresh(&self, state: &mut CycleState) {
        match self.source.fetch_products().await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "offer notifier catalog refreshed");
                state.products = Some(products);
            }
            Err(e) => {
                tracing::warn!(error = %e, "offer notifier could not fetch catalog");
                state.products = None;
            }
        }
    }

    async fn cycle(&self) -> Option<Toast> {
        let country = self.country.borrow().clone();

        let offer = {
            let mut guard = self.state.lock().await;
            if guard.products.is_none() {
                self.refresh(&mut guard).await;
            }
            let CycleState { products, rotation } = &mut *guard;
            pick_offer(rotation, products.as_deref()?, &country)?.clone()
        };

        let toast = self.board.push(ToastContent::offer(
            &offer,
            &country,
            &self.config.checkout_path,
        ));
        tracing::info!(
            toast_id = toast.id,
            product = ?offer.id,
            country = %country,
            "showing offer"
        );
        if let Err(e) = self.chime.play(&Chime::OFFER) {
            tracing::debug!(error = %e, "chime playback failed");
        }
        Some(toast)
    }

    async fn run(self: Arc<Self>) {
        {
            let mut guard = self.state.lock().await;
            self.refresh(&mut guard).await;
        }
        self.cycle().await;

        let period = self.config.interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.cycle().await;
        }
    }
}

/// Timer-driven offer toasts for the active country.
pub struct OfferNotifier {
    inner: Arc<Inner>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl OfferNotifier {
    pub fn new(
        source: Arc<dyn ProductSource>,
        board: Arc<ToastBoard>,
        chime: Arc<dyn ChimePlayer>,
        country: watch::Receiver<Country>,
        config: NotifierConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                board,
                chime,
                country,
                config,
                state: AsyncMutex::new(CycleState::default()),
            }),
            task: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Arc<ToastBoard> {
        &self.inner.board
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts the background task. Does nothing if it is already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        tracing::info!(
            interval_secs = self.inner.config.interval.as_secs(),
            "offer notifier started"
        );
        *task = Some(tokio::spawn(Arc::clone(&self.inner).run()));
    }

    /// Cancels the background task. Idempotent.
    pub fn stop(&self) {
        if let Some(handle) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
            tracing::info!("offer notifier stopped");
        }
    }

    /// Removes every visible toast. The timer is left as it is.
    pub fn clear(&self) -> usize {
        self.inner.board.clear()
    }

    /// Applies a persisted preference: on starts, off stops and clears.
    pub fn apply(&self, preference: NotifyPreference) {
        if preference.is_on() {
            self.start();
        } else {
            self.stop();
            self.clear();
        }
    }

    /// Runs one cycle immediately, outside the timer.
    ///
    /// Fetches the catalog first if no copy is held yet. Returns the toast
    /// shown, or `None` when there is no eligible product.
    pub async fn run_cycle(&self) -> Option<Toast> {
        self.inner.cycle().await
    }
}

impl Drop for OfferNotifier {
    fn drop(&mut self) {
        self.stop();
    }
}
