use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use vitrine_core::messages::t;
use vitrine_core::{checkout_destination, Country, Product};

/// What a toast shows, before it is placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastContent {
    pub product_id: Option<String>,
    pub image: String,
    pub title: String,
    pub price: String,
    pub description: String,
    pub cta_label: String,
    pub close_label: String,
    /// Checkout destination, carried in `data-href`.
    pub href: String,
}

impl ToastContent {
    /// Promotional toast for `product` in the language of `country`.
    #[must_use]
    pub fn offer(product: &Product, country: &Country, checkout_path: &str) -> Self {
        let language = country.language();
        Self {
            product_id: product.id.clone(),
            image: product.image.clone(),
            title: product.title.clone(),
            price: product.price_for(country).unwrap_or_default().to_string(),
            description: t(language, "toast.offer.desc"),
            cta_label: t(language, "toast.offer.cta"),
            close_label: t(language, "toast.close"),
            href: checkout_destination(product, country, checkout_path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    #[serde(flatten)]
    pub content: ToastContent,
}

#[derive(Debug)]
struct Entry {
    toast: Toast,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct BoardState {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Visible toasts, oldest first. Each toast disappears after the board's
/// TTL or when dismissed.
#[derive(Debug)]
pub struct ToastBoard {
    ttl: Duration,
    state: Mutex<BoardState>,
}

impl ToastBoard {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(BoardState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        state.entries.retain(|e| e.expires_at > now);
        state
    }

    pub fn push(&self, content: ToastContent) -> Toast {
        let mut state = self.lock();
        state.next_id += 1;
        let toast = Toast {
            id: state.next_id,
            content,
        };
        state.entries.push(Entry {
            toast: toast.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        toast
    }

    #[must_use]
    pub fn visible(&self) -> Vec<Toast> {
        self.lock().entries.iter().map(|e| e.toast.clone()).collect()
    }

    /// Removes toast `id`. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|e| e.toast.id != id);
        state.entries.len() != before
    }

    /// Removes every visible toast and returns how many there were.
    pub fn clear(&self) -> usize {
        let mut state = self.lock();
        let removed = state.entries.len();
        state.entries.clear();
        removed
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
