pub mod chime;
pub mod notifier;
pub mod offer;
pub mod toast;

pub use chime::{Chime, ChimeError, ChimePlayer, SilentChime, TerminalBell, Tone};
pub use notifier::{NotifierConfig, OfferNotifier};
pub use offer::{cheapest_offers, pick_offer, OfferRotation, OFFER_POOL_SIZE};
pub use toast::{Toast, ToastBoard, ToastContent};
