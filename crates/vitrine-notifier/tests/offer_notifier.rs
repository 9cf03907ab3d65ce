//! Scheduling tests for `OfferNotifier`, run on a paused tokio clock.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::watch;

use vitrine_catalog::{CatalogError, ProductSource, StaticProducts};
use vitrine_core::{Country, NotifyPreference, Product};
use vitrine_notifier::{
    Chime, ChimeError, ChimePlayer, NotifierConfig, OfferNotifier, SilentChime, ToastBoard,
};

const INTERVAL: Duration = Duration::from_secs(25);
const TTL: Duration = Duration::from_secs(6);

fn priced(id: &str, br: &str) -> Product {
    let mut p = Product {
        id: Some(id.to_string()),
        title: format!("Plano {id}"),
        image: format!("assets/img/{id}.png"),
        ..Product::default()
    };
    p.prices.insert("BR".to_string(), br.to_string());
    p
}

fn five_products() -> Vec<Product> {
    vec![
        priced("e", "R$ 99,00"),
        priced("c", "R$ 29,90"),
        priced("a", "R$ 9,90"),
        priced("d", "R$ 59,90"),
        priced("b", "R$ 19,90"),
    ]
}

struct Harness {
    notifier: OfferNotifier,
    board: Arc<ToastBoard>,
    country: watch::Sender<Country>,
}

fn harness(source: Arc<dyn ProductSource>, chime: Arc<dyn ChimePlayer>) -> Harness {
    let board = Arc::new(ToastBoard::new(TTL));
    let (country, rx) = watch::channel(Country::parse("BR").unwrap());
    let notifier = OfferNotifier::new(
        source,
        Arc::clone(&board),
        chime,
        rx,
        NotifierConfig {
            interval: INTERVAL,
            checkout_path: "checkout.html".to_string(),
        },
    );
    Harness {
        notifier,
        board,
        country,
    }
}

fn static_harness(products: Vec<Product>) -> Harness {
    harness(Arc::new(StaticProducts(products)), Arc::new(SilentChime))
}

/// Lets the spawned task run without moving the clock meaningfully.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn visible_ids(board: &ToastBoard) -> Vec<String> {
    board
        .visible()
        .into_iter()
        .filter_map(|t| t.content.product_id)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn three_cycles_show_three_cheapest_distinct_products() {
    let h = static_harness(five_products());
    let mut shown = Vec::new();
    for _ in 0..3 {
        let toast = h.notifier.run_cycle().await.expect("an offer");
        shown.push(toast.content.product_id.unwrap());
    }
    let distinct: HashSet<_> = shown.iter().cloned().collect();
    assert_eq!(distinct.len(), 3);
    assert!(distinct.iter().all(|id| ["a", "b", "c"].contains(&id.as_str())));
    assert_eq!(shown, vec!["a", "b", "c"]);
}

#[tokio::test(start_paused = true)]
async fn start_shows_immediately_then_every_interval() {
    let h = static_harness(five_products());
    h.notifier.start();
    settle().await;
    assert_eq!(visible_ids(&h.board), vec!["a"]);

    tokio::time::sleep(TTL).await;
    assert!(h.board.is_empty(), "toast should expire after its TTL");

    tokio::time::sleep(INTERVAL - TTL).await;
    settle().await;
    assert_eq!(visible_ids(&h.board), vec!["b"]);

    tokio::time::sleep(INTERVAL).await;
    settle().await;
    assert_eq!(visible_ids(&h.board), vec!["c"]);

    tokio::time::sleep(INTERVAL).await;
    settle().await;
    assert_eq!(visible_ids(&h.board), vec!["a"]);
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let h = static_harness(five_products());
    h.notifier.start();
    h.notifier.start();
    settle().await;
    assert!(h.notifier.is_running());
    assert_eq!(h.board.visible().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn toggling_off_clears_and_stays_quiet() {
    let h = static_harness(five_products());
    h.notifier.apply(NotifyPreference::On);
    settle().await;
    assert_eq!(h.board.visible().len(), 1);

    h.notifier.apply(NotifyPreference::Off);
    assert!(!h.notifier.is_running());
    assert!(h.board.is_empty());

    tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;
    assert!(h.board.is_empty());

    h.notifier.stop();
    assert!(!h.notifier.is_running());
}

#[tokio::test(start_paused = true)]
async fn clear_leaves_timer_running() {
    let h = static_harness(five_products());
    h.notifier.start();
    settle().await;
    assert_eq!(h.notifier.clear(), 1);
    assert!(h.notifier.is_running());

    tokio::time::sleep(INTERVAL).await;
    settle().await;
    assert_eq!(h.board.visible().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn no_eligible_product_is_a_no_op() {
    let mut unpriced = priced("x", "");
    unpriced.prices.clear();
    let h = static_harness(vec![unpriced]);
    assert!(h.notifier.run_cycle().await.is_none());
    assert!(h.board.is_empty());
}

#[tokio::test(start_paused = true)]
async fn country_change_is_picked_up_next_cycle() {
    let mut us_only = priced("us", "R$ 1,00");
    us_only.countries = Some(vec!["US".to_string()]);
    us_only.prices.insert("US".to_string(), "$4.99".to_string());
    let h = static_harness(vec![us_only, priced("br", "R$ 2,00")]);

    let toast = h.notifier.run_cycle().await.unwrap();
    assert_eq!(toast.content.product_id.as_deref(), Some("br"));
    assert_eq!(toast.content.cta_label, "Ver oferta");

    h.country.send(Country::parse("US").unwrap()).unwrap();
    let toast = h.notifier.run_cycle().await.unwrap();
    assert_eq!(toast.content.product_id.as_deref(), Some("us"));
    assert_eq!(toast.content.price, "$4.99");
    assert_eq!(toast.content.cta_label, "View deal");
    assert_eq!(toast.content.href, "checkout.html?country=US&id=us");
}

/// Fails the first fetch, then serves the catalog.
struct RecoveringSource {
    calls: AtomicUsize,
}

impl ProductSource for RecoveringSource {
    fn fetch_products(&self) -> BoxFuture<'_, Result<Vec<Product>, CatalogError>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if call == 0 {
                Err(CatalogError::NotFound {
                    url: "http://example.invalid/products.json".to_string(),
                })
            } else {
                Ok(five_products())
            }
        })
    }
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_is_retried_next_cycle() {
    let source = Arc::new(RecoveringSource {
        calls: AtomicUsize::new(0),
    });
    let h = harness(source.clone(), Arc::new(SilentChime));
    h.notifier.start();
    settle().await;
    // the first fetch failed; the immediate cycle retried and succeeded
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(visible_ids(&h.board), vec!["a"]);
}

struct BrokenSpeaker {
    plays: AtomicUsize,
}

impl ChimePlayer for BrokenSpeaker {
    fn play(&self, _chime: &Chime) -> Result<(), ChimeError> {
        self.plays.fetch_add(1, Ordering::SeqCst);
        Err(ChimeError::Unavailable("no audio device".to_string()))
    }
}

#[tokio::test(start_paused = true)]
async fn chime_failures_are_swallowed() {
    let speaker = Arc::new(BrokenSpeaker {
        plays: AtomicUsize::new(0),
    });
    let h = harness(Arc::new(StaticProducts(five_products())), speaker.clone());
    assert!(h.notifier.run_cycle().await.is_some());
    assert_eq!(speaker.plays.load(Ordering::SeqCst), 1);
    assert_eq!(h.board.visible().len(), 1);
}
