//! Demo contract feed: stands in for a trading gateway.
//!
//! A few contracts are announced up front so the completion source is seeded
//! at startup; the rest trickle in from a background thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use recorderlab_core::config::FeedConfig;
use recorderlab_core::{Contract, LocalRecorder};

/// (vt_symbol, display name)
pub const CATALOGUE: &[(&str, &str)] = &[
    ("IF2312.CFFEX", "CSI 300 index Dec"),
    ("IC2312.CFFEX", "CSI 500 index Dec"),
    ("rb2401.SHFE", "Rebar Jan"),
    ("au2402.SHFE", "Gold Feb"),
    ("ag2402.SHFE", "Silver Feb"),
    ("cu2401.SHFE", "Copper Jan"),
    ("sc2402.INE", "Crude oil Feb"),
    ("i2401.DCE", "Iron ore Jan"),
    ("m2405.DCE", "Soybean meal May"),
    ("p2405.DCE", "Palm oil May"),
    ("SR405.CZCE", "White sugar May"),
    ("TA405.CZCE", "PTA May"),
    ("MA405.CZCE", "Methanol May"),
    ("T2403.CFFEX", "10Y treasury Mar"),
];

/// Poll step while waiting, so cancellation is noticed promptly.
const CANCEL_POLL: Duration = Duration::from_millis(50);

fn contract(entry: &(&str, &str)) -> Contract {
    Contract::new(entry.0).with_name(entry.1)
}

/// Announce the first `count` catalogue entries synchronously.
/// Returns how many were new to the recorder.
pub fn announce_initial(recorder: &LocalRecorder, count: usize) -> usize {
    CATALOGUE
        .iter()
        .take(count)
        .filter(|entry| recorder.discover_contract(contract(entry)))
        .count()
}

/// Discover the remaining catalogue in random order at a jittered pace.
pub fn spawn_feed(
    recorder: Arc<LocalRecorder>,
    config: &FeedConfig,
    cancel: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut remaining: Vec<Contract> = CATALOGUE
        .iter()
        .skip(config.initial_contracts)
        .map(contract)
        .collect();
    remaining.shuffle(&mut rng);
    let mean = Duration::from_millis(config.interval_ms.max(1));

    thread::Builder::new()
        .name("recorderlab-feed".into())
        .spawn(move || {
            for contract in remaining {
                if !wait(jitter(&mut rng, mean), &cancel) {
                    tracing::debug!("contract feed cancelled");
                    return;
                }
                recorder.discover_contract(contract);
            }
            tracing::debug!("contract feed exhausted");
        })
}

/// Uniform in [mean/2, 3·mean/2].
fn jitter(rng: &mut impl Rng, mean: Duration) -> Duration {
    let ms = mean.as_millis() as u64;
    Duration::from_millis(rng.gen_range(ms / 2..=ms + ms / 2))
}

/// Sleep for `delay` unless cancelled first. Returns false on cancel.
fn wait(delay: Duration, cancel: &AtomicBool) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}
