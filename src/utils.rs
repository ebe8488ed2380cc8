use rand::Rng;
use std::time::Duration;

/// Sleeps a random whole number of seconds in `min_secs..=max_secs`.
pub fn random_delay(min_secs: u64, max_secs: u64) {
    let secs = if max_secs > min_secs {
        rand::rng().random_range(min_secs..=max_secs)
    } else {
        min_secs
    };

    if secs > 0 {
        std::thread::sleep(Duration::from_secs(secs));
    }
}

/// Collapses runs of whitespace (including NBSP) into single spaces.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
