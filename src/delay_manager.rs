use std::thread;
use std::time::Duration;

use log::info;
use rand::Rng;

/// Randomized pause between keyword searches, to stay polite to the registry.
pub fn random_keyword_delay() {
    let mut rng = rand::thread_rng();
    let delay_secs = rng.gen_range(4..=12);
    info!("Waiting for {} seconds before the next keyword...", delay_secs);
    thread::sleep(Duration::from_secs(delay_secs));
}
