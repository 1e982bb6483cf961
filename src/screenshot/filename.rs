use chrono::{DateTime, Local};
use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of the random part of a screenshot filename
const RANDOM_LEN: usize = 12;

/// Generates a unique screenshot filename
///
/// Format: `<12 random alphanumerics>-<YYYY-MM-DD_HH-MM-SS>.png`. The random
/// part keeps names unique within a run, the timestamp across runs.
pub fn generate_filename() -> String {
    let random: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(RANDOM_LEN)
        .map(char::from)
        .collect();

    filename_at(&random, Local::now())
}

fn filename_at(random: &str, at: DateTime<Local>) -> String {
    format!("{}-{}.png", random, at.format("%Y-%m-%d_%H-%M-%S"))
}
