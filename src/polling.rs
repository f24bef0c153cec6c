use rand::Rng;

pub const MIN_INTERVAL_SECS: u32 = 4;
pub const MAX_INTERVAL_SECS: u32 = 60;

/// Polling cadence suggested to devices, uniform over
/// `MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS`.
pub fn random_interval_secs() -> u32 {
    rand::thread_rng().gen_range(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS)
}
