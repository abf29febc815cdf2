use std::time::Duration;

/// Blocking delay primitive.
///
/// The poll loop intentionally blocks the calling context while waiting
/// for the hardware; this seam exists so tests can run that loop
/// instantly and script when the sensor becomes ready.
pub trait Delay: Send + Sync {
    fn pause(&self, interval: Duration);
}

/// Production delay backed by the OS sleep.
pub struct SleepDelay;

impl Delay for SleepDelay {
    fn pause(&self, interval: Duration) {
        std::thread::sleep(interval);
    }
}
