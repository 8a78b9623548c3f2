use std::sync::Arc;

use parking_lot::Mutex;

/// Monotonic source of "now", in seconds from an arbitrary origin.
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall clock of the host: `Instant` natively, `performance.now()` in the browser.
#[derive(Debug)]
pub struct HostTime {
    #[cfg(not(target_arch = "wasm32"))]
    origin: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    performance: Option<web_sys::Performance>,
}

impl HostTime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            origin: std::time::Instant::now(),
            #[cfg(target_arch = "wasm32")]
            performance: web_sys::window().and_then(|window| window.performance()),
        }
    }
}

impl Default for HostTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for HostTime {
    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> f64 {
        self.performance
            .as_ref()
            .map(|performance| performance.now() / 1000.0)
            .unwrap_or_default()
    }
}

/// Time source moved by hand. Clones share the same reading, so a test or a
/// headless run can keep one clone and hand the other to a [`Clock`].
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Arc<Mutex<f64>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        *self.now.lock() = seconds;
    }

    pub fn advance(&self, seconds: f64) {
        *self.now.lock() += seconds;
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> f64 {
        *self.now.lock()
    }
}

/// Elapsed-time clock driving the animation.
///
/// Starts when created and is never reset. Readings never go backwards even
/// if the source does.
pub struct Clock {
    source: Box<dyn TimeSource>,
    start: f64,
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::with_source(HostTime::new())
    }

    pub fn with_source(source: impl TimeSource + 'static) -> Self {
        let start = source.now();
        Self {
            source: Box::new(source),
            start,
            elapsed: 0.0,
        }
    }

    /// Samples the source and returns the seconds since the clock started.
    pub fn elapsed_time(&mut self) -> f32 {
        let now = self.source.now() - self.start;
        self.elapsed = self.elapsed.max(now);
        self.elapsed as f32
    }

    /// Last sampled reading, without sampling again.
    pub fn last_elapsed(&self) -> f32 {
        self.elapsed as f32
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("start", &self.start)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn manual_clock_reports_offset_from_start() {
        let time = ManualTime::new();
        time.set(5.0);
        let mut clock = Clock::with_source(time.clone());
        assert_eq!(clock.elapsed_time(), 0.0);
        time.advance(10.0);
        assert_eq!(clock.elapsed_time(), 10.0);
        assert_eq!(clock.last_elapsed(), 10.0);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let time = ManualTime::new();
        let mut clock = Clock::with_source(time.clone());
        time.set(3.0);
        assert_eq!(clock.elapsed_time(), 3.0);
        time.set(1.0);
        assert_eq!(clock.elapsed_time(), 3.0);
    }

    #[test]
    fn host_clock_advances() {
        let mut clock = Clock::new();
        let first = clock.elapsed_time();
        thread::sleep(Duration::from_millis(10));
        let second = clock.elapsed_time();
        assert!(second >= first + 0.009);
    }
}
