use std::{fmt, time::Duration};

/// Countdown advanced by frame deltas.
///
/// A repeating timer fires once for every `wait_time` of accumulated delta,
/// so a single long frame can fire it several times. A one-shot timer fires
/// once and stops until [`restart`](Self::restart) is called.
pub struct Timer {
    elapsed: Duration,
    wait_time: Duration,
    one_shot: bool,
    running: bool,
    on_timeout: Option<Box<dyn FnMut()>>,
}

impl Timer {
    /// Creates a running, repeating timer with a zero wait time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            wait_time: Duration::ZERO,
            one_shot: false,
            running: true,
            on_timeout: None,
        }
    }

    /// Chooses between single-shot and repeating behaviour.
    pub fn set_one_shot(&mut self, one_shot: bool) {
        self.one_shot = one_shot;
    }

    /// Sets the delay between timeouts.
    pub fn set_wait_time(&mut self, wait_time: Duration) {
        self.wait_time = wait_time;
    }

    /// Installs a callback invoked synchronously on every timeout.
    pub fn set_on_timeout<F>(&mut self, on_timeout: F)
    where
        F: FnMut() + 'static,
    {
        self.on_timeout = Some(Box::new(on_timeout));
    }

    /// Clears accumulated time and starts the timer again.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Stops accumulating time without clearing it.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Continues accumulating time after a pause.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Reports whether the timer accumulates time.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reports whether the timer stops after its first timeout.
    #[must_use]
    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    /// Delay between timeouts.
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// Time accumulated toward the next timeout.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Accumulates `dt` and returns how many timeouts fired.
    pub fn on_update(&mut self, dt: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        self.elapsed = self.elapsed.saturating_add(dt);

        let mut fired = 0;
        while self.running && self.elapsed >= self.wait_time {
            fired += 1;
            if let Some(on_timeout) = self.on_timeout.as_mut() {
                on_timeout();
            }

            if self.one_shot {
                self.running = false;
                self.elapsed = Duration::ZERO;
            } else if self.wait_time.is_zero() {
                // A zero period would never drain; fire once per update.
                self.elapsed = Duration::ZERO;
                break;
            } else {
                self.elapsed -= self.wait_time;
            }
        }

        fired
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("elapsed", &self.elapsed)
            .field("wait_time", &self.wait_time)
            .field("one_shot", &self.one_shot)
            .field("running", &self.running)
            .field("has_callback", &self.on_timeout.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    fn repeating(wait_time: Duration) -> Timer {
        let mut timer = Timer::new();
        timer.set_wait_time(wait_time);
        timer
    }

    #[test]
    fn fire_count_is_independent_of_delta_chunking() {
        let mut chunked = repeating(Duration::from_millis(300));
        let mut whole = repeating(Duration::from_millis(300));

        let chunked_fires: u32 = (0..10)
            .map(|_| chunked.on_update(Duration::from_millis(100)))
            .sum();
        let whole_fires = whole.on_update(Duration::from_secs(1));

        assert_eq!(chunked_fires, 3);
        assert_eq!(whole_fires, 3);
        assert_eq!(chunked.elapsed(), Duration::from_millis(100));
        assert_eq!(whole.elapsed(), Duration::from_millis(100));
    }

    #[test]
    fn callback_runs_once_per_crossing() {
        let count = Rc::new(Cell::new(0));
        let mut timer = repeating(Duration::from_millis(250));
        let observed = Rc::clone(&count);
        timer.set_on_timeout(move || observed.set(observed.get() + 1));

        assert_eq!(timer.on_update(Duration::from_millis(1000)), 4);
        assert_eq!(count.get(), 4);
    }

    #[test]
    fn one_shot_fires_once_and_stops() {
        let mut timer = repeating(Duration::from_millis(75));
        timer.set_one_shot(true);
        assert!(timer.is_one_shot());

        assert_eq!(timer.on_update(Duration::from_millis(50)), 0);
        assert_eq!(timer.on_update(Duration::from_millis(25)), 1);
        assert!(!timer.is_running());
        assert_eq!(timer.on_update(Duration::from_secs(5)), 0);

        timer.restart();
        assert_eq!(timer.on_update(Duration::from_secs(5)), 1);
    }

    #[test]
    fn paused_timer_keeps_elapsed_time() {
        let mut timer = repeating(Duration::from_secs(1));
        assert_eq!(timer.on_update(Duration::from_millis(600)), 0);

        timer.pause();
        assert_eq!(timer.on_update(Duration::from_secs(3)), 0);
        assert_eq!(timer.elapsed(), Duration::from_millis(600));

        timer.resume();
        assert_eq!(timer.on_update(Duration::from_millis(400)), 1);
    }

    #[test]
    fn zero_wait_time_fires_once_per_update() {
        let mut timer = Timer::new();
        assert_eq!(timer.on_update(Duration::from_millis(16)), 1);
        assert_eq!(timer.on_update(Duration::ZERO), 1);
    }
}
