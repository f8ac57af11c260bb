/// Slots in the collision-time ring.
pub const RATE_WINDOW: usize = 16;

/// Moving-average collision rate over the last [`RATE_WINDOW`] event timestamps.
///
/// Until the ring has filled, the interval is measured against slot 0, the first event
/// recorded. Those early readings are rough and a single event gives an infinite rate.
#[derive(Clone, Debug, PartialEq)]
pub struct RateCounter {
    times: [f32; RATE_WINDOW],
    back: usize,
    recorded: usize,
}

impl Default for RateCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateCounter {
    pub fn new() -> Self {
        Self { times: [0.0; RATE_WINDOW], back: 0, recorded: 0 }
    }

    /// Record an event at `game_time` and return the current rate in events per unit time.
    pub fn record(&mut self, game_time: f32) -> f32 {
        self.times[self.back] = game_time;
        let dt = if self.recorded >= RATE_WINDOW - 1 {
            let front = (self.back + 1) % RATE_WINDOW;
            let dt = self.times[self.back] - self.times[front];
            self.back = front;
            dt
        } else {
            let dt = self.times[self.back] - self.times[0];
            self.back = (self.back + 1) % RATE_WINDOW;
            dt
        };
        self.recorded = (self.recorded + 1).min(RATE_WINDOW);
        RATE_WINDOW as f32 / dt
    }

    /// Events recorded so far, saturating at the window size.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_event_is_unbounded() {
        let mut r = RateCounter::new();
        assert!(r.record(3.0).is_infinite());
        assert_eq!(r.recorded(), 1);
    }

    #[test]
    fn test_steady_rate_once_full() {
        let mut r = RateCounter::new();
        let mut last = 0.0;
        for i in 0..40 {
            last = r.record(i as f32 * 0.5);
        }
        // Ring spans 15 intervals of 0.5s once full.
        assert!((last - RATE_WINDOW as f32 / 7.5).abs() < 1e-4);
        assert_eq!(r.recorded(), RATE_WINDOW);
    }

    #[test]
    fn test_warm_up_measures_from_slot_zero() {
        let mut r = RateCounter::new();
        r.record(1.0);
        r.record(2.0);
        let rate = r.record(3.0);
        assert!((rate - RATE_WINDOW as f32 / 2.0).abs() < 1e-5);
        r.reset();
        assert_eq!(r.recorded(), 0);
    }
}
