//! Monotonic time source and blocking delay

/// Millisecond clock interface
///
/// `now_ms` is a free-running counter that is allowed to wrap around at
/// `u32::MAX`; use [`elapsed_ms`] to compare two readings.
pub trait Clock {
    /// Current value of the monotonic millisecond counter
    fn now_ms(&self) -> u32;

    /// Block the caller for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<C: Clock + ?Sized> Clock for &mut C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms)
    }
}

/// Milliseconds elapsed from `earlier` to `now`, tolerating counter wraparound
pub fn elapsed_ms(now: u32, earlier: u32) -> u32 {
    now.wrapping_sub(earlier)
}

/// Clock backed by `std::time::Instant` for desktop and SITL builds
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&self) -> u32 {
        // Truncation wraps the counter the same way a hardware tick does
        self.origin.elapsed().as_millis() as u32
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

/// Clock backed by the embassy time driver
///
/// Delays busy-wait with `embassy_time::block_for`, so they are safe to use
/// outside of an executor.
#[cfg(feature = "embassy")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

#[cfg(feature = "embassy")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        embassy_time::Instant::now().as_millis() as u32
    }

    fn delay_ms(&mut self, ms: u32) {
        embassy_time::block_for(embassy_time::Duration::from_millis(ms as u64));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_without_wrap() {
        assert_eq!(elapsed_ms(1500, 1000), 500);
        assert_eq!(elapsed_ms(42, 42), 0);
    }

    #[test]
    fn test_elapsed_across_wraparound() {
        assert_eq!(elapsed_ms(250, u32::MAX - 249), 500);
        assert_eq!(elapsed_ms(0, u32::MAX), 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_std_clock_delay_advances_counter() {
        let mut clock = StdClock::new();
        let start = clock.now_ms();
        clock.delay_ms(20);
        assert!(elapsed_ms(clock.now_ms(), start) >= 20);
    }
}
