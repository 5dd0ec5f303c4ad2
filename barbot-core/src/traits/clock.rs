//! Monotonic time source

/// Monotonic clock
///
/// Only differences between readings are meaningful. Millisecond values
/// wrap; consumers compare them with wrapping subtraction.
pub trait Clock {
    /// Microseconds since an arbitrary epoch
    fn now_us(&self) -> u64;

    /// Milliseconds since the same epoch, truncated to 32 bits
    fn now_ms(&self) -> u32 {
        (self.now_us() / 1000) as u32
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

/// Milliseconds elapsed from `since` to `now`, tolerant of wraparound
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u64);

    impl Clock for Fixed {
        fn now_us(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_now_ms_derived() {
        assert_eq!(Fixed(1_234_567).now_ms(), 1234);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        assert_eq!(elapsed_ms(5, u32::MAX - 4), 10);
        assert_eq!(elapsed_ms(1000, 250), 750);
    }

    #[test]
    fn test_reference_clock() {
        let clock = Fixed(2_000);
        let by_ref = &clock;
        assert_eq!(by_ref.now_ms(), 2);
    }
}
