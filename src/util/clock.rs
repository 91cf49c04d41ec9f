use web_time::Instant;

/// Monotonic elapsed-time source for the render loop. Backed by
/// `performance.now()` on wasm.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    /// Start counting from now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since [`Clock::start`].
    #[must_use]
    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_never_decreases() {
        let clock = Clock::start();
        let a = clock.elapsed_secs();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.elapsed_secs();
        assert!(a >= 0.0);
        assert!(b > a);
    }
}
