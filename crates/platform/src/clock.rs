use std::time::{Duration, Instant};

/// Window over which the frame rate is averaged.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Loop clock: seconds since start, plus a frame rate averaged over
/// half-second windows.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FrameClock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            start: now,
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Restart from zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Count one frame and return the seconds since start.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let window = now.duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.fps = self.frames as f32 / window.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        now.duration_since(self.start).as_secs_f32()
    }

    /// Frames per second over the last complete window; 0 until one has
    /// passed.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_is_averaged_over_half_a_second() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        for i in 1..30 {
            clock.tick_at(t0 + Duration::from_millis(i * 16));
            assert_eq!(clock.fps(), 0.0);
        }
        let t = clock.tick_at(t0 + Duration::from_millis(500));
        assert!((clock.fps() - 60.0).abs() < 1e-3);
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn elapsed_grows_from_zero() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0);
        assert_eq!(clock.tick_at(t0), 0.0);
        assert!((clock.tick_at(t0 + Duration::from_secs(2)) - 2.0).abs() < 1e-6);
    }
}
