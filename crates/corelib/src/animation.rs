//! Time-driven animation state.

use std::f32::consts::TAU;

/// An angle advancing at a constant angular speed (radians per second),
/// kept in `[0, TAU)`.
///
/// `update` takes absolute timestamps; the first call has no previous
/// timestamp and therefore applies a zero delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
    angle: f32,
    speed: f32,
    prev_time: Option<f32>,
}

impl Orbit {
    pub fn new(angle: f32, speed: f32) -> Self {
        Self {
            angle: wrap(angle),
            speed,
            prev_time: None,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance to absolute time `t` (seconds).
    pub fn update(&mut self, t: f32) {
        let dt = self.prev_time.map_or(0.0, |prev| t - prev);
        self.prev_time = Some(t);
        self.advance(dt);
    }

    /// Advance by an explicit delta (seconds).
    pub fn advance(&mut self, dt: f32) {
        self.angle = wrap(self.angle + self.speed * dt);
    }
}

fn wrap(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_8, PI};

    #[test]
    fn first_update_applies_no_delta() {
        let mut orbit = Orbit::new(FRAC_PI_2, FRAC_PI_8);
        orbit.update(1234.5);
        assert_eq!(orbit.angle(), FRAC_PI_2);
    }

    #[test]
    fn one_second_advances_by_speed() {
        let mut orbit = Orbit::new(FRAC_PI_2, FRAC_PI_8);
        orbit.update(2.0);
        orbit.update(3.0);
        assert!((orbit.angle() - (FRAC_PI_2 + FRAC_PI_8)).abs() < 1e-5);
    }

    #[test]
    fn half_steps_match_a_full_step() {
        let mut coarse = Orbit::new(0.3, FRAC_PI_8);
        let mut fine = coarse;
        coarse.update(1.0);
        fine.update(1.0);

        coarse.update(1.8);
        fine.update(1.4);
        fine.update(1.8);
        assert!((coarse.angle() - fine.angle()).abs() < 1e-5);
    }

    #[test]
    fn angle_wraps_at_full_turn() {
        let mut orbit = Orbit::new(3.0 * PI / 2.0, PI);
        orbit.advance(1.0);
        assert!((orbit.angle() - FRAC_PI_2).abs() < 1e-5);
        assert!(orbit.angle() < TAU);
    }

    #[test]
    fn negative_delta_stays_in_range() {
        let mut orbit = Orbit::new(0.1, 1.0);
        orbit.advance(-0.2);
        assert!((0.0..TAU).contains(&orbit.angle()));
        assert!((orbit.angle() - (TAU - 0.1)).abs() < 1e-5);
    }
}
