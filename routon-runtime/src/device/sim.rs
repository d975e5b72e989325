use rand::Rng;

use super::{Actuator, Stopwatch};

/// Virtual actuator channel.
///
/// Integrates the last commanded output or velocity setpoint into the
/// position counter on every cycle. The sensor phase can be inverted to
/// match a mirrored drivetrain side, and jitter adds sensor noise on top
/// of the integrated position.
pub struct VirtualActuator {
    rng: rand::rngs::OsRng,
    position: f32,
    output: f32,
    velocity: f32,
    rate: f32,
    invert: bool,
    jitter: bool,
}

impl VirtualActuator {
    /// Construct a new virtual actuator.
    ///
    /// The rate is the position change in counts per second at full
    /// open-loop output. Velocity setpoints integrate as counts per second
    /// directly.
    pub fn new(rate: f32, invert: bool, jitter: bool) -> Self {
        Self {
            rng: rand::rngs::OsRng,
            position: 0.0,
            output: 0.0,
            velocity: 0.0,
            rate,
            invert,
            jitter,
        }
    }

    /// Last commanded open-loop output.
    pub fn output(&self) -> f32 {
        self.output
    }

    /// Last commanded velocity setpoint.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}

impl Actuator for VirtualActuator {
    fn set_output(&mut self, output: f32) {
        self.output = output.clamp(-1.0, 1.0);
        self.velocity = 0.0;
    }

    fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
        self.output = 0.0;
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn reset_position(&mut self, counts: f32) {
        self.position = counts;
    }

    fn update(&mut self, dt: f32) {
        let command = self.output * self.rate + self.velocity;
        let command = if self.invert { -command } else { command };

        self.position += command * dt;

        if self.jitter && command != 0.0 {
            self.position += self.rng.gen_range(-1.0..=1.0);
        }
    }
}

/// Stopwatch advanced by hand.
///
/// Used for deterministic routine playback and tests. Time only moves
/// while the stopwatch is running.
pub struct ManualStopwatch {
    elapsed: f32,
    running: bool,
}

impl ManualStopwatch {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            running: false,
        }
    }

    /// Move time forward by the given number of seconds.
    pub fn advance(&mut self, seconds: f32) {
        if self.running {
            self.elapsed += seconds;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for ManualStopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch for ManualStopwatch {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actuator_integrates_output() {
        let mut actuator = VirtualActuator::new(100.0, false, false);

        actuator.set_output(0.5);
        actuator.update(1.0);

        assert_eq!(actuator.position(), 50.0);
    }

    #[test]
    fn test_actuator_inverted_sensor_phase() {
        let mut actuator = VirtualActuator::new(100.0, true, false);

        actuator.set_output(-0.5);
        actuator.update(1.0);

        assert_eq!(actuator.position(), 50.0);
    }

    #[test]
    fn test_actuator_output_clamped() {
        let mut actuator = VirtualActuator::new(100.0, false, false);

        actuator.set_output(2.5);

        assert_eq!(actuator.output(), 1.0);
    }

    #[test]
    fn test_actuator_velocity_integrates_directly() {
        let mut actuator = VirtualActuator::new(100.0, false, false);

        actuator.set_velocity(30.0);
        actuator.update(0.5);

        assert_eq!(actuator.position(), 15.0);
    }

    #[test]
    fn test_manual_stopwatch_only_moves_while_running() {
        let mut stopwatch = ManualStopwatch::new();

        stopwatch.advance(1.0);
        assert_eq!(stopwatch.elapsed(), 0.0);

        stopwatch.start();
        stopwatch.advance(1.0);
        assert_eq!(stopwatch.elapsed(), 1.0);

        stopwatch.stop();
        stopwatch.advance(1.0);
        assert_eq!(stopwatch.elapsed(), 1.0);

        stopwatch.reset();
        assert_eq!(stopwatch.elapsed(), 0.0);
    }
}
