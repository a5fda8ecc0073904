//! PID controller for the steering loop.

use salvo_core::config::PidGains;

/// Proportional-integral-derivative controller with a clamped integrator.
///
/// The derivative term is zero on the first update after construction or
/// `reset`, so a fresh controller never sees a spurious kick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidController {
    pub gains: PidGains,
    integral: f64,
    previous_error: Option<f64>,
}

impl Default for PidController {
    fn default() -> Self {
        Self::new(PidGains::default())
    }
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            previous_error: None,
        }
    }

    /// Feed one error sample taken `dt` seconds after the previous one.
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        let limit = self.gains.integral_limit;
        self.integral = (self.integral + error * dt).clamp(-limit, limit);

        let derivative = match self.previous_error {
            Some(previous) if dt > 0.0 => (error - previous) / dt,
            _ => 0.0,
        };
        self.previous_error = Some(error);

        self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = None;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }
}
