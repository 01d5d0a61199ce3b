//! Fixed-timestep frame loop
//!
//! Called once per animation frame with a millisecond timestamp. Runs as many
//! fixed `SIM_DT` updates as the elapsed time covers and hands back the
//! leftover fraction of a step as the render interpolation alpha.

use crate::consts::{MAX_FRAME_MS, SIM_DT, STEP_MS};

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    accumulator: f64,
    last_time: Option<f64>,
    running: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or resume) at `now`; the first frame measures from here
    pub fn start(&mut self, now: f64) {
        self.running = true;
        self.last_time = Some(now);
        self.accumulator = 0.0;
    }

    /// No update or render happens after this until `start` is called again
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Leftover time not yet simulated, in steps
    pub fn alpha(&self) -> f32 {
        (self.accumulator / STEP_MS) as f32
    }

    /// Run one animation frame: as many fixed updates as the elapsed time
    /// covers. Returns the render alpha, or `None` when stopped (the caller
    /// must then neither render nor schedule another frame).
    pub fn frame(&mut self, now: f64, mut update: impl FnMut(f32)) -> Option<f32> {
        if !self.running {
            return None;
        }
        let last = self.last_time.unwrap_or(now);
        let frame_ms = (now - last).clamp(0.0, MAX_FRAME_MS);
        self.last_time = Some(now);

        self.accumulator += frame_ms;
        while self.accumulator >= STEP_MS {
            update(SIM_DT);
            self.accumulator -= STEP_MS;
        }
        Some(self.alpha())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lp: &mut FrameLoop, now: f64) -> (usize, Option<f32>) {
        let mut steps = 0;
        let alpha = lp.frame(now, |_| steps += 1);
        (steps, alpha)
    }

    #[test]
    fn test_steps_and_alpha() {
        let mut lp = FrameLoop::new();
        lp.start(1000.0);
        let (steps, alpha) = run(&mut lp, 1000.0 + STEP_MS * 2.5);
        assert_eq!(steps, 2);
        assert!((alpha.unwrap() - 0.5).abs() < 1e-4);
        // Carry-over completes the next step
        let (steps, _) = run(&mut lp, 1000.0 + STEP_MS * 3.2);
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut lp = FrameLoop::new();
        lp.start(0.0);
        // Tab came back after 10s: only 250ms worth of steps
        let (steps, _) = run(&mut lp, 10_000.0);
        assert!((14..=15).contains(&steps));
    }

    #[test]
    fn test_clock_going_backwards_is_ignored() {
        let mut lp = FrameLoop::new();
        lp.start(500.0);
        let (steps, alpha) = run(&mut lp, 400.0);
        assert_eq!(steps, 0);
        assert_eq!(alpha, Some(0.0));
    }

    #[test]
    fn test_stop_halts_everything() {
        let mut lp = FrameLoop::new();
        lp.start(0.0);
        lp.stop();
        let (steps, alpha) = run(&mut lp, 100.0);
        assert_eq!(steps, 0);
        assert_eq!(alpha, None);
        assert!(!lp.is_running());
    }
}
