//! Fixed timestep accumulator
//!
//! Decouples simulation rate from render rate. The simulation only ever
//! advances in whole `fixed_dt` steps; under sustained overload it drops to
//! the sub-step cap and slows down instead of spiraling.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedTimestepLoop {
    fixed_dt: f32,
    max_substeps: u32,
    max_frame_dt: f32,
    accumulator: f32,
}

impl Default for FixedTimestepLoop {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedTimestepLoop {
    pub fn new(fixed_dt: f32, max_substeps: u32) -> Self {
        Self {
            fixed_dt,
            max_substeps: max_substeps.max(1),
            max_frame_dt: MAX_FRAME_DT,
            accumulator: 0.0,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Unconsumed time carried into the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Drop any banked time (new rocket, scene change)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Advance one real frame.
    ///
    /// Calls `on_fixed` with exactly `fixed_dt` for each whole step banked (up to
    /// the sub-step cap), then `on_render` once with the clamped frame delta.
    /// Returns the number of fixed steps run.
    pub fn frame<F, R>(&mut self, frame_dt: f32, mut on_fixed: F, mut on_render: R) -> u32
    where
        F: FnMut(f32),
        R: FnMut(f32),
    {
        let dt = frame_dt.clamp(0.0, self.max_frame_dt);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.fixed_dt && substeps < self.max_substeps {
            on_fixed(self.fixed_dt);
            self.accumulator -= self.fixed_dt;
            substeps += 1;
        }

        on_render(dt);
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_frames_run_one_step() {
        let mut lp = FixedTimestepLoop::new(0.01, 5);
        let mut steps = 0;
        for _ in 0..10 {
            steps += lp.frame(0.0101, |_| {}, |_| {});
        }
        assert_eq!(steps, 10);
    }

    #[test]
    fn test_huge_delta_is_clamped_and_capped() {
        let mut lp = FixedTimestepLoop::new(SIM_DT, MAX_SUBSTEPS);
        let mut render_dt = 0.0;
        let steps = lp.frame(10.0, |_| {}, |dt| render_dt = dt);
        assert_eq!(steps, MAX_SUBSTEPS);
        assert_eq!(render_dt, MAX_FRAME_DT);
        // Leftover time stays banked rather than being simulated
        assert!(lp.accumulator() > 0.0);
    }

    #[test]
    fn test_small_frames_accumulate() {
        let mut lp = FixedTimestepLoop::new(0.1, 5);
        assert_eq!(lp.frame(0.06, |_| {}, |_| {}), 0);
        assert_eq!(lp.frame(0.06, |_| {}, |_| {}), 1);
    }

    proptest! {
        #[test]
        fn prop_fixed_steps_never_outrun_real_time(deltas in prop::collection::vec(0.0f32..0.5, 1..200)) {
            let fixed_dt = SIM_DT;
            let mut lp = FixedTimestepLoop::new(fixed_dt, MAX_SUBSTEPS);
            let mut total_real = 0.0f64;
            let mut total_sim = 0.0f64;
            for delta in deltas {
                total_real += delta.min(MAX_FRAME_DT) as f64;
                let mut wrong_dt = false;
                let steps = lp.frame(
                    delta,
                    |dt| {
                        if dt != fixed_dt {
                            wrong_dt = true;
                        }
                        total_sim += dt as f64;
                    },
                    |_| {},
                );
                prop_assert!(!wrong_dt);
                prop_assert!(steps <= MAX_SUBSTEPS);
                prop_assert!(total_sim <= total_real + 1e-4);
            }
        }
    }
}
