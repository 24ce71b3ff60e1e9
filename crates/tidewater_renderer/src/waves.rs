//! CPU height-field wave simulation for the water surface.
//!
//! The grid solves the damped 2-D wave equation with an explicit
//! finite-difference scheme. The three update coefficients are derived
//! once from the physical parameters (spatial step, time step, wave speed,
//! damping); the time step chosen at construction — not the caller's frame
//! time — governs numerical stability, so [`Waves::update`] accumulates
//! frame time and advances in fixed sub-steps.
//!
//! Boundary samples are pinned at zero height. [`Waves::disturb`] clamps
//! its target cell into the interior so an impulse can never write to (or
//! past) the boundary ring.

use glam::Vec3;

pub struct Waves {
    rows: usize,
    cols: usize,

    spatial_step: f32,
    time_step: f32,

    // update coefficients folded from (damping, speed, dx, dt)
    k1: f32,
    k2: f32,
    k3: f32,

    /// Frame time not yet consumed by a fixed sub-step.
    accumulated: f32,

    prev_height: Vec<f32>,
    curr_height: Vec<f32>,
    normals: Vec<Vec3>,
}

impl Waves {
    /// Builds a `rows` × `cols` grid with `spatial_step` between samples.
    ///
    /// `speed` and `damping` must satisfy the usual explicit-scheme
    /// stability bound for the given steps; the debug assertion catches
    /// parameter sets that would blow up.
    pub fn new(
        rows: usize,
        cols: usize,
        spatial_step: f32,
        time_step: f32,
        speed: f32,
        damping: f32,
    ) -> Self {
        assert!(rows >= 5 && cols >= 5, "wave grid needs an interior");

        let d = damping * time_step + 2.0;
        let e = (speed * speed) * (time_step * time_step)
            / (spatial_step * spatial_step);
        debug_assert!(e < 0.5, "unstable wave parameters");

        let count = rows * cols;
        Self {
            rows,
            cols,
            spatial_step,
            time_step,
            k1: (damping * time_step - 2.0) / d,
            k2: (4.0 - 8.0 * e) / d,
            k3: (2.0 * e) / d,
            accumulated: 0.0,
            prev_height: vec![0.0; count],
            curr_height: vec![0.0; count],
            normals: vec![Vec3::Y; count],
        }
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        (self.rows - 1) * (self.cols - 1) * 2
    }

    /// Extent of the grid along X.
    #[inline]
    pub fn width(&self) -> f32 {
        (self.cols - 1) as f32 * self.spatial_step
    }

    /// Extent of the grid along Z.
    #[inline]
    pub fn depth(&self) -> f32 {
        (self.rows - 1) as f32 * self.spatial_step
    }

    /// World-space sample position for the flat vertex index `i`.
    pub fn position(&self, i: usize) -> Vec3 {
        let row = i / self.cols;
        let col = i % self.cols;
        Vec3::new(
            -0.5 * self.width() + col as f32 * self.spatial_step,
            self.curr_height[i],
            0.5 * self.depth() - row as f32 * self.spatial_step,
        )
    }

    /// Unit surface normal for the flat vertex index `i`.
    #[inline]
    pub fn normal(&self, i: usize) -> Vec3 {
        self.normals[i]
    }

    /// Advances the simulation by `dt` seconds of caller time, in as many
    /// fixed sub-steps as have accumulated.
    pub fn update(&mut self, dt: f32) {
        self.accumulated += dt;
        while self.accumulated >= self.time_step {
            self.accumulated -= self.time_step;
            self.step();
        }
    }

    /// Adds a height impulse at `(row, col)` and half the magnitude at the
    /// four neighbors. The target is clamped far enough into the interior
    /// that neither it nor its neighbors land on the pinned boundary ring.
    pub fn disturb(&mut self, row: usize, col: usize, magnitude: f32) {
        let row = row.clamp(2, self.rows - 3);
        let col = col.clamp(2, self.cols - 3);

        let n = self.cols;
        self.curr_height[row * n + col] += magnitude;
        let half = 0.5 * magnitude;
        self.curr_height[row * n + col + 1] += half;
        self.curr_height[row * n + col - 1] += half;
        self.curr_height[(row + 1) * n + col] += half;
        self.curr_height[(row - 1) * n + col] += half;
    }

    /// One fixed time step: finite-difference update of the interior, then
    /// buffer swap, then normal refresh.
    fn step(&mut self) {
        let n = self.cols;
        for row in 1..self.rows - 1 {
            for col in 1..self.cols - 1 {
                let i = row * n + col;
                // After the update `prev` holds the *next* solution; the
                // swap below promotes it. This avoids a third buffer.
                self.prev_height[i] = self.k1 * self.prev_height[i]
                    + self.k2 * self.curr_height[i]
                    + self.k3
                        * (self.curr_height[i + n]
                            + self.curr_height[i - n]
                            + self.curr_height[i + 1]
                            + self.curr_height[i - 1]);
            }
        }
        std::mem::swap(&mut self.prev_height, &mut self.curr_height);

        self.update_normals();
    }

    /// Central-difference normals over the interior; the boundary keeps +Y.
    fn update_normals(&mut self) {
        let n = self.cols;
        let two_dx = 2.0 * self.spatial_step;
        for row in 1..self.rows - 1 {
            for col in 1..self.cols - 1 {
                let i = row * n + col;
                let left = self.curr_height[i - 1];
                let right = self.curr_height[i + 1];
                let top = self.curr_height[i - n];
                let bottom = self.curr_height[i + n];
                self.normals[i] =
                    Vec3::new(left - right, two_dx, bottom - top).normalize();
            }
        }
    }

    #[cfg(test)]
    fn energy(&self) -> f32 {
        self.curr_height.iter().map(|h| h * h).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_waves() -> Waves {
        Waves::new(32, 32, 1.0, 0.03, 4.0, 0.8)
    }

    #[test]
    fn grid_counts() {
        let w = small_waves();
        assert_eq!(w.vertex_count(), 32 * 32);
        assert_eq!(w.triangle_count(), 31 * 31 * 2);
        assert_eq!(w.width(), 31.0);
        assert_eq!(w.depth(), 31.0);
    }

    #[test]
    fn disturb_near_edge_is_clamped_inside() {
        let mut w = small_waves();
        w.disturb(0, 0, 1.0);
        // boundary ring must stay untouched
        let n = w.column_count();
        for col in 0..n {
            assert_eq!(w.curr_height[col], 0.0, "top edge written");
            assert_eq!(w.curr_height[(w.row_count() - 1) * n + col], 0.0);
        }
        for row in 0..w.row_count() {
            assert_eq!(w.curr_height[row * n], 0.0, "left edge written");
            assert_eq!(w.curr_height[row * n + n - 1], 0.0);
        }
        // the clamped interior cell received the impulse
        assert!(w.curr_height[2 * n + 2] >= 1.0);
    }

    #[test]
    fn disturbance_raises_energy_then_damping_settles_it() {
        let mut w = small_waves();
        assert_eq!(w.energy(), 0.0);

        w.disturb(16, 16, 0.5);
        let e0 = w.energy();
        assert!(e0 > 0.0);

        w.update(10.0);
        let e1 = w.energy();
        assert!(e1 < e0);

        w.update(20.0);
        let e2 = w.energy();
        assert!(e2 < e1);
        assert!(e2 < 0.1 * e0, "energy failed to settle: {e2} vs {e0}");
    }

    #[test]
    fn update_only_steps_in_fixed_increments() {
        let mut w = small_waves();
        w.disturb(16, 16, 0.5);
        let before = w.curr_height.clone();
        // less than one time step: no solve may run
        w.update(0.01);
        assert_eq!(w.curr_height, before);
        w.update(0.05);
        assert_ne!(w.curr_height, before);
    }

    #[test]
    fn boundary_heights_stay_pinned_during_simulation() {
        let mut w = small_waves();
        w.disturb(2, 2, 1.0);
        w.update(5.0);
        let n = w.column_count();
        for col in 0..n {
            assert_eq!(w.curr_height[col], 0.0);
        }
    }

    #[test]
    fn normals_tilt_away_from_a_peak() {
        let mut w = small_waves();
        w.disturb(16, 16, 1.0);
        w.update(0.03);
        // a neighbor of the peak should have a non-vertical normal
        let i = 16 * w.column_count() + 17;
        assert!(w.normal(i).x.abs() > 0.0 || w.normal(i).z.abs() > 0.0);
        assert!((w.normal(i).length() - 1.0).abs() < 1e-5);
    }
}
