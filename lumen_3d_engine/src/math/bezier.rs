/// Cubic easing curve through (0,0) and (1,1)
///
/// Keyframe interpolators store the two inner control points. `calculate`
/// maps a linear progress `x` in [0,1] to an eased progress `y`.

/// Bisection steps when solving x(t) = x
const SOLVE_ITERATIONS: u32 = 32;
const SOLVE_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Bezier {
    /// Create a curve from its two inner control points
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Identity easing
    pub fn linear() -> Self {
        Self::new(0.25, 0.25, 0.75, 0.75)
    }

    /// Returns true when both control points sit on the diagonal
    pub fn is_linear(&self) -> bool {
        self.x1 == self.y1 && self.x2 == self.y2
    }

    /// Eased progress for a linear progress `x` (clamped to [0,1])
    pub fn calculate(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if self.is_linear() {
            return x;
        }

        let mut lo = 0.0f32;
        let mut hi = 1.0f32;
        let mut t = x;
        for _ in 0..SOLVE_ITERATIONS {
            let current = Self::component(t, self.x1, self.x2);
            if (current - x).abs() < SOLVE_EPSILON {
                break;
            }
            if current < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }

        Self::component(t, self.y1, self.y2)
    }

    // Cubic with end points 0 and 1
    fn component(t: f32, p1: f32, p2: f32) -> f32 {
        let inv = 1.0 - t;
        3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t
    }
}

impl Default for Bezier {
    fn default() -> Self {
        Self::linear()
    }
}

#[cfg(test)]
#[path = "bezier_tests.rs"]
mod tests;
