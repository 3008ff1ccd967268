use crate::all::*;

// Smaller eigenvalue of the symmetric matrix `[a, b; b, c]`.
pub fn min_eigenvalue(a: f64, b: f64, c: f64) -> f64 {
  let half_trace = 0.5 * (a + c);
  let half_diff = 0.5 * (a - c);
  half_trace - (half_diff * half_diff + b * b).sqrt()
}

pub fn measure_distance(p0: Vector2d, p1: Vector2d) -> f64 {
  (p0 - p1).norm()
}

// Signed per-axis offset `p0 - p1`.
pub fn measure_xy_distance(p0: Vector2d, p1: Vector2d) -> (f64, f64) {
  (p0[0] - p1[0], p0[1] - p1[1])
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_min_eigenvalue() {
    assert_eq!(min_eigenvalue(3., 0., 5.), 3.);
    assert_eq!(min_eigenvalue(4., 0., 1.), 1.);
    // [2 1; 1 2] has eigenvalues 1 and 3.
    assert!((min_eigenvalue(2., 1., 2.) - 1.).abs() < 1e-12);
    // Rank one.
    assert!(min_eigenvalue(1., 1., 1.).abs() < 1e-12);
  }

  #[test]
  fn test_distances() {
    let p0 = Vector2d::new(4., 6.);
    let p1 = Vector2d::new(1., 2.);
    assert_eq!(measure_distance(p0, p1), 5.);
    assert_eq!(measure_xy_distance(p0, p1), (3., 4.));
    assert_eq!(measure_xy_distance(p1, p0), (-3., -4.));
  }
}
