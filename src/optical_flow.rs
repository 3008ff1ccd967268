// Pyramidal Lucas-Kanade tracker based on:
// <http://robots.stanford.edu/cs223b04/algo_tracking.pdf>
// “Pyramidal Implementation of the Lucas Kanade Feature Tracker
//   Description of the algorithm” by Jean-Yves Bouguet

use crate::all::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowParams {
  // Side of the square integration window, odd.
  pub win_size: usize,
  // Index of the coarsest pyramid level, 0 tracks on the full image only.
  pub max_level: usize,
  // Iteration limit per level.
  pub max_iters: usize,
  // Iteration stops once the update is at most this long, pixels.
  pub epsilon: f64,
  // Points whose window has a smaller minimum eigenvalue, normalized by
  // window area, are reported lost.
  pub min_eig_threshold: f64,
}

impl Default for FlowParams {
  fn default() -> FlowParams {
    FlowParams {
      win_size: 15,
      max_level: 2,
      max_iters: 10,
      epsilon: 0.03,
      min_eig_threshold: 1e-4,
    }
  }
}

#[allow(non_snake_case)]
pub struct OpticalFlow {
  lk_iters: usize,
  lk_levels: usize,
  lk_win_size: usize,
  lk_epsilon: f64,
  lk_min_eig: f64,
  Ix: Matrixd,
  Iy: Matrixd,
  It: Matrixd,
  // Workspace.
  grid0: Matrixd,
  grid1: Matrixd,
}

impl OpticalFlow {
  pub fn new(params: &FlowParams) -> Result<OpticalFlow> {
    if params.win_size % 2 != 1 {
      bail!("Lucas-Kanade window size must be odd number.");
    }
    if params.win_size < 3 {
      bail!("Lucas-Kanade window size must be at least 3.");
    }
    if params.max_iters == 0 {
      bail!("Lucas-Kanade needs at least one iteration.");
    }
    if !(params.epsilon >= 0.) || !(params.min_eig_threshold >= 0.) {
      bail!("Lucas-Kanade thresholds must be non-negative.");
    }
    let n = params.win_size;
    Ok(OpticalFlow {
      lk_iters: params.max_iters,
      lk_levels: params.max_level,
      lk_win_size: n,
      lk_epsilon: params.epsilon,
      lk_min_eig: params.min_eig_threshold,
      Ix: DMatrix::zeros(n, n),
      Iy: DMatrix::zeros(n, n),
      It: DMatrix::zeros(n, n),
      grid0: DMatrix::zeros(n + 2, n + 2),
      grid1: DMatrix::zeros(n, n),
    })
  }

  // Number of pyramid levels frames passed to `process()` must have.
  pub fn level_count(&self) -> usize {
    self.lk_levels
  }

  // Lost features keep their old coordinates in `features1`.
  pub fn process(
    &mut self,
    frame0: &Frame,
    frame1: &Frame,
    features0: &[Vector2d],
    features1: &mut Vec<Vector2d>,
    statuses: &mut Vec<bool>,
  ) {
    assert!(frame0.level_count() >= self.lk_levels);
    assert!(frame1.level_count() >= self.lk_levels);
    features1.clear();
    statuses.clear();
    for feature0 in features0 {
      if let Some(feature1) = self.process_feature(frame0, frame1, *feature0) {
        features1.push(feature1);
        statuses.push(true);
      }
      else {
        features1.push(*feature0);
        statuses.push(false);
      }
    }
  }

  #[allow(non_snake_case)]
  fn process_feature(
    &mut self,
    frame0: &Frame,
    frame1: &Frame,
    feature0: Vector2d,
  ) -> Option<Vector2d> {
    let r = (self.lk_win_size - 1) / 2;
    let area = (self.lk_win_size * self.lk_win_size) as f64;
    let mut g = Vector2d::zeros();
    for L in (0..self.lk_levels + 1).rev() {
      let level0 = frame0.get_level(L);
      let level1 = frame1.get_level(L);
      let u = feature0 / u32::pow(2, L as u32) as f64;
      fill_grid(&level0, u, r + 1, &mut self.grid0);
      scharr(&self.grid0, &mut self.Ix, &mut self.Iy);
      let G = spatial_gradient(&self.Ix, &self.Iy);
      // A degenerate window on a coarse level only skips that level, the
      // point is lost only if the full resolution level is degenerate.
      let min_eig = min_eigenvalue(G[(0, 0)], G[(0, 1)], G[(1, 1)]) / area;
      let invG = match G.try_inverse() {
        Some(invG) if min_eig >= self.lk_min_eig => invG,
        _ if L > 0 => {
          g *= 2.;
          continue;
        },
        _ => return None,
      };
      let mut nu = Vector2d::zeros();
      for _ in 0..self.lk_iters {
        fill_grid(&level1, u + g + nu, r, &mut self.grid1);
        image_difference(&self.grid0, &self.grid1, &mut self.It);
        let eta = flow_vector(&invG, &self.Ix, &self.Iy, &self.It);
        nu += eta;
        if eta.norm() <= self.lk_epsilon { break }
      }
      g = if L > 0 { 2. * (g + nu) } else { g + nu };
    }
    let feature1 = feature0 + g;
    if !feature1.iter().all(|v| v.is_finite()) { return None }
    if !frame1.contains(feature1) { return None }
    Some(feature1)
  }
}

// `It = I0 - I1`, where `I0` is the interior of the padded source grid.
#[allow(non_snake_case)]
fn image_difference(I0: &Matrixd, I1: &Matrixd, It: &mut Matrixd) {
  It.copy_from(&I0.slice((1, 1), (I1.nrows(), I1.ncols())));
  *It -= I1;
}

#[allow(non_snake_case)]
fn flow_vector(
  invG: &Matrix2d,
  Ix: &Matrixd,
  Iy: &Matrixd,
  It: &Matrixd,
) -> Vector2d {
  let mut b = Vector2d::zeros();
  for y in 0..Ix.nrows() {
    for x in 0..Ix.ncols() {
      b[0] += It[(y, x)] * Ix[(y, x)];
      b[1] += It[(y, x)] * Iy[(y, x)];
    }
  }
  invG * b
}

#[allow(non_snake_case)]
fn spatial_gradient(Ix: &Matrixd, Iy: &Matrixd) -> Matrix2d {
  assert_eq!(Ix.nrows(), Iy.nrows());
  assert_eq!(Ix.ncols(), Iy.ncols());
  let mut x2 = 0.;
  let mut y2 = 0.;
  let mut xy = 0.;
  for y in 0..Ix.nrows() {
    for x in 0..Ix.ncols() {
      x2 += Ix[(y, x)] * Ix[(y, x)];
      y2 += Iy[(y, x)] * Iy[(y, x)];
      xy += Ix[(y, x)] * Iy[(y, x)];
    }
  }
  Matrix2d::new(x2, xy, xy, y2)
}

// Samples the square of radius `r` around `center` into `grid`, which must be
// `(2r + 1) × (2r + 1)`.
fn fill_grid(
  level: &Level,
  center: Vector2d,
  r: usize,
  grid: &mut Matrixd,
) {
  debug_assert_eq!(grid.nrows(), 2 * r + 1);
  let r = r as i64;
  for (y_ind, y) in (-r..=r).enumerate() {
    for (x_ind, x) in (-r..=r).enumerate() {
      grid[(y_ind, x_ind)] = bilinear(level, center + Vector2d::new(x as f64, y as f64));
    }
  }
}

// Writes derivatives of the interior of `grid` to `out_x` and `out_y`, both
// two smaller than `grid` in each dimension.
fn scharr(
  grid: &Matrixd,
  out_x: &mut Matrixd,
  out_y: &mut Matrixd,
) {
  for y in 1..(grid.nrows() - 1) {
    for x in 1..(grid.ncols() - 1) {
      out_x[(y - 1, x - 1)] = (10. * grid[(y, x + 1)]
        + 3. * grid[(y + 1, x + 1)]
        + 3. * grid[(y - 1, x + 1)]
        - 10. * grid[(y, x - 1)]
        - 3. * grid[(y + 1, x - 1)]
        - 3. * grid[(y - 1, x - 1)]
      ) / 32.;
      out_y[(y - 1, x - 1)] = (10. * grid[(y + 1, x)]
        + 3. * grid[(y + 1, x + 1)]
        + 3. * grid[(y + 1, x - 1)]
        - 10. * grid[(y - 1, x)]
        - 3. * grid[(y - 1, x + 1)]
        - 3. * grid[(y - 1, x - 1)]
      ) / 32.;
    }
  }
}

// Coordinates outside the level are clamped to the border pixels.
#[inline(always)]
fn bilinear(level: &Level, u: Vector2d) -> f64 {
  let x = u[0].clamp(0., level.width as f64 - 1.);
  let y = u[1].clamp(0., level.height as f64 - 1.);
  let x0 = x as usize;
  let y0 = y as usize;
  let x1 = usize::min(x0 + 1, level.width - 1);
  let y1 = usize::min(y0 + 1, level.height - 1);
  let xa = x - x0 as f64;
  let ya = y - y0 as f64;
  // Besides improving computation speed, this avoids reading the clamped
  // neighbors on exact pixel coordinates.
  let eps = 1e-5;
  if xa < eps && ya < eps {
    level.value(x0, y0)
  }
  else {
    (1. - xa) * (1. - ya) * level.value(x0, y0)
      + xa * (1. - ya) * level.value(x1, y0)
      + (1. - xa) * ya * level.value(x0, y1)
      + xa * ya * level.value(x1, y1)
  }
}
