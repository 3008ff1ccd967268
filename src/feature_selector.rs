// Shi-Tomasi "good features to track" restricted to vertical image bands.

use crate::all::*;

use std::str::FromStr;

// Half-open column range `[start, end)` spanning all rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnBand {
  pub start: usize,
  pub end: usize,
}

impl ColumnBand {
  pub fn new(start: usize, end: usize) -> ColumnBand {
    ColumnBand { start, end }
  }
}

// Parses `start:end`.
impl FromStr for ColumnBand {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<ColumnBand, String> {
    let (start, end) = s.split_once(':')
      .ok_or(format!("Column band `{}` is not of the form start:end.", s))?;
    let start = start.trim().parse::<usize>()
      .map_err(|err| format!("Bad band start `{}`: {}", start, err))?;
    let end = end.trim().parse::<usize>()
      .map_err(|err| format!("Bad band end `{}`: {}", end, err))?;
    if start >= end {
      return Err(format!("Column band {}:{} is empty.", start, end));
    }
    Ok(ColumnBand { start, end })
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureParams {
  // Upper bound on the number of returned corners.
  pub max_corners: usize,
  // Fraction of the best corner score a corner must exceed.
  pub quality_level: f64,
  // Minimum Euclidean separation of returned corners, pixels.
  pub min_distance: f64,
  // Side of the structure tensor summation window.
  pub block_size: usize,
  // Corners are only taken from these columns. Touchline and edge bands
  // keep the players and the crowd out of the feature set.
  pub mask_bands: Vec<ColumnBand>,
}

impl Default for FeatureParams {
  fn default() -> FeatureParams {
    FeatureParams {
      max_corners: 100,
      quality_level: 0.3,
      min_distance: 3.,
      block_size: 7,
      mask_bands: vec![ColumnBand::new(0, 20), ColumnBand::new(900, 1050)],
    }
  }
}

pub struct FeatureSelector {
  params: FeatureParams,
}

struct Candidate {
  score: f64,
  x: usize,
  y: usize,
}

impl FeatureSelector {
  pub fn new(params: FeatureParams) -> Result<FeatureSelector> {
    if params.max_corners == 0 {
      bail!("Maximum number of corners must be positive.");
    }
    if !(params.quality_level > 0. && params.quality_level <= 1.) {
      bail!("Corner quality level must be in (0, 1], got {}.", params.quality_level);
    }
    if !(params.min_distance >= 0.) {
      bail!("Minimum corner distance must be non-negative, got {}.", params.min_distance);
    }
    if params.block_size == 0 {
      bail!("Corner block size must be positive.");
    }
    for band in &params.mask_bands {
      if band.start >= band.end {
        bail!("Mask band {}:{} is empty.", band.start, band.end);
      }
    }
    Ok(FeatureSelector { params })
  }

  pub fn params(&self) -> &FeatureParams {
    &self.params
  }

  // Columns of an image of `width` that may hold corners.
  pub fn mask(&self, width: usize) -> Vec<bool> {
    let mut mask = vec![false; width];
    for band in &self.params.mask_bands {
      for m in mask.iter_mut().take(band.end).skip(band.start) {
        *m = true;
      }
    }
    mask
  }

  // Corners sorted by decreasing score. Returns an empty set when nothing in
  // the mask qualifies.
  pub fn select(&self, image: &Image) -> Vec<Vector2d> {
    let mut features = vec![];
    let (w, h) = (image.width, image.height);
    if w < 3 || h < 3 { return features }
    let mask = self.mask(w);
    if !mask.iter().any(|m| *m) { return features }

    let scores = corner_scores(image, &mask, self.params.block_size);
    let max_score = scores.iter().cloned().fold(0., f64::max);
    if max_score <= 0. { return features }
    let threshold = self.params.quality_level * max_score;

    let mut candidates = vec![];
    for y in 1..(h - 1) {
      for x in 1..(w - 1) {
        let score = scores[y * w + x];
        if score <= threshold { continue }
        if !is_local_maximum(&scores, w, x, y) { continue }
        candidates.push(Candidate { score, x, y });
      }
    }
    // Stable sort, ties stay in raster order.
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let min_distance2 = self.params.min_distance * self.params.min_distance;
    for candidate in candidates {
      let p = Vector2d::new(candidate.x as f64, candidate.y as f64);
      if features.iter().any(|f: &Vector2d| (f - p).norm_squared() < min_distance2) { continue }
      features.push(p);
      if features.len() >= self.params.max_corners { break }
    }
    features
  }
}

// Minimum eigenvalue of the gradient structure tensor, zero outside the mask.
fn corner_scores(image: &Image, mask: &[bool], block_size: usize) -> Vec<f64> {
  let (w, h) = (image.width, image.height);
  // Integral images of the tensor entries, with a leading zero row and column.
  let iw = w + 1;
  let mut sxx = vec![0.; iw * (h + 1)];
  let mut sxy = vec![0.; iw * (h + 1)];
  let mut syy = vec![0.; iw * (h + 1)];
  for y in 0..h {
    let mut row = [0.; 3];
    for x in 0..w {
      let (dx, dy) = sobel(image, x as i64, y as i64);
      row[0] += dx * dx;
      row[1] += dx * dy;
      row[2] += dy * dy;
      let i = (y + 1) * iw + x + 1;
      sxx[i] = sxx[i - iw] + row[0];
      sxy[i] = sxy[i - iw] + row[1];
      syy[i] = syy[i - iw] + row[2];
    }
  }

  let box_sum = |s: &[f64], x0: usize, y0: usize, x1: usize, y1: usize| {
    s[y1 * iw + x1] - s[y0 * iw + x1] - s[y1 * iw + x0] + s[y0 * iw + x0]
  };

  let r = block_size / 2;
  let mut scores = vec![0.; w * h];
  for y in 0..h {
    let y0 = y.saturating_sub(r);
    let y1 = usize::min(y0 + block_size, h);
    for x in 0..w {
      if !mask[x] { continue }
      let x0 = x.saturating_sub(r);
      let x1 = usize::min(x0 + block_size, w);
      let a = box_sum(&sxx, x0, y0, x1, y1);
      let b = box_sum(&sxy, x0, y0, x1, y1);
      let c = box_sum(&syy, x0, y0, x1, y1);
      scores[y * w + x] = f64::max(0., min_eigenvalue(a, b, c));
    }
  }
  scores
}

// 3x3 Sobel derivatives with replicated borders.
fn sobel(image: &Image, x: i64, y: i64) -> (f64, f64) {
  let v = |dx: i64, dy: i64| image.value_clamped(x + dx, y + dy) as f64;
  let gx = v(1, -1) + 2. * v(1, 0) + v(1, 1) - v(-1, -1) - 2. * v(-1, 0) - v(-1, 1);
  let gy = v(-1, 1) + 2. * v(0, 1) + v(1, 1) - v(-1, -1) - 2. * v(0, -1) - v(1, -1);
  (gx, gy)
}

fn is_local_maximum(scores: &[f64], w: usize, x: usize, y: usize) -> bool {
  let center = scores[y * w + x];
  for ny in (y - 1)..=(y + 1) {
    for nx in (x - 1)..=(x + 1) {
      if scores[ny * w + nx] > center { return false }
    }
  }
  true
}

#[cfg(test)]
mod tests {
  use super::*;

  fn selector(mask_bands: Vec<ColumnBand>) -> FeatureSelector {
    FeatureSelector::new(FeatureParams {
      mask_bands,
      ..FeatureParams::default()
    }).unwrap()
  }

  // Dark image with bright filled squares at the given top-left corners.
  fn squares(width: usize, height: usize, corners: &[[usize; 2]], side: usize) -> Image {
    let mut image = Image::new(width, height);
    for c in corners {
      for y in c[1]..(c[1] + side) {
        for x in c[0]..(c[0] + side) {
          image.set_value(x, y, 200);
        }
      }
    }
    image
  }

  #[test]
  fn test_column_band_from_str() {
    assert_eq!("900:1050".parse::<ColumnBand>().unwrap(), ColumnBand::new(900, 1050));
    assert_eq!(" 0 : 20".parse::<ColumnBand>().unwrap(), ColumnBand::new(0, 20));
    assert!("20:20".parse::<ColumnBand>().is_err());
    assert!("20".parse::<ColumnBand>().is_err());
    assert!("a:5".parse::<ColumnBand>().is_err());
  }

  #[test]
  fn test_invalid_params() {
    let bad = [
      FeatureParams { max_corners: 0, ..FeatureParams::default() },
      FeatureParams { quality_level: 0., ..FeatureParams::default() },
      FeatureParams { quality_level: 1.5, ..FeatureParams::default() },
      FeatureParams { min_distance: -1., ..FeatureParams::default() },
      FeatureParams { block_size: 0, ..FeatureParams::default() },
      FeatureParams { mask_bands: vec![ColumnBand::new(5, 3)], ..FeatureParams::default() },
    ];
    for params in bad {
      assert!(FeatureSelector::new(params).is_err());
    }
  }

  #[test]
  fn test_mask_clipped_to_width() {
    let selector = selector(vec![ColumnBand::new(0, 2), ColumnBand::new(8, 50)]);
    assert_eq!(
      selector.mask(10),
      vec![true, true, false, false, false, false, false, false, true, true],
    );
  }

  #[test]
  fn test_flat_image_has_no_features() {
    let selector = selector(vec![ColumnBand::new(0, 40)]);
    let image = Image { data: vec![90; 40 * 30], width: 40, height: 30 };
    assert!(selector.select(&image).is_empty());
  }

  #[test]
  fn test_empty_mask_has_no_features() {
    let selector = selector(vec![ColumnBand::new(100, 200)]);
    let image = squares(40, 30, &[[10, 10]], 10);
    assert!(selector.select(&image).is_empty());
  }

  #[test]
  fn test_square_corners() {
    let selector = selector(vec![ColumnBand::new(0, 40)]);
    let image = squares(40, 40, &[[10, 10]], 20);
    let features = selector.select(&image);
    assert_eq!(features.len(), 4);
    // The score peaks a couple of pixels inside each corner.
    for corner in [[10., 10.], [29., 10.], [10., 29.], [29., 29.]] {
      let corner = Vector2d::new(corner[0], corner[1]);
      assert_eq!(features.iter().filter(|p| (*p - corner).norm() <= 4.).count(), 1);
    }
  }

  #[test]
  fn test_mask_restricts_columns() {
    let selector = selector(vec![ColumnBand::new(0, 20)]);
    let image = squares(60, 40, &[[6, 10], [36, 10]], 10);
    let features = selector.select(&image);
    assert!(!features.is_empty());
    assert!(features.iter().all(|p| p[0] < 20.));
  }

  #[test]
  fn test_max_corners_and_min_distance() {
    let corners: Vec<[usize; 2]> = (0..4)
      .flat_map(|i| (0..4).map(move |j| [5 + 12 * i, 5 + 12 * j]))
      .collect();
    let image = squares(60, 60, &corners, 6);
    let unlimited = FeatureSelector::new(FeatureParams {
      max_corners: 1000,
      quality_level: 0.01,
      min_distance: 10.,
      mask_bands: vec![ColumnBand::new(0, 60)],
      ..FeatureParams::default()
    }).unwrap().select(&image);
    assert!(unlimited.len() > 5);
    for (i, p) in unlimited.iter().enumerate() {
      for q in &unlimited[i + 1..] {
        assert!((p - q).norm() >= 10.);
      }
    }

    let limited = FeatureSelector::new(FeatureParams {
      max_corners: 5,
      quality_level: 0.01,
      min_distance: 10.,
      mask_bands: vec![ColumnBand::new(0, 60)],
      ..FeatureParams::default()
    }).unwrap().select(&image);
    assert_eq!(limited.len(), 5);
    assert_eq!(limited[..], unlimited[..5]);
  }
}
