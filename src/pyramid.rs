use crate::all::*;

// Binomial approximation of a Gaussian.
const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];

// Successively halved copies of a base image. The base itself is not stored,
// so `levels[0]` is half the resolution of the base.
pub struct Pyramid {
  pub levels: Vec<Image>,
}

impl Pyramid {
  pub fn new(
    base: &Image,
    unused_pyramid: Option<Pyramid>,
    level_count: usize,
  ) -> Pyramid {
    Pyramid {
      levels: compute_levels(
        base,
        unused_pyramid.map(|x| x.levels),
        level_count,
      ),
    }
  }

  // Size of level `level`, counting the base as level 0.
  pub fn size(&self, level: usize) -> [usize; 2] {
    let image = &self.levels[level - 1];
    [image.width, image.height]
  }
}

fn compute_levels(
  base: &Image,
  unused_levels: Option<Vec<Image>>,
  level_count: usize,
) -> Vec<Image> {
  let mut levels = unused_levels.unwrap_or_default();
  levels.resize_with(level_count, Image::empty);
  for level_ind in 0..level_count {
    let (parents, children) = levels.split_at_mut(level_ind);
    let parent = if level_ind > 0 { &parents[level_ind - 1] } else { base };
    downscale(parent, &mut children[0]);
  }
  levels
}

// Child pixel `(i, j)` is the 5x5 Gaussian of the parent centered at `(2i, 2j)`,
// with replicated borders.
fn downscale(parent: &Image, child: &mut Image) {
  let width = (parent.width + 1) / 2;
  let height = (parent.height + 1) / 2;
  child.data.clear();
  child.data.resize(width * height, 0);
  child.width = width;
  child.height = height;
  if width == 0 || height == 0 { return }

  // Horizontal pass over every parent row, sums scaled by 16.
  let mut rows = vec![0u32; parent.height * width];
  for y in 0..parent.height {
    for x in 0..width {
      let mut sum = 0;
      for (k, w) in KERNEL.iter().enumerate() {
        let px = 2 * x as i64 + k as i64 - 2;
        sum += w * parent.value_clamped(px, y as i64) as u32;
      }
      rows[y * width + x] = sum;
    }
  }

  // Vertical pass, sums scaled by 256.
  let last_row = parent.height as i64 - 1;
  for y in 0..height {
    for x in 0..width {
      let mut sum = 0;
      for (k, w) in KERNEL.iter().enumerate() {
        let py = (2 * y as i64 + k as i64 - 2).clamp(0, last_row) as usize;
        sum += w * rows[py * width + x];
      }
      child.set_value(x, y, ((sum + 128) >> 8) as u8);
    }
  }
}
