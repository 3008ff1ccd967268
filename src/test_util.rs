// Synthetic scenes for tests.

use crate::all::*;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const CELL: usize = 28;
const BACKGROUND: u8 = 30;

// Dark background scattered with bright rectangles of random size and
// brightness, one per grid cell, then blurred. Gives trackable corners
// everywhere without a repeating pattern.
pub fn textured_canvas(width: usize, height: usize, seed: u64) -> Image {
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
  let mut image = Image { data: vec![BACKGROUND; width * height], width, height };
  for cy in (0..height).step_by(CELL) {
    for cx in (0..width).step_by(CELL) {
      let w = rng.gen_range(8..18);
      let h = rng.gen_range(8..18);
      let x0 = cx + rng.gen_range(0..CELL - 8);
      let y0 = cy + rng.gen_range(0..CELL - 8);
      let value = rng.gen_range(90..=255);
      for y in y0..usize::min(y0 + h, height) {
        for x in x0..usize::min(x0 + w, width) {
          image.set_value(x, y, value);
        }
      }
    }
  }
  box_blur(&box_blur(&image))
}

pub fn crop(image: &Image, ax: usize, ay: usize, width: usize, height: usize) -> Image {
  let mut out = Image::new(width, height);
  for y in 0..height {
    for x in 0..width {
      out.set_value(x, y, image.value(ax + x, ay + y));
    }
  }
  out
}

fn box_blur(image: &Image) -> Image {
  let mut out = Image::new(image.width, image.height);
  for y in 0..image.height {
    for x in 0..image.width {
      let mut sum = 0;
      for dy in -1..=1 {
        for dx in -1..=1 {
          sum += image.value_clamped(x as i64 + dx, y as i64 + dy) as u32;
        }
      }
      out.set_value(x, y, ((sum + 4) / 9) as u8);
    }
  }
  out
}
