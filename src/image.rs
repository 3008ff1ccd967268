use crate::all::*;

// Row-major grayscale image, the input of feature selection and pyramids.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

impl Image {
  pub fn empty() -> Image {
    Image {
      data: vec![],
      width: 0,
      height: 0,
    }
  }

  pub fn new(width: usize, height: usize) -> Image {
    Image {
      data: vec![0; width * height],
      width,
      height,
    }
  }

  #[inline(always)]
  pub fn value(&self, x: usize, y: usize) -> u8 {
    self.data[y * self.width + x]
  }

  // Out-of-range coordinates are clamped to the nearest border pixel.
  #[inline(always)]
  pub fn value_clamped(&self, x: i64, y: i64) -> u8 {
    let x = x.clamp(0, self.width as i64 - 1) as usize;
    let y = y.clamp(0, self.height as i64 - 1) as usize;
    self.data[y * self.width + x]
  }

  #[inline(always)]
  pub fn set_value(&mut self, x: usize, y: usize, value: u8) {
    self.data[y * self.width + x] = value;
  }
}

pub type Bgr = [u8; 3];

// Row-major interleaved color storage, channel order blue, green, red.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorImage {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

impl ColorImage {
  pub fn new(width: usize, height: usize) -> ColorImage {
    ColorImage {
      data: vec![0; 3 * width * height],
      width,
      height,
    }
  }

  pub fn from_bgr(data: Vec<u8>, width: usize, height: usize) -> Result<ColorImage> {
    if data.len() != 3 * width * height {
      bail!("BGR buffer of {} bytes does not match {}x{} image.", data.len(), width, height);
    }
    Ok(ColorImage { data, width, height })
  }

  // Replicates gray values into all three channels.
  pub fn from_gray(image: &Image) -> ColorImage {
    let mut data = Vec::with_capacity(3 * image.data.len());
    for v in &image.data {
      data.extend([*v, *v, *v]);
    }
    ColorImage {
      data,
      width: image.width,
      height: image.height,
    }
  }

  #[inline(always)]
  pub fn pixel(&self, x: usize, y: usize) -> Bgr {
    let i = 3 * (y * self.width + x);
    [self.data[i], self.data[i + 1], self.data[i + 2]]
  }

  #[inline(always)]
  pub fn set_pixel(&mut self, x: usize, y: usize, bgr: Bgr) {
    let i = 3 * (y * self.width + x);
    self.data[i..i + 3].copy_from_slice(&bgr);
  }

  // Fills the half-open rectangle `[x0, x1) × [y0, y1)`, clipped to the image.
  pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, bgr: Bgr) {
    for y in y0..usize::min(y1, self.height) {
      for x in x0..usize::min(x1, self.width) {
        self.set_pixel(x, y, bgr);
      }
    }
  }

  // `alpha * bgr + (1 - alpha) * image` over the clipped rectangle.
  pub fn blend_rect(
    &mut self,
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    bgr: Bgr,
    alpha: f64,
  ) {
    for y in y0..usize::min(y1, self.height) {
      for x in x0..usize::min(x1, self.width) {
        let old = self.pixel(x, y);
        let mut new = [0; 3];
        for c in 0..3 {
          let v = alpha * bgr[c] as f64 + (1. - alpha) * old[c] as f64;
          new[c] = v.round().clamp(0., 255.) as u8;
        }
        self.set_pixel(x, y, new);
      }
    }
  }

  pub fn to_gray(&self) -> Image {
    let mut image = Image::empty();
    self.to_gray_into(&mut image);
    image
  }

  // Reuses the buffer of `out`. Fixed-point BT.601 luma weights with 14
  // fractional bits.
  pub fn to_gray_into(&self, out: &mut Image) {
    out.data.clear();
    out.data.extend(self.data.chunks_exact(3).map(|p| {
      let (b, g, r) = (p[0] as u32, p[1] as u32, p[2] as u32);
      ((4899 * r + 9617 * g + 1868 * b + 8192) >> 14) as u8
    }));
    out.width = self.width;
    out.height = self.height;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_to_gray() {
    let image = ColorImage::from_bgr(vec![
      0, 0, 0,   255, 255, 255,
      0, 0, 255, 0, 255, 0,
      255, 0, 0, 10, 20, 30,
    ], 2, 3).unwrap();
    let gray = image.to_gray();
    assert_eq!(gray.width, 2);
    assert_eq!(gray.height, 3);
    assert_eq!(gray.data, vec![0, 255, 76, 150, 29, 22]);
  }

  #[test]
  fn test_from_bgr_checks_size() {
    assert!(ColorImage::from_bgr(vec![0; 11], 2, 2).is_err());
  }

  #[test]
  fn test_blend_rect_clips() {
    let mut image = ColorImage::new(4, 2);
    image.blend_rect(2, 0, 10, 10, [255, 255, 255], 0.6);
    assert_eq!(image.pixel(1, 1), [0, 0, 0]);
    assert_eq!(image.pixel(2, 0), [153, 153, 153]);
    assert_eq!(image.pixel(3, 1), [153, 153, 153]);
  }

  #[test]
  fn test_value_clamped() {
    let image = Image { data: vec![1, 2, 3, 4], width: 2, height: 2 };
    assert_eq!(image.value_clamped(-5, 0), 1);
    assert_eq!(image.value_clamped(7, 9), 4);
    assert_eq!(image.value(0, 1), 3);
  }
}
