use crate::all::*;

// Data derived from a single color frame: its gray image and pyramid.
pub struct Frame {
  pub image: Image,
  pub pyramid: Pyramid,
}

pub struct Level<'a> {
  pub data: &'a [u8],
  pub width: usize,
  pub height: usize,
}

impl Frame {
  pub fn new(
    color: &ColorImage,
    unused_frame: Option<Frame>,
    level_count: usize,
  ) -> Frame {
    let (image, unused_pyramid) = if let Some(mut unused_frame) = unused_frame {
      // Move buffers from the old unused frame to the new frame to avoid allocation.
      color.to_gray_into(&mut unused_frame.image);
      (unused_frame.image, Some(unused_frame.pyramid))
    }
    else {
      (color.to_gray(), None)
    };
    Frame::from_gray(image, unused_pyramid, level_count)
  }

  pub fn from_gray(
    image: Image,
    unused_pyramid: Option<Pyramid>,
    level_count: usize,
  ) -> Frame {
    Frame {
      pyramid: Pyramid::new(&image, unused_pyramid, level_count),
      image,
    }
  }

  pub fn width(&self) -> usize { self.image.width }

  pub fn height(&self) -> usize { self.image.height }

  pub fn level_count(&self) -> usize { self.pyramid.levels.len() }

  // Whether `p` lies within the pixel-center extents of level 0.
  pub fn contains(&self, p: Vector2d) -> bool {
    p[0] >= 0. && p[1] >= 0.
      && p[0] <= (self.width() as f64 - 1.)
      && p[1] <= (self.height() as f64 - 1.)
  }

  pub fn get_level(&self, level: usize) -> Level {
    if level == 0 {
      Level {
        data: &self.image.data,
        width: self.image.width,
        height: self.image.height,
      }
    }
    else {
      let size = self.pyramid.size(level);
      Level {
        data: &self.pyramid.levels[level - 1].data,
        width: size[0],
        height: size[1],
      }
    }
  }
}

impl<'a> Level<'a> {
  #[inline(always)]
  pub fn value(&self, x: usize, y: usize) -> f64 {
    self.data[y * self.width + x] as f64
  }
}
