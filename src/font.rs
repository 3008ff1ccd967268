// 5x7 bitmap font. Each glyph row uses the low five bits, most significant bit
// leftmost.

use crate::all::*;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
// Horizontal advance in glyph pixels, including spacing.
const ADVANCE: usize = GLYPH_WIDTH + 1;

type Glyph = [u8; GLYPH_HEIGHT];

lazy_static! {
  static ref GLYPHS: HashMap<char, Glyph> = {
    let mut m = HashMap::new();
    m.insert(' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
    m.insert('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C]);
    m.insert(':', [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00]);
    m.insert('-', [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00]);
    m.insert('+', [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00]);
    m.insert('0', [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E]);
    m.insert('1', [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E]);
    m.insert('2', [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F]);
    m.insert('3', [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E]);
    m.insert('4', [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02]);
    m.insert('5', [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E]);
    m.insert('6', [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E]);
    m.insert('7', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08]);
    m.insert('8', [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E]);
    m.insert('9', [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C]);
    m.insert('A', [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]);
    m.insert('B', [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E]);
    m.insert('C', [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E]);
    m.insert('D', [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C]);
    m.insert('E', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F]);
    m.insert('F', [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10]);
    m.insert('G', [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F]);
    m.insert('H', [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11]);
    m.insert('I', [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E]);
    m.insert('J', [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C]);
    m.insert('K', [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11]);
    m.insert('L', [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F]);
    m.insert('M', [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11]);
    m.insert('N', [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11]);
    m.insert('O', [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]);
    m.insert('P', [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10]);
    m.insert('Q', [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D]);
    m.insert('R', [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11]);
    m.insert('S', [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E]);
    m.insert('T', [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04]);
    m.insert('U', [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E]);
    m.insert('V', [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04]);
    m.insert('W', [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A]);
    m.insert('X', [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11]);
    m.insert('Y', [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04]);
    m.insert('Z', [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F]);
    // Lowercase only where the overlay labels need it, other letters fall
    // back to uppercase.
    m.insert('a', [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F]);
    m.insert('e', [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E]);
    m.insert('m', [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11]);
    m.insert('n', [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11]);
    m.insert('o', [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E]);
    m.insert('r', [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10]);
    m.insert('t', [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06]);
    m.insert('v', [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04]);
    m
  };
}

fn glyph(c: char) -> Option<&'static Glyph> {
  GLYPHS.get(&c).or_else(|| GLYPHS.get(&c.to_ascii_uppercase()))
}

// Draws `text` with its bottom-left corner at `(x, baseline)`, clipped to the
// image. Unknown characters are left blank.
pub fn draw_text(
  image: &mut ColorImage,
  text: &str,
  x: usize,
  baseline: usize,
  scale: usize,
  bgr: Bgr,
) {
  let top = baseline as i64 - (GLYPH_HEIGHT * scale) as i64;
  for (i, c) in text.chars().enumerate() {
    let glyph = match glyph(c) {
      Some(glyph) => glyph,
      None => {
        debug!("No glyph for {:?}.", c);
        continue;
      },
    };
    let gx = (x + i * ADVANCE * scale) as i64;
    for (row, bits) in glyph.iter().enumerate() {
      for col in 0..GLYPH_WIDTH {
        if bits & (0x10 >> col) == 0 { continue }
        let px = gx + (col * scale) as i64;
        let py = top + (row * scale) as i64;
        if px < 0 || py < 0 { continue }
        image.fill_rect(px as usize, py as usize, px as usize + scale, py as usize + scale, bgr);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_label_characters_have_glyphs() {
    for c in "Camera Movement X: -1234567890.+Y".chars() {
      assert!(glyph(c).is_some(), "{:?}", c);
    }
    assert_eq!(glyph('x'), glyph('X'));
    assert!(glyph('é').is_none());
  }

  #[test]
  fn test_draw_text() {
    let mut image = ColorImage::new(20, 10);
    draw_text(&mut image, "1", 2, 8, 1, [255, 0, 0]);
    // Top row of '1' has only the center column set.
    assert_eq!(image.pixel(4, 1), [255, 0, 0]);
    assert_eq!(image.pixel(3, 1), [0, 0, 0]);
    // Bottom row spans three columns.
    for x in 3..6 {
      assert_eq!(image.pixel(x, 7), [255, 0, 0]);
    }
    assert_eq!(image.pixel(4, 8), [0, 0, 0]);
  }

  #[test]
  fn test_draw_text_clips() {
    let mut image = ColorImage::new(8, 4);
    draw_text(&mut image, "WWWW", 0, 20, 2, [1, 2, 3]);
    draw_text(&mut image, "8", 0, 3, 2, [1, 2, 3]);
    assert!(image.data.iter().any(|v| *v != 0));
  }
}
