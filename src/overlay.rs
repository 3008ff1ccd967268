use crate::all::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayParams {
  // Panel in the top-left corner.
  pub panel_width: usize,
  pub panel_height: usize,
  pub panel_color: Bgr,
  // Opacity of the panel.
  pub alpha: f64,
  pub text_color: Bgr,
  pub text_scale: usize,
  pub text_x: usize,
  // Baselines of the X and Y lines.
  pub text_baselines: [usize; 2],
}

impl Default for OverlayParams {
  fn default() -> OverlayParams {
    OverlayParams {
      panel_width: 500,
      panel_height: 100,
      panel_color: [255, 255, 255],
      alpha: 0.6,
      text_color: [0, 0, 0],
      text_scale: 3,
      text_x: 10,
      text_baselines: [30, 60],
    }
  }
}

pub fn motion_labels(d: &Displacement) -> [String; 2] {
  [
    format!("Camera Movement X: {:.2}", d.dx),
    format!("Camera Movement Y: {:.2}", d.dy),
  ]
}

// Copies of `frames` with the camera motion of each frame printed on a
// translucent panel.
pub fn render(
  frames: &[ColorImage],
  motion: &MotionSequence,
  params: &OverlayParams,
) -> Result<Vec<ColorImage>> {
  if frames.len() != motion.len() {
    bail!("Cannot draw camera motion of {} frames onto {} frames.", motion.len(), frames.len());
  }
  Ok(frames.iter().zip(motion).map(|(frame, d)| render_frame(frame, d, params)).collect())
}

pub fn render_frame(frame: &ColorImage, d: &Displacement, params: &OverlayParams) -> ColorImage {
  let mut out = frame.clone();
  out.blend_rect(0, 0, params.panel_width, params.panel_height, params.panel_color, params.alpha);
  for (label, baseline) in motion_labels(d).iter().zip(params.text_baselines) {
    draw_text(&mut out, label, params.text_x, baseline, params.text_scale, params.text_color);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn gray_frames(n: usize) -> Vec<ColorImage> {
    (0..n).map(|i| {
      let mut frame = ColorImage::new(640, 200);
      frame.fill_rect(0, 0, 640, 200, [100, 50 + i as u8, 20]);
      frame
    }).collect()
  }

  #[test]
  fn test_labels() {
    let [x, y] = motion_labels(&Displacement::new(10.004, -0.5));
    assert_eq!(x, "Camera Movement X: 10.00");
    assert_eq!(y, "Camera Movement Y: -0.50");
  }

  #[test]
  fn test_render() {
    let frames = gray_frames(2);
    let original = frames.clone();
    let motion = MotionSequence::from(vec![Displacement::ZERO, Displacement::new(12.5, -3.)]);
    let out = render(&frames, &motion, &OverlayParams::default()).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(frames, original);

    // Outside the panel.
    assert_eq!(out[1].pixel(600, 150), frames[1].pixel(600, 150));
    // Inside the panel, away from the text.
    assert_eq!(out[0].pixel(480, 90), [193, 173, 161]);
    // Some text pixels are black, and the frames differ by their labels.
    assert!((0..100).any(|y| (0..500).any(|x| out[1].pixel(x, y) == [0, 0, 0])));
    assert_ne!(out[0].data[..3 * 640 * 100], out[1].data[..3 * 640 * 100]);
  }

  #[test]
  fn test_small_frame_is_clipped() {
    let frames = vec![ColorImage::new(40, 20)];
    let motion = MotionSequence::from(vec![Displacement::ZERO]);
    let out = render(&frames, &motion, &OverlayParams::default()).unwrap();
    assert_eq!(out[0].width, 40);
    assert_eq!(out[0].height, 20);
  }

  #[test]
  fn test_length_mismatch() {
    let frames = gray_frames(3);
    let motion = MotionSequence::from(vec![Displacement::ZERO; 2]);
    assert!(render(&frames, &motion, &OverlayParams::default()).is_err());
  }
}
