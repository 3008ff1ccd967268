use crate::all::*;

// Net camera translation between a frame and its predecessor, pixels. Positive
// `dx` means the scene moved left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
  pub dx: f64,
  pub dy: f64,
}

impl Displacement {
  pub const ZERO: Displacement = Displacement { dx: 0., dy: 0. };

  pub fn new(dx: f64, dy: f64) -> Displacement {
    Displacement { dx, dy }
  }

  // Displacement of a feature that moved from `old` to `new`.
  pub fn between(old: Vector2d, new: Vector2d) -> Displacement {
    let (dx, dy) = measure_xy_distance(old, new);
    Displacement { dx, dy }
  }

  pub fn is_zero(&self) -> bool {
    self.dx == 0. && self.dy == 0.
  }
}

// One displacement per frame, the first always zero. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MotionSequence(Vec<Displacement>);

impl MotionSequence {
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Displacement> {
    self.0.iter()
  }

  pub fn as_slice(&self) -> &[Displacement] {
    &self.0
  }

  // Number of frames with non-zero motion.
  pub fn moving_frame_count(&self) -> usize {
    self.0.iter().filter(|d| !d.is_zero()).count()
  }
}

impl From<Vec<Displacement>> for MotionSequence {
  fn from(displacements: Vec<Displacement>) -> MotionSequence {
    MotionSequence(displacements)
  }
}

impl Index<usize> for MotionSequence {
  type Output = Displacement;
  fn index(&self, frame_number: usize) -> &Displacement {
    &self.0[frame_number]
  }
}

impl<'a> IntoIterator for &'a MotionSequence {
  type Item = &'a Displacement;
  type IntoIter = std::slice::Iter<'a, Displacement>;
  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}
