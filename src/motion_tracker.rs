use crate::all::*;

// Representative camera motion of one frame step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepMotion {
  pub max_distance: f64,
  pub displacement: Displacement,
}

impl StepMotion {
  pub const NONE: StepMotion = StepMotion {
    max_distance: 0.,
    displacement: Displacement::ZERO,
  };
}

pub struct MotionTracker {
  optical_flow: OpticalFlow,
  features1: Vec<Vector2d>,
  statuses: Vec<bool>,
}

impl MotionTracker {
  pub fn new(params: &FlowParams) -> Result<MotionTracker> {
    Ok(MotionTracker {
      optical_flow: OpticalFlow::new(params)?,
      features1: vec![],
      statuses: vec![],
    })
  }

  pub fn level_count(&self) -> usize {
    self.optical_flow.level_count()
  }

  pub fn track(
    &mut self,
    frame0: &Frame,
    frame1: &Frame,
    features0: &[Vector2d],
  ) -> StepMotion {
    if features0.is_empty() { return StepMotion::NONE }
    self.optical_flow.process(frame0, frame1, features0, &mut self.features1, &mut self.statuses);
    let lost = self.statuses.iter().filter(|s| !**s).count();
    if lost > 0 {
      debug!("Lost {} of {} features.", lost, features0.len());
    }
    representative_motion(features0, &self.features1, &self.statuses)
  }
}

// Picks the tracked feature that moved the most. The most displaced static
// background feature reflects the pan; ties go to the earliest feature.
pub fn representative_motion(
  features0: &[Vector2d],
  features1: &[Vector2d],
  statuses: &[bool],
) -> StepMotion {
  let mut motion = StepMotion::NONE;
  for ((old, new), ok) in features0.iter().zip(features1).zip(statuses) {
    if !ok { continue }
    let distance = measure_distance(*new, *old);
    if distance > motion.max_distance {
      motion = StepMotion {
        max_distance: distance,
        displacement: Displacement::between(*old, *new),
      };
    }
  }
  motion
}
