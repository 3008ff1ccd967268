use crate::all::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatorParams {
  // A frame step only counts as camera motion if its representative feature
  // moved more than this many pixels.
  pub minimum_distance: f64,
  pub features: FeatureParams,
  pub flow: FlowParams,
}

impl Default for EstimatorParams {
  fn default() -> EstimatorParams {
    EstimatorParams {
      minimum_distance: 5.,
      features: FeatureParams::default(),
      flow: FlowParams::default(),
    }
  }
}

pub struct CameraMotionEstimator {
  minimum_distance: f64,
  selector: FeatureSelector,
  flow: FlowParams,
}

impl CameraMotionEstimator {
  pub fn new(params: EstimatorParams) -> Result<CameraMotionEstimator> {
    if !(params.minimum_distance >= 0.) {
      bail!("Minimum camera movement distance must be non-negative, got {}.", params.minimum_distance);
    }
    // Validates flow parameters.
    OpticalFlow::new(&params.flow)?;
    Ok(CameraMotionEstimator {
      minimum_distance: params.minimum_distance,
      selector: FeatureSelector::new(params.features)?,
      flow: params.flow,
    })
  }

  pub fn selector(&self) -> &FeatureSelector {
    &self.selector
  }

  // Camera motion of every frame, or the cached motion when `cache` asks for
  // it. The cache is read once before and written once after the computation.
  pub fn estimate(&self, frames: &[ColorImage], cache: &CachePolicy) -> Result<MotionSequence> {
    if let Some(path) = cache.read_path()? {
      let motion = load_motion_cache(path, frames.len())?;
      info!("Loaded camera motion of {} frames from {}.", motion.len(), path.display());
      return Ok(motion);
    }
    let motion = self.compute(frames)?;
    if let Some(path) = &cache.path {
      save_motion_cache(path, &motion)?;
      info!("Wrote camera motion cache {}.", path.display());
    }
    Ok(motion)
  }

  pub fn compute(&self, frames: &[ColorImage]) -> Result<MotionSequence> {
    let first = match frames.first() {
      Some(first) => first,
      None => {
        warn!("No frames, camera motion is empty.");
        return Ok(MotionSequence::default());
      },
    };
    info!("Estimating camera motion over {} frames.", frames.len());
    let mut state = EstimatorState::new(self, first)?;
    let mut motion = Vec::with_capacity(frames.len());
    motion.push(Displacement::ZERO);
    let mut reseed_count = 0;
    for frame in &frames[1..] {
      let outcome = state.step(frame)?;
      if outcome.reseeded { reseed_count += 1 }
      motion.push(outcome.displacement);
    }
    let motion = MotionSequence::from(motion);
    info!(
      "Camera moved in {} of {} frames, features re-seeded {} times.",
      motion.moving_frame_count(), motion.len(), reseed_count,
    );
    Ok(motion)
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
  pub displacement: Displacement,
  pub max_distance: f64,
  pub reseeded: bool,
}

// Variables carried from one frame step to the next.
pub struct EstimatorState<'a> {
  estimator: &'a CameraMotionEstimator,
  tracker: MotionTracker,
  prev: Frame,
  features: Vec<Vector2d>,
  // Buffers of the frame before `prev`, reused for the next frame.
  unused_frame: Option<Frame>,
  frame_number: usize,
}

impl<'a> EstimatorState<'a> {
  pub fn new(estimator: &'a CameraMotionEstimator, first: &ColorImage) -> Result<EstimatorState<'a>> {
    if first.width == 0 || first.height == 0 {
      bail!("Cannot estimate camera motion on an empty {}x{} frame.", first.width, first.height);
    }
    let tracker = MotionTracker::new(&estimator.flow)?;
    let prev = Frame::new(first, None, tracker.level_count());
    let features = select_features(estimator, &prev, 0);
    Ok(EstimatorState {
      estimator,
      tracker,
      prev,
      features,
      unused_frame: None,
      frame_number: 0,
    })
  }

  // Features that the next `step()` will track.
  pub fn features(&self) -> &[Vector2d] {
    &self.features
  }

  pub fn frame_number(&self) -> usize {
    self.frame_number
  }

  pub fn step(&mut self, color: &ColorImage) -> Result<StepOutcome> {
    if color.width != self.prev.width() || color.height != self.prev.height() {
      bail!(
        "Frame {} is {}x{}, expected {}x{}.",
        self.frame_number + 1, color.width, color.height, self.prev.width(), self.prev.height(),
      );
    }
    self.frame_number += 1;
    let frame = Frame::new(color, self.unused_frame.take(), self.tracker.level_count());
    let step = self.tracker.track(&self.prev, &frame, &self.features);

    let outcome = if step.max_distance > self.estimator.minimum_distance {
      debug!(
        "Frame {}: camera moved ({:.2}, {:.2}), max feature distance {:.2}.",
        self.frame_number, step.displacement.dx, step.displacement.dy, step.max_distance,
      );
      self.features = select_features(self.estimator, &frame, self.frame_number);
      StepOutcome {
        displacement: step.displacement,
        max_distance: step.max_distance,
        reseeded: true,
      }
    }
    else {
      StepOutcome {
        displacement: Displacement::ZERO,
        max_distance: step.max_distance,
        reseeded: false,
      }
    };

    self.unused_frame = Some(std::mem::replace(&mut self.prev, frame));
    Ok(outcome)
  }
}

fn select_features(
  estimator: &CameraMotionEstimator,
  frame: &Frame,
  frame_number: usize,
) -> Vec<Vector2d> {
  let features = estimator.selector.select(&frame.image);
  if features.is_empty() {
    warn!("No features to track in frame {}, camera motion is unobservable until re-seeded.", frame_number);
  }
  else {
    debug!("Selected {} features in frame {}.", features.len(), frame_number);
  }
  features
}
