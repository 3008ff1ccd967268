use crate::all::*;

// Command line view of `EstimatorParams`. Defaults must match the `Default`
// implementations of the typed parameter structs.
#[derive(Clone, Debug)]
#[derive(clap::Args)]
pub struct ParameterSet {
  // Motion estimator.
  /// Minimum displacement in pixels for a frame step to count as camera motion.
  #[clap(long, default_value = "5")]
  pub minimum_distance: f64,

  // Feature selection.
  #[clap(long, default_value = "100")]
  pub max_corners: usize,
  #[clap(long, default_value = "0.3")]
  pub quality_level: f64,
  #[clap(long, default_value = "3")]
  pub min_distance: f64,
  #[clap(long, default_value = "7")]
  pub block_size: usize,
  /// Column range `start:end` to select features from. Repeat for several bands.
  #[clap(long = "mask-band", default_values = &["0:20", "900:1050"])]
  pub mask_bands: Vec<ColumnBand>,

  // Pyramidal Lucas-Kanade feature tracker.
  #[clap(long, default_value = "15")]
  pub lk_win_size: usize,
  #[clap(long, default_value = "2")]
  pub lk_levels: usize,
  #[clap(long, default_value = "10")]
  pub lk_iters: usize,
  #[clap(long, default_value = "0.03")]
  pub lk_epsilon: f64,
  #[clap(long, default_value = "0.0001")]
  pub lk_min_eig: f64,
}

impl ParameterSet {
  pub fn feature_params(&self) -> FeatureParams {
    FeatureParams {
      max_corners: self.max_corners,
      quality_level: self.quality_level,
      min_distance: self.min_distance,
      block_size: self.block_size,
      mask_bands: self.mask_bands.clone(),
    }
  }

  pub fn flow_params(&self) -> FlowParams {
    FlowParams {
      win_size: self.lk_win_size,
      max_level: self.lk_levels,
      max_iters: self.lk_iters,
      epsilon: self.lk_epsilon,
      min_eig_threshold: self.lk_min_eig,
    }
  }

  pub fn estimator_params(&self) -> EstimatorParams {
    EstimatorParams {
      minimum_distance: self.minimum_distance,
      features: self.feature_params(),
      flow: self.flow_params(),
    }
  }
}
