use camera_motion::all::*;

use clap::Parser;

#[derive(Parser)]
#[clap(about = "Estimates camera motion of a video and removes it from object tracks.")]
struct Args {
  /// Input video, decoded with ffmpeg.
  #[clap(short, long)]
  input: PathBuf,
  /// Object tracks JSON to compensate.
  #[clap(long)]
  tracks: Option<PathBuf>,
  /// Where to write the tracks with `adjusted_position` added.
  #[clap(long, requires = "tracks")]
  tracks_output: Option<PathBuf>,
  /// Where to write the per-frame camera motion as JSON.
  #[clap(long)]
  motion_output: Option<PathBuf>,
  /// Where to write the input video with camera motion drawn on it.
  #[clap(long)]
  video_output: Option<PathBuf>,
  #[clap(long, default_value = "24")]
  fps: f64,
  /// Motion cache file, written after estimation.
  #[clap(long)]
  cache: Option<PathBuf>,
  /// Load motion from the cache file instead of estimating it.
  #[clap(long, requires = "cache")]
  read_cache: bool,
  #[clap(flatten)]
  parameters: ParameterSet,
}

fn handle_error(err: &anyhow::Error) {
  error!("Failed:");
  for (i, e) in err.chain().enumerate() {
    error!("  {}: {}", i + 1, e);
  }
}

fn main() {
  init_logging();
  if let Err(err) = run() {
    handle_error(&err);
    std::process::exit(1);
  }
}

fn run() -> Result<()> {
  let args = Args::parse();
  let estimator = CameraMotionEstimator::new(args.parameters.estimator_params())?;
  let frames = read_video(&args.input)?;
  let cache = match &args.cache {
    Some(path) if args.read_cache => CachePolicy::read(path),
    Some(path) => CachePolicy::write(path),
    None => CachePolicy::disabled(),
  };
  let motion = estimator.estimate(&frames, &cache)?;

  if let Some(path) = &args.motion_output {
    let file = File::create(path)
      .with_context(|| format!("Failed to create {}.", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &motion)
      .context("Camera motion JSON serialization failed.")?;
    info!("Wrote camera motion to {}.", path.display());
  }

  if let Some(path) = &args.tracks {
    let mut tracks = load_tracks(path)?;
    compensate(&mut tracks, &motion)?;
    match &args.tracks_output {
      Some(output) => {
        save_tracks(output, &tracks)?;
        info!("Wrote compensated tracks to {}.", output.display());
      },
      None => warn!("Compensated tracks are discarded, pass --tracks-output to keep them."),
    }
  }

  if let Some(path) = &args.video_output {
    let output = render(&frames, &motion, &OverlayParams::default())?;
    write_video(path, &output, args.fps)?;
  }
  Ok(())
}
