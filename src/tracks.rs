use crate::all::*;

pub type TrackId = u32;

// One tracked object in one frame, as produced by the upstream tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
  // Raw image coordinates derived from the bounding box.
  pub position: [f64; 2],
  // `position` with the camera motion of the frame removed.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub adjusted_position: Option<[f64; 2]>,
  // Fields owned by other pipeline stages, kept verbatim.
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TrackRecord {
  pub fn new(position: [f64; 2]) -> TrackRecord {
    TrackRecord {
      position,
      adjusted_position: None,
      extra: serde_json::Map::new(),
    }
  }
}

pub type FrameTracks = BTreeMap<TrackId, TrackRecord>;

// Object category (players, ball, ...) to per-frame tracks.
pub type TrackCollection = BTreeMap<String, Vec<FrameTracks>>;

pub fn load_tracks(path: &Path) -> Result<TrackCollection> {
  let file = File::open(path)
    .with_context(|| format!("Failed to open tracks {}.", path.display()))?;
  serde_json::from_reader(BufReader::new(file))
    .with_context(|| format!("Tracks JSON deserialization failed for {}.", path.display()))
}

pub fn save_tracks(path: &Path, tracks: &TrackCollection) -> Result<()> {
  let file = File::create(path)
    .with_context(|| format!("Failed to create tracks {}.", path.display()))?;
  let mut writer = BufWriter::new(file);
  serde_json::to_writer(&mut writer, tracks)
    .with_context(|| format!("Tracks JSON serialization failed for {}.", path.display()))?;
  writer.flush()?;
  Ok(())
}
