// On-disk motion cache. Little-endian layout:
//
//   magic        4 bytes  "CMOV"
//   version      u32
//   frame_count  u64
//   entries      frame_count × (dx: f64, dy: f64)

use crate::all::*;

const CACHE_MAGIC: [u8; 4] = *b"CMOV";
const CACHE_VERSION: u32 = 1;

#[derive(Clone, Debug, Default)]
pub struct CachePolicy {
  // Location of the cache file. Computed motion is written here.
  pub path: Option<PathBuf>,
  // Load from `path` instead of computing.
  pub read: bool,
}

impl CachePolicy {
  pub fn disabled() -> CachePolicy {
    CachePolicy::default()
  }

  pub fn write(path: impl Into<PathBuf>) -> CachePolicy {
    CachePolicy { path: Some(path.into()), read: false }
  }

  pub fn read(path: impl Into<PathBuf>) -> CachePolicy {
    CachePolicy { path: Some(path.into()), read: true }
  }

  // Path to load from, or an error if reading was requested but is impossible.
  pub fn read_path(&self) -> Result<Option<&Path>> {
    if !self.read { return Ok(None) }
    let path = self.path.as_deref()
      .ok_or(anyhow!("Motion cache unavailable: reading requested without a path."))?;
    if !path.exists() {
      bail!("Motion cache unavailable: {} does not exist.", path.display());
    }
    Ok(Some(path))
  }
}

pub fn load_motion_cache(path: &Path, frame_count: usize) -> Result<MotionSequence> {
  let file = File::open(path)
    .with_context(|| format!("Failed to open motion cache {}.", path.display()))?;
  read_motion(&mut BufReader::new(file), frame_count)
    .with_context(|| format!("Invalid motion cache {}.", path.display()))
}

pub fn save_motion_cache(path: &Path, motion: &MotionSequence) -> Result<()> {
  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}.", parent.display()))?;
    }
  }
  let file = File::create(path)
    .with_context(|| format!("Failed to create motion cache {}.", path.display()))?;
  let mut writer = BufWriter::new(file);
  write_motion(&mut writer, motion)?;
  writer.flush()
    .with_context(|| format!("Failed to write motion cache {}.", path.display()))?;
  Ok(())
}

pub fn write_motion<W: Write>(writer: &mut W, motion: &MotionSequence) -> Result<()> {
  writer.write_all(&CACHE_MAGIC)?;
  writer.write_all(&CACHE_VERSION.to_le_bytes())?;
  writer.write_all(&(motion.len() as u64).to_le_bytes())?;
  for d in motion {
    writer.write_all(&d.dx.to_le_bytes())?;
    writer.write_all(&d.dy.to_le_bytes())?;
  }
  Ok(())
}

// Fails unless the cache holds exactly `frame_count` entries.
pub fn read_motion<R: Read>(reader: &mut R, frame_count: usize) -> Result<MotionSequence> {
  let mut magic = [0; 4];
  reader.read_exact(&mut magic).context("Truncated header.")?;
  if magic != CACHE_MAGIC {
    bail!("Not a motion cache file.");
  }
  let version = u32::from_le_bytes(read_array(reader)?);
  if version != CACHE_VERSION {
    bail!("Unsupported motion cache version {}, expected {}.", version, CACHE_VERSION);
  }
  let count = u64::from_le_bytes(read_array(reader)?);
  if count != frame_count as u64 {
    bail!("Motion cache holds {} frames but the input has {}.", count, frame_count);
  }
  let mut displacements = Vec::with_capacity(frame_count);
  for i in 0..frame_count {
    let dx = f64::from_le_bytes(read_array(reader).with_context(|| format!("Truncated at entry {}.", i))?);
    let dy = f64::from_le_bytes(read_array(reader).with_context(|| format!("Truncated at entry {}.", i))?);
    displacements.push(Displacement { dx, dy });
  }
  let mut rest = [0; 1];
  if reader.read(&mut rest)? != 0 {
    bail!("Trailing data after {} entries.", frame_count);
  }
  Ok(MotionSequence::from(displacements))
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
  let mut bytes = [0; N];
  reader.read_exact(&mut bytes)?;
  Ok(bytes)
}
