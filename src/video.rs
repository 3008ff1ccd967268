// Raw BGR frame pipes to and from external ffmpeg processes.

use crate::all::*;

use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

#[derive(Deserialize)]
struct ProbeOutput {
  streams: Vec<ProbeStream>,
}

#[derive(Deserialize)]
struct ProbeStream {
  width: usize,
  height: usize,
}

// Dimensions of the first video stream.
pub fn probe_video_size(path: &Path) -> Result<(usize, usize)> {
  let output = Command::new("ffprobe")
    .args(["-v", "error", "-select_streams", "v:0", "-show_entries", "stream=width,height", "-of", "json"])
    .arg(path)
    .output()
    .context("Failed to run ffprobe.")?;
  if !output.status.success() {
    bail!("ffprobe failed on {}: {}", path.display(), String::from_utf8_lossy(&output.stderr).trim());
  }
  let probe: ProbeOutput = serde_json::from_slice(&output.stdout)
    .context("ffprobe JSON deserialization failed.")?;
  let stream = probe.streams.first()
    .ok_or(anyhow!("No video stream in {}.", path.display()))?;
  Ok((stream.width, stream.height))
}

pub struct VideoInput {
  child: Child,
  child_stdout: ChildStdout,
  width: usize,
  height: usize,
}

impl VideoInput {
  pub fn new(path: &Path) -> Result<VideoInput> {
    let (width, height) = probe_video_size(path)?;
    let mut child = Command::new("ffmpeg")
      .arg("-i").arg(path)
      .args(["-f", "rawvideo", "-vcodec", "rawvideo", "-vsync", "passthrough", "-pix_fmt", "bgr24", "-"])
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::null())
      .spawn()
      .context("Failed to start ffmpeg for decoding.")?;
    let child_stdout = child.stdout.take()
      .ok_or(anyhow!("ffmpeg decoder has no stdout."))?;
    Ok(VideoInput { child, child_stdout, width, height })
  }

  // End of video is signaled by `Result::Ok(Option::None)`.
  pub fn read(&mut self) -> Result<Option<ColorImage>> {
    let mut data = vec![0; 3 * self.width * self.height];
    let mut filled = 0;
    while filled < data.len() {
      let n = self.child_stdout.read(&mut data[filled..])
        .context("Reading bytes from video input failed.")?;
      if n == 0 { break }
      filled += n;
    }
    if filled == 0 { return Ok(None) }
    if filled < data.len() {
      bail!("Video input ended in the middle of a frame ({} of {} bytes).", filled, data.len());
    }
    Ok(Some(ColorImage::from_bgr(data, self.width, self.height)?))
  }

  // Decodes the remaining frames.
  pub fn read_all(mut self) -> Result<Vec<ColorImage>> {
    let mut frames = vec![];
    while let Some(frame) = self.read()? {
      frames.push(frame);
    }
    let status = self.child.wait()?;
    if !status.success() {
      bail!("ffmpeg decoder exited with {}.", status);
    }
    Ok(frames)
  }
}

// Kills and reaps a child that has not exited yet, so that a pipe abandoned
// on error does not leave ffmpeg running.
fn stop_child(child: &mut Child) {
  if let Ok(None) = child.try_wait() {
    debug!("Killing ffmpeg process {}.", child.id());
    let _ = child.kill();
    let _ = child.wait();
  }
}

impl Drop for VideoInput {
  fn drop(&mut self) {
    stop_child(&mut self.child);
  }
}

pub fn read_video(path: &Path) -> Result<Vec<ColorImage>> {
  let frames = VideoInput::new(path)?.read_all()
    .with_context(|| format!("Failed to decode {}.", path.display()))?;
  info!("Read {} frames from {}.", frames.len(), path.display());
  Ok(frames)
}

pub struct VideoOutput {
  child: Child,
  child_stdin: Option<ChildStdin>,
  width: usize,
  height: usize,
}

impl VideoOutput {
  pub fn new(path: &Path, width: usize, height: usize, fps: f64) -> Result<VideoOutput> {
    let size = format!("{}x{}", width, height);
    let rate = fps.to_string();
    let mut child = Command::new("ffmpeg")
      .args(["-y", "-f", "rawvideo", "-vcodec", "rawvideo", "-pix_fmt", "bgr24"])
      .args(["-s", size.as_str(), "-r", rate.as_str(), "-i", "-"])
      .args(["-pix_fmt", "yuv420p"])
      .arg(path)
      .stdin(Stdio::piped())
      .stdout(Stdio::null())
      .stderr(Stdio::null())
      .spawn()
      .context("Failed to start ffmpeg for encoding.")?;
    let child_stdin = child.stdin.take();
    Ok(VideoOutput { child, child_stdin, width, height })
  }

  pub fn write(&mut self, frame: &ColorImage) -> Result<()> {
    if frame.width != self.width || frame.height != self.height {
      bail!("Cannot write {}x{} frame to {}x{} video.", frame.width, frame.height, self.width, self.height);
    }
    let stdin = self.child_stdin.as_mut()
      .ok_or(anyhow!("Video output already finished."))?;
    stdin.write_all(&frame.data).context("Writing bytes to video output failed.")?;
    Ok(())
  }

  // Closes the pipe and waits for the encoder.
  pub fn finish(mut self) -> Result<()> {
    drop(self.child_stdin.take());
    let status = self.child.wait()?;
    if !status.success() {
      bail!("ffmpeg encoder exited with {}.", status);
    }
    Ok(())
  }
}

impl Drop for VideoOutput {
  fn drop(&mut self) {
    drop(self.child_stdin.take());
    stop_child(&mut self.child);
  }
}

pub fn write_video(path: &Path, frames: &[ColorImage], fps: f64) -> Result<()> {
  let first = match frames.first() {
    Some(first) => first,
    None => bail!("No frames to write to {}.", path.display()),
  };
  let mut output = VideoOutput::new(path, first.width, first.height, fps)?;
  for frame in frames {
    output.write(frame)?;
  }
  output.finish().with_context(|| format!("Failed to encode {}.", path.display()))?;
  info!("Wrote {} frames to {}.", frames.len(), path.display());
  Ok(())
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
  use super::*;

  #[test]
  fn test_failed_write_stops_child() {
    let mut child = Command::new("sleep")
      .arg("30")
      .stdin(Stdio::piped())
      .spawn()
      .unwrap();
    let child_stdin = child.stdin.take();
    let pid = child.id();
    let mut output = VideoOutput { child, child_stdin, width: 4, height: 2 };
    assert!(output.write(&ColorImage::new(2, 2)).is_err());
    drop(output);
    // Reaped children have no process entry.
    assert!(!Path::new(&format!("/proc/{}", pid)).exists());
  }
}
