use crate::all::*;

// Writes `adjusted_position = position - motion[n]` into every track record of
// frame `n`. Nothing is modified if some category has more frames than
// `motion`.
pub fn compensate(tracks: &mut TrackCollection, motion: &MotionSequence) -> Result<()> {
  for (category, frames) in tracks.iter() {
    if frames.len() > motion.len() {
      bail!(
        "Category `{}` has tracks for {} frames but camera motion covers {}.",
        category, frames.len(), motion.len(),
      );
    }
  }
  let mut count = 0;
  for frames in tracks.values_mut() {
    for (frame_number, frame_tracks) in frames.iter_mut().enumerate() {
      let d = motion[frame_number];
      for record in frame_tracks.values_mut() {
        record.adjusted_position = Some([
          record.position[0] - d.dx,
          record.position[1] - d.dy,
        ]);
        count += 1;
      }
    }
  }
  debug!("Adjusted {} track positions.", count);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn frame(records: &[(TrackId, [f64; 2])]) -> FrameTracks {
    records.iter().map(|(id, p)| (*id, TrackRecord::new(*p))).collect()
  }

  fn motion() -> MotionSequence {
    MotionSequence::from(vec![
      Displacement::ZERO,
      Displacement::new(10., 0.),
      Displacement::new(-2.5, 4.),
    ])
  }

  #[test]
  fn test_subtracts_frame_motion() {
    let mut tracks = TrackCollection::new();
    tracks.insert("players".into(), vec![
      frame(&[(1, [50., 50.]), (2, [7., 8.])]),
      frame(&[(1, [50., 50.])]),
      frame(&[(2, [0., 0.])]),
    ]);
    tracks.insert("ball".into(), vec![frame(&[]), frame(&[(1, [3., 4.])])]);
    let motion = motion();
    compensate(&mut tracks, &motion).unwrap();

    for frames in tracks.values() {
      for (n, frame_tracks) in frames.iter().enumerate() {
        for record in frame_tracks.values() {
          let adjusted = record.adjusted_position.unwrap();
          assert_eq!(adjusted[0], record.position[0] - motion[n].dx);
          assert_eq!(adjusted[1], record.position[1] - motion[n].dy);
        }
      }
    }
    assert_eq!(tracks["players"][1][&1].adjusted_position, Some([40., 50.]));
    assert_eq!(tracks["players"][1][&1].position, [50., 50.]);
    assert_eq!(tracks["players"][2][&2].adjusted_position, Some([2.5, -4.]));
    assert_eq!(tracks["ball"][1][&1].adjusted_position, Some([-7., 4.]));
  }

  #[test]
  fn test_too_short_motion_leaves_tracks_untouched() {
    let mut tracks = TrackCollection::new();
    tracks.insert("ball".into(), vec![frame(&[(1, [1., 1.])])]);
    tracks.insert("players".into(), vec![frame(&[(1, [1., 1.])]); 4]);
    let before = tracks.clone();
    assert!(compensate(&mut tracks, &motion()).is_err());
    assert_eq!(tracks, before);
  }

  #[test]
  fn test_empty_collection() {
    let mut tracks = TrackCollection::new();
    compensate(&mut tracks, &MotionSequence::default()).unwrap();
    assert!(tracks.is_empty());
  }
}
