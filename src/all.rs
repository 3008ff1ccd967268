// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  cache::*,
  compensator::*,
  estimator::*,
  feature_selector::*,
  font::*,
  frame::*,
  image::*,
  math::*,
  motion::*,
  motion_tracker::*,
  optical_flow::*,
  overlay::*,
  parameters::*,
  pyramid::*,
  tracks::*,
  types::*,
  util::*,
  video::*,
};

pub use {
  std::{
    collections::{BTreeMap, HashMap},
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    ops::Index,
    path::{Path, PathBuf},
  },
  log::{debug, error, info, warn, LevelFilter},
  nalgebra::{dmatrix, DMatrix},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
  serde::{Deserialize, Serialize},
};
