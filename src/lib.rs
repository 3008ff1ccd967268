//! Camera-motion estimation for broadcast sports video.
//!
//! A rolling set of touchline corner features is tracked with pyramidal
//! Lucas-Kanade optical flow. The most displaced feature of each frame step
//! gives the camera pan, which is then subtracted from object track positions.

#[macro_use] extern crate lazy_static;

pub mod all;
pub mod cache;
pub mod compensator;
pub mod estimator;
pub mod feature_selector;
pub mod font;
pub mod frame;
pub mod image;
pub mod math;
pub mod motion;
pub mod motion_tracker;
pub mod optical_flow;
pub mod overlay;
pub mod parameters;
pub mod pyramid;
pub mod tracks;
pub mod types;
pub mod util;
pub mod video;

#[cfg(test)]
mod test_util;
