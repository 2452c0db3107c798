//! Detector output contract shared with the external inference collaborators.
//!
//! The core never runs a model itself: pose estimation and object detection
//! happen upstream and arrive here as plain values.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pose::Pose;

/// One labeled bounding box from the object detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    /// Consumed as given; the detector applies its own confidence cutoff.
    pub confidence: f32,
}

impl Detection {
    pub fn new(class_name: &str, x1: i32, y1: i32, x2: i32, y2: i32, confidence: f32) -> Self {
        Self {
            class_name: class_name.to_string(),
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }
}

/// Combined detector output for one still image or video frame.
///
/// `pose` is `None` when no person was detected (empty keypoint set upstream).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectedFrame {
    pub pose: Option<Pose>,
    pub objects: Vec<Detection>,
}

/// Seam to the pose + object models, used only by offset calibration.
///
/// Implementations run both models on a still image. An unreadable image or a
/// failed inference is an `Err`; the calibrator recovers by keeping the
/// previous offsets.
pub trait FrameDetector {
    fn detect(&mut self, image: &Path) -> Result<DetectedFrame>;
}
