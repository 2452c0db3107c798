use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::OffsetConfig;
use crate::detect::FrameDetector;
use crate::pose::KeypointIndex;
use crate::region::extract_regions;

/// 手首座標とボタン中心のずれ補正（ピクセル）
///
/// 停止ボタンは左手首、送りボタンは右手首に対応する
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    pub stop_x: f32,
    pub stop_y: f32,
    pub feed_x: f32,
    pub feed_y: f32,
}

impl From<&OffsetConfig> for Offsets {
    fn from(config: &OffsetConfig) -> Self {
        Self {
            stop_x: config.stop_x,
            stop_y: config.stop_y,
            feed_x: config.feed_x,
            feed_y: config.feed_y,
        }
    }
}

impl Default for Offsets {
    fn default() -> Self {
        Offsets::from(&OffsetConfig::default())
    }
}

/// 基準画像からオフセットを較正する
///
/// 「ボタンに手を置いた」静止画像を使い、ボタン中心と手首の差を
/// そのままオフセットとする。較正できないペアは前回値を維持する
#[derive(Debug, Default)]
pub struct OffsetCalibrator;

impl OffsetCalibrator {
    /// - `to_adjust` が偽、または画像が無い場合は `prev` をそのまま返す
    /// - 検出に失敗した場合も `prev` を返す（エラーにはしない）
    pub fn calibrate(
        &self,
        to_adjust: bool,
        prev: Offsets,
        image: Option<&Path>,
        detector: &mut dyn FrameDetector,
    ) -> Offsets {
        let mut offsets = prev;

        if to_adjust {
            let Some(image) = image else {
                warn!("較正画像が未指定のため前回のオフセットを使用");
                return prev;
            };
            info!(image = %image.display(), "オフセットを較正中");
            let detected = match detector.detect(image) {
                Ok(detected) => detected,
                Err(err) => {
                    warn!(error = %err, "較正画像の検出に失敗、前回のオフセットを使用");
                    return prev;
                }
            };
            let Some(pose) = detected.pose else {
                warn!("較正画像に人が写っていないため前回のオフセットを使用");
                return prev;
            };

            let regions = extract_regions(&detected.objects, &["stop", "feed"]);

            let left_wrist = pose.get(KeypointIndex::LeftWrist);
            if let Some(stop) = regions["stop"] {
                if !left_wrist.is_missing() {
                    let (cx, cy) = stop.center();
                    offsets.stop_x = cx - left_wrist.x;
                    offsets.stop_y = cy - left_wrist.y;
                }
            }

            let right_wrist = pose.get(KeypointIndex::RightWrist);
            if let Some(feed) = regions["feed"] {
                if !right_wrist.is_missing() {
                    let (cx, cy) = feed.center();
                    offsets.feed_x = cx - right_wrist.x;
                    offsets.feed_y = cy - right_wrist.y;
                }
            }
        }

        if offsets == Offsets::default() {
            info!("既定のオフセットを使用");
        } else if offsets == prev {
            info!("前回のオフセットを使用");
        } else {
            info!(
                stop_x = offsets.stop_x,
                stop_y = offsets.stop_y,
                feed_x = offsets.feed_x,
                feed_y = offsets.feed_y,
                "オフセットを較正した"
            );
        }

        offsets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};

    use crate::detect::{DetectedFrame, Detection};
    use crate::pose::{Keypoint, Pose};

    /// 固定の検出結果を返すスタブ
    struct FixedDetector(DetectedFrame);

    impl FrameDetector for FixedDetector {
        fn detect(&mut self, _image: &Path) -> Result<DetectedFrame> {
            Ok(self.0.clone())
        }
    }

    struct FailingDetector;

    impl FrameDetector for FailingDetector {
        fn detect(&mut self, _image: &Path) -> Result<DetectedFrame> {
            bail!("画像を読み込めない")
        }
    }

    fn calibration_frame() -> DetectedFrame {
        let mut pose = Pose::default();
        pose.xy[KeypointIndex::LeftWrist as usize] = Keypoint::new(100.0, 220.0);
        pose.xy[KeypointIndex::RightWrist as usize] = Keypoint::new(260.0, 310.0);
        DetectedFrame {
            pose: Some(pose),
            objects: vec![
                // stop 中心 (120, 215), feed 中心 (300, 300)
                Detection::new("stop", 100, 200, 140, 230, 0.9),
                Detection::new("feed", 280, 280, 320, 320, 0.9),
            ],
        }
    }

    #[test]
    fn test_not_adjusting_returns_previous() {
        let prev = Offsets {
            stop_x: 1.0,
            stop_y: 2.0,
            feed_x: 3.0,
            feed_y: 4.0,
        };
        let mut detector = FixedDetector(calibration_frame());
        let result = OffsetCalibrator.calibrate(
            false,
            prev,
            Some(Path::new("calib.png")),
            &mut detector,
        );
        assert_eq!(result, prev);
    }

    #[test]
    fn test_calibrates_both_pairs() {
        let mut detector = FixedDetector(calibration_frame());
        let result = OffsetCalibrator.calibrate(
            true,
            Offsets::default(),
            Some(Path::new("calib.png")),
            &mut detector,
        );
        assert_eq!(result.stop_x, 20.0);
        assert_eq!(result.stop_y, -5.0);
        assert_eq!(result.feed_x, 40.0);
        assert_eq!(result.feed_y, -10.0);
    }

    #[test]
    fn test_missing_feed_region_keeps_previous_pair() {
        let mut frame = calibration_frame();
        frame.objects.retain(|d| d.class_name == "stop");
        let mut detector = FixedDetector(frame);
        let prev = Offsets {
            stop_x: 0.0,
            stop_y: 0.0,
            feed_x: 44.0,
            feed_y: -10.0,
        };
        let result =
            OffsetCalibrator.calibrate(true, prev, Some(Path::new("calib.png")), &mut detector);
        assert_eq!(result.stop_x, 20.0);
        assert_eq!(result.feed_x, 44.0);
        assert_eq!(result.feed_y, -10.0);
    }

    #[test]
    fn test_missing_wrist_keeps_previous_pair() {
        let mut frame = calibration_frame();
        if let Some(pose) = frame.pose.as_mut() {
            pose.xy[KeypointIndex::LeftWrist as usize] = Keypoint::new(0.0, 0.0);
        }
        let mut detector = FixedDetector(frame);
        let prev = Offsets::default();
        let result =
            OffsetCalibrator.calibrate(true, prev, Some(Path::new("calib.png")), &mut detector);
        assert_eq!(result.stop_x, prev.stop_x);
        assert_eq!(result.stop_y, prev.stop_y);
        assert_eq!(result.feed_x, 40.0);
    }

    #[test]
    fn test_detector_error_returns_previous() {
        let prev = Offsets {
            stop_x: 5.0,
            stop_y: 6.0,
            feed_x: 7.0,
            feed_y: 8.0,
        };
        let result = OffsetCalibrator.calibrate(
            true,
            prev,
            Some(Path::new("missing.png")),
            &mut FailingDetector,
        );
        assert_eq!(result, prev);
    }

    #[test]
    fn test_no_image_returns_previous() {
        let prev = Offsets::default();
        let mut detector = FixedDetector(calibration_frame());
        let result = OffsetCalibrator.calibrate(true, prev, None, &mut detector);
        assert_eq!(result, prev);
    }

    #[test]
    fn test_defaults_come_from_config() {
        let offsets = Offsets::default();
        assert_eq!(offsets.stop_x, 52.0);
        assert_eq!(offsets.stop_y, 1.0);
        assert_eq!(offsets.feed_x, 44.0);
        assert_eq!(offsets.feed_y, -10.0);
    }
}
