use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::behavior::{aggregate, Behavior};
use crate::config::Config;
use crate::detect::FrameDetector;
use crate::offsets::{OffsetCalibrator, Offsets};
use crate::safety::{CameraFrame, SafetyEvaluator};
use crate::sop::SopTracker;

/// 1ティック分の監視結果
#[derive(Debug, Clone, Serialize)]
pub struct TickResult {
    pub behavior: Behavior,
    pub sop_step: u8,
    pub sop_active: bool,
    pub alert: bool,
}

/// 監視セッション本体
///
/// 全カメラの検出結果を1ティックずつ流し込み、評価→集約→SOP更新→警報判定を
/// 1パスで行う。状態（オフセット・SOP進行）の書き手はこの構造体のみ
#[derive(Debug)]
pub struct Monitor {
    evaluator: SafetyEvaluator,
    calibrator: OffsetCalibrator,
    sop: SopTracker,
    offsets: Offsets,
    default_offsets: Offsets,
}

impl Monitor {
    pub fn new(config: &Config) -> Self {
        let default_offsets = Offsets::from(&config.offsets);
        Self {
            evaluator: SafetyEvaluator::new(config.safety.clone()),
            calibrator: OffsetCalibrator,
            sop: SopTracker::new(config.sop.clone()),
            offsets: default_offsets,
            default_offsets,
        }
    }

    pub fn offsets(&self) -> Offsets {
        self.offsets
    }

    /// オフセットの一括差し替え（スライダー確定に相当）
    pub fn set_offsets(&mut self, offsets: Offsets) {
        info!(
            stop_x = offsets.stop_x,
            stop_y = offsets.stop_y,
            feed_x = offsets.feed_x,
            feed_y = offsets.feed_y,
            "オフセットを更新"
        );
        self.offsets = offsets;
    }

    /// 設定の既定値へ戻す（スライダー取り消しに相当）
    pub fn reset_offsets(&mut self) {
        info!("オフセットを既定値へ戻す");
        self.offsets = self.default_offsets;
    }

    /// 基準画像からオフセットを較正して取り込む
    pub fn calibrate(&mut self, image: Option<&Path>, detector: &mut dyn FrameDetector) {
        self.offsets = self
            .calibrator
            .calibrate(true, self.offsets, image, detector);
    }

    /// 全カメラ1フレームずつを処理する。`now` はセッション開始からの経過時間
    pub fn process(&mut self, frames: &[CameraFrame], now: Duration) -> TickResult {
        if frames.is_empty() {
            warn!("カメラフレームが空");
        }

        let behaviors: Vec<Behavior> = frames
            .iter()
            .map(|frame| self.evaluator.evaluate(frame, &self.offsets))
            .collect();
        let behavior = aggregate(&behaviors);
        debug!(
            pose = behavior.human_pose.as_str(),
            stop = ?behavior.is_hand_on_stop,
            feed = ?behavior.is_hand_on_feed,
            collision = ?behavior.is_knife_base_collided,
            "集約結果"
        );

        self.sop.update(behavior.human_pose, now);
        let alert = self.sop.alert(&behavior);
        if alert {
            warn!(step = self.sop.current_step(), "安全確認の手が離れている");
        }

        TickResult {
            behavior,
            sop_step: self.sop.current_step(),
            sop_active: self.sop.is_active(),
            alert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{PoseState, SafeState};
    use crate::detect::Detection;
    use crate::pose::{Keypoint, KeypointIndex, Pose};
    use crate::safety::CameraRole;

    fn posture_frame(pose_state: PoseState) -> CameraFrame {
        use KeypointIndex::*;
        let mut pose = Pose::default();
        let mut set = |index: KeypointIndex, x: f32, y: f32| {
            pose.xyn[index as usize] = Keypoint::new(x, y);
        };
        match pose_state {
            PoseState::Stand => {
                set(LeftShoulder, 0.5, 0.4);
                set(LeftHip, 0.5, 0.6);
                set(LeftKnee, 0.5, 0.8);
            }
            PoseState::ArmStretch => {
                set(LeftShoulder, 0.5, 0.4);
                set(LeftHip, 0.5, 0.6);
                set(LeftKnee, 0.5, 0.8);
                set(LeftElbow, 0.5, 0.3);
                set(LeftWrist, 0.5, 0.2);
            }
            PoseState::ArmBend => {
                set(LeftShoulder, 0.5, 0.4);
                set(LeftHip, 0.5, 0.6);
                set(LeftKnee, 0.5, 0.8);
                set(LeftElbow, 0.6, 0.3);
                set(LeftWrist, 0.5, 0.2);
            }
            _ => {}
        }
        CameraFrame {
            role: CameraRole::Posture,
            pose: Some(pose),
            objects: Vec::new(),
        }
    }

    fn hands_frame(left_wrist: (f32, f32), right_wrist: (f32, f32)) -> CameraFrame {
        let mut pose = Pose::default();
        pose.xy[KeypointIndex::LeftWrist as usize] = Keypoint::new(left_wrist.0, left_wrist.1);
        pose.xy[KeypointIndex::RightWrist as usize] = Keypoint::new(right_wrist.0, right_wrist.1);
        CameraFrame {
            role: CameraRole::HandButtons,
            pose: Some(pose),
            objects: vec![
                Detection::new("stop", 100, 200, 140, 230, 0.9),
                Detection::new("feed", 280, 280, 320, 320, 0.9),
            ],
        }
    }

    fn monitor_with_zero_offsets() -> Monitor {
        let mut monitor = Monitor::new(&Config::default());
        monitor.set_offsets(Offsets {
            stop_x: 0.0,
            stop_y: 0.0,
            feed_x: 0.0,
            feed_y: 0.0,
        });
        monitor
    }

    #[test]
    fn test_tick_aggregates_across_cameras() {
        let mut monitor = monitor_with_zero_offsets();
        let frames = vec![
            hands_frame((120.0, 215.0), (300.0, 300.0)),
            posture_frame(PoseState::Stand),
        ];
        let result = monitor.process(&frames, Duration::from_secs(0));
        assert_eq!(result.behavior.is_hand_on_stop, SafeState::Yes);
        assert_eq!(result.behavior.is_hand_on_feed, SafeState::Yes);
        assert_eq!(result.behavior.human_pose, PoseState::Stand);
        assert!(!result.alert);
    }

    #[test]
    fn test_sop_cycle_with_terminal_alert() {
        let mut monitor = monitor_with_zero_offsets();
        // 腕伸ばしで手順開始
        let result = monitor.process(
            &[posture_frame(PoseState::ArmStretch)],
            Duration::from_secs(0),
        );
        assert_eq!(result.sop_step, 1);
        assert!(result.sop_active);

        // 20秒後に立位で段2
        let result = monitor.process(
            &[posture_frame(PoseState::Stand)],
            Duration::from_secs(20),
        );
        assert_eq!(result.sop_step, 2);

        // さらに20秒後、屈み姿勢かつ左手がボタンから外れている → 警報
        let frames = vec![
            hands_frame((500.0, 500.0), (300.0, 300.0)),
            posture_frame(PoseState::ArmBend),
        ];
        let result = monitor.process(&frames, Duration::from_secs(40));
        assert_eq!(result.sop_step, 3);
        assert!(!result.sop_active);
        assert_eq!(result.behavior.is_hand_on_stop, SafeState::No);
        assert!(result.alert);
    }

    #[test]
    fn test_reset_offsets_restores_defaults() {
        let mut monitor = Monitor::new(&Config::default());
        monitor.set_offsets(Offsets {
            stop_x: 9.0,
            stop_y: 9.0,
            feed_x: 9.0,
            feed_y: 9.0,
        });
        assert_ne!(monitor.offsets(), Offsets::default());
        monitor.reset_offsets();
        assert_eq!(monitor.offsets(), Offsets::default());
    }

    #[test]
    fn test_empty_tick_is_inert() {
        let mut monitor = Monitor::new(&Config::default());
        let result = monitor.process(&[], Duration::from_secs(0));
        assert_eq!(result.behavior, Behavior::default());
        assert_eq!(result.sop_step, 1);
        assert!(!result.sop_active);
        assert!(!result.alert);
    }
}
