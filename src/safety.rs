use serde::{Deserialize, Serialize};

use crate::behavior::{Behavior, SafeState};
use crate::config::SafetyConfig;
use crate::detect::{DetectedFrame, Detection};
use crate::offsets::Offsets;
use crate::pose::{Keypoint, KeypointIndex, Pose};
use crate::posture::classify_pose;
use crate::region::{extract_regions, Region};

/// カメラの担当領域
///
/// `All` は単一カメラ運用（一台で全判定を受け持つ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraRole {
    /// 上半身と操作盤（両手ボタン判定）
    HandButtons,
    /// 全身姿勢
    Posture,
    /// 刀具と底座
    ToolBase,
    /// 単一カメラで全判定
    All,
}

impl CameraRole {
    fn covers_hands(self) -> bool {
        matches!(self, CameraRole::HandButtons | CameraRole::All)
    }

    fn covers_posture(self) -> bool {
        matches!(self, CameraRole::Posture | CameraRole::All)
    }

    fn covers_tool(self) -> bool {
        matches!(self, CameraRole::ToolBase | CameraRole::All)
    }
}

/// 1カメラ・1フレーム分の検出結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFrame {
    pub role: CameraRole,
    #[serde(default)]
    pub pose: Option<Pose>,
    #[serde(default)]
    pub objects: Vec<Detection>,
}

impl CameraFrame {
    pub fn new(role: CameraRole, detected: DetectedFrame) -> Self {
        Self {
            role,
            pose: detected.pose,
            objects: detected.objects,
        }
    }
}

/// 1フレームの検出結果を`Behavior`へ評価する
///
/// 担当外のフィールドは `Undetected` / `Unknown` のまま触らない
#[derive(Debug, Clone)]
pub struct SafetyEvaluator {
    config: SafetyConfig,
}

impl SafetyEvaluator {
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, frame: &CameraFrame, offsets: &Offsets) -> Behavior {
        let mut behavior = Behavior::default();
        let regions = extract_regions(&frame.objects, &["stop", "feed", "knife", "base"]);

        if frame.role.covers_posture() {
            if let Some(pose) = &frame.pose {
                behavior.human_pose = classify_pose(pose, &self.config);
            }
        }

        if frame.role.covers_hands() {
            if let Some(pose) = &frame.pose {
                // 左手首(9) は停止ボタン、右手首(10) は送りボタンを担当
                if let Some(stop) = regions["stop"] {
                    behavior.is_hand_on_stop = self.hand_on_button(
                        pose.get(KeypointIndex::LeftWrist),
                        stop,
                        offsets.stop_x,
                        offsets.stop_y,
                    );
                }
                if let Some(feed) = regions["feed"] {
                    behavior.is_hand_on_feed = self.hand_on_button(
                        pose.get(KeypointIndex::RightWrist),
                        feed,
                        offsets.feed_x,
                        offsets.feed_y,
                    );
                }
            }
        }

        if frame.role.covers_tool() {
            if let (Some(knife), Some(base)) = (regions["knife"], regions["base"]) {
                // 縦方向は重なりのみ、横方向は刀具の左右端が底座の幅に入るか。
                // ボタン判定と違いマージンは取らない
                let collided = knife.y_max >= base.y_min
                    && ((base.x_min <= knife.x_min && knife.x_min <= base.x_max)
                        || (base.x_min <= knife.x_max && knife.x_max <= base.x_max));
                behavior.is_knife_base_collided = if collided {
                    SafeState::Yes
                } else {
                    SafeState::No
                };
            }
        }

        behavior
    }

    fn hand_on_button(
        &self,
        wrist: Keypoint,
        region: Region,
        offset_x: f32,
        offset_y: f32,
    ) -> SafeState {
        if wrist.is_missing() {
            return SafeState::Undetected;
        }
        let x = wrist.x + offset_x;
        let y = wrist.y + offset_y;
        if region.contains_with_margin(x, y, self.config.button_threshold) {
            SafeState::Yes
        } else {
            SafeState::No
        }
    }
}
