use serde::{Deserialize, Serialize};

/// COCO の 17 キーポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }
}

/// 単一キーポイント
///
/// (0, 0) は「未検出」の番兵値。演算に流す前に `is_missing` で必ず除外する
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 検出器が出力する未検出番兵 (0, 0) か
    pub fn is_missing(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// 1人分の姿勢推定結果
///
/// `xy` はピクセル座標（ボタン判定・オフセット用）、
/// `xyn` は 0.0〜1.0 正規化座標（姿勢分類用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pose {
    pub xy: [Keypoint; KeypointIndex::COUNT],
    pub xyn: [Keypoint; KeypointIndex::COUNT],
}

impl Pose {
    pub fn new(
        xy: [Keypoint; KeypointIndex::COUNT],
        xyn: [Keypoint; KeypointIndex::COUNT],
    ) -> Self {
        Self { xy, xyn }
    }

    /// ピクセル座標のキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> Keypoint {
        self.xy[index as usize]
    }

    /// 正規化座標のキーポイントを取得
    pub fn get_norm(&self, index: KeypointIndex) -> Keypoint {
        self.xyn[index as usize]
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            xy: [Keypoint::default(); KeypointIndex::COUNT],
            xyn: [Keypoint::default(); KeypointIndex::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_index_count() {
        assert_eq!(KeypointIndex::COUNT, 17);
    }

    #[test]
    fn test_keypoint_index_from_index() {
        assert_eq!(KeypointIndex::from_index(9), Some(KeypointIndex::LeftWrist));
        assert_eq!(
            KeypointIndex::from_index(10),
            Some(KeypointIndex::RightWrist)
        );
        assert_eq!(KeypointIndex::from_index(17), None);
    }

    #[test]
    fn test_keypoint_missing_sentinel() {
        assert!(Keypoint::new(0.0, 0.0).is_missing());
        assert!(!Keypoint::new(0.0, 0.1).is_missing());
        assert!(!Keypoint::new(12.0, 34.0).is_missing());
    }

    #[test]
    fn test_pose_get() {
        let mut pose = Pose::default();
        pose.xy[KeypointIndex::LeftWrist as usize] = Keypoint::new(14.0, 14.0);
        pose.xyn[KeypointIndex::LeftWrist as usize] = Keypoint::new(0.02, 0.03);

        assert_eq!(pose.get(KeypointIndex::LeftWrist), Keypoint::new(14.0, 14.0));
        assert_eq!(
            pose.get_norm(KeypointIndex::LeftWrist),
            Keypoint::new(0.02, 0.03)
        );
        assert!(pose.get(KeypointIndex::RightWrist).is_missing());
    }
}
