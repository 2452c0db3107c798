use serde::{Deserialize, Serialize};

/// 二値安全チェックの三値結果
///
/// `Undetected` は「必要な領域やキーポイントがこのフレームに無かった」ことを
/// 表す。エラーではなく、集約時の単位元として扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeState {
    No,
    Yes,
    Undetected,
}

impl SafeState {
    /// 論理AND結合: `Undetected` は単位元、以降は全カメラ `Yes` のときのみ `Yes`
    pub fn combine_and(self, other: SafeState) -> SafeState {
        match (self, other) {
            (_, SafeState::Undetected) => self,
            (SafeState::Undetected, _) => other,
            (SafeState::Yes, SafeState::Yes) => SafeState::Yes,
            _ => SafeState::No,
        }
    }

    /// 論理OR結合: `Undetected` は単位元、どれか1カメラでも `Yes` なら `Yes`
    pub fn combine_or(self, other: SafeState) -> SafeState {
        match (self, other) {
            (_, SafeState::Undetected) => self,
            (SafeState::Undetected, _) => other,
            (SafeState::No, SafeState::No) => SafeState::No,
            _ => SafeState::Yes,
        }
    }
}

/// 粗い姿勢分類ラベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoseState {
    Stand,
    ArmStretch,
    ArmBend,
    Lie,
    Unknown,
}

impl PoseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoseState::Stand => "Standing",
            PoseState::ArmStretch => "Arm Stretching",
            PoseState::ArmBend => "Arm Bending",
            PoseState::Lie => "Lying",
            PoseState::Unknown => "Unknown",
        }
    }
}

/// 1評価サイクル分の安全シグナル一式
///
/// 評価ごとに新規生成される値型。返却後は変更しない
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub is_hand_on_stop: SafeState,
    pub is_hand_on_feed: SafeState,
    pub is_knife_base_collided: SafeState,
    pub human_pose: PoseState,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            is_hand_on_stop: SafeState::Undetected,
            is_hand_on_feed: SafeState::Undetected,
            is_knife_base_collided: SafeState::Undetected,
            human_pose: PoseState::Unknown,
        }
    }
}

/// カメラごとの Behavior を1つに畳み込む
///
/// 手の判定は AND（全カメラ一致で `Yes`）、衝突判定は OR（どれか1台で `Yes`）、
/// 姿勢は最後の非 `Unknown` 観測が勝つ
pub fn aggregate(behaviors: &[Behavior]) -> Behavior {
    let mut result = Behavior::default();

    for behavior in behaviors {
        result.is_hand_on_stop = result.is_hand_on_stop.combine_and(behavior.is_hand_on_stop);
        result.is_hand_on_feed = result.is_hand_on_feed.combine_and(behavior.is_hand_on_feed);
        result.is_knife_base_collided = result
            .is_knife_base_collided
            .combine_or(behavior.is_knife_base_collided);
        if behavior.human_pose != PoseState::Unknown {
            result.human_pose = behavior.human_pose;
        }
    }

    result
}
