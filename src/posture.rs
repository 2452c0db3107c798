use crate::behavior::PoseState;
use crate::config::SafetyConfig;
use crate::pose::{KeypointIndex, Pose};

/// 左右ペア関節のy座標平均
///
/// 片側のみ検出時は検出側の値、両側未検出なら 0（以降の閾値判定で未知扱い）
fn avg_pair_y(left_y: f32, right_y: f32) -> f32 {
    if left_y != 0.0 && right_y != 0.0 {
        (left_y + right_y) / 2.0
    } else if left_y != 0.0 {
        left_y
    } else {
        right_y
    }
}

/// 3点 a-b-c の中点 b における内角（度、0〜180）
///
/// ベクトルが退化している場合は 0 を返す
pub fn calculate_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let n1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let n2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
    if n1 == 0.0 || n2 == 0.0 {
        return 0.0;
    }

    let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / (n1 * n2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// 肘の内角（肩-肘-手首）。いずれかが未検出番兵なら 0
fn arm_angle(
    pose: &Pose,
    shoulder: KeypointIndex,
    elbow: KeypointIndex,
    wrist: KeypointIndex,
) -> f32 {
    let s = pose.get_norm(shoulder);
    let e = pose.get_norm(elbow);
    let w = pose.get_norm(wrist);
    if s.is_missing() || e.is_missing() || w.is_missing() {
        return 0.0;
    }
    calculate_angle((s.x, s.y), (e.x, e.y), (w.x, w.y))
}

/// 正規化キーポイントからの固定決定木による姿勢分類
///
/// 規則の順序が意味を持つ: 最初に一致した規則で確定する
pub fn classify_pose(pose: &Pose, config: &SafetyConfig) -> PoseState {
    use KeypointIndex::*;

    let left_wrist = pose.get_norm(LeftWrist);
    let right_wrist = pose.get_norm(RightWrist);

    let avg_hip_y = avg_pair_y(pose.get_norm(LeftHip).y, pose.get_norm(RightHip).y);
    let avg_knee_y = avg_pair_y(pose.get_norm(LeftKnee).y, pose.get_norm(RightKnee).y);
    let avg_shoulder_y = avg_pair_y(
        pose.get_norm(LeftShoulder).y,
        pose.get_norm(RightShoulder).y,
    );

    let left_angle = arm_angle(pose, LeftShoulder, LeftElbow, LeftWrist);
    let right_angle = arm_angle(pose, RightShoulder, RightElbow, RightWrist);

    // 横たわり: 腰-肩 または 膝-腰 の縦方向の差が閾値未満
    if (avg_hip_y != 0.0
        && avg_shoulder_y != 0.0
        && avg_hip_y - avg_shoulder_y < config.lie_threshold)
        || (avg_knee_y != 0.0
            && avg_hip_y != 0.0
            && avg_knee_y - avg_hip_y < config.lie_threshold)
    {
        return PoseState::Lie;
    }

    // 手首が腰より上にあるか（腰未検出時は手首検出のみで成立）
    let wrist_raised = |wrist_y: f32, threshold: f32| {
        wrist_y != 0.0 && (avg_hip_y == 0.0 || avg_hip_y - wrist_y > threshold)
    };

    // 腕伸ばし: 肘角度条件と手首高さ条件は別の腕でも成立する（既存挙動のまま）
    if (left_angle > config.arm_angle_threshold || right_angle > config.arm_angle_threshold)
        && (wrist_raised(left_wrist.y, config.arm_stretch_threshold)
            || wrist_raised(right_wrist.y, config.arm_stretch_threshold))
    {
        return PoseState::ArmStretch;
    }

    // 腕曲げ
    if wrist_raised(left_wrist.y, config.arm_bend_threshold)
        || wrist_raised(right_wrist.y, config.arm_bend_threshold)
    {
        return PoseState::ArmBend;
    }

    // 立位: 腰が肩より下、膝が腰より下（画像座標は下が正）
    if avg_hip_y != 0.0
        && avg_shoulder_y != 0.0
        && avg_hip_y > avg_shoulder_y
        && avg_knee_y != 0.0
        && avg_knee_y > avg_hip_y
    {
        return PoseState::Stand;
    }

    PoseState::Unknown
}
