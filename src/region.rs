use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::detect::Detection;

/// 1フレーム内の1クラス分の軸平行バウンディングボックス
///
/// フレームごとに作り直す値型。フレームをまたいで保持しない
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Region {
    pub fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// ボックスの中心座標
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x_min + self.x_max) as f32 / 2.0,
            (self.y_min + self.y_max) as f32 / 2.0,
        )
    }

    /// マージン付きの包含判定（境界は含む）
    pub fn contains_with_margin(&self, x: f32, y: f32, margin: f32) -> bool {
        self.x_min as f32 - margin <= x
            && x <= self.x_max as f32 + margin
            && self.y_min as f32 - margin <= y
            && y <= self.y_max as f32 + margin
    }
}

/// 物体検出結果から対象クラスごとの範囲を抽出する
///
/// 全対象クラスをキーに持つマップを返し、未検出のクラスは `None`。
/// 同一クラスが複数検出された場合は最後の検出が勝つ（既存挙動のまま維持）
pub fn extract_regions(
    detections: &[Detection],
    target_classes: &[&str],
) -> HashMap<String, Option<Region>> {
    let mut regions: HashMap<String, Option<Region>> = target_classes
        .iter()
        .map(|name| (name.to_string(), None))
        .collect();

    for detection in detections {
        if let Some(slot) = regions.get_mut(&detection.class_name) {
            *slot = Some(Region::new(
                detection.x1,
                detection.x2,
                detection.y1,
                detection.y2,
            ));
        }
    }

    regions
}
