use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub offsets: OffsetConfig,
    #[serde(default)]
    pub sop: SopConfig,
    #[serde(default)]
    pub cameras: CameraConfig,
}

/// 安全判定の閾値
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SafetyConfig {
    /// 横たわり判定の垂直距離閾値（正規化座標）
    #[serde(default = "default_lie_threshold")]
    pub lie_threshold: f32,
    /// 腕伸ばし判定の肘角度閾値（度）
    #[serde(default = "default_arm_angle_threshold")]
    pub arm_angle_threshold: f32,
    /// 腕伸ばし判定の手首高さ閾値（正規化座標）
    #[serde(default = "default_arm_stretch_threshold")]
    pub arm_stretch_threshold: f32,
    /// 腕曲げ判定の手首高さ閾値（正規化座標）
    #[serde(default = "default_arm_bend_threshold")]
    pub arm_bend_threshold: f32,
    /// ボタン領域の許容マージン（ピクセル）
    #[serde(default = "default_button_threshold")]
    pub button_threshold: f32,
}

/// キャリブレーション前の初期オフセット値
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct OffsetConfig {
    #[serde(default = "default_stop_x")]
    pub stop_x: f32,
    #[serde(default = "default_stop_y")]
    pub stop_y: f32,
    #[serde(default = "default_feed_x")]
    pub feed_x: f32,
    #[serde(default = "default_feed_y")]
    pub feed_y: f32,
}

/// SOP遷移ごとの最小経過時間（秒）
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SopConfig {
    /// 待機 → ステップ1（腕伸ばし）
    #[serde(default = "default_dwell_secs")]
    pub enter_dwell_secs: f32,
    /// ステップ1 → ステップ2（立位）
    #[serde(default = "default_dwell_secs")]
    pub stand_dwell_secs: f32,
    /// ステップ2 → ステップ3（腕曲げ）
    #[serde(default = "default_dwell_secs")]
    pub bend_dwell_secs: f32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CameraConfig {
    /// カメラ台数（1 = 単眼モード、全チェックを1フレームで行う）
    #[serde(default = "default_camera_count")]
    pub count: usize,
}

fn default_lie_threshold() -> f32 { 0.14 }
fn default_arm_angle_threshold() -> f32 { 150.0 }
fn default_arm_stretch_threshold() -> f32 { 0.1 }
fn default_arm_bend_threshold() -> f32 { 0.05 }
fn default_button_threshold() -> f32 { 10.0 }
fn default_stop_x() -> f32 { 52.0 }
fn default_stop_y() -> f32 { 1.0 }
fn default_feed_x() -> f32 { 44.0 }
fn default_feed_y() -> f32 { -10.0 }
fn default_dwell_secs() -> f32 { 20.0 }
fn default_camera_count() -> usize { 3 }

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            lie_threshold: default_lie_threshold(),
            arm_angle_threshold: default_arm_angle_threshold(),
            arm_stretch_threshold: default_arm_stretch_threshold(),
            arm_bend_threshold: default_arm_bend_threshold(),
            button_threshold: default_button_threshold(),
        }
    }
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            stop_x: default_stop_x(),
            stop_y: default_stop_y(),
            feed_x: default_feed_x(),
            feed_y: default_feed_y(),
        }
    }
}

impl Default for SopConfig {
    fn default() -> Self {
        Self {
            enter_dwell_secs: default_dwell_secs(),
            stand_dwell_secs: default_dwell_secs(),
            bend_dwell_secs: default_dwell_secs(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            count: default_camera_count(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "設定ファイル {} を読めません ({e})。デフォルト値を使用します",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }
}
