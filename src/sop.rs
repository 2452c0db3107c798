use std::time::Duration;

use tracing::info;

use crate::behavior::{Behavior, PoseState, SafeState};
use crate::config::SopConfig;

/// 標準作業手順（SOP）の進行追跡
///
/// 手順は 1:加工エリアへ手を伸ばす → 2:立位で待機 → 3:屈んで操作盤へ、の
/// 3段階を繰り返す。各遷移は前回遷移からの滞留時間で デバウンスし、
/// 姿勢のちらつきで段が飛ばないようにする。
///
/// 時刻は呼び出し側がセッション開始からの経過時間として渡す
#[derive(Debug)]
pub struct SopTracker {
    config: SopConfig,
    current_step: u8,
    sop_active: bool,
    last_transition: Option<Duration>,
}

impl SopTracker {
    pub fn new(config: SopConfig) -> Self {
        Self {
            config,
            current_step: 1,
            sop_active: false,
            last_transition: None,
        }
    }

    /// 現在の段（1〜3）
    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    /// 手順サイクルの途中か
    pub fn is_active(&self) -> bool {
        self.sop_active
    }

    /// 1フレーム分の姿勢で手順を進める
    ///
    /// `now` はセッション開始からの経過時間。遷移しないフレームでは状態を変えない
    pub fn update(&mut self, pose: PoseState, now: Duration) {
        match (self.sop_active, self.current_step, pose) {
            (false, _, PoseState::ArmStretch) => {
                if self.dwell_passed(now, self.config.enter_dwell_secs) {
                    self.advance(1, true, now);
                }
            }
            (true, 1, PoseState::Stand) => {
                if self.dwell_passed(now, self.config.stand_dwell_secs) {
                    self.advance(2, true, now);
                }
            }
            (true, 2, PoseState::ArmBend) => {
                if self.dwell_passed(now, self.config.bend_dwell_secs) {
                    // サイクル完了。次の腕伸ばしで再び段1から始まる
                    self.advance(3, false, now);
                }
            }
            _ => {}
        }
    }

    /// 最終段で安全確認の手が離れていれば警報条件
    pub fn alert(&self, behavior: &Behavior) -> bool {
        self.current_step == 3
            && (behavior.is_hand_on_stop == SafeState::No
                || behavior.is_hand_on_feed == SafeState::No)
    }

    fn dwell_passed(&self, now: Duration, dwell_secs: f32) -> bool {
        match self.last_transition {
            None => true,
            Some(last) => now.saturating_sub(last) >= Duration::from_secs_f32(dwell_secs),
        }
    }

    fn advance(&mut self, step: u8, active: bool, now: Duration) {
        self.current_step = step;
        self.sop_active = active;
        self.last_transition = Some(now);
        info!(step, active, elapsed_secs = now.as_secs_f32(), "SOP遷移");
    }
}

impl Default for SopTracker {
    fn default() -> Self {
        Self::new(SopConfig::default())
    }
}
