use std::fs::File;
use std::io::{BufRead, BufReader};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use gojiku_monitor::config::Config;
use gojiku_monitor::monitor::Monitor;
use gojiku_monitor::safety::CameraFrame;

const CONFIG_PATH: &str = "config.toml";

/// 記録済み検出結果の1ティック分（JSON Lines の1行）
#[derive(Debug, Deserialize)]
struct TickRecord {
    time_secs: f32,
    frames: Vec<CameraFrame>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .context("使い方: gojiku-monitor <検出記録.jsonl>")?;

    let config = Config::load_or_default(CONFIG_PATH);
    let mut monitor = Monitor::new(&config);

    println!("=== 五軸加工機 安全監視リプレイ ===");
    println!("記録: {}", path);
    println!();

    let file = File::open(&path).with_context(|| format!("記録を開けない: {}", path))?;
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: TickRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{} の解析に失敗", path, line_no + 1))?;
        if record.frames.len() != config.cameras.count {
            tracing::warn!(
                expected = config.cameras.count,
                actual = record.frames.len(),
                line = line_no + 1,
                "カメラ台数が設定と一致しない"
            );
        }

        let result = monitor.process(
            &record.frames,
            Duration::from_secs_f32(record.time_secs),
        );
        println!(
            "[{:>7.2}s] 姿勢: {:<14} 停止手: {:?} 送り手: {:?} 衝突: {:?} SOP: 段{}{}{}",
            record.time_secs,
            result.behavior.human_pose.as_str(),
            result.behavior.is_hand_on_stop,
            result.behavior.is_hand_on_feed,
            result.behavior.is_knife_base_collided,
            result.sop_step,
            if result.sop_active { " (進行中)" } else { "" },
            if result.alert { " ※警報" } else { "" },
        );
    }

    Ok(())
}
