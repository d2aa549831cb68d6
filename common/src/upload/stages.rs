//! 処理中アニメーションの段階表示
//!
//! バックエンドは最終レスポンスを1回返すだけなので、ここでの進捗は
//! 経過時間だけから決まる見せかけの値。アップロード状態には一切影響しない。

use std::time::Duration;

/// 表示段階（名前と表示時間）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub label: &'static str,
    pub duration_ms: u32,
}

impl Stage {
    pub const fn new(label: &'static str, duration_ms: u32) -> Self {
        Self { label, duration_ms }
    }
}

/// ある時点での表示位置
#[derive(Debug, Clone, PartialEq)]
pub struct StagePosition {
    pub index: usize,
    pub label: &'static str,
    /// 現在段階内の進み具合 (0.0..=1.0)
    pub stage_progress: f32,
    /// 全体の進み具合 (0.0..=1.0)
    pub overall: f32,
    /// 全段階を表示し終えたか（以降は最終段階で待機）
    pub finished: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct StageTimeline {
    stages: &'static [Stage],
}

impl StageTimeline {
    pub const fn new(stages: &'static [Stage]) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &'static [Stage] {
        self.stages
    }

    pub fn total_ms(&self) -> u64 {
        self.stages.iter().map(|s| s.duration_ms as u64).sum()
    }

    /// 経過時間から表示位置を求める
    ///
    /// 合計時間を過ぎたら最終段階に留まる。段階が空なら `None`。
    pub fn position(&self, elapsed: Duration) -> Option<StagePosition> {
        let last = self.stages.len().checked_sub(1)?;
        let elapsed_ms = elapsed.as_millis() as u64;
        let total = self.total_ms();

        let mut start = 0u64;
        for (index, stage) in self.stages.iter().enumerate() {
            let end = start + stage.duration_ms as u64;
            if elapsed_ms < end {
                let within = elapsed_ms - start;
                return Some(StagePosition {
                    index,
                    label: stage.label,
                    stage_progress: ratio(within, stage.duration_ms as u64),
                    overall: ratio(elapsed_ms, total),
                    finished: false,
                });
            }
            start = end;
        }

        Some(StagePosition {
            index: last,
            label: self.stages[last].label,
            stage_progress: 1.0,
            overall: 1.0,
            finished: true,
        })
    }
}

fn ratio(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        1.0
    } else {
        (part as f32 / whole as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAGES: &[Stage] = &[
        Stage::new("Uploading", 1000),
        Stage::new("Matching", 2000),
        Stage::new("Summarising", 1000),
    ];

    fn at(ms: u64) -> StagePosition {
        StageTimeline::new(STAGES)
            .position(Duration::from_millis(ms))
            .expect("stages present")
    }

    #[test]
    fn test_total_ms() {
        assert_eq!(StageTimeline::new(STAGES).total_ms(), 4000);
    }

    #[test]
    fn test_starts_on_first_stage() {
        let pos = at(0);
        assert_eq!(pos.index, 0);
        assert_eq!(pos.label, "Uploading");
        assert_eq!(pos.overall, 0.0);
    }

    #[test]
    fn test_stage_boundaries() {
        assert_eq!(at(999).index, 0);
        assert_eq!(at(1000).index, 1);
        assert_eq!(at(2999).index, 1);
        assert_eq!(at(3000).index, 2);
    }

    #[test]
    fn test_progress_within_stage() {
        let pos = at(2000);
        assert_eq!(pos.index, 1);
        assert!((pos.stage_progress - 0.5).abs() < f32::EPSILON);
        assert!((pos.overall - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_holds_last_stage_after_total() {
        let pos = at(60_000);
        assert_eq!(pos.index, 2);
        assert_eq!(pos.label, "Summarising");
        assert!(pos.finished);
        assert_eq!(pos.overall, 1.0);
    }

    #[test]
    fn test_empty_timeline() {
        assert!(StageTimeline::new(&[]).position(Duration::from_secs(1)).is_none());
    }
}
