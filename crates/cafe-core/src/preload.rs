//! # Preload Plan
//!
//! Stage list and progress math for the splash screen shown after a cafe
//! is picked.
//!
//! ## Stages
//! ```text
//! ┌────────────┬──────┬──────┬──────────┬──────────────────┬───────┐
//! │ stage      │ App  │ Cafe │ Products │ PromotionalCards │ Video │
//! │ weight     │  15  │  10  │    45    │        20        │  10   │
//! │ progress   │  15% │  25% │    70%   │        90%       │ 100%  │
//! └────────────┴──────┴──────┴──────────┴──────────────────┴───────┘
//! ```
//!
//! Weights are fixed guesses of how long each stage takes, not measured.
//! A failed stage still counts as done: the loader substitutes demo data
//! and the bar keeps moving.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One step of the splash preload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PreloadStage {
    AppConfig,
    Cafe,
    Products,
    PromotionalCards,
    Video,
}

impl PreloadStage {
    /// Stages in execution order.
    pub const ALL: [PreloadStage; 5] = [
        PreloadStage::AppConfig,
        PreloadStage::Cafe,
        PreloadStage::Products,
        PreloadStage::PromotionalCards,
        PreloadStage::Video,
    ];

    pub const fn weight(&self) -> u32 {
        match self {
            PreloadStage::AppConfig => 15,
            PreloadStage::Cafe => 10,
            PreloadStage::Products => 45,
            PreloadStage::PromotionalCards => 20,
            PreloadStage::Video => 10,
        }
    }

    /// Caption under the progress bar.
    pub const fn label(&self) -> &'static str {
        match self {
            PreloadStage::AppConfig => "Ayarlar yükleniyor",
            PreloadStage::Cafe => "Kafe bilgileri alınıyor",
            PreloadStage::Products => "Menü hazırlanıyor",
            PreloadStage::PromotionalCards => "Kampanyalar getiriliyor",
            PreloadStage::Video => "Video hazırlanıyor",
        }
    }
}

/// Progress report emitted after each stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PreloadProgress {
    pub stage: PreloadStage,
    /// Stages finished so far, including this one.
    pub completed: usize,
    pub total: usize,
    /// 0-100, never decreases, exactly 100 after the last stage.
    pub percent: u8,
    /// False when the stage fell back to demo data.
    pub succeeded: bool,
}

/// Tracks cumulative progress through the stage list.
#[derive(Debug, Clone)]
pub struct PreloadPlan {
    stages: Vec<PreloadStage>,
    completed: usize,
    completed_weight: u32,
}

impl PreloadPlan {
    /// The fixed splash plan.
    pub fn standard() -> Self {
        PreloadPlan::with_stages(PreloadStage::ALL.to_vec())
    }

    pub fn with_stages(stages: Vec<PreloadStage>) -> Self {
        PreloadPlan {
            stages,
            completed: 0,
            completed_weight: 0,
        }
    }

    pub fn stages(&self) -> &[PreloadStage] {
        &self.stages
    }

    pub fn total_weight(&self) -> u32 {
        self.stages.iter().map(PreloadStage::weight).sum()
    }

    /// Next stage to run, `None` when finished.
    pub fn next_stage(&self) -> Option<PreloadStage> {
        self.stages.get(self.completed).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.stages.len()
    }

    /// Marks the next stage done and reports progress.
    ///
    /// Returns `None` if every stage is already done.
    pub fn advance(&mut self, succeeded: bool) -> Option<PreloadProgress> {
        let stage = self.next_stage()?;
        self.completed += 1;
        self.completed_weight += stage.weight();

        Some(PreloadProgress {
            stage,
            completed: self.completed,
            total: self.stages.len(),
            percent: self.percent(),
            succeeded,
        })
    }

    /// Cumulative percentage, rounded down; 100 once finished.
    pub fn percent(&self) -> u8 {
        if self.is_finished() {
            return 100;
        }
        let total = self.total_weight();
        if total == 0 {
            return 0;
        }
        (self.completed_weight * 100 / total) as u8
    }
}

impl Default for PreloadPlan {
    fn default() -> Self {
        PreloadPlan::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_100() {
        assert_eq!(PreloadPlan::standard().total_weight(), 100);
    }

    #[test]
    fn test_progress_is_cumulative() {
        let mut plan = PreloadPlan::standard();
        let percents: Vec<u8> = std::iter::from_fn(|| plan.advance(true))
            .map(|p| p.percent)
            .collect();
        assert_eq!(percents, vec![15, 25, 70, 90, 100]);
        assert!(plan.is_finished());
        assert!(plan.advance(true).is_none());
    }

    #[test]
    fn test_failed_stage_still_advances() {
        let mut plan = PreloadPlan::standard();
        plan.advance(true);
        let progress = plan.advance(false).unwrap();
        assert_eq!(progress.stage, PreloadStage::Cafe);
        assert!(!progress.succeeded);
        assert_eq!(progress.percent, 25);
        assert_eq!(plan.next_stage(), Some(PreloadStage::Products));
    }

    #[test]
    fn test_custom_plan_ends_at_100() {
        // 10 + 45 = 55: intermediate values round down, last is exact
        let mut plan = PreloadPlan::with_stages(vec![PreloadStage::Cafe, PreloadStage::Products]);
        assert_eq!(plan.advance(true).unwrap().percent, 18);
        assert_eq!(plan.advance(true).unwrap().percent, 100);
    }
}
