//! # Cafe Preload
//!
//! Runs the splash-screen stages for a cafe and reports progress.
//!
//! ```text
//! AppConfig 15 ─► Cafe 10 ─► Products 45 ─► PromotionalCards 20 ─► Video 10
//!      │             │            │                 │                  │
//!      └── progress callback after each stage: 15, 25, 70, 90, 100 ────┘
//! ```
//!
//! Stages run one after another. A stage that errors is logged and
//! skipped; its slot in the snapshot keeps the empty/default value and the
//! bar still advances.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cafe_client::{CatalogService, ClientResult, Sourced};
use cafe_core::{
    AppConfig, Cafe, PreloadPlan, PreloadProgress, PreloadStage, Product, PromotionalCard,
    VideoConfig, VideoPreset,
};

/// Everything the menu screen needs, loaded up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadedCafe {
    pub cafe_id: String,
    pub app_config: AppConfig,
    pub cafe: Option<Cafe>,
    pub products: Vec<Product>,
    pub promotional_cards: Vec<PromotionalCard>,
    /// Background video, resolved against the preset list.
    pub video: Option<VideoConfig>,
    /// Stages answered by demo data or skipped.
    pub degraded_stages: Vec<PreloadStage>,
}

impl PreloadedCafe {
    fn empty(cafe_id: &str) -> Self {
        PreloadedCafe {
            cafe_id: cafe_id.to_string(),
            app_config: AppConfig::default_for(cafe_id, Utc::now()),
            cafe: None,
            products: Vec::new(),
            promotional_cards: Vec::new(),
            video: None,
            degraded_stages: Vec::new(),
        }
    }
}

/// Stores a stage result and says whether it came from the API.
fn take<T>(stage: PreloadStage, result: ClientResult<Sourced<T>>, slot: &mut T) -> bool {
    match result {
        Ok(sourced) => {
            let from_api = !sourced.is_demo();
            *slot = sourced.data;
            from_api
        }
        Err(e) => {
            warn!(stage = ?stage, error = %e, "Preload stage failed, skipping");
            false
        }
    }
}

/// Loads a cafe's data stage by stage.
///
/// `on_progress` is called once per stage, after it finishes.
pub async fn run_preload<F>(
    catalog: &CatalogService,
    cafe_id: &str,
    mut on_progress: F,
) -> PreloadedCafe
where
    F: FnMut(&PreloadProgress),
{
    let mut plan = PreloadPlan::standard();
    let mut loaded = PreloadedCafe::empty(cafe_id);

    while let Some(stage) = plan.next_stage() {
        let from_api = match stage {
            PreloadStage::AppConfig => {
                take(stage, catalog.app_config(cafe_id).await, &mut loaded.app_config)
            }
            PreloadStage::Cafe => {
                let result = catalog.cafe(cafe_id).await.map(|s| s.map(Some));
                take(stage, result, &mut loaded.cafe)
            }
            PreloadStage::Products => {
                take(stage, catalog.products(cafe_id, None).await, &mut loaded.products)
            }
            PreloadStage::PromotionalCards => take(
                stage,
                catalog.promotional_cards(cafe_id, false).await,
                &mut loaded.promotional_cards,
            ),
            PreloadStage::Video => {
                let current = loaded.cafe.as_ref().map(|c| c.video.clone());
                let result = catalog
                    .video_presets()
                    .await
                    .map(|s| s.map(|presets| resolve_video(current, &presets)));
                take(stage, result, &mut loaded.video)
            }
        };

        if !from_api {
            loaded.degraded_stages.push(stage);
        }
        if let Some(progress) = plan.advance(from_api) {
            on_progress(&progress);
        }
    }

    info!(
        cafe_id,
        products = loaded.products.len(),
        degraded = loaded.degraded_stages.len(),
        "Preload finished"
    );
    loaded
}

/// The cafe's own video, with the URL refreshed from its preset when the
/// preset still exists. A cafe with no video gets the default preset.
fn resolve_video(current: Option<VideoConfig>, presets: &[VideoPreset]) -> Option<VideoConfig> {
    let default_preset = || {
        presets
            .iter()
            .find(|p| p.is_default)
            .map(VideoPreset::to_video_config)
    };

    match current {
        Some(video) if !video.url.is_empty() || video.preset_id.is_some() => {
            let preset = video
                .preset_id
                .as_deref()
                .and_then(|id| presets.iter().find(|p| p.id == id));
            match preset {
                Some(preset) => Some(VideoConfig {
                    url: preset.url.clone(),
                    ..video
                }),
                None => Some(video),
            }
        }
        _ => default_preset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cafe_client::{ClientConfig, DemoCatalog};

    fn offline_catalog() -> CatalogService {
        let config = ClientConfig::default().offline(true);
        CatalogService::with_demo(config, DemoCatalog::new()).unwrap()
    }

    #[tokio::test]
    async fn test_progress_reaches_100_in_order() {
        let catalog = offline_catalog();
        let mut seen = Vec::new();

        let loaded = run_preload(&catalog, "moda-kahve", |p| seen.push(p.percent)).await;

        assert_eq!(seen, vec![15, 25, 70, 90, 100]);
        assert_eq!(loaded.cafe.unwrap().id, "moda-kahve");
        assert!(!loaded.products.is_empty());
        assert!(loaded.video.is_some());
        // Offline: every stage answered by demo data
        assert_eq!(loaded.degraded_stages.len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_cafe_skips_failed_stage() {
        let catalog = offline_catalog();
        let mut last = 0;

        let loaded = run_preload(&catalog, "yok-boyle", |p| last = p.percent).await;

        assert_eq!(last, 100);
        assert!(loaded.cafe.is_none());
        assert!(loaded.products.is_empty());
        assert_eq!(loaded.app_config.cafe_id, "yok-boyle");
    }
}
