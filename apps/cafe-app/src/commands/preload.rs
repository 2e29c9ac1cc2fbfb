//! # Preload Command
//!
//! Runs the splash preload for the selected cafe.

use cafe_core::PreloadProgress;

use crate::error::{ApiError, ApiResult};
use crate::preload::{run_preload, PreloadedCafe};
use crate::state::{CatalogState, SessionState};

/// Preloads the selected cafe, reporting progress after each stage.
pub async fn preload_cafe<F>(
    catalog: &CatalogState,
    session: &SessionState,
    on_progress: F,
) -> ApiResult<PreloadedCafe>
where
    F: FnMut(&PreloadProgress),
{
    let cafe_id = session.cafe_id().ok_or_else(ApiError::no_cafe)?;
    Ok(run_preload(catalog.inner(), &cafe_id, on_progress).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cafe::scan_code;
    use crate::error::ErrorCode;
    use crate::test_context;

    #[tokio::test]
    async fn test_needs_selected_cafe() {
        let ctx = test_context().await;
        let err = preload_cafe(&ctx.catalog, &ctx.session, |_| {})
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoCafeSelected);

        scan_code(&ctx.db, &ctx.catalog, &ctx.session, &ctx.cart, "DEMO-3")
            .await
            .unwrap();
        let mut steps = 0;
        let loaded = preload_cafe(&ctx.catalog, &ctx.session, |_| steps += 1)
            .await
            .unwrap();
        assert_eq!(steps, 5);
        assert_eq!(loaded.cafe_id, "kordon-cay");
    }
}
