//! # Onboarding Commands
//!
//! The welcome carousel is shown until `complete_onboarding` runs once.

use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::state::{DbState, SessionState};
use crate::storage;

/// Where the user is in the first-run flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub complete: bool,
    pub cafe_selected: bool,
    pub signed_in: bool,
}

pub async fn onboarding_status(db: &DbState, session: &SessionState) -> ApiResult<OnboardingStatus> {
    Ok(OnboardingStatus {
        complete: storage::onboarding_complete(&db.kv()).await?,
        cafe_selected: session.cafe_id().is_some(),
        signed_in: session.auth().is_some(),
    })
}

pub async fn complete_onboarding(db: &DbState, session: &SessionState) -> ApiResult<OnboardingStatus> {
    db.kv().set_json(storage::ONBOARDING_COMPLETE, &true).await?;
    info!("Onboarding completed");
    onboarding_status(db, session).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_context;

    #[tokio::test]
    async fn test_onboarding_flag_persists() {
        let ctx = test_context().await;

        let status = onboarding_status(&ctx.db, &ctx.session).await.unwrap();
        assert!(!status.complete);
        assert!(!status.cafe_selected);

        let status = complete_onboarding(&ctx.db, &ctx.session).await.unwrap();
        assert!(status.complete);
        assert!(storage::onboarding_complete(&ctx.db.kv()).await.unwrap());
    }
}
