use api_types::{institution::Institution, reward::Reward};
use client::{ApiError, services::MarketplaceService};

use crate::{QueryClient, keys};

pub async fn rewards(qc: &QueryClient, svc: &MarketplaceService) -> Result<Vec<Reward>, ApiError> {
    qc.query(keys::marketplace_rewards(), || svc.rewards()).await
}

pub async fn reward(
    qc: &QueryClient,
    svc: &MarketplaceService,
    id: i64,
) -> Result<Reward, ApiError> {
    qc.query(keys::marketplace_reward(id), || svc.reward(id)).await
}

pub async fn institutions(
    qc: &QueryClient,
    svc: &MarketplaceService,
) -> Result<Vec<Institution>, ApiError> {
    qc.query(keys::institutions(), || svc.institutions()).await
}
