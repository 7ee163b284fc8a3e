use api_types::{
    coupon::{ValidateCouponRequest, ValidateCouponResponse},
    reward::{Reward, RewardNew, RewardStatusUpdate, RewardUpdate},
    stats::CompanyStatistics,
    user::{ProfileUpdate, Role, User},
};
use client::{ApiError, services::CompanyService};

use crate::{QueryClient, keys};

pub async fn profile(qc: &QueryClient, svc: &CompanyService) -> Result<User, ApiError> {
    qc.query(keys::profile(Role::Company), || svc.profile()).await
}

pub async fn update_profile(
    qc: &QueryClient,
    svc: &CompanyService,
    req: &ProfileUpdate,
) -> Result<User, ApiError> {
    qc.mutate(|| svc.update_profile(req), &[keys::profile(Role::Company)])
        .await
}

pub async fn statistics(
    qc: &QueryClient,
    svc: &CompanyService,
) -> Result<CompanyStatistics, ApiError> {
    qc.query(keys::statistics(Role::Company), || svc.statistics())
        .await
}

pub async fn rewards(qc: &QueryClient, svc: &CompanyService) -> Result<Vec<Reward>, ApiError> {
    qc.query(keys::company_rewards(), || svc.rewards()).await
}

/// Creating changes both the list and the reward counts.
pub async fn create_reward(
    qc: &QueryClient,
    svc: &CompanyService,
    req: &RewardNew,
) -> Result<Reward, ApiError> {
    qc.mutate(
        || svc.create_reward(req),
        &[keys::company_rewards(), keys::statistics(Role::Company)],
    )
    .await
}

/// Editing fields leaves the counts alone.
pub async fn update_reward(
    qc: &QueryClient,
    svc: &CompanyService,
    id: i64,
    req: &RewardUpdate,
) -> Result<Reward, ApiError> {
    qc.mutate(
        || svc.update_reward(id, req),
        &[keys::company_rewards()],
    )
    .await
}

pub async fn delete_reward(qc: &QueryClient, svc: &CompanyService, id: i64) -> Result<(), ApiError> {
    qc.mutate(
        || svc.delete_reward(id),
        &[keys::company_rewards(), keys::statistics(Role::Company)],
    )
    .await
}

/// Toggling moves the reward between the active and inactive counts.
pub async fn set_reward_status(
    qc: &QueryClient,
    svc: &CompanyService,
    id: i64,
    req: &RewardStatusUpdate,
) -> Result<Reward, ApiError> {
    qc.mutate(
        || svc.set_reward_status(id, req),
        &[keys::company_rewards(), keys::statistics(Role::Company)],
    )
    .await
}

pub async fn upload_reward_image(
    qc: &QueryClient,
    svc: &CompanyService,
    id: i64,
    file_name: &str,
    bytes: Vec<u8>,
    mime: &str,
) -> Result<Reward, ApiError> {
    qc.mutate(
        || svc.upload_reward_image(id, file_name, bytes, mime),
        &[keys::company_rewards()],
    )
    .await
}

/// Validation flips the coupon's used flag server-side, but no company-side
/// cached read depends on it, so there is nothing to invalidate.
pub async fn validate_coupon(
    qc: &QueryClient,
    svc: &CompanyService,
    req: &ValidateCouponRequest,
) -> Result<ValidateCouponResponse, ApiError> {
    qc.mutate(|| svc.validate_coupon(req), &[]).await
}
