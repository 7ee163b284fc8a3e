use api_types::{
    balance::Balance,
    coupon::{Coupon, RedeemRequest, RedeemResponse},
    stats::StudentStatistics,
    transaction::TransactionView,
    user::{ProfileUpdate, Role, User},
};
use client::{ApiError, services::StudentService};

use crate::{QueryClient, keys};

pub async fn profile(qc: &QueryClient, svc: &StudentService) -> Result<User, ApiError> {
    qc.query(keys::profile(Role::Student), || svc.profile()).await
}

pub async fn update_profile(
    qc: &QueryClient,
    svc: &StudentService,
    req: &ProfileUpdate,
) -> Result<User, ApiError> {
    qc.mutate(|| svc.update_profile(req), &[keys::profile(Role::Student)])
        .await
}

pub async fn balance(qc: &QueryClient, svc: &StudentService) -> Result<Balance, ApiError> {
    qc.query(keys::balance(Role::Student), || svc.balance()).await
}

pub async fn statistics(
    qc: &QueryClient,
    svc: &StudentService,
) -> Result<StudentStatistics, ApiError> {
    qc.query(keys::statistics(Role::Student), || svc.statistics())
        .await
}

pub async fn transactions(
    qc: &QueryClient,
    svc: &StudentService,
) -> Result<Vec<TransactionView>, ApiError> {
    qc.query(keys::transactions(Role::Student), || svc.transactions())
        .await
}

pub async fn coupons(qc: &QueryClient, svc: &StudentService) -> Result<Vec<Coupon>, ApiError> {
    qc.query(keys::student_coupons(), || svc.coupons()).await
}

/// Redeeming moves coins, appends a transaction and issues a coupon, so all
/// three reads are stale afterwards. On failure nothing is invalidated; the
/// cached balance is still the truth.
pub async fn redeem(
    qc: &QueryClient,
    svc: &StudentService,
    req: &RedeemRequest,
) -> Result<RedeemResponse, ApiError> {
    qc.mutate(
        || svc.redeem(req),
        &[
            keys::balance(Role::Student),
            keys::transactions(Role::Student),
            keys::student_coupons(),
        ],
    )
    .await
}
