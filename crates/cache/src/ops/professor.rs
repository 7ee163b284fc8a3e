use api_types::{
    balance::Balance,
    stats::ProfessorStatistics,
    transaction::{GiveCoins, TransactionView},
    user::{ProfileUpdate, Role, User},
};
use client::{ApiError, services::ProfessorService};

use crate::{QueryClient, keys};

pub async fn profile(qc: &QueryClient, svc: &ProfessorService) -> Result<User, ApiError> {
    qc.query(keys::profile(Role::Professor), || svc.profile())
        .await
}

pub async fn update_profile(
    qc: &QueryClient,
    svc: &ProfessorService,
    req: &ProfileUpdate,
) -> Result<User, ApiError> {
    qc.mutate(|| svc.update_profile(req), &[keys::profile(Role::Professor)])
        .await
}

pub async fn balance(qc: &QueryClient, svc: &ProfessorService) -> Result<Balance, ApiError> {
    qc.query(keys::balance(Role::Professor), || svc.balance())
        .await
}

pub async fn statistics(
    qc: &QueryClient,
    svc: &ProfessorService,
) -> Result<ProfessorStatistics, ApiError> {
    qc.query(keys::statistics(Role::Professor), || svc.statistics())
        .await
}

pub async fn transactions(
    qc: &QueryClient,
    svc: &ProfessorService,
) -> Result<Vec<TransactionView>, ApiError> {
    qc.query(keys::transactions(Role::Professor), || svc.transactions())
        .await
}

/// Granting spends from the professor's allowance and shows up in their
/// history and statistics.
pub async fn give(
    qc: &QueryClient,
    svc: &ProfessorService,
    req: &GiveCoins,
) -> Result<TransactionView, ApiError> {
    qc.mutate(
        || svc.give(req),
        &[
            keys::balance(Role::Professor),
            keys::transactions(Role::Professor),
            keys::statistics(Role::Professor),
        ],
    )
    .await
}
