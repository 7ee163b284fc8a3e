use api_types::notification::{Notification, UnreadCount};
use client::{ApiError, services::NotificationsApi};

use crate::{QueryClient, keys};

pub async fn list(qc: &QueryClient, api: &NotificationsApi) -> Result<Vec<Notification>, ApiError> {
    qc.query(keys::notifications(api.role()), || api.list()).await
}

pub async fn unread_count(
    qc: &QueryClient,
    api: &NotificationsApi,
) -> Result<UnreadCount, ApiError> {
    qc.query(keys::notifications_unread(api.role()), || api.unread_count())
        .await
}

/// The notifications prefix covers the unread count, so one edge keeps both
/// reads honest.
pub async fn mark_read(
    qc: &QueryClient,
    api: &NotificationsApi,
    id: i64,
) -> Result<Notification, ApiError> {
    qc.mutate(
        || api.mark_read(id),
        &[keys::notifications(api.role())],
    )
    .await
}

pub async fn mark_all_read(qc: &QueryClient, api: &NotificationsApi) -> Result<(), ApiError> {
    qc.mutate(
        || api.mark_all_read(),
        &[keys::notifications(api.role())],
    )
    .await
}
