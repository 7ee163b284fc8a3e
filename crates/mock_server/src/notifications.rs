use api_types::notification::{Notification, UnreadCount};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{ApiFailure, AppState, server::CurrentUser};

/// Notification handlers serve all three role-scoped routes; the recipient
/// is always the authenticated caller.
pub(crate) async fn list(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<Notification>> {
    state.with_data(|data| {
        Json(
            data.notifications
                .iter()
                .filter(|(recipient, _)| *recipient == user.id)
                .map(|(_, notification)| notification.clone())
                .collect(),
        )
    })
}

pub(crate) async fn mark_read(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, ApiFailure> {
    state.with_data(|data| {
        let found = data
            .notifications
            .iter_mut()
            .find(|(recipient, notification)| *recipient == user.id && notification.id == id);
        match found {
            Some((_, notification)) => {
                notification.read = true;
                Ok(Json(notification.clone()))
            }
            None => Err(ApiFailure::not_found("unknown_notification")),
        }
    })
}

pub(crate) async fn mark_all_read(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<serde_json::Value> {
    state.with_data(|data| {
        let mut marked = 0;
        for (recipient, notification) in &mut data.notifications {
            if *recipient == user.id && !notification.read {
                notification.read = true;
                marked += 1;
            }
        }
        Json(serde_json::json!({ "marked": marked }))
    })
}

pub(crate) async fn unread_count(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<UnreadCount> {
    state.with_data(|data| {
        let count = data
            .notifications
            .iter()
            .filter(|(recipient, notification)| *recipient == user.id && !notification.read)
            .count() as u64;
        Json(UnreadCount { count })
    })
}
