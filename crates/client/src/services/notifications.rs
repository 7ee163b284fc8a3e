use api_types::{
    notification::{Notification, UnreadCount},
    user::Role,
};

use crate::{ApiError, Http};

/// Role-scoped notification endpoints. Notifications are polled, never
/// pushed; each role reads its own resource group.
#[derive(Clone, Debug)]
pub struct NotificationsApi {
    http: Http,
    role: Role,
}

impl NotificationsApi {
    pub(crate) fn new(http: Http, role: Role) -> Self {
        Self { http, role }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    fn path(&self, suffix: &str) -> String {
        format!("/api/{}/notifications{suffix}", self.role.as_str())
    }

    pub async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        self.http.get(&self.path("")).await
    }

    pub async fn mark_read(&self, id: i64) -> Result<Notification, ApiError> {
        self.http.post_empty(&self.path(&format!("/{id}/read"))).await
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.http.post_empty_unit(&self.path("/read-all")).await
    }

    pub async fn unread_count(&self) -> Result<UnreadCount, ApiError> {
        self.http.get(&self.path("/unread-count")).await
    }
}
