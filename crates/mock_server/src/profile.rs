use api_types::user::{ProfileUpdate, User};
use axum::{Extension, Json, extract::State};

use crate::{ApiFailure, AppState, server::CurrentUser};

/// Profile reads and writes behave the same for every role; the auth
/// middleware already pinned the caller to the right resource group.
pub(crate) async fn profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

pub(crate) async fn update_profile(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<User>, ApiFailure> {
    state.with_data(|data| {
        let seed = data
            .users
            .iter_mut()
            .find(|u| u.user.id == user.id)
            .ok_or_else(|| ApiFailure::not_found("unknown_user"))?;
        if let Some(name) = req.name {
            seed.user.name = name;
        }
        if let Some(email) = req.email {
            seed.user.email = email;
        }
        Ok(Json(seed.user.clone()))
    })
}
