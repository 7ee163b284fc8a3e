use api_types::{
    auth::{CompanySignup, LoginRequest, LoginResponse, StudentSignup},
    user::{Role, User},
};
use axum::{Extension, Json, extract::State};

use crate::{ApiFailure, AppState, server::CurrentUser, state::SeedUser};

pub(crate) async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiFailure> {
    state
        .with_data(|data| {
            data.users
                .iter()
                .find(|u| u.user.email == req.email && u.password == req.password)
                .map(|u| {
                    Json(LoginResponse {
                        token: u.token.clone(),
                        user: u.user.clone(),
                    })
                })
        })
        .ok_or_else(|| {
            ApiFailure::unauthorized("invalid_credentials")
                .with_message("invalid email or password")
        })
}

pub(crate) async fn signup_student(
    State(state): State<AppState>,
    Json(req): Json<StudentSignup>,
) -> Result<Json<LoginResponse>, ApiFailure> {
    state.with_data(|data| {
        if data.users.iter().any(|u| u.user.email == req.email) {
            return Err(ApiFailure::new(
                axum::http::StatusCode::CONFLICT,
                "email_taken",
            ));
        }
        if !data.institutions.iter().any(|i| i.id == req.institution_id) {
            return Err(ApiFailure::not_found("unknown_institution"));
        }

        let id = data.fresh_id();
        let seed = SeedUser {
            user: User {
                id,
                name: req.name,
                email: req.email,
                role: Role::Student,
                institution_id: Some(req.institution_id),
            },
            password: req.password,
            token: format!("tok-{id}"),
            coins: 0,
        };
        let response = LoginResponse {
            token: seed.token.clone(),
            user: seed.user.clone(),
        };
        data.users.push(seed);
        Ok(Json(response))
    })
}

pub(crate) async fn signup_company(
    State(state): State<AppState>,
    Json(req): Json<CompanySignup>,
) -> Result<Json<LoginResponse>, ApiFailure> {
    state.with_data(|data| {
        if data.users.iter().any(|u| u.user.email == req.email) {
            return Err(ApiFailure::new(
                axum::http::StatusCode::CONFLICT,
                "email_taken",
            ));
        }

        let id = data.fresh_id();
        let seed = SeedUser {
            user: User {
                id,
                name: req.name,
                email: req.email,
                role: Role::Company,
                institution_id: None,
            },
            password: req.password,
            token: format!("tok-{id}"),
            coins: 0,
        };
        let response = LoginResponse {
            token: seed.token.clone(),
            user: seed.user.clone(),
        };
        data.users.push(seed);
        Ok(Json(response))
    })
}

pub(crate) async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}
