use std::collections::HashSet;

use api_types::{
    coupon::{ValidateCouponRequest, ValidateCouponResponse},
    reward::{Reward, RewardNew, RewardStatusUpdate, RewardUpdate},
    stats::CompanyStatistics,
};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
};
use chrono::Utc;

use crate::{ApiFailure, AppState, server::CurrentUser};

pub(crate) async fn statistics(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<CompanyStatistics> {
    state.with_data(|data| {
        let mine: Vec<&Reward> = data
            .rewards
            .iter()
            .filter(|r| r.company_id == user.id)
            .collect();
        let reward_ids: HashSet<i64> = mine.iter().map(|r| r.id).collect();
        let redemption_count = data
            .coupons
            .iter()
            .filter(|(_, coupon)| reward_ids.contains(&coupon.reward_id))
            .count() as u64;
        Json(CompanyStatistics {
            reward_count: mine.len() as u64,
            active_reward_count: mine.iter().filter(|r| r.active).count() as u64,
            redemption_count,
        })
    })
}

pub(crate) async fn rewards(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<Reward>> {
    state.with_data(|data| {
        Json(
            data.rewards
                .iter()
                .filter(|r| r.company_id == user.id)
                .cloned()
                .collect(),
        )
    })
}

pub(crate) async fn create_reward(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<RewardNew>,
) -> Result<Json<Reward>, ApiFailure> {
    if req.cost <= 0 {
        return Err(ApiFailure::bad_request("invalid_cost").with_message("cost must be positive"));
    }
    state.with_data(|data| {
        let reward = Reward {
            id: data.fresh_id(),
            company_id: user.id,
            name: req.name.clone(),
            description: req.description.clone(),
            cost: req.cost,
            category: req.category.clone(),
            active: true,
            image_url: None,
        };
        data.rewards.push(reward.clone());
        Ok(Json(reward))
    })
}

fn owned_reward<'a>(
    data: &'a mut crate::state::Data,
    company_id: i64,
    reward_id: i64,
) -> Result<&'a mut Reward, ApiFailure> {
    data.rewards
        .iter_mut()
        .find(|r| r.id == reward_id && r.company_id == company_id)
        .ok_or_else(|| ApiFailure::not_found("unknown_reward"))
}

pub(crate) async fn update_reward(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<RewardUpdate>,
) -> Result<Json<Reward>, ApiFailure> {
    state.with_data(|data| {
        let reward = owned_reward(data, user.id, id)?;
        if let Some(name) = req.name {
            reward.name = name;
        }
        if let Some(description) = req.description {
            reward.description = description;
        }
        if let Some(cost) = req.cost {
            if cost <= 0 {
                return Err(ApiFailure::bad_request("invalid_cost"));
            }
            reward.cost = cost;
        }
        if let Some(category) = req.category {
            reward.category = category;
        }
        Ok(Json(reward.clone()))
    })
}

pub(crate) async fn delete_reward(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiFailure> {
    state.with_data(|data| {
        let before = data.rewards.len();
        data.rewards
            .retain(|r| !(r.id == id && r.company_id == user.id));
        if data.rewards.len() == before {
            return Err(ApiFailure::not_found("unknown_reward"));
        }
        Ok(Json(serde_json::json!({ "deleted": id })))
    })
}

pub(crate) async fn set_reward_status(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<RewardStatusUpdate>,
) -> Result<Json<Reward>, ApiFailure> {
    state.with_data(|data| {
        let reward = owned_reward(data, user.id, id)?;
        reward.active = req.active;
        Ok(Json(reward.clone()))
    })
}

pub(crate) async fn upload_reward_image(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<Reward>, ApiFailure> {
    let mut file_name = None;
    let mut bytes_received = 0usize;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiFailure::bad_request("invalid_multipart"))?
    {
        if field.name() == Some("image") {
            file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiFailure::bad_request("invalid_multipart"))?;
            bytes_received = bytes.len();
        }
    }
    if bytes_received == 0 {
        return Err(ApiFailure::bad_request("empty_image"));
    }

    let file_name = file_name.unwrap_or_else(|| "image.bin".to_string());
    state.with_data(|data| {
        let reward = owned_reward(data, user.id, id)?;
        reward.image_url = Some(format!("/uploads/rewards/{id}/{file_name}"));
        Ok(Json(reward.clone()))
    })
}

pub(crate) async fn validate_coupon(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<ValidateCouponRequest>,
) -> Json<ValidateCouponResponse> {
    state.with_data(|data| {
        let reward_ids: HashSet<i64> = data
            .rewards
            .iter()
            .filter(|r| r.company_id == user.id)
            .map(|r| r.id)
            .collect();

        let found = data
            .coupons
            .iter_mut()
            .map(|(_, coupon)| coupon)
            .find(|coupon| coupon.code == req.code && reward_ids.contains(&coupon.reward_id));

        match found {
            Some(coupon) if !coupon.used && coupon.expires_at > Utc::now() => {
                coupon.used = true;
                Json(ValidateCouponResponse {
                    valid: true,
                    coupon: Some(coupon.clone()),
                })
            }
            Some(coupon) => Json(ValidateCouponResponse {
                valid: false,
                coupon: Some(coupon.clone()),
            }),
            None => Json(ValidateCouponResponse {
                valid: false,
                coupon: None,
            }),
        }
    })
}
