use api_types::{
    balance::Balance,
    coupon::{Coupon, RedeemRequest, RedeemResponse},
    stats::StudentStatistics,
    transaction::{TransactionKind, TransactionView},
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;
use uuid::Uuid;

use crate::{ApiFailure, AppState, server::CurrentUser};

pub(crate) async fn balance(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Balance>, ApiFailure> {
    state
        .coins_of(user.id)
        .map(|coins| Json(Balance { coins }))
        .ok_or_else(|| ApiFailure::not_found("unknown_user"))
}

pub(crate) async fn statistics(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<StudentStatistics> {
    state.with_data(|data| {
        let mut stats = StudentStatistics {
            total_earned: 0,
            total_redeemed: 0,
            redemption_count: 0,
        };
        for tx in &data.transactions {
            match tx.kind {
                TransactionKind::Give if tx.to_user_id == Some(user.id) => {
                    stats.total_earned += tx.amount;
                }
                TransactionKind::Redeem if tx.from_user_id == Some(user.id) => {
                    stats.total_redeemed += tx.amount;
                    stats.redemption_count += 1;
                }
                _ => {}
            }
        }
        Json(stats)
    })
}

pub(crate) async fn transactions(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<TransactionView>> {
    state.with_data(|data| {
        Json(
            data.transactions
                .iter()
                .filter(|tx| {
                    tx.from_user_id == Some(user.id) || tx.to_user_id == Some(user.id)
                })
                .cloned()
                .collect(),
        )
    })
}

pub(crate) async fn redeem(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<RedeemRequest>,
) -> Result<Json<RedeemResponse>, ApiFailure> {
    state.with_data(|data| {
        let reward = data
            .rewards
            .iter()
            .find(|r| r.id == req.reward_id)
            .cloned()
            .ok_or_else(|| ApiFailure::not_found("unknown_reward"))?;
        if !reward.active {
            return Err(ApiFailure::bad_request("reward_inactive"));
        }

        let tx_id = data.fresh_id();
        let coupon_id = data.fresh_id();

        {
            let seed = data
                .users
                .iter_mut()
                .find(|u| u.user.id == user.id)
                .ok_or_else(|| ApiFailure::not_found("unknown_user"))?;
            if seed.coins < reward.cost {
                return Err(ApiFailure::bad_request("insufficient_balance"));
            }
            seed.coins -= reward.cost;
        }

        // Coupon and transaction appear together, as the real backend
        // guarantees.
        data.transactions.push(TransactionView {
            id: tx_id,
            kind: TransactionKind::Redeem,
            amount: reward.cost,
            from_user_id: Some(user.id),
            to_user_id: Some(reward.company_id),
            message: Some(reward.name.clone()),
            created_at: Utc::now(),
        });
        let coupon = Coupon {
            id: coupon_id,
            code: Uuid::new_v4().simple().to_string(),
            reward_id: reward.id,
            used: false,
            expires_at: Utc::now() + chrono::Duration::days(30),
        };
        data.coupons.push((user.id, coupon.clone()));

        Ok(Json(RedeemResponse { coupon }))
    })
}

pub(crate) async fn coupons(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<Vec<Coupon>> {
    state.with_data(|data| {
        Json(
            data.coupons
                .iter()
                .filter(|(owner, _)| *owner == user.id)
                .map(|(_, coupon)| coupon.clone())
                .collect(),
        )
    })
}
