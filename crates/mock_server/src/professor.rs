use std::collections::HashSet;

use api_types::{
    balance::Balance,
    notification::Notification,
    stats::ProfessorStatistics,
    transaction::{GiveCoins, TransactionKind, TransactionView},
    user::Role,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

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
) -> Json<ProfessorStatistics> {
    state.with_data(|data| {
        let mut total_given = 0;
        let mut give_count = 0;
        let mut students = HashSet::new();
        for tx in &data.transactions {
            if tx.kind == TransactionKind::Give && tx.from_user_id == Some(user.id) {
                total_given += tx.amount;
                give_count += 1;
                if let Some(student) = tx.to_user_id {
                    students.insert(student);
                }
            }
        }
        Json(ProfessorStatistics {
            total_given,
            give_count,
            students_reached: students.len() as u64,
        })
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

pub(crate) async fn give(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(req): Json<GiveCoins>,
) -> Result<Json<TransactionView>, ApiFailure> {
    if req.amount <= 0 {
        return Err(
            ApiFailure::bad_request("invalid_amount").with_message("amount must be positive")
        );
    }

    state.with_data(|data| {
        let student_exists = data
            .users
            .iter()
            .any(|u| u.user.id == req.student_id && u.user.role == Role::Student);
        if !student_exists {
            return Err(ApiFailure::not_found("unknown_student"));
        }

        let tx_id = data.fresh_id();
        let notification_id = data.fresh_id();

        {
            let professor = data
                .users
                .iter_mut()
                .find(|u| u.user.id == user.id)
                .ok_or_else(|| ApiFailure::not_found("unknown_user"))?;
            if professor.coins < req.amount {
                return Err(ApiFailure::bad_request("insufficient_balance"));
            }
            professor.coins -= req.amount;
        }
        {
            let student = data
                .users
                .iter_mut()
                .find(|u| u.user.id == req.student_id)
                .ok_or_else(|| ApiFailure::not_found("unknown_student"))?;
            student.coins += req.amount;
        }

        let tx = TransactionView {
            id: tx_id,
            kind: TransactionKind::Give,
            amount: req.amount,
            from_user_id: Some(user.id),
            to_user_id: Some(req.student_id),
            message: req.message.clone(),
            created_at: Utc::now(),
        };
        data.transactions.push(tx.clone());
        data.notifications.push((
            req.student_id,
            Notification {
                id: notification_id,
                message: format!("You received {} coins", req.amount),
                read: false,
                created_at: Utc::now(),
            },
        ));

        Ok(Json(tx))
    })
}
