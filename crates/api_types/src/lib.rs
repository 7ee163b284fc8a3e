use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    /// Account role, fixed at signup.
    ///
    /// The backend treats roles as:
    /// - `student`: earns coins and redeems rewards.
    /// - `professor`: grants coins from an allowance.
    /// - `company`: lists rewards and validates coupons.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        Student,
        Professor,
        Company,
    }

    impl Role {
        /// Returns the canonical role string used in endpoint paths.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Student => "student",
                Self::Professor => "professor",
                Self::Company => "company",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct User {
        pub id: i64,
        pub name: String,
        pub email: String,
        pub role: Role,
        pub institution_id: Option<i64>,
    }

    /// Request body for `PUT .../profile`. Absent fields are left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub email: Option<String>,
    }
}

pub mod auth {
    use super::*;
    use super::user::User;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        pub user: User,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StudentSignup {
        pub name: String,
        pub email: String,
        pub password: String,
        pub institution_id: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CompanySignup {
        pub name: String,
        pub email: String,
        pub password: String,
    }
}

pub mod balance {
    use super::*;

    /// Coin balance scoped to one user. Only backend-issued transactions
    /// move it; the client never writes it directly.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Balance {
        pub coins: i64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Give,
        Redeem,
    }

    /// An immutable coin movement. Created by the backend, never edited.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: i64,
        pub kind: TransactionKind,
        pub amount: i64,
        pub from_user_id: Option<i64>,
        pub to_user_id: Option<i64>,
        pub message: Option<String>,
        /// RFC3339 creation timestamp.
        pub created_at: DateTime<Utc>,
    }

    /// Request body for `POST /api/professor/give`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GiveCoins {
        pub student_id: i64,
        pub amount: i64,
        pub message: Option<String>,
    }
}

pub mod reward {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Reward {
        pub id: i64,
        pub company_id: i64,
        pub name: String,
        pub description: String,
        /// Cost in coins.
        pub cost: i64,
        pub category: String,
        pub active: bool,
        pub image_url: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RewardNew {
        pub name: String,
        pub description: String,
        pub cost: i64,
        pub category: String,
    }

    /// Request body for `PATCH /api/company/rewards/{id}`. Absent fields are
    /// left unchanged.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RewardUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub cost: Option<i64>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RewardStatusUpdate {
        pub active: bool,
    }
}

pub mod coupon {
    use super::*;

    /// Proof of redemption. Issued by the backend together with the
    /// `redeem` transaction; the code is opaque to the client.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Coupon {
        pub id: i64,
        pub code: String,
        pub reward_id: i64,
        pub used: bool,
        pub expires_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RedeemRequest {
        pub reward_id: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RedeemResponse {
        pub coupon: Coupon,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ValidateCouponRequest {
        pub code: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ValidateCouponResponse {
        pub valid: bool,
        pub coupon: Option<Coupon>,
    }
}

pub mod notification {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Notification {
        pub id: i64,
        pub message: String,
        pub read: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UnreadCount {
        pub count: u64,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StudentStatistics {
        pub total_earned: i64,
        pub total_redeemed: i64,
        pub redemption_count: u64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ProfessorStatistics {
        pub total_given: i64,
        pub give_count: u64,
        pub students_reached: u64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CompanyStatistics {
        pub reward_count: u64,
        pub active_reward_count: u64,
        pub redemption_count: u64,
    }
}

pub mod institution {
    use super::*;

    /// Public catalog entry; no auth required to list these.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Institution {
        pub id: i64,
        pub name: String,
    }
}
