use api_types::{
    balance::Balance,
    coupon::{Coupon, RedeemRequest, RedeemResponse},
    stats::StudentStatistics,
    transaction::TransactionView,
    user::{ProfileUpdate, Role, User},
};

use crate::{ApiError, Http};

#[derive(Clone, Debug)]
pub struct StudentService {
    http: Http,
}

impl StudentService {
    pub fn new(http: Http) -> Self {
        Self { http }
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.http.get("/api/student/profile").await
    }

    pub async fn update_profile(&self, req: &ProfileUpdate) -> Result<User, ApiError> {
        self.http.put("/api/student/profile", req).await
    }

    pub async fn balance(&self) -> Result<Balance, ApiError> {
        self.http.get("/api/student/balance").await
    }

    pub async fn statistics(&self) -> Result<StudentStatistics, ApiError> {
        self.http.get("/api/student/statistics").await
    }

    pub async fn transactions(&self) -> Result<Vec<TransactionView>, ApiError> {
        self.http.get("/api/student/transactions").await
    }

    /// Redemption is backend-atomic: the coupon and its `redeem` transaction
    /// are created together or not at all.
    pub async fn redeem(&self, req: &RedeemRequest) -> Result<RedeemResponse, ApiError> {
        self.http.post("/api/student/redeem", req).await
    }

    pub async fn coupons(&self) -> Result<Vec<Coupon>, ApiError> {
        self.http.get("/api/student/coupons").await
    }

    pub fn notifications(&self) -> super::NotificationsApi {
        super::NotificationsApi::new(self.http.clone(), Role::Student)
    }
}
