use api_types::{
    coupon::{ValidateCouponRequest, ValidateCouponResponse},
    reward::{Reward, RewardNew, RewardStatusUpdate, RewardUpdate},
    stats::CompanyStatistics,
    user::{ProfileUpdate, Role, User},
};

use crate::{ApiError, Http};

#[derive(Clone, Debug)]
pub struct CompanyService {
    http: Http,
}

impl CompanyService {
    pub fn new(http: Http) -> Self {
        Self { http }
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.http.get("/api/company/profile").await
    }

    pub async fn update_profile(&self, req: &ProfileUpdate) -> Result<User, ApiError> {
        self.http.put("/api/company/profile", req).await
    }

    pub async fn statistics(&self) -> Result<CompanyStatistics, ApiError> {
        self.http.get("/api/company/statistics").await
    }

    /// The company's own catalog, active or not.
    pub async fn rewards(&self) -> Result<Vec<Reward>, ApiError> {
        self.http.get("/api/company/rewards").await
    }

    pub async fn create_reward(&self, req: &RewardNew) -> Result<Reward, ApiError> {
        self.http.post("/api/company/rewards", req).await
    }

    pub async fn update_reward(&self, id: i64, req: &RewardUpdate) -> Result<Reward, ApiError> {
        self.http.patch(&format!("/api/company/rewards/{id}"), req).await
    }

    pub async fn delete_reward(&self, id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/api/company/rewards/{id}")).await
    }

    pub async fn set_reward_status(
        &self,
        id: i64,
        req: &RewardStatusUpdate,
    ) -> Result<Reward, ApiError> {
        self.http
            .patch(&format!("/api/company/rewards/{id}/status"), req)
            .await
    }

    pub async fn upload_reward_image(
        &self,
        id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<Reward, ApiError> {
        self.http
            .upload(
                &format!("/api/company/rewards/{id}/image"),
                "image",
                file_name,
                bytes,
                mime,
            )
            .await
    }

    /// Marks the coupon used server-side when it is valid.
    pub async fn validate_coupon(
        &self,
        req: &ValidateCouponRequest,
    ) -> Result<ValidateCouponResponse, ApiError> {
        self.http.post("/api/company/validate-coupon", req).await
    }

    pub fn notifications(&self) -> super::NotificationsApi {
        super::NotificationsApi::new(self.http.clone(), Role::Company)
    }
}
