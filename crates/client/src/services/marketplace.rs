use api_types::{institution::Institution, reward::Reward};

use crate::{ApiError, Http};

/// Public catalog reads. No auth required; the bearer header is still
/// attached when a token exists.
#[derive(Clone, Debug)]
pub struct MarketplaceService {
    http: Http,
}

impl MarketplaceService {
    pub fn new(http: Http) -> Self {
        Self { http }
    }

    pub async fn rewards(&self) -> Result<Vec<Reward>, ApiError> {
        self.http.get("/api/rewards").await
    }

    pub async fn reward(&self, id: i64) -> Result<Reward, ApiError> {
        self.http.get(&format!("/api/rewards/{id}")).await
    }

    pub async fn institutions(&self) -> Result<Vec<Institution>, ApiError> {
        self.http.get("/api/institutions").await
    }
}
