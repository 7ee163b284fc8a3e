use api_types::{
    balance::Balance,
    stats::ProfessorStatistics,
    transaction::{GiveCoins, TransactionView},
    user::{ProfileUpdate, Role, User},
};

use crate::{ApiError, Http};

#[derive(Clone, Debug)]
pub struct ProfessorService {
    http: Http,
}

impl ProfessorService {
    pub fn new(http: Http) -> Self {
        Self { http }
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.http.get("/api/professor/profile").await
    }

    pub async fn update_profile(&self, req: &ProfileUpdate) -> Result<User, ApiError> {
        self.http.put("/api/professor/profile", req).await
    }

    /// Remaining grant allowance for this period.
    pub async fn balance(&self) -> Result<Balance, ApiError> {
        self.http.get("/api/professor/balance").await
    }

    pub async fn statistics(&self) -> Result<ProfessorStatistics, ApiError> {
        self.http.get("/api/professor/statistics").await
    }

    pub async fn transactions(&self) -> Result<Vec<TransactionView>, ApiError> {
        self.http.get("/api/professor/transactions").await
    }

    pub async fn give(&self, req: &GiveCoins) -> Result<TransactionView, ApiError> {
        self.http.post("/api/professor/give", req).await
    }

    pub fn notifications(&self) -> super::NotificationsApi {
        super::NotificationsApi::new(self.http.clone(), Role::Professor)
    }
}
