use api_types::{
    auth::{CompanySignup, LoginRequest, LoginResponse, StudentSignup},
    user::User,
};

use crate::{ApiError, Http, TokenStore};

/// Auth endpoints. The only service with a side effect beyond the network
/// call: it owns persistence of the bearer token.
#[derive(Clone, Debug)]
pub struct AuthService {
    http: Http,
    tokens: TokenStore,
}

impl AuthService {
    pub fn new(http: Http) -> Self {
        let tokens = http.tokens().clone();
        Self { http, tokens }
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let res: LoginResponse = self.http.post("/api/auth/login", req).await?;
        self.tokens.set(&res.token)?;
        Ok(res)
    }

    pub async fn signup_student(&self, req: &StudentSignup) -> Result<LoginResponse, ApiError> {
        let res: LoginResponse = self.http.post("/api/auth/signup/student", req).await?;
        self.tokens.set(&res.token)?;
        Ok(res)
    }

    pub async fn signup_company(&self, req: &CompanySignup) -> Result<LoginResponse, ApiError> {
        let res: LoginResponse = self.http.post("/api/auth/signup/company", req).await?;
        self.tokens.set(&res.token)?;
        Ok(res)
    }

    /// Identity behind the current token. 401 means the token was rejected
    /// and a full re-login is required.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.http.get("/api/auth/me").await
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.tokens.clear()?;
        Ok(())
    }
}
