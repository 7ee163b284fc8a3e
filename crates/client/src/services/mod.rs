//! One module per backend resource area. Each is a thin typed mapping, one
//! method per endpoint, no business logic; errors from [`crate::Http`]
//! propagate unchanged.

mod auth;
mod company;
mod marketplace;
mod notifications;
mod professor;
mod student;

pub use auth::AuthService;
pub use company::CompanyService;
pub use marketplace::MarketplaceService;
pub use notifications::NotificationsApi;
pub use professor::ProfessorService;
pub use student::StudentService;

use crate::Http;

/// All resource services over one shared [`Http`].
#[derive(Clone, Debug)]
pub struct Services {
    pub auth: AuthService,
    pub student: StudentService,
    pub professor: ProfessorService,
    pub company: CompanyService,
    pub marketplace: MarketplaceService,
}

impl Services {
    pub fn new(http: Http) -> Self {
        Self {
            auth: AuthService::new(http.clone()),
            student: StudentService::new(http.clone()),
            professor: ProfessorService::new(http.clone()),
            company: CompanyService::new(http.clone()),
            marketplace: MarketplaceService::new(http),
        }
    }
}
