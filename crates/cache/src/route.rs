use api_types::user::Role;

/// Post-login navigation target, one dashboard per role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    StudentDashboard,
    ProfessorDashboard,
    CompanyDashboard,
}

impl Route {
    pub fn dashboard(role: Role) -> Self {
        match role {
            Role::Student => Self::StudentDashboard,
            Role::Professor => Self::ProfessorDashboard,
            Role::Company => Self::CompanyDashboard,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::StudentDashboard => "/student/dashboard",
            Self::ProfessorDashboard => "/professor/dashboard",
            Self::CompanyDashboard => "/company/dashboard",
        }
    }
}
