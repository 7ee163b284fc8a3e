use std::fmt;

/// Stable hierarchical cache key, e.g. `["student", "balance"]`.
///
/// Invalidation matches by prefix: invalidating `["student",
/// "notifications"]` also covers `["student", "notifications",
/// "unread-count"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

/// Canonical keys for every cached read. Keys for role-parallel resources
/// take the [`Role`](api_types::user::Role) so the three resource groups
/// stay separate entries.
pub mod keys {
    use api_types::user::Role;

    use super::QueryKey;

    pub fn profile(role: Role) -> QueryKey {
        QueryKey::new([role.as_str(), "profile"])
    }

    pub fn balance(role: Role) -> QueryKey {
        QueryKey::new([role.as_str(), "balance"])
    }

    pub fn statistics(role: Role) -> QueryKey {
        QueryKey::new([role.as_str(), "statistics"])
    }

    pub fn transactions(role: Role) -> QueryKey {
        QueryKey::new([role.as_str(), "transactions"])
    }

    pub fn student_coupons() -> QueryKey {
        QueryKey::new(["student", "coupons"])
    }

    pub fn company_rewards() -> QueryKey {
        QueryKey::new(["company", "rewards"])
    }

    pub fn notifications(role: Role) -> QueryKey {
        QueryKey::new([role.as_str(), "notifications"])
    }

    pub fn notifications_unread(role: Role) -> QueryKey {
        notifications(role).push("unread-count")
    }

    pub fn marketplace_rewards() -> QueryKey {
        QueryKey::new(["rewards"])
    }

    pub fn marketplace_reward(id: i64) -> QueryKey {
        marketplace_rewards().push(id.to_string())
    }

    pub fn institutions() -> QueryKey {
        QueryKey::new(["institutions"])
    }
}

#[cfg(test)]
mod tests {
    use api_types::user::Role;

    use super::*;

    #[test]
    fn key_matches_itself_as_prefix() {
        let key = keys::balance(Role::Student);
        assert!(key.starts_with(&key));
    }

    #[test]
    fn unread_count_is_under_the_notifications_prefix() {
        let unread = keys::notifications_unread(Role::Professor);
        assert!(unread.starts_with(&keys::notifications(Role::Professor)));
        assert!(!unread.starts_with(&keys::notifications(Role::Student)));
    }

    #[test]
    fn longer_prefix_does_not_match_shorter_key() {
        let list = keys::notifications(Role::Student);
        let unread = keys::notifications_unread(Role::Student);
        assert!(!list.starts_with(&unread));
    }

    #[test]
    fn roles_produce_disjoint_keys() {
        assert_ne!(keys::balance(Role::Student), keys::balance(Role::Professor));
    }

    #[test]
    fn display_joins_segments() {
        assert_eq!(keys::marketplace_reward(7).to_string(), "rewards/7");
    }
}
