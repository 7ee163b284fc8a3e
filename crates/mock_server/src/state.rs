use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use api_types::{
    coupon::Coupon,
    institution::Institution,
    notification::Notification,
    reward::Reward,
    transaction::TransactionView,
    user::{Role, User},
};
use chrono::Utc;

/// A seeded account: identity plus the credentials and balance the backend
/// would hold for it.
#[derive(Clone, Debug)]
pub struct SeedUser {
    pub user: User,
    pub password: String,
    pub token: String,
    pub coins: i64,
}

#[derive(Default)]
pub(crate) struct Data {
    pub users: Vec<SeedUser>,
    pub transactions: Vec<TransactionView>,
    pub rewards: Vec<Reward>,
    /// Coupons with their owning student.
    pub coupons: Vec<(i64, Coupon)>,
    /// Notifications with their recipient.
    pub notifications: Vec<(i64, Notification)>,
    pub institutions: Vec<Institution>,
    pub next_id: i64,
}

impl Data {
    pub(crate) fn fresh_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Clone, Debug)]
pub(crate) struct InjectedFailure {
    pub status: u16,
    pub body: String,
}

/// Shared backend state plus the test hook surface.
#[derive(Clone, Default)]
pub struct AppState {
    data: Arc<Mutex<Data>>,
    hits: Arc<Mutex<HashMap<String, usize>>>,
    failures: Arc<Mutex<HashMap<String, VecDeque<InjectedFailure>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl AppState {
    /// A populated backend: one student, one professor, one company, a small
    /// reward catalog and a few notifications.
    pub fn seeded() -> Self {
        let state = Self::default();
        state.with_data(|data| {
            data.next_id = 1000;
            data.institutions = vec![Institution {
                id: 10,
                name: "State University".to_string(),
            }];
            data.users = vec![
                SeedUser {
                    user: User {
                        id: 1,
                        name: "Ada Student".to_string(),
                        email: "ada@campus.example".to_string(),
                        role: Role::Student,
                        institution_id: Some(10),
                    },
                    password: "ada-pw".to_string(),
                    token: "tok-student".to_string(),
                    coins: 120,
                },
                SeedUser {
                    user: User {
                        id: 2,
                        name: "Grace Professor".to_string(),
                        email: "grace@campus.example".to_string(),
                        role: Role::Professor,
                        institution_id: Some(10),
                    },
                    password: "grace-pw".to_string(),
                    token: "tok-professor".to_string(),
                    coins: 500,
                },
                SeedUser {
                    user: User {
                        id: 3,
                        name: "Campus Cafe".to_string(),
                        email: "cafe@campus.example".to_string(),
                        role: Role::Company,
                        institution_id: None,
                    },
                    password: "cafe-pw".to_string(),
                    token: "tok-company".to_string(),
                    coins: 0,
                },
            ];
            data.rewards = vec![
                Reward {
                    id: 101,
                    company_id: 3,
                    name: "Coffee voucher".to_string(),
                    description: "One free coffee".to_string(),
                    cost: 50,
                    category: "food".to_string(),
                    active: true,
                    image_url: None,
                },
                Reward {
                    id: 102,
                    company_id: 3,
                    name: "Laptop sleeve".to_string(),
                    description: "Branded sleeve".to_string(),
                    cost: 1000,
                    category: "merch".to_string(),
                    active: true,
                    image_url: None,
                },
                Reward {
                    id: 103,
                    company_id: 3,
                    name: "Spring promo".to_string(),
                    description: "Expired promotion".to_string(),
                    cost: 10,
                    category: "promo".to_string(),
                    active: false,
                    image_url: None,
                },
            ];
            data.notifications = vec![
                (
                    1,
                    Notification {
                        id: 901,
                        message: "You received 20 coins".to_string(),
                        read: false,
                        created_at: Utc::now(),
                    },
                ),
                (
                    1,
                    Notification {
                        id: 902,
                        message: "Welcome to CampusCash".to_string(),
                        read: true,
                        created_at: Utc::now(),
                    },
                ),
                (
                    2,
                    Notification {
                        id: 903,
                        message: "Allowance renewed".to_string(),
                        read: false,
                        created_at: Utc::now(),
                    },
                ),
            ];
        });
        state
    }

    pub(crate) fn with_data<R>(&self, f: impl FnOnce(&mut Data) -> R) -> R {
        f(&mut lock(&self.data))
    }

    pub(crate) fn user_by_token(&self, token: &str) -> Option<SeedUser> {
        self.with_data(|data| data.users.iter().find(|u| u.token == token).cloned())
    }

    pub(crate) fn record_hit(&self, path: &str) {
        *lock(&self.hits).entry(path.to_string()).or_default() += 1;
    }

    pub(crate) fn pop_failure(&self, path: &str) -> Option<InjectedFailure> {
        lock(&self.failures).get_mut(path).and_then(VecDeque::pop_front)
    }

    pub(crate) fn delay_for(&self, path: &str) -> Option<Duration> {
        lock(&self.delays).get(path).copied()
    }

    // Test hooks.

    /// How many requests have reached `path` (counted before any injected
    /// failure fires).
    pub fn hits(&self, path: &str) -> usize {
        lock(&self.hits).get(path).copied().unwrap_or(0)
    }

    /// Queues `times` failures for `path`; each serves `status` with the raw
    /// `body` instead of the real handler.
    pub fn fail(&self, path: &str, times: usize, status: u16, body: &str) {
        let mut failures = lock(&self.failures);
        let queue = failures.entry(path.to_string()).or_default();
        for _ in 0..times {
            queue.push_back(InjectedFailure {
                status,
                body: body.to_string(),
            });
        }
    }

    /// Makes every request to `path` sleep first; pair with a short client
    /// timeout to exercise the timeout path.
    pub fn delay(&self, path: &str, delay: Duration) {
        lock(&self.delays).insert(path.to_string(), delay);
    }

    pub fn coins_of(&self, user_id: i64) -> Option<i64> {
        self.with_data(|data| {
            data.users
                .iter()
                .find(|u| u.user.id == user_id)
                .map(|u| u.coins)
        })
    }

    /// The seeded bearer token for `role`, for tests that skip the login
    /// round-trip.
    pub fn token_for(&self, role: Role) -> Option<String> {
        self.with_data(|data| {
            data.users
                .iter()
                .find(|u| u.user.role == role)
                .map(|u| u.token.clone())
        })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}
