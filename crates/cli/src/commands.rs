use std::{fs, path::PathBuf, time::Duration};

use api_types::{
    auth::{CompanySignup, LoginRequest, StudentSignup},
    coupon::{RedeemRequest, ValidateCouponRequest},
    reward::{RewardNew, RewardStatusUpdate, RewardUpdate},
    transaction::GiveCoins,
    user::Role,
};
use cache::{QueryClient, ops};
use clap::Subcommand;
use client::{Http, TokenStore, services::Services};
use serde::Serialize;
use store::{AuthStore, Theme, UiStore};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and print the dashboard route for the account's role.
    Login { email: String, password: String },
    /// Create an account and log in.
    #[command(subcommand)]
    Signup(SignupCommand),
    /// Drop the session and clear cached data.
    Logout,
    /// Show the identity behind the current session.
    Me,
    /// Current coin balance (students and professors).
    Balance,
    /// Transaction history for the current account.
    Transactions,
    /// Role-specific statistics.
    Statistics,
    /// Redeem a reward; prints the issued coupon.
    Redeem { reward_id: i64 },
    /// Coupons issued to this student.
    Coupons,
    /// Browse the public reward catalog.
    Rewards {
        #[arg(long)]
        id: Option<i64>,
    },
    /// List participating institutions.
    Institutions,
    /// Grant coins to a student (professors).
    Give {
        student_id: i64,
        amount: i64,
        #[arg(long)]
        message: Option<String>,
    },
    /// Manage the company reward catalog.
    #[command(subcommand)]
    Reward(RewardCommand),
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Show or change interface preferences.
    Prefs {
        /// light, dark or system.
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        sidebar: Option<bool>,
    },
}

#[derive(Debug, Subcommand)]
pub enum SignupCommand {
    Student {
        name: String,
        email: String,
        password: String,
        #[arg(long)]
        institution_id: i64,
    },
    Company {
        name: String,
        email: String,
        password: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum RewardCommand {
    Create {
        name: String,
        description: String,
        cost: i64,
        category: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        cost: Option<i64>,
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        id: i64,
    },
    /// Activate or deactivate a listing.
    Status {
        id: i64,
        #[arg(long)]
        active: bool,
    },
    /// Attach an image file to a listing.
    Image {
        id: i64,
        path: PathBuf,
    },
    /// Check and consume a coupon code.
    Validate {
        code: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    List,
    Read { id: i64 },
    ReadAll,
    Unread,
}

pub struct Context {
    qc: QueryClient,
    services: Services,
    auth_store: AuthStore,
    ui_store: UiStore,
}

impl Context {
    pub fn new(settings: &AppConfig) -> Result<Self> {
        let tokens = TokenStore::open(&settings.state_dir);
        let http = Http::with_timeout(
            &settings.base_url,
            tokens.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?;
        Ok(Self {
            qc: QueryClient::new(),
            services: Services::new(http),
            auth_store: AuthStore::open(&settings.state_dir, tokens),
            ui_store: UiStore::open(&settings.state_dir),
        })
    }

    async fn role(&self) -> Result<Role> {
        self.auth_store
            .state()
            .await
            .user
            .map(|user| user.role)
            .ok_or_else(|| {
                AppError::Usage("not logged in; run `campuscash login` first".to_string())
            })
    }
}

pub async fn run(ctx: &Context, command: Command) -> Result<()> {
    // Confirm a previously issued token before doing anything with it; a
    // rejected token resets the session to anonymous. Login and signup
    // replace the session, logout discards it and prefs never leave the
    // machine, so none of those need the round-trip.
    if !matches!(
        command,
        Command::Login { .. } | Command::Signup(_) | Command::Logout | Command::Prefs { .. }
    ) {
        ops::auth::rehydrate(&ctx.services.auth, &ctx.auth_store).await?;
    }

    match command {
        Command::Login { email, password } => {
            let route = ops::auth::login(
                &ctx.qc,
                &ctx.services.auth,
                &ctx.auth_store,
                &LoginRequest { email, password },
            )
            .await?;
            println!("logged in; dashboard: {}", route.path());
        }
        Command::Signup(cmd) => {
            let route = match cmd {
                SignupCommand::Student {
                    name,
                    email,
                    password,
                    institution_id,
                } => {
                    ops::auth::signup_student(
                        &ctx.qc,
                        &ctx.services.auth,
                        &ctx.auth_store,
                        &StudentSignup {
                            name,
                            email,
                            password,
                            institution_id,
                        },
                    )
                    .await?
                }
                SignupCommand::Company {
                    name,
                    email,
                    password,
                } => {
                    ops::auth::signup_company(
                        &ctx.qc,
                        &ctx.services.auth,
                        &ctx.auth_store,
                        &CompanySignup {
                            name,
                            email,
                            password,
                        },
                    )
                    .await?
                }
            };
            println!("account created; dashboard: {}", route.path());
        }
        Command::Logout => {
            ops::auth::logout(&ctx.qc, &ctx.services.auth, &ctx.auth_store).await?;
            println!("logged out");
        }
        Command::Me => {
            let state = ctx.auth_store.state().await;
            match state.user {
                Some(user) => print_json(&user)?,
                None => println!("not logged in"),
            }
        }
        Command::Balance => match ctx.role().await? {
            Role::Student => {
                let balance = ops::student::balance(&ctx.qc, &ctx.services.student).await?;
                println!("{} coins", balance.coins);
            }
            Role::Professor => {
                let balance = ops::professor::balance(&ctx.qc, &ctx.services.professor).await?;
                println!("{} coins", balance.coins);
            }
            Role::Company => {
                return Err(AppError::Usage(
                    "companies do not hold a coin balance".to_string(),
                ));
            }
        },
        Command::Transactions => match ctx.role().await? {
            Role::Student => {
                print_json(&ops::student::transactions(&ctx.qc, &ctx.services.student).await?)?;
            }
            Role::Professor => {
                print_json(
                    &ops::professor::transactions(&ctx.qc, &ctx.services.professor).await?,
                )?;
            }
            Role::Company => {
                return Err(AppError::Usage(
                    "companies have no transaction history".to_string(),
                ));
            }
        },
        Command::Statistics => match ctx.role().await? {
            Role::Student => {
                print_json(&ops::student::statistics(&ctx.qc, &ctx.services.student).await?)?;
            }
            Role::Professor => {
                print_json(&ops::professor::statistics(&ctx.qc, &ctx.services.professor).await?)?;
            }
            Role::Company => {
                print_json(&ops::company::statistics(&ctx.qc, &ctx.services.company).await?)?;
            }
        },
        Command::Redeem { reward_id } => {
            require_role(ctx, Role::Student, "only students redeem rewards").await?;
            let res =
                ops::student::redeem(&ctx.qc, &ctx.services.student, &RedeemRequest { reward_id })
                    .await?;
            ctx.ui_store
                .add_notification(format!("coupon {} issued", res.coupon.code))
                .await;
            print_json(&res.coupon)?;
        }
        Command::Coupons => {
            require_role(ctx, Role::Student, "only students hold coupons").await?;
            print_json(&ops::student::coupons(&ctx.qc, &ctx.services.student).await?)?;
        }
        Command::Rewards { id } => match id {
            Some(id) => {
                print_json(&ops::marketplace::reward(&ctx.qc, &ctx.services.marketplace, id).await?)?;
            }
            None => {
                print_json(&ops::marketplace::rewards(&ctx.qc, &ctx.services.marketplace).await?)?;
            }
        },
        Command::Institutions => {
            print_json(&ops::marketplace::institutions(&ctx.qc, &ctx.services.marketplace).await?)?;
        }
        Command::Give {
            student_id,
            amount,
            message,
        } => {
            require_role(ctx, Role::Professor, "only professors grant coins").await?;
            let tx = ops::professor::give(
                &ctx.qc,
                &ctx.services.professor,
                &GiveCoins {
                    student_id,
                    amount,
                    message,
                },
            )
            .await?;
            ctx.ui_store
                .add_notification(format!("gave {amount} coins to student {student_id}"))
                .await;
            print_json(&tx)?;
        }
        Command::Reward(cmd) => {
            require_role(ctx, Role::Company, "only companies manage rewards").await?;
            run_reward(ctx, cmd).await?;
        }
        Command::Notifications(cmd) => {
            let api = match ctx.role().await? {
                Role::Student => ctx.services.student.notifications(),
                Role::Professor => ctx.services.professor.notifications(),
                Role::Company => ctx.services.company.notifications(),
            };
            match cmd {
                NotificationsCommand::List => {
                    print_json(&ops::notifications::list(&ctx.qc, &api).await?)?;
                }
                NotificationsCommand::Read { id } => {
                    print_json(&ops::notifications::mark_read(&ctx.qc, &api, id).await?)?;
                }
                NotificationsCommand::ReadAll => {
                    ops::notifications::mark_all_read(&ctx.qc, &api).await?;
                    println!("all notifications marked read");
                }
                NotificationsCommand::Unread => {
                    let unread = ops::notifications::unread_count(&ctx.qc, &api).await?;
                    println!("{} unread", unread.count);
                }
            }
        }
        Command::Prefs { theme, sidebar } => {
            if let Some(theme) = theme {
                ctx.ui_store.set_theme(parse_theme(&theme)?).await?;
            }
            if let Some(open) = sidebar {
                ctx.ui_store.set_sidebar(open).await?;
            }
            let state = ctx.ui_store.state().await;
            println!("theme: {:?}, sidebar: {}", state.theme, state.sidebar_open);
        }
    }

    Ok(())
}

async fn run_reward(ctx: &Context, cmd: RewardCommand) -> Result<()> {
    match cmd {
        RewardCommand::Create {
            name,
            description,
            cost,
            category,
        } => {
            let reward = ops::company::create_reward(
                &ctx.qc,
                &ctx.services.company,
                &RewardNew {
                    name,
                    description,
                    cost,
                    category,
                },
            )
            .await?;
            print_json(&reward)?;
        }
        RewardCommand::Update {
            id,
            name,
            description,
            cost,
            category,
        } => {
            let reward = ops::company::update_reward(
                &ctx.qc,
                &ctx.services.company,
                id,
                &RewardUpdate {
                    name,
                    description,
                    cost,
                    category,
                },
            )
            .await?;
            print_json(&reward)?;
        }
        RewardCommand::Delete { id } => {
            ops::company::delete_reward(&ctx.qc, &ctx.services.company, id).await?;
            println!("reward {id} deleted");
        }
        RewardCommand::Status { id, active } => {
            let reward = ops::company::set_reward_status(
                &ctx.qc,
                &ctx.services.company,
                id,
                &RewardStatusUpdate { active },
            )
            .await?;
            print_json(&reward)?;
        }
        RewardCommand::Image { id, path } => {
            let bytes = fs::read(&path)?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("image.bin")
                .to_string();
            let mime = mime_for(&file_name);
            let reward = ops::company::upload_reward_image(
                &ctx.qc,
                &ctx.services.company,
                id,
                &file_name,
                bytes,
                mime,
            )
            .await?;
            print_json(&reward)?;
        }
        RewardCommand::Validate { code } => {
            let res = ops::company::validate_coupon(
                &ctx.qc,
                &ctx.services.company,
                &ValidateCouponRequest { code },
            )
            .await?;
            print_json(&res)?;
        }
    }
    Ok(())
}

async fn require_role(ctx: &Context, expected: Role, hint: &str) -> Result<()> {
    if ctx.role().await? == expected {
        Ok(())
    } else {
        Err(AppError::Usage(hint.to_string()))
    }
}

fn parse_theme(raw: &str) -> Result<Theme> {
    match raw {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        "system" => Ok(Theme::System),
        other => Err(AppError::Usage(format!(
            "unknown theme {other:?}; expected light, dark or system"
        ))),
    }
}

fn mime_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
