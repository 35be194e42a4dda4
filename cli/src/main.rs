//! Command-line front end for the classroom API.
//!
//! Each invocation builds one [`SessionContext`], optionally logs in with
//! `--email`/`--password` (or reuses `--cookie`), runs one command and prints
//! JSON. Server messages are printed verbatim on failure.

use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use classroom::config::{ClientConfig, ConfigError};
use classroom::forms::{
    ClassForm, ForgotPasswordForm, FormError, JoinClassForm, ResetPasswordForm, ResourceForm, TaskForm,
};
use classroom::list::{
    ClassSource, ListController, ListSource, NotificationSource, RemoveSource, SEARCH_KEY, SearchMode, TaskSource,
    UserSource,
};
use classroom::net::transport::TransportBuildError;
use classroom::net::types::{Priority, Role, TaskStatus};
use classroom::net::{ApiClient, ApiError, HttpTransport};
use classroom::poller::UnreadPoller;
use classroom::session::SessionContext;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not build http client: {0}")]
    Transport(#[from] TransportBuildError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("{0}")]
    Fetch(String),
    #[error("--email and --password must be given together")]
    PartialCredentials,
    #[error("delete was not confirmed")]
    NotConfirmed,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "classroom-cli", about = "Classroom task manager CLI")]
struct Cli {
    /// Server root; `/api` is appended.
    #[arg(long, env = "CLASSROOM_API_ROOT")]
    api_root: Option<String>,

    #[arg(long, env = "CLASSROOM_EMAIL")]
    email: Option<String>,

    #[arg(long, env = "CLASSROOM_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Raw `Cookie` header from an existing browser session.
    #[arg(long, env = "CLASSROOM_COOKIE", hide_env_values = true, conflicts_with = "email")]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the logged-in user, or `null`.
    Whoami,
    Tasks(TasksCommand),
    Classes(ClassesCommand),
    Notifications(NotificationsCommand),
    Admin(AdminCommand),
    Auth(AuthCommand),
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args, Debug)]
struct TasksCommand {
    #[command(subcommand)]
    command: TasksSubcommand,
}

#[derive(Subcommand, Debug)]
enum TasksSubcommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        class_id: Option<String>,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// `YYYY-MM-DD`
        #[arg(long, default_value = "")]
        due_date: String,
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long)]
        class_id: Option<String>,
        #[arg(long)]
        assignee_id: Option<String>,
    },
    Status {
        id: String,
        status: TaskStatus,
    },
    Delete {
        id: String,
    },
    Stats,
}

#[derive(Args, Debug)]
struct ClassesCommand {
    #[command(subcommand)]
    command: ClassesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ClassesSubcommand {
    List {
        #[arg(long)]
        search: Option<String>,
        /// Send the search to the server instead of filtering locally.
        #[arg(long, default_value_t = false)]
        server_search: bool,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Join {
        invite_code: String,
    },
    Members {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct NotificationsCommand {
    #[command(subcommand)]
    command: NotificationsSubcommand,
}

#[derive(Subcommand, Debug)]
enum NotificationsSubcommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = false)]
        unread_only: bool,
    },
    Unread,
    Read {
        id: String,
    },
    ReadAll,
    /// Print the unread count whenever it changes, until interrupted.
    Watch {
        #[arg(long)]
        every_secs: Option<u64>,
    },
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Users {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        role: Option<Role>,
    },
    Stats,
    Role {
        id: String,
        role: Role,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    Verify { code: String },
    Forgot { email: String },
    Reset {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(root) = cli.api_root {
        config = ClientConfig { api_root: ClientConfig::with_root(root)?.api_root, ..config };
    }
    let api = match cli.cookie.as_deref() {
        Some(cookie) => ApiClient::new(Arc::new(HttpTransport::with_cookie(&config.api_base(), cookie)?)),
        None => ApiClient::from_config(&config)?,
    };

    let mut session = SessionContext::new(api.clone());
    match (cli.email.as_deref(), cli.password.as_deref()) {
        (Some(email), Some(password)) => {
            session.login(email, password).await?;
        }
        (None, None) => {}
        _ => return Err(CliError::PartialCredentials),
    }

    match cli.command {
        Command::Whoami => print_json(&api.me().await?),
        Command::Tasks(tasks) => run_tasks(&api, &config, tasks).await,
        Command::Classes(classes) => run_classes(&api, &config, classes).await,
        Command::Notifications(n) => run_notifications(&api, &config, n).await,
        Command::Admin(admin) => run_admin(&api, &config, admin).await,
        Command::Auth(auth) => run_auth(&session, auth).await,
    }
}

async fn run_tasks(api: &ApiClient, config: &ClientConfig, tasks: TasksCommand) -> Result<(), CliError> {
    match tasks.command {
        TasksSubcommand::List { page, status, priority, class_id } => {
            let mut list = ListController::from_config(TaskSource::new(api.clone()), config);
            list.set_filter("status", &status.map(|s| s.to_string()).unwrap_or_default());
            list.set_filter("priority", &priority.map(|p| p.to_string()).unwrap_or_default());
            list.set_filter("class_id", class_id.as_deref().unwrap_or_default());
            apply_page(&mut list, &page);
            print_page(&mut list).await
        }
        TasksSubcommand::Create { title, description, due_date, priority, class_id, assignee_id } => {
            let mut form = TaskForm::blank();
            form.title = title;
            form.description = description;
            form.due_date = due_date;
            form.select_priority(priority);
            form.select_class(class_id.as_deref());
            form.select_assignee(assignee_id.as_deref());
            form.validate(None).map_err(FormError::from)?;
            form.submit(api, None).await?;
            print_json(&json!({ "message": "Assignment created" }))
        }
        TasksSubcommand::Status { id, status } => {
            let mut list = ListController::from_config(TaskSource::new(api.clone()), config);
            list.set_task_status(&id, status).await?;
            print_json(&json!({ "id": id, "status": status }))
        }
        TasksSubcommand::Delete { id } => {
            let mut list = ListController::from_config(TaskSource::new(api.clone()), config);
            delete(&mut list, &id).await
        }
        TasksSubcommand::Stats => print_json(&api.task_stats().await?),
    }
}

async fn run_classes(api: &ApiClient, config: &ClientConfig, classes: ClassesCommand) -> Result<(), CliError> {
    match classes.command {
        ClassesSubcommand::List { search, server_search } => {
            let mode = if server_search { SearchMode::Server } else { SearchMode::ClientSide };
            let mut list = ListController::from_config(ClassSource::new(api.clone(), mode), config);
            list.set_filter(SEARCH_KEY, search.as_deref().unwrap_or_default());
            print_page(&mut list).await
        }
        ClassesSubcommand::Create { name, description } => {
            let form = ClassForm { name, description };
            form.validate(None).map_err(FormError::from)?;
            form.submit(api, None).await?;
            print_json(&json!({ "message": "Class created" }))
        }
        ClassesSubcommand::Join { invite_code } => {
            let joined = JoinClassForm { invite_code }.submit(api).await?;
            print_json(&joined)
        }
        ClassesSubcommand::Members { id } => print_json(&api.class_members(&id).await?),
        ClassesSubcommand::Delete { id } => {
            let mut list = ListController::from_config(ClassSource::new(api.clone(), SearchMode::default()), config);
            delete(&mut list, &id).await
        }
    }
}

async fn run_notifications(
    api: &ApiClient,
    config: &ClientConfig,
    notifications: NotificationsCommand,
) -> Result<(), CliError> {
    match notifications.command {
        NotificationsSubcommand::List { page, unread_only } => {
            let mut list = ListController::from_config(NotificationSource::new(api.clone()), config);
            if unread_only {
                list.set_filter("unread_only", "true");
            }
            list.set_page(page);
            print_page(&mut list).await
        }
        NotificationsSubcommand::Unread => print_json(&json!({ "unreadCount": api.unread_count().await? })),
        NotificationsSubcommand::Read { id } => {
            api.mark_notification_read(&id).await?;
            print_json(&json!({ "id": id, "isRead": true }))
        }
        NotificationsSubcommand::ReadAll => {
            let env = api.mark_all_notifications_read().await?;
            print_json(&json!({ "message": env.message }))
        }
        NotificationsSubcommand::Watch { every_secs } => {
            let every = every_secs.map_or(config.notification_poll, Duration::from_secs);
            watch_unread(api, every).await
        }
    }
}

async fn run_admin(api: &ApiClient, config: &ClientConfig, admin: AdminCommand) -> Result<(), CliError> {
    match admin.command {
        AdminSubcommand::Users { page, role } => {
            let mut list = ListController::from_config(UserSource::new(api.clone()), config);
            list.set_filter("role", &role.map(|r| r.to_string()).unwrap_or_default());
            apply_page(&mut list, &page);
            print_page(&mut list).await
        }
        AdminSubcommand::Stats => print_json(&api.admin_stats().await?),
        AdminSubcommand::Role { id, role } => {
            let mut list = ListController::from_config(UserSource::new(api.clone()), config);
            list.change_role(&id, role).await?;
            print_json(&json!({ "id": id, "role": role }))
        }
        AdminSubcommand::Delete { id } => {
            let mut list = ListController::from_config(UserSource::new(api.clone()), config);
            delete(&mut list, &id).await
        }
    }
}

async fn run_auth(session: &SessionContext, auth: AuthCommand) -> Result<(), CliError> {
    let message = match auth.command {
        AuthSubcommand::Verify { code } => session.verify_email(&code).await?,
        AuthSubcommand::Forgot { email } => {
            ForgotPasswordForm { email }.submit(session).await?
        }
        AuthSubcommand::Reset { token, password } => {
            let form = ResetPasswordForm { token, confirm_password: password.clone(), password };
            form.submit(session).await?
        }
    };
    print_json(&json!({ "message": message }))
}

// =============================================================================
// HELPERS
// =============================================================================

/// Call after other filters; changing a filter resets the page.
fn apply_page<S: ListSource>(list: &mut ListController<S>, args: &PageArgs) {
    list.set_filter(SEARCH_KEY, args.search.as_deref().unwrap_or_default());
    list.set_page(args.page);
}

async fn print_page<S>(list: &mut ListController<S>) -> Result<(), CliError>
where
    S: ListSource,
    S::Item: Serialize,
{
    list.refresh().await;
    if let Some(error) = list.error() {
        return Err(CliError::Fetch(error.to_owned()));
    }
    print_json(&json!({ "items": list.items(), "pagination": list.pagination() }))
}

async fn delete<S: RemoveSource>(list: &mut ListController<S>, id: &str) -> Result<(), CliError> {
    list.request_delete(id);
    if !list.confirm_delete(id).await? {
        return Err(CliError::NotConfirmed);
    }
    print_json(&json!({ "message": list.banners().success() }))
}

async fn watch_unread(api: &ApiClient, every: Duration) -> Result<(), CliError> {
    let poller = UnreadPoller::spawn(api.clone(), every);
    let mut count = poller.subscribe();
    println!("{}", *count.borrow_and_update());
    loop {
        tokio::select! {
            changed = count.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                println!("{}", *count.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("watch interrupted");
                poller.stop();
                return Ok(());
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
