
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use imarabima_admin::app::{App, AppError, History, Route};
use imarabima_admin::config::{AdminConfig, ConfigError};
use imarabima_admin::net::ApiError;
use imarabima_admin::net::types::{
    CreatePolicyRequest, CreateProductRequest, CreateUserRequest, LoginRequest, PolicyStatus,
    ProductType, UpdatePolicyRequest, UpdateProductRequest, UpdateUserRequest, UserQuery,
};
use imarabima_admin::pages::policies::{PoliciesPage, PolicyForm, status_tone};
use imarabima_admin::pages::{LoadState, dashboard, products, users};
use imarabima_admin::state::session::SessionError;
use imarabima_admin::state::storage::{FileStorage, StorageError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    App(#[from] AppError),
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
    #[error("{}", .0.user_message())]
    Session(#[from] SessionError),
    #[error("not signed in; run `imarabima-admin login` first")]
    NotSignedIn,
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("{0}")]
    Page(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "imarabima-admin", about = "ImaraBima insurance administration CLI")]
struct Cli {
    /// Overrides IMARABIMA_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    /// Overrides IMARABIMA_STORAGE_PATH.
    #[arg(long)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long, env = "IMARABIMA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Users(UsersCommand),
    Products(ProductsCommand),
    Policies(PoliciesCommand),
    Dashboard(DashboardCommand),
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value = "")]
        search: String,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
    Toggle {
        id: String,
    },
}

#[derive(Args, Debug)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProductsSubcommand {
    List {
        #[arg(long = "type", value_parser = parse_product_type)]
        product_type: Option<ProductType>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
    Toggle {
        id: String,
    },
}

#[derive(Args, Debug)]
struct PoliciesCommand {
    #[command(subcommand)]
    command: PoliciesSubcommand,
}

#[derive(Subcommand, Debug)]
enum PoliciesSubcommand {
    List {
        #[arg(long)]
        status: Option<PolicyStatus>,
        /// Policy number, holder name or product name.
        #[arg(long, default_value = "")]
        search: String,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
    Status {
        id: String,
        status: PolicyStatus,
    },
}

#[derive(Args, Debug)]
struct DashboardCommand {
    #[command(subcommand)]
    command: DashboardSubcommand,
}

#[derive(Subcommand, Debug)]
enum DashboardSubcommand {
    Stats,
    Revenue,
    PolicyStatus,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = AdminConfig::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_owned();
    }
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }

    let storage = Arc::new(FileStorage::open(config.storage_path.clone())?);
    let app = App::new(&config, storage, Arc::new(History::new()))?;
    app.start().await;

    match cli.command {
        Command::Login { phone, password } => run_login(&app, phone, password).await,
        Command::Logout => {
            app.session().logout().await;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&app),
        Command::Users(cmd) => run_users(&app, cmd).await,
        Command::Products(cmd) => run_products(&app, cmd).await,
        Command::Policies(cmd) => run_policies(&app, cmd).await,
        Command::Dashboard(cmd) => run_dashboard(&app, cmd).await,
    }
}

async fn run_login(app: &App, phone: String, password: String) -> Result<(), CliError> {
    let credentials = LoginRequest { phone_number: phone, password };
    let user = app.session().login(&credentials).await?;
    print_json(&user)
}

fn run_whoami(app: &App) -> Result<(), CliError> {
    let session = app.session().snapshot();
    print_json(&json!({
        "authenticated": session.is_authenticated(),
        "phase": format!("{:?}", session.phase),
        "user": session.user,
    }))
}

/// Pass the route gate for `route` or fail.
fn require(app: &App, route: Route) -> Result<(), CliError> {
    match app.open(route.path()) {
        Some(opened) if opened == route => Ok(()),
        _ => Err(CliError::NotSignedIn),
    }
}

async fn run_users(app: &App, cmd: UsersCommand) -> Result<(), CliError> {
    require(app, Route::Users)?;
    let client = app.client();
    match cmd.command {
        UsersSubcommand::List { page, limit, search } => {
            let query = UserQuery { page, limit, search };
            print_json(&loaded(users::load(client, &query).await)?)
        }
        UsersSubcommand::Get { id } => print_json(&client.users().get(&id).await?),
        UsersSubcommand::Create { data } => {
            let body: CreateUserRequest = parse_data(&data)?;
            users::validate_new_user(&body).map_err(CliError::Invalid)?;
            print_json(&client.users().create(&body).await?)
        }
        UsersSubcommand::Update { id, data } => {
            let body: UpdateUserRequest = parse_data(&data)?;
            print_json(&client.users().update(&id, &body).await?)
        }
        UsersSubcommand::Delete { id } => {
            client.users().delete(&id).await?;
            println!("deleted user {id}");
            Ok(())
        }
        UsersSubcommand::Toggle { id } => print_json(&users::toggle_status(client, &id).await?),
    }
}

async fn run_products(app: &App, cmd: ProductsCommand) -> Result<(), CliError> {
    require(app, Route::Products)?;
    let client = app.client();
    match cmd.command {
        ProductsSubcommand::List { product_type } => {
            print_json(&loaded(products::load(client, product_type).await)?)
        }
        ProductsSubcommand::Get { id } => print_json(&client.products().get(&id).await?),
        ProductsSubcommand::Create { data } => {
            let body: CreateProductRequest = parse_data(&data)?;
            products::validate_product(&body).map_err(CliError::Invalid)?;
            print_json(&client.products().create(&body).await?)
        }
        ProductsSubcommand::Update { id, data } => {
            let body: UpdateProductRequest = parse_data(&data)?;
            print_json(&client.products().update(&id, &body).await?)
        }
        ProductsSubcommand::Delete { id } => {
            client.products().delete(&id).await?;
            println!("deleted product {id}");
            Ok(())
        }
        ProductsSubcommand::Toggle { id } => print_json(&products::toggle_status(client, &id).await?),
    }
}

async fn run_policies(app: &App, cmd: PoliciesCommand) -> Result<(), CliError> {
    require(app, Route::Policies)?;
    let client = app.client();
    match cmd.command {
        PoliciesSubcommand::List { status, search } => {
            let mut page = PoliciesPage::new(status);
            page.fetch(client).await;
            if let Some(message) = page.error.take() {
                return Err(CliError::Page(message));
            }
            let matching = page.search(&search);
            for policy in &matching {
                eprintln!(
                    "{} {} ({:?}) {}",
                    policy.policy_number,
                    policy.status.as_str(),
                    status_tone(policy.status),
                    page.product_name(policy).unwrap_or("-"),
                );
            }
            print_json(&matching)
        }
        PoliciesSubcommand::Get { id } => print_json(&client.policies().get(&id).await?),
        PoliciesSubcommand::Create { data } => {
            let body: CreatePolicyRequest = parse_data(&data)?;
            let form = PolicyForm {
                product_id: body.product_id.clone(),
                premium_amount: body.premium_amount,
                sum_assured: body.sum_assured,
                payment_frequency: body.payment_frequency,
            };
            form.validate().map_err(CliError::Invalid)?;
            print_json(&client.policies().create(&body).await?)
        }
        PoliciesSubcommand::Update { id, data } => {
            let body: UpdatePolicyRequest = parse_data(&data)?;
            print_json(&client.policies().update(&id, &body).await?)
        }
        PoliciesSubcommand::Delete { id } => {
            let mut page = PoliciesPage::new(None);
            page.delete(client, &id).await.map_err(|e| page_failure(&page, e))?;
            println!("deleted policy {id}");
            Ok(())
        }
        PoliciesSubcommand::Status { id, status } => {
            let mut page = PoliciesPage::new(None);
            page.update_status(client, &id, status).await.map_err(|e| page_failure(&page, e))?;
            match page.policies.iter().find(|p| p.id == id) {
                Some(policy) => print_json(policy),
                None => {
                    println!("policy {id} is now {}", status.as_str());
                    Ok(())
                }
            }
        }
    }
}

async fn run_dashboard(app: &App, cmd: DashboardCommand) -> Result<(), CliError> {
    require(app, Route::Dashboard)?;
    let client = app.client();
    match cmd.command {
        DashboardSubcommand::Stats => {
            let view = loaded(dashboard::load(client).await)?;
            if view.development_mode {
                eprintln!("{}", dashboard::DEVELOPMENT_BANNER);
            }
            for card in &view.cards {
                match card.change {
                    Some(change) => eprintln!("{}: {} ({change:+.1}%)", card.name, card.value),
                    None => eprintln!("{}: {}", card.name, card.value),
                }
            }
            print_json(&view.stats)
        }
        DashboardSubcommand::Revenue => {
            let (revenue, _) = dashboard::load_charts(client).await?;
            print_json(&revenue)
        }
        DashboardSubcommand::PolicyStatus => {
            let (_, status) = dashboard::load_charts(client).await?;
            print_json(&status)
        }
    }
}

fn loaded<T>(state: LoadState<T>) -> Result<T, CliError> {
    match state {
        LoadState::Ready(value) => Ok(value),
        LoadState::Failed { message, .. } => Err(CliError::Page(message)),
        LoadState::Loading => Err(CliError::Page("still loading".to_owned())),
    }
}

/// Prefer the page's message (e.g. "Policy not found.") over the raw error.
fn page_failure(page: &PoliciesPage, error: ApiError) -> CliError {
    page.error.clone().map_or(CliError::Api(error), CliError::Page)
}

fn parse_product_type(raw: &str) -> Result<ProductType, String> {
    match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "funeral" => Ok(ProductType::Funeral),
        "boda_boda" => Ok(ProductType::BodaBoda),
        other => Err(format!("unknown product type: {other}")),
    }
}

fn parse_data<T: DeserializeOwned>(data: &str) -> Result<T, CliError> {
    Ok(serde_json::from_str(data)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
