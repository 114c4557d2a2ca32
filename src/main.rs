use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use phd_client::{ApiVersion, Config, Reader};
use serde::Serialize;

/// phd - portal HTTP database client
///
/// Read-only access to blockchains, applications, load balancers and pay plans.
///
/// Connection settings can also be given through PHD_* environment variables.
///
/// Examples:
///   phd blockchains
///   phd load-balancers --user 42 --role admin
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the database API [env: PHD_BASE_URL]
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// API key sent in the Authorization header [env: PHD_API_KEY]
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// API version, v1 when unset [env: PHD_API_VERSION]
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Retries after a transport error or 5xx response [env: PHD_RETRIES]
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Deadline for each call in milliseconds, retries included [env: PHD_TIMEOUT_MS]
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List blockchains
    Blockchains,

    /// Show one blockchain
    Blockchain { id: String },

    /// List applications
    Applications {
        /// Only applications owned by this user
        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,
    },

    /// Show one application
    Application { id: String },

    /// List load balancers
    LoadBalancers {
        /// Only load balancers this user belongs to
        #[arg(long, value_name = "USER_ID")]
        user: Option<String>,

        /// Filter by the user's role (owner, admin, member); requires --user
        #[arg(long, requires = "user")]
        role: Option<String>,
    },

    /// Show one load balancer
    LoadBalancer { id: String },

    /// List pay plans
    PayPlans,

    /// Show one pay plan
    PayPlan {
        #[arg(value_name = "TYPE")]
        plan_type: String,
    },
}

impl Cli {
    /// Applies the command-line flags on top of `base`.
    fn config(&self, mut base: Config) -> Config {
        if let Some(base_url) = &self.base_url {
            base.base_url = base_url.clone();
        }
        if let Some(api_key) = &self.api_key {
            base.api_key = api_key.clone();
        }
        if let Some(version) = &self.api_version {
            base.version = version.clone();
        } else if base.version.is_empty() {
            base.version = ApiVersion::V1.to_string();
        }
        if let Some(retries) = self.retries {
            base.retries = retries;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            base.timeout = Duration::from_millis(timeout_ms);
        }
        base
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", json);
    Ok(())
}

async fn run(reader: &dyn Reader, command: Commands) -> Result<()> {
    match command {
        Commands::Blockchains => print_json(&reader.blockchains().await?),
        Commands::Blockchain { id } => print_json(&reader.blockchain(&id).await?),
        Commands::Applications { user: None } => print_json(&reader.applications().await?),
        Commands::Applications { user: Some(user) } => {
            print_json(&reader.user_applications(&user).await?)
        }
        Commands::Application { id } => print_json(&reader.application(&id).await?),
        Commands::LoadBalancers { user: None, .. } => print_json(&reader.load_balancers().await?),
        Commands::LoadBalancers {
            user: Some(user),
            role,
        } => print_json(&reader.user_load_balancers(&user, role.as_deref()).await?),
        Commands::LoadBalancer { id } => print_json(&reader.load_balancer(&id).await?),
        Commands::PayPlans => print_json(&reader.pay_plans().await?),
        Commands::PayPlan { plan_type } => print_json(&reader.pay_plan(&plan_type).await?),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = cli.config(Config::from_env().context("Invalid environment configuration")?);
    let reader = phd_client::new_read_only(&config).context("Invalid client configuration")?;
    run(reader.as_ref(), cli.command).await
}
