//! Xpensa CLI
//!
//! Command-line interface for the Xpensa API.
//!
//! `auth signup` and `auth login` print the session token; pass it back with
//! `--token` or `XPENSA_TOKEN` for every other command.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use xpensa_client::XpensaClient;
use xpensa_types::{Budget, Goal, TransactionId, TransactionQuery, TransactionSort};

#[derive(Parser)]
#[command(name = "xpensa")]
#[command(author, version, about = "Xpensa API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Xpensa API
    #[arg(long, env = "XPENSA_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Session token from signup or login
    #[arg(long, env = "XPENSA_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Signup, login and profile
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Transaction operations
    Tx {
        #[command(subcommand)]
        action: TxCommands,
    },
    /// Budget operations
    Budget {
        #[command(subcommand)]
        action: BudgetCommands,
    },
    /// Savings goal operations
    Goal {
        #[command(subcommand)]
        action: GoalCommands,
    },
    /// Show dashboard analytics
    Analytics,
    /// Show the financial health report
    Report,
    /// Ask the assistant a question
    Ask {
        query: String,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Register a new user
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and print a fresh token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Revoke the current token
    Logout,
    /// Show the current profile
    Me,
    /// Change the profile picture URL
    Picture {
        url: String,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    /// Record a transaction
    Add {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        category: String,
        /// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`; defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List transactions
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        /// newest, oldest, highest or lowest
        #[arg(long, value_parser = parse_sort)]
        sort: Option<TransactionSort>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID (UUID)
        id: String,
    },
    /// Total spent between two days, inclusive
    Total {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum BudgetCommands {
    /// Add a budget for a category
    Add {
        #[arg(long)]
        category: String,
        #[arg(long)]
        limit: f64,
    },
    /// List budgets
    List,
    /// Spending against each budget
    Status,
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Create or replace a goal by title
    Set {
        #[arg(long)]
        title: String,
        #[arg(long)]
        target: f64,
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        /// `YYYY-MM-DD`
        #[arg(long)]
        deadline: Option<NaiveDate>,
        #[arg(long)]
        complete: bool,
    },
    /// List goals
    List,
    /// Progress on each goal
    Status,
}

fn parse_sort(s: &str) -> Result<TransactionSort> {
    match s.to_lowercase().as_str() {
        "newest" => Ok(TransactionSort::Newest),
        "oldest" => Ok(TransactionSort::Oldest),
        "highest" => Ok(TransactionSort::Highest),
        "lowest" => Ok(TransactionSort::Lowest),
        _ => anyhow::bail!("Unknown sort: {}. Supported: newest, oldest, highest, lowest", s),
    }
}

fn parse_transaction_id(s: &str) -> Result<TransactionId> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid transaction ID: {}", s))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = XpensaClient::new(&cli.api_url);
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Health => {
            if client.health().await? {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Auth { action } => match action {
            AuthCommands::Signup {
                name,
                email,
                password,
            } => {
                let auth = client.signup(&name, &email, &password).await?;
                print_json(&auth)?;
            }
            AuthCommands::Login { email, password } => {
                let auth = client.login(&email, &password).await?;
                print_json(&auth)?;
            }
            AuthCommands::Logout => {
                client.logout().await?;
                println!("✓ Logged out");
            }
            AuthCommands::Me => print_json(&client.me().await?)?,
            AuthCommands::Picture { url } => print_json(&client.update_profile(&url).await?)?,
        },

        Commands::Tx { action } => match action {
            TxCommands::Add {
                amount,
                category,
                date,
            } => print_json(&client.add_transaction(amount, &category, date).await?)?,
            TxCommands::List {
                category,
                search,
                sort,
            } => {
                let query = TransactionQuery {
                    category,
                    search,
                    sort,
                };
                print_json(&client.list_transactions(&query).await?)?;
            }
            TxCommands::Delete { id } => {
                client.delete_transaction(parse_transaction_id(&id)?).await?;
                println!("✓ Transaction deleted");
            }
            TxCommands::Total { from, to, category } => {
                print_json(&client.total_spent(&from, &to, category).await?)?
            }
        },

        Commands::Budget { action } => match action {
            BudgetCommands::Add { category, limit } => {
                let budget = Budget::new(&category, limit)?;
                print_json(&client.add_budgets(vec![budget]).await?)?;
            }
            BudgetCommands::List => print_json(&client.budgets().await?)?,
            BudgetCommands::Status => print_json(&client.budget_status().await?)?,
        },

        Commands::Goal { action } => match action {
            GoalCommands::Set {
                title,
                target,
                current,
                deadline,
                complete,
            } => {
                let goal = Goal::new(&title, target, current, deadline, complete)?;
                print_json(&client.upsert_goals(vec![goal]).await?)?;
            }
            GoalCommands::List => print_json(&client.goals().await?)?,
            GoalCommands::Status => print_json(&client.goal_status().await?)?,
        },

        Commands::Analytics => print_json(&client.analytics().await?)?,
        Commands::Report => print_json(&client.health_report().await?)?,
        Commands::Ask { query } => println!("{}", client.ask(&query).await?.response),
    }

    Ok(())
}
