//! Credalysis CLI
//!
//! Command-line client for the Credalysis backend:
//! - Sign in and out
//! - Ask the AI assistant, one-shot or interactively
//! - Manage financial goals and query the goal assistant
//! - List loans

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use credalysis::backend::BackendClient;
use credalysis::chat::ChatSession;
use credalysis::config::{generate_default_config, Config, LoggingConfig};
use credalysis::goals::GoalTracker;
use credalysis::loans::LoanBook;
use credalysis::models::{GoalDraft, Identity};
use credalysis::render::{
    render_blocks, render_goal_table, render_loan_table, render_message, render_transcript,
};
use credalysis::session::SessionStore;
use credalysis::AppError;

#[derive(Parser)]
#[command(name = "credalysis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Personal finance assistant: AI chat, goals and loans")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overriding the config file
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with your email
    Login {
        email: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in identity
    Whoami,

    /// Ask the AI assistant a single question
    Ask {
        query: Vec<String>,
    },

    /// Interactive chat with the AI assistant
    Chat,

    /// Manage financial goals
    Goals {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// List your loans
    Loans,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// List goals
    List,

    /// Add a goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        #[arg(short, long)]
        target: f64,
        /// Amount saved so far
        #[arg(short, long)]
        current: Option<f64>,
        /// High, Medium or Low
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long)]
        goal_type: Option<String>,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        target_date: Option<String>,
        #[arg(long)]
        required_monthly: Option<f64>,
        #[arg(long)]
        actual_monthly: Option<f64>,
    },

    /// Edit the goal at a list position
    Edit {
        /// Position as shown by `goals list`
        index: usize,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        target: Option<f64>,
        #[arg(short, long)]
        current: Option<f64>,
        #[arg(short, long)]
        priority: Option<String>,
        #[arg(long)]
        goal_type: Option<String>,
        #[arg(long)]
        target_date: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a goal by name
    Delete {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Ask the goal assistant to review your goals
    Review {
        /// Optional question
        question: Vec<String>,
    },

    /// General advice about your goals
    Advice,

    /// Analyze a what-if scenario
    Scenario {
        description: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }
    init_logging(&config.logging);

    let store = SessionStore::new(config.session.resolved_path());
    let backend = BackendClient::new(config.backend.client_config())
        .context("Failed to create backend client")?;
    tracing::debug!(backend = %backend.config().base_url, "Using backend");

    match cli.command {
        Commands::Login { email } => {
            let session = store.login(&email)?;
            println!(
                "Signed in as {}",
                session.email.as_deref().unwrap_or_default()
            );
        }

        Commands::Logout => {
            store.logout()?;
            println!("Signed out");
        }

        Commands::Whoami => match store.load()?.identity() {
            Some(identity) => println!("{}", identity),
            None => println!("Not signed in"),
        },

        Commands::Ask { query } => {
            let mut session = ChatSession::new(store.load()?.identity());
            session.set_input(query.join(" "));

            match session.submit(&backend).await {
                Ok(reply) => println!("{}", reply.text),
                Err(e) if e.is_silent() => {}
                Err(e) => anyhow::bail!(e),
            }
        }

        Commands::Chat => {
            let session = ChatSession::new(store.load()?.identity());
            let session = run_chat(session, &backend).await?;
            tracing::debug!(entries = session.transcript().len(), "Chat ended");
        }

        Commands::Goals { command } => {
            let identity = store.load()?.require_user().map_err(alert)?;
            run_goals(command, identity, &backend).await?;
        }

        Commands::Loans => {
            let mut book = LoanBook::new(store.load()?.identity());
            let loans = book.refresh(&backend).await.map_err(alert)?;
            println!("{}", render_loan_table(loans));
        }

        Commands::Config { output } => {
            let config = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("credalysis={}", config.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

/// Turn a page error into the message the user sees
fn alert(err: AppError) -> anyhow::Error {
    tracing::debug!(error = %err, "Request failed");
    anyhow::anyhow!(err.alert_message())
}

async fn run_chat(mut session: ChatSession, backend: &BackendClient) -> anyhow::Result<ChatSession> {
    println!("Ask Credalysis AI (empty line to skip, \"exit\" to quit)");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        session.set_input(line);
        match session.submit(backend).await {
            Ok(reply) => println!("{}", render_message(reply)),
            Err(e) if e.is_silent() => continue,
            Err(e) => anyhow::bail!(e),
        }
    }

    if !session.transcript().is_empty() {
        tracing::info!("Transcript:\n{}", render_transcript(session.transcript()));
    }
    Ok(session)
}

async fn run_goals(
    command: GoalCommands,
    identity: Identity,
    backend: &BackendClient,
) -> anyhow::Result<()> {
    let mut tracker = GoalTracker::new(Some(identity));

    match command {
        GoalCommands::List => {
            let goals = tracker.refresh(backend).await.map_err(alert)?;
            println!("{}", render_goal_table(goals));
        }

        GoalCommands::Add {
            name,
            target,
            current,
            priority,
            goal_type,
            target_date,
            required_monthly,
            actual_monthly,
        } => {
            tracker.new_goal = GoalDraft {
                goal_name: name,
                goal_type,
                target_amount: Some(target),
                current_amount: current,
                target_date,
                required_monthly_contribution: required_monthly,
                actual_monthly_contribution: actual_monthly,
                priority,
            };
            tracker.create(backend).await.map_err(alert)?;
            println!("{}", render_goal_table(tracker.goals()));
        }

        GoalCommands::Edit {
            index,
            name,
            target,
            current,
            priority,
            goal_type,
            target_date,
            status,
        } => {
            tracker.refresh(backend).await.map_err(alert)?;

            let draft = tracker.begin_edit(index).map_err(alert)?;
            if let Some(name) = name {
                draft.goal_name = name;
            }
            if let Some(target) = target {
                draft.target_amount = target;
            }
            if let Some(current) = current {
                draft.current_amount = current;
            }
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            if let Some(goal_type) = goal_type {
                draft.goal_type = goal_type;
            }
            if let Some(target_date) = target_date {
                draft.target_date = target_date;
            }
            if let Some(status) = status {
                draft.status = status;
            }

            tracker.save_edit(backend).await.map_err(alert)?;
            println!("{}", render_goal_table(tracker.goals()));
        }

        GoalCommands::Delete { name, yes } => {
            tracker.refresh(backend).await.map_err(alert)?;

            let deleted = tracker
                .delete(backend, &name, |prompt| yes || confirm(prompt))
                .await
                .map_err(alert)?;
            if deleted {
                println!("Deleted {}", name);
            }
        }

        GoalCommands::Review { question } => {
            tracker.assistant.question = question.join(" ");
            tracker.review(backend).await.map_err(alert)?;
            println!("{}", render_blocks(&tracker.assistant.visible_blocks()));
        }

        GoalCommands::Advice => {
            tracker.advice(backend).await.map_err(alert)?;
            println!("{}", render_blocks(&tracker.assistant.visible_blocks()));
        }

        GoalCommands::Scenario { description } => {
            tracker.assistant.scenario_description = description.join(" ");
            tracker.scenario(backend).await.map_err(alert)?;
            println!("{}", render_blocks(&tracker.assistant.visible_blocks()));
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}
