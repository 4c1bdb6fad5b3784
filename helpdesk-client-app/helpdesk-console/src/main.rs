mod app;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use helpdesk_core::{Credentials, RegisterData, TicketFilter, TicketStatus};
use helpdesk_shared::config::AppConfig;
use helpdesk_shared::constants::{DEFAULT_PAGE_SIZE, HOME_ROUTE};
use helpdesk_shared::Pagination;

use app::App;

#[derive(Parser)]
#[command(name = "helpdesk-console")]
#[command(about = "Console client for the helpdesk portal", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Preferred response language, falls back to the configured default
    #[arg(long, global = true, env = "HELPDESK_LOCALE")]
    locale: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "HELPDESK_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Exchange the stored refresh token for a new token pair
    Refresh,
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List tickets
    Tickets {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
        /// open, in_progress, pending, resolved or closed
        #[arg(long)]
        status: Option<TicketStatus>,
    },
    /// Show one ticket
    Ticket { id: i64 },
    /// Upload a file to a ticket
    Attach { id: i64, path: std::path::PathBuf },
    /// Save a ticket attachment to a file
    Download {
        id: i64,
        attachment_id: i64,
        out: std::path::PathBuf,
    },
    /// Show the agent dashboard summary
    Dashboard,
    /// Navigate to a portal route through its guards
    Open { route: String },
    /// Print realtime events until Ctrl+C
    Listen {
        /// Event names to subscribe to. All events when empty.
        events: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = helpdesk_shared::telemetry::init_telemetry(&config.logging)?;
    info!("Helpdesk console starting ({})", config.app.env);

    let app = App::build(config, cli.locale.as_deref())?;
    let result = run(&app, cli.command).await;

    for toast in app.toasts.active() {
        eprintln!("[{:?}] {}", toast.severity, toast.message);
    }

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            let user = app.session.login(Credentials::new(email, password)).await?;
            println!("Signed in as {} ({})", user.full_name(), user.role);
            app.routes.navigate(HOME_ROUTE);
        }
        Commands::Register {
            email,
            password,
            first_name,
            last_name,
        } => {
            let user = app
                .session
                .register(RegisterData {
                    email: email.trim().to_string(),
                    password,
                    first_name,
                    last_name,
                })
                .await?;
            println!("Registered {} ({})", user.email, user.role);
            app.routes.navigate(HOME_ROUTE);
        }
        Commands::Refresh => {
            let user = app.session.refresh().await?;
            println!("Tokens refreshed for {}", user.email);
        }
        Commands::Logout => {
            app.session.logout();
            println!("Signed out");
        }
        Commands::Whoami => match app.session.current_user() {
            Some(user) => {
                let state = if app.session.is_authenticated() { "active" } else { "expired" };
                println!("{} <{}> role={} token={}", user.full_name(), user.email, user.role, state);
            }
            None => println!("Not signed in"),
        },
        Commands::Tickets { page, limit, status } => {
            guard(app, "/portal/tickets")?;
            let filter = TicketFilter {
                pagination: Pagination::new(page, limit),
                status,
            };
            let result = app.tickets.list(&filter).await?;
            for ticket in &result.items {
                println!(
                    "#{:<6} {:<12} {:<8} {}",
                    ticket.id,
                    ticket.status.as_str(),
                    format!("{:?}", ticket.priority).to_lowercase(),
                    ticket.subject
                );
            }
            println!("page {} ({} of {})", result.page, result.items.len(), result.total);
        }
        Commands::Ticket { id } => {
            guard(app, &format!("/portal/tickets/{}", id))?;
            let ticket = app.tickets.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&ticket)?);
        }
        Commands::Attach { id, path } => {
            guard(app, &format!("/portal/tickets/{}", id))?;
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());
            let attachment = app.tickets.attach(id, &file_name, bytes).await?;
            println!("Uploaded {} as attachment {}", attachment.file_name, attachment.id);
        }
        Commands::Download { id, attachment_id, out } => {
            guard(app, &format!("/portal/tickets/{}", id))?;
            let bytes = app.tickets.download_attachment(id, attachment_id).await?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            println!("Saved {} bytes to {}", bytes.len(), out.display());
        }
        Commands::Dashboard => {
            feature(app, "analytics")?;
            guard(app, "/agent/dashboard")?;
            let summary = app.analytics.dashboard().await?;
            println!("open:           {}", summary.open_tickets);
            println!("pending:        {}", summary.pending_tickets);
            println!("resolved today: {}", summary.resolved_today);
            if let Some(minutes) = summary.average_response_minutes {
                println!("avg response:   {:.1} min", minutes);
            }
        }
        Commands::Open { route } => {
            let allowed = app.routes.navigate(&route);
            println!("{} -> {}", route, app.history.current());
            if !allowed {
                bail!("Navigation to {} was redirected", route);
            }
        }
        Commands::Listen { events } => {
            feature(app, "chat")?;
            guard(app, "/portal/chat")?;
            listen(app, events).await?;
        }
    }
    Ok(())
}

fn guard(app: &App, route: &str) -> anyhow::Result<()> {
    if !app.routes.navigate(route) {
        bail!("Access to {} denied, redirected to {}", route, app.history.current());
    }
    Ok(())
}

fn feature(app: &App, name: &str) -> anyhow::Result<()> {
    if !app.config.is_feature_enabled(name) {
        bail!("The {} feature is disabled", name);
    }
    Ok(())
}

async fn listen(app: &App, events: Vec<String>) -> anyhow::Result<()> {
    let handle = app.realtime.ensure_connected().await?;

    if events.is_empty() {
        let mut messages = handle.messages();
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                message = messages.recv() => match message {
                    Ok(event) => println!("{} {}", event.event, event.data),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        info!("Skipped {} realtime events", n)
                    }
                    Err(_) => break,
                },
                _ = closed(app) => break,
            }
        }
    } else {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        for name in events {
            let mut receiver = handle.on(&name);
            let tx = tx.clone();
            tokio::spawn(async move {
                while let Ok(data) = receiver.recv().await {
                    if tx.send((name.clone(), data)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                message = rx.recv() => match message {
                    Some((name, data)) => println!("{} {}", name, data),
                    None => break,
                },
                _ = closed(app) => break,
            }
        }
    }

    app.realtime.disconnect().await;
    Ok(())
}

/// Resolves once the realtime connection has gone away.
async fn closed(app: &App) {
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
    loop {
        ticker.tick().await;
        if !app.realtime.is_connected().await {
            info!("Realtime connection closed");
            return;
        }
    }
}
