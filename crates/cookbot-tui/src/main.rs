use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use cookbot_core::{
    run_exchange, Collaborator, Config, Conversation, HealthMonitor, IntentRouter, ServiceClient,
    Speaker,
};
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "cookbot")]
#[command(about = "Cooking assistant that routes chat to recipe, shopping, and video agents")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the answer, ingredients, and recipe
    Ask {
        /// Your message, or a YouTube link
        message: String,
    },
    /// Check which agent services are reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        None => {
            // The TUI owns the terminal, so logs go to a file
            init_logging(Some(&config.log_path()?))?;
            run_tui(&config).await?
        }
        Some(Commands::Ask { message }) => {
            init_logging(None)?;
            ask(&config, &message).await?
        }
        Some(Commands::Health) => {
            init_logging(None)?;
            health(&config).await?
        }
    }

    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cookbot=info,cookbot_core=info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

async fn run_tui(config: &Config) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(config);
    let mut events = EventHandler::new();
    tracing::info!("Cookbot started");

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        app.poll_background();
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

async fn ask(config: &Config, message: &str) -> Result<()> {
    let router = IntentRouter::new(Arc::new(ServiceClient::from_config(config)));
    let mut conversation = Conversation::new();

    println!("🍳 {}", message.bold().cyan());
    if !run_exchange(&mut conversation, &router, message).await {
        println!("{}", "Nothing to send: the message is empty".yellow());
        return Ok(());
    }

    if let Some(answer) = conversation.turns().filter(|t| t.speaker == Speaker::Agent).last() {
        println!("\n{}", "Answer:".bold().green());
        println!("{}", answer.text);
    }

    if !conversation.ingredients().is_empty() {
        println!("\n{}", "Ingredients:".bold().blue());
        for ingredient in conversation.ingredients() {
            println!("  • {}", ingredient);
        }
    }

    if !conversation.recipe().is_empty() {
        println!("\n{}", "Recipe:".bold().magenta());
        for (i, step) in conversation.recipe().iter().enumerate() {
            println!("  {}. {}", (i + 1).to_string().bold(), step);
        }
    }

    Ok(())
}

async fn health(config: &Config) -> Result<()> {
    let client = Arc::new(ServiceClient::from_config(config));
    let monitor = HealthMonitor::new(client.clone());

    println!("\n{}", "🩺 Agent Services".bold().blue());
    println!("{}", "=".repeat(30).dimmed());

    let status = monitor.poll().await;
    for service in Collaborator::all() {
        let indicator = if status.get(service) {
            "● up".green()
        } else {
            "● down".red()
        };
        println!(
            "  {:<20} {}  {}",
            service.display_name(),
            indicator,
            client.base_url(service).dimmed()
        );
    }

    Ok(())
}
