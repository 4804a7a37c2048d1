use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod commands;
mod context;
mod logging;

use commands::persona::CreateArgs;
use context::AppContext;

#[derive(Parser)]
#[command(name = "agentme", version)]
#[command(about = "AgentMe - design a persona and chat with it through Gemini", long_about = None)]
struct Cli {
    /// Directory holding personas and the API key
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Path to config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list, select and delete personas
    Persona {
        #[command(subcommand)]
        action: PersonaAction,
    },
    /// Manage the Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Print the system prompt compiled for a persona
    Prompt {
        /// Persona id (defaults to the current persona)
        id: Option<String>,
    },
    /// Chat with the current persona
    Chat,
}

#[derive(Subcommand)]
enum PersonaAction {
    /// Create a persona, asking for anything not given as a flag
    Create(CreateArgs),
    /// List all personas (* marks the current one)
    List,
    /// Show a persona's details
    Show {
        /// Persona id (defaults to the current persona)
        id: Option<String>,
    },
    /// Make a persona the current one
    Select { id: String },
    /// Delete a persona
    Delete { id: String },
    /// List the job presets `create --preset` accepts
    Presets,
}

#[derive(Subcommand)]
enum KeyAction {
    /// Store the API key
    Set { key: String },
    /// Show the stored API key, masked
    Show,
    /// Delete the stored API key
    Remove,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Commands::Persona {
        action: PersonaAction::Presets,
    } = cli.command
    {
        commands::persona::presets();
        return Ok(());
    }

    let ctx = AppContext::load(cli.data_dir.as_deref(), cli.config.as_deref())?;

    match cli.command {
        Commands::Persona { action } => match action {
            PersonaAction::Create(args) => commands::persona::create(&ctx, args).await?,
            PersonaAction::List => commands::persona::list(&ctx).await?,
            PersonaAction::Show { id } => commands::persona::show(&ctx, id.as_deref()).await?,
            PersonaAction::Select { id } => commands::persona::select(&ctx, &id).await?,
            PersonaAction::Delete { id } => commands::persona::delete(&ctx, &id).await?,
            PersonaAction::Presets => commands::persona::presets(),
        },
        Commands::Key { action } => match action {
            KeyAction::Set { key } => commands::key::set(&ctx, &key).await?,
            KeyAction::Show => commands::key::show(&ctx).await?,
            KeyAction::Remove => commands::key::remove(&ctx).await?,
        },
        Commands::Prompt { id } => commands::prompt::show(&ctx, id.as_deref()).await?,
        Commands::Chat => commands::chat::run(&ctx).await?,
    }

    Ok(())
}
