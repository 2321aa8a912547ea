//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the
//! appropriate commands.

pub mod chat;
pub mod model_list;
pub mod persona_list;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::cli::chat::run_chat;
use crate::cli::model_list::list_models;
use crate::cli::persona_list::list_personas;

#[derive(Parser)]
#[command(name = "penpal")]
#[command(about = "A terminal AI companion that texts like a real person")]
#[command(
    long_about = "Penpal is a terminal chat client for a local Ollama-compatible endpoint. \
Each contact is an AI partner with its own personality dials, persona, and isolated \
conversation history. Replies arrive in short texting-style bubbles and occasionally \
come with a picture.\n\n\
Controls:\n\
  Type a message and press Enter to send\n\
  /contacts         List contacts\n\
  /switch <id>      Switch the active contact\n\
  /attach <path>    Attach an image to your next message\n\
  /personas         List available personas\n\
  /quit             Exit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for chat
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Inference endpoint base URL
    #[arg(short = 'b', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Directory of images for picture drops
    #[arg(long, global = true, value_name = "DIR")]
    pub images: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List models available at the endpoint
    Models,
    /// List built-in and custom personas
    Personas,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(args.model, args.base_url, args.images).await,
        Commands::Models => list_models(args.base_url).await,
        Commands::Personas => list_personas(),
    }
}
