use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "explaind", about = "AI tutor question-answering service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml", global = true)]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,
    /// Ask a question once: generate, persist and print the explanation
    Ask { question: String },
    /// Manage stored conversations
    Conversation {
        #[command(subcommand)]
        action: ConversationAction,
    },
}

#[derive(Subcommand)]
pub enum ConversationAction {
    /// List stored conversations, newest first
    List,
    /// Show one conversation with its explanation
    Show { id: Uuid },
    /// Delete a conversation and its explanation
    Delete { id: Uuid },
    /// Export a conversation as a plain-text file
    Export {
        id: Uuid,
        #[arg(short, long)]
        path: Option<String>,
    },
}
