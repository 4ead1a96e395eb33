use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "sender-grid")]
#[command(about = "Browse and manage marketing email senders", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server root, e.g. https://api.example.com
    #[arg(long, env = "SENDER_GRID_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "SENDER_GRID_AUTH_TOKEN", hide_env_values = true, global = true)]
    pub auth_token: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List email senders
    List {
        /// Only show senders whose name or email contains this text (case-insensitive)
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete an email sender
    Delete {
        /// Sender ID
        id: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
