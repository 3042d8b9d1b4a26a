use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dtl",
    about = "Donation Tracking Ledger: track donations and fund assignments over key-value state",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// State snapshot file (overrides the config file)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Config file (defaults to ./dtl.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register (or reset) a donator
    RegisterDonator(NameArgs),
    /// Register (or reset) a profit receiver
    RegisterReceiver(NameArgs),
    /// Register (or reset) a project
    RegisterProject(NameArgs),
    /// Record a donation to a project
    Donate(DonateArgs),
    /// Assign funds from a project to a receiver
    Assign(AssignArgs),
    /// Show a donator and its donation history
    TrackDonator(NameArgs),
    /// Show a receiver's balance
    TrackReceiver(NameArgs),
    /// Show a registered project
    TrackProject(NameArgs),
    /// Call an invoke operation by name
    Invoke(CallArgs),
    /// Call a query operation by name; prints the raw payload
    Query(CallArgs),
    /// Start the HTTP host
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Args)]
pub struct DonateArgs {
    pub donator: String,
    pub project: String,
    /// Whole units; must be a positive integer
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
}

#[derive(Args)]
pub struct AssignArgs {
    pub project: String,
    pub receiver: String,
    #[arg(allow_hyphen_values = true)]
    pub amount: String,
}

#[derive(Args)]
pub struct CallArgs {
    pub function: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}
