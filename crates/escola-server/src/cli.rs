//! CLI argument parsing and command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use escola_core::models::account::{AccountId, Role};

/// Escola authentication maintenance tool.
#[derive(Parser, Debug)]
#[command(name = "escola", version, about, propagate_version = true)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "ESCOLA_LOG_LEVEL", global = true)]
    pub log_level: String,

    /// Log format
    #[arg(long, default_value = "text", env = "ESCOLA_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print a bcrypt hash of a password, for seeding the database
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),

    /// Mint an access/refresh token pair for an account
    #[command(name = "issue-token")]
    IssueToken(IssueTokenArgs),

    /// Verify a token and print its claims
    #[command(name = "inspect-token")]
    InspectToken(InspectTokenArgs),

    /// Load and validate settings, then print the effective values
    #[command(name = "check-config")]
    CheckConfig,
}

#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    pub password: String,
}

#[derive(Args, Debug, Clone)]
pub struct IssueTokenArgs {
    #[arg(long)]
    pub id: AccountId,

    #[arg(long)]
    pub email: String,

    /// ADMIN, TEACHER, STUDENT or STAFF
    #[arg(long)]
    pub role: Role,
}

#[derive(Args, Debug, Clone)]
pub struct InspectTokenArgs {
    pub token: String,
}
