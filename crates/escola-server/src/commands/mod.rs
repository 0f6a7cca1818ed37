//! CLI command implementations.
//!
//! - `hash-password`: bcrypt a password for seeding
//! - `issue-token`: mint a token pair
//! - `inspect-token`: verify and print claims
//! - `check-config`: validate settings

mod password;
mod token;

use crate::cli::Commands;
use crate::settings::Settings;

/// Executes the selected command.
pub fn execute(command: &Commands, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Commands::HashPassword(args) => password::hash_password(args, settings),
        Commands::IssueToken(args) => token::issue_token(args, settings),
        Commands::InspectToken(args) => token::inspect_token(args, settings),
        Commands::CheckConfig => check_config(settings),
    }
}

fn check_config(settings: &Settings) -> anyhow::Result<()> {
    let config = settings.auth_config()?;
    let summary = serde_json::json!({
        "algorithm": format!("{:?}", config.jwt_algorithm),
        "access_token_lifetime_secs": config.access_token_lifetime_secs,
        "refresh_token_lifetime_secs": config.refresh_token_lifetime_secs,
        "bcrypt_cost": config.bcrypt_cost,
        "min_password_length": config.min_password_length,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    tracing::info!("configuration is valid");
    Ok(())
}
