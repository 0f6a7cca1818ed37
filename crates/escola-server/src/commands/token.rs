//! `issue-token` and `inspect-token` commands.

use escola_auth::TokenService;

use crate::cli::{InspectTokenArgs, IssueTokenArgs};
use crate::settings::Settings;

fn token_service(settings: &Settings) -> anyhow::Result<TokenService> {
    Ok(TokenService::new(settings.auth_config()?)?)
}

pub fn issue_token(args: &IssueTokenArgs, settings: &Settings) -> anyhow::Result<()> {
    let tokens = token_service(settings)?;
    let access_token = tokens.issue_access(args.id, &args.email, args.role)?;
    let refresh_token = tokens.issue_refresh(args.id)?;

    let pair = serde_json::json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "token_type": "bearer",
        "expires_in": tokens.access_token_lifetime_secs(),
    });
    println!("{}", serde_json::to_string_pretty(&pair)?);
    tracing::info!(account_id = args.id, role = %args.role, "token pair issued");
    Ok(())
}

pub fn inspect_token(args: &InspectTokenArgs, settings: &Settings) -> anyhow::Result<()> {
    let tokens = token_service(settings)?;
    match tokens.decode(args.token.trim()) {
        Ok(claims) => {
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "error": format!("{:?}", e.kind()) }));
            Err(e.into())
        }
    }
}
