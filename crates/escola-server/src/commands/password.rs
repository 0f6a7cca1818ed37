//! `hash-password` command.

use escola_auth::password;

use crate::cli::HashPasswordArgs;
use crate::settings::Settings;

pub fn hash_password(args: &HashPasswordArgs, settings: &Settings) -> anyhow::Result<()> {
    if args.password.len() > password::MAX_SECRET_BYTES {
        tracing::warn!(
            limit = password::MAX_SECRET_BYTES,
            "password exceeds the bcrypt input bound and will be truncated"
        );
    }
    password::check_policy(&args.password, settings.min_password_length)?;
    let hash = password::hash_password(&args.password, settings.bcrypt_cost)?;
    println!("{hash}");
    Ok(())
}
