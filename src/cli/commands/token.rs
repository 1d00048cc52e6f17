use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::config;

/// One year
pub const MAX_TOKEN_HOURS: u64 = 24 * 365;

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[arg(long, help = "Subject (sub claim) of the token")]
    pub subject: String,

    #[arg(long = "permission", help = "Permission to grant, e.g. post:drinks (repeatable)")]
    pub permissions: Vec<String>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_HOURS),
        help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)"
    )]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    let secret = security
        .jwt_secret
        .as_deref()
        .context("SECURITY_JWT_SECRET must be set to mint tokens")?;

    let mut claims = Claims::new(
        args.subject,
        args.permissions,
        args.hours.unwrap_or(security.jwt_expiry_hours),
    )?;
    claims.iss = security.jwt_issuer.clone();

    let token = generate_jwt(&claims, secret)?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "success": true,
                "token": token,
                "expires_at": claims.exp,
            }))?
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
