//! verify-token: check one bearer token against a Cognito user pool
//!
//! Configuration comes from `COGNITO_*` environment variables. The token is
//! read from `--token` or standard input. On success the claims are printed
//! as JSON; on rejection `Unauthorized` is printed and the reason is logged.

use std::process::ExitCode;

use clap::Parser;
use cognito_verifier::{Authenticator, VerifierConfig};
use figment::{Figment, providers::Env};
use tokio::io::AsyncReadExt;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "verify-token", version, about)]
struct Cli {
    /// Token to verify; read from stdin when omitted
    #[arg(short, long)]
    token: Option<String>,

    /// Expected audience, overriding COGNITO_APP_CLIENT_ID
    #[arg(short, long)]
    audience: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "COGNITO_LOG_LEVEL")]
    log_level: String,

    /// Log format (text, json)
    #[arg(long, default_value = "text", env = "COGNITO_LOG_FORMAT")]
    log_format: String,
}

fn setup_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        "json" => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn read_token(cli: &Cli) -> std::io::Result<String> {
    if let Some(token) = &cli.token {
        return Ok(token.trim().to_string());
    }

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input.trim().to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_tracing(&cli.log_level, &cli.log_format);

    let mut figment = Figment::from(Env::prefixed("COGNITO_"));
    if let Some(audience) = &cli.audience {
        figment = figment.merge(("app_client_id", audience.as_str()));
    }

    let authenticator = match VerifierConfig::from_figment(figment)
        .and_then(|config| Authenticator::from_config(&config))
    {
        Ok(authenticator) => authenticator,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    let token = match read_token(&cli).await {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "failed to read token");
            return ExitCode::from(2);
        }
    };

    match authenticator.authorize(&format!("Bearer {token}")).await {
        Ok(claims) => {
            println!("{}", claims.to_json());
            ExitCode::SUCCESS
        }
        Err(unauthorized) => {
            println!("{unauthorized}");
            ExitCode::FAILURE
        }
    }
}
