mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prospect_intel::app::AppState;
use prospect_intel::model::{AccountContext, CompanyProfile, Config, ProfileGeneration};
use prospect_intel::service::collateral::proof_points;

use crate::cli::{Cli, Commands, TargetArgs};

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            tracing::error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let state = AppState::new(Config::from_env())?;

    match cli.command {
        Commands::Profile(args) => {
            let (_, generation) = generate_profile(&state, &args).await?;
            print_json(&generation)
        }
        Commands::Email(args) => {
            let (account, generation) = generate_profile(&state, &args.target).await?;
            let draft = state
                .collateral_service
                .generate_email(&account, &generation.profile, args.persona)
                .await?;
            print_json(&draft)
        }
        Commands::Pitch(args) => {
            let (account, generation) = generate_profile(&state, &args).await?;
            let pitch = state
                .collateral_service
                .generate_pitch(&account, &generation.profile)
                .await?;
            print_json(&pitch)
        }
        Commands::ProofPoints(args) => {
            let (_, generation) = generate_profile(&state, &args).await?;
            print_json(&proof_points(&generation.profile.claims))
        }
        Commands::Summarize(args) => {
            let transcript = std::fs::read_to_string(&args.transcript)
                .with_context(|| format!("failed to read {}", args.transcript.display()))?;
            let summary = state
                .collateral_service
                .generate_meeting_summary(&transcript)
                .await?;
            print_json(&summary)
        }
    }
}

async fn generate_profile(
    state: &AppState,
    args: &TargetArgs,
) -> Result<(AccountContext, ProfileGeneration)> {
    let account = AccountContext::from_company_url(&args.company_url, args.name.as_deref());
    let sources = state
        .profile_assembler
        .fetch_sources(&args.company_url, &args.extra_urls)
        .await?;

    let generation = state
        .profile_assembler
        .generate(&account, &sources)
        .await
        .with_context(|| format!("profile generation failed for {}", account.name))?;

    log_profile(&generation.profile);
    Ok((account, generation))
}

fn log_profile(profile: &CompanyProfile) {
    tracing::info!(
        company = %profile.company_name,
        claims = profile.claims.len(),
        sourced = profile.sourced_claims().count(),
        "Profile ready"
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
