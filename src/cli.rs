use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use prospect_intel::model::Persona;

#[derive(Parser, Debug)]
#[command(
    name = "prospect-intel",
    version,
    about = "Company profiles with provenance-checked claims, and collateral built from them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch sources and generate a company profile
    Profile(TargetArgs),
    /// Generate a profile, then a persona-targeted email draft from its claims
    Email(EmailArgs),
    /// Generate a profile, then a pitch outline from its claims
    Pitch(TargetArgs),
    /// Generate a profile, then list its strongest claims as landing-page proof points
    ProofPoints(TargetArgs),
    /// Summarize a meeting transcript
    Summarize(SummarizeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Company website, with or without scheme
    pub company_url: String,

    /// Company name; defaults to the website domain
    #[arg(long)]
    pub name: Option<String>,

    /// Additional pages to fetch (at most two are used)
    #[arg(long = "extra-url")]
    pub extra_urls: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EmailArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Exec, Buyer or Champion
    #[arg(long, default_value = "Exec")]
    pub persona: Persona,
}

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    /// Transcript file to summarize
    pub transcript: PathBuf,
}
