mod output;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use gmaps2vcard_core::{load_app_config, ExtractionMethod};
use gmaps2vcard_resolver::{normalize, ResolveError, Resolver, ResolverSettings};

#[derive(Debug, Parser)]
#[command(name = "gmaps2vcard")]
#[command(about = "Turn a Google Maps link into a vCard contact file")]
struct Cli {
    /// Google Maps, goo.gl or share.google link to a business.
    url: String,

    /// Extraction method to try first; falls back to basic when it finds no name.
    #[arg(long, value_enum, default_value_t = MethodArg::Basic)]
    method: MethodArg,

    /// Directory to write the .vcf file into.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    /// Google Places API (needs GOOGLE_PLACES_API_KEY)
    Api,
    /// Headless browser automation
    #[value(alias = "browser")]
    Playwright,
    /// URL data plus a plain page fetch, no API key needed
    Basic,
}

impl From<MethodArg> for ExtractionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Api => Self::Api,
            MethodArg::Playwright => Self::Playwright,
            MethodArg::Basic => Self::Basic,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match load_app_config() {
        Ok(config) => config,
        Err(err) => return Ok(usage_error(&err.to_string())),
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let method = ExtractionMethod::from(cli.method);
    tracing::debug!(
        config = ?config,
        %method,
        output_dir = %cli.output_dir.display(),
        "configuration loaded"
    );
    let resolver = Resolver::new(ResolverSettings::from_app_config(&config))
        .context("failed to initialise resolver")?;

    if let Err(err) = resolver.ensure_credentials(method) {
        eprintln!("error: {err}");
        eprintln!("Get an API key from: https://console.cloud.google.com/apis/credentials");
        eprintln!("Or use: gmaps2vcard <url> --method playwright");
        return Ok(ExitCode::FAILURE);
    }

    let validated = match normalize(&cli.url) {
        Ok(url) => url,
        Err(err) => return Ok(usage_error(&err.to_string())),
    };
    println!("✓ Valid Google Maps URL");
    println!("→ Following redirects and extracting business data using method: {method}...");

    let resolution = match resolver.resolve_validated(&validated, method).await {
        Ok(resolution) => resolution,
        Err(err @ ResolveError::MissingCredential(_)) => return Ok(usage_error(&err.to_string())),
        Err(err) => return Err(anyhow::Error::from(err).context("resolution failed")),
    };

    if resolution.redirected() {
        println!("✓ Redirected to: {}", report::truncate_url(&resolution.final_url));
    }
    for advisory in &resolution.advisories {
        eprintln!("⚠ {advisory}");
    }

    println!();
    print!("{}", report::summary(&resolution.record));

    println!();
    println!("→ Generating vCard...");
    let path = output::write_vcard(&cli.output_dir, &resolution.record).with_context(|| {
        format!("failed to write vCard into {}", cli.output_dir.display())
    })?;
    tracing::info!(path = %path.display(), "vCard written");
    println!("✓ vCard saved to: {}", path.display());
    println!();
    println!("You can now import this file to your contacts app or iCloud.");

    Ok(ExitCode::SUCCESS)
}

/// Expected validation failures get a one-line message, not a backtrace.
fn usage_error(message: &str) -> ExitCode {
    eprintln!("error: {message}");
    ExitCode::FAILURE
}
