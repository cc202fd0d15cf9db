use anyhow::Result;
use clap::Parser;
use release_stats::{
    analysis::CalendarZone,
    commands::{analyze, serve},
    config::ServerConfig,
    github::GitHubRepo,
    output::DEFAULT_OUTPUT_DIR,
    runtime::RealRuntime,
};
use std::path::PathBuf;

/// release-stats - GitHub release statistics
///
/// Fetch the release history of GitHub repositories, derive calendar and
/// version features, write them as CSV, and serve the result over HTTP.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding rate limits.
///
/// Examples:
///   release-stats analyze                          # Analyze the default repositories
///   release-stats analyze --repo owner/repo        # Analyze one repository
///   release-stats serve --port 3001                # Serve output/ over HTTP
#[derive(Parser, Debug)]
#[command(author, version = env!("RELEASE_STATS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(
        long = "log-level",
        env = "LOG_LEVEL",
        value_name = "LEVEL",
        default_value = "info",
        global = true
    )]
    pub log_level: String,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Fetch releases and write the CSV files
    Analyze(AnalyzeArgs),

    /// Serve the analyzed release data over HTTP
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// Repository to analyze, in the format "owner/repo" (repeatable)
    #[arg(
        long = "repo",
        short = 'r',
        value_name = "OWNER/REPO",
        default_values_t = GitHubRepo::defaults()
    )]
    pub repos: Vec<GitHubRepo>,

    /// Directory the CSV files are written to
    #[arg(long = "output-dir", short = 'o', value_name = "PATH", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Time zone the calendar fields are computed in
    #[arg(long, value_enum, default_value_t = CalendarZone::Local)]
    pub calendar: CalendarZone,
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Directory holding enhanced_release_details.csv
    #[arg(long = "data-dir", value_name = "PATH", default_value = DEFAULT_OUTPUT_DIR)]
    pub data_dir: PathBuf,

    /// Origin allowed by CORS ("*" for any)
    #[arg(long = "cors-origin", env = "CORS_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_origin: String,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            data_dir: args.data_dir,
            cors_origin: args.cors_origin,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();
    let runtime = RealRuntime;

    match cli.command {
        Commands::Analyze(args) => {
            analyze(
                runtime,
                &args.repos,
                &args.output_dir,
                args.api_url,
                args.calendar,
            )
            .await?;
        }
        Commands::Serve(args) => serve(runtime, args.into()).await?,
    }
    Ok(())
}
