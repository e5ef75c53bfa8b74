use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use swagger_gen::api::parse_plugin_input;
use swagger_gen::config::GenerateConfig;
use swagger_gen::{generate, to_json, write_document};

#[derive(Parser, Debug)]
#[command(name = "api-swagger", version, about = "A plugin that generates swagger.json from an API model")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates swagger.json
    Swagger(SwaggerArgs),
}

#[derive(Args, Debug)]
struct SwaggerArgs {
    /// API request address
    #[arg(long, env = "SWAGGER_HOST")]
    host: Option<String>,

    /// URL request prefix
    #[arg(long = "basepath", env = "SWAGGER_BASE_PATH")]
    base_path: Option<String>,

    /// Swagger save file name [default: rest.swagger.json]
    #[arg(long)]
    filename: Option<String>,

    /// Plugin payload to read instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

    /// Output directory, overriding the one in the payload
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Print the document instead of writing it
    #[arg(long)]
    stdout: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Swagger(args) => run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("api-swagger: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with SWAGGER_LOG and LOG_FORMAT support. Logs go to
/// stderr so `--stdout` output stays clean JSON.
fn init_tracing() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match std::env::var("SWAGGER_LOG").as_deref() {
            Ok("debug") => "debug",
            Ok("warn") | Ok("warning") => "warn",
            Ok("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("swagger_gen={level},api_swagger={level}"))
    };

    let use_json = std::env::var("LOG_FORMAT").as_deref() == Ok("json");

    if use_json {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    }
}

fn run(args: SwaggerArgs) -> anyhow::Result<()> {
    let source = read_input(args.input.as_deref())?;
    let input = parse_plugin_input(&source)?;

    let config = GenerateConfig::new()
        .with_host(args.host.unwrap_or_default())
        .with_base_path(args.base_path.unwrap_or_default())
        .with_output_file_name(args.filename.unwrap_or_default());

    let generated = generate(&input.api, &config);
    let warnings = generated.diagnostics.warnings().count();
    if warnings > 0 {
        warn!(warnings, "document generated with degraded entries");
    }

    if args.stdout {
        println!("{}", to_json(&generated.document)?);
        return Ok(());
    }

    let dir = args
        .dir
        .or_else(|| (!input.dir.is_empty()).then(|| PathBuf::from(&input.dir)))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(config.output_file_name());

    write_document(&generated.document, &path)?;
    info!(path = %path.display(), "wrote swagger document");

    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read plugin payload from stdin")?;
            Ok(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_swagger_flags() {
        let cli = Cli::try_parse_from([
            "api-swagger",
            "swagger",
            "--host",
            "api.example.com",
            "--basepath",
            "/v1",
            "--filename",
            "demo.json",
        ])
        .unwrap();
        let Commands::Swagger(args) = cli.command;
        assert_eq!(args.host.as_deref(), Some("api.example.com"));
        assert_eq!(args.base_path.as_deref(), Some("/v1"));
        assert_eq!(args.filename.as_deref(), Some("demo.json"));
        assert!(!args.stdout);
    }
}
