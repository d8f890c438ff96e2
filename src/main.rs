//! z-editor CLI
//!
//! Runs the editor bridge on stdio, or performs a single compile / hover
//! from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tower_lsp::{LspService, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use z_editor::hover::{self, KEYWORDS};
use z_editor::sink::ConsoleSink;
use z_editor::{triggers, ConfigOverrides, ExtensionConfig, SourceDocument, ZServer};

#[derive(Parser)]
#[command(name = "z-editor")]
#[command(about = "Editor integration for the Z language")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to .z-editor.yaml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve an editor over stdio
    Serve {
        /// Compile Z files when they are saved
        #[arg(long)]
        auto_compile_on_save: bool,
    },

    /// Compile a Z file with the configured compiler
    Compile {
        /// Z source file
        file: PathBuf,

        /// Compiler command (overrides settings)
        #[arg(long)]
        compiler: Option<String>,

        /// Extra compiler argument, repeatable (overrides settings)
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,

        /// Compile even if the file does not look like a Z file
        #[arg(long)]
        force: bool,
    },

    /// Show hover documentation at a position
    Hover {
        /// Z file (or - for stdin)
        file: String,

        /// Line number (1-based)
        line: u32,

        /// Column number (1-based)
        column: u32,

        /// Output format
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,
    },

    /// List documented keywords
    Keywords,

    /// Locate the configured compiler on PATH
    Detect {
        /// Compiler command (overrides settings)
        #[arg(long)]
        compiler: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Plain,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Commands::Serve { .. }, false) => "info",
        _ => "warn",
    };

    // stdout carries the protocol or command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ExtensionConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(ExtensionConfig::load(path)?),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(ExtensionConfig::load_default(&cwd))
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Serve {
            auto_compile_on_save,
        } => {
            // Without --config the server reads the workspace file at initialize
            let settings_file = match cli.config.as_deref() {
                Some(path) => Some(ExtensionConfig::load(path)?),
                None => None,
            };
            let overrides = ConfigOverrides {
                auto_compile_on_save: auto_compile_on_save.then_some(true),
                ..ConfigOverrides::default()
            };
            serve(settings_file, overrides).await;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Compile {
            file,
            compiler,
            args,
            force,
        } => {
            let overrides = ConfigOverrides {
                compiler_path: compiler,
                compiler_args: (!args.is_empty()).then_some(args),
                ..ConfigOverrides::default()
            };
            let config = overrides.apply(load_config(cli.config.as_deref())?);
            run_compile(file, &config, force).await
        }

        Commands::Hover {
            file,
            line,
            column,
            format,
        } => run_hover(&file, line, column, format),

        Commands::Keywords => {
            for (keyword, description) in KEYWORDS {
                println!("{:<10} {}", keyword, description);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Detect { compiler } => {
            let overrides = ConfigOverrides {
                compiler_path: compiler,
                ..ConfigOverrides::default()
            };
            let config = overrides.apply(load_config(cli.config.as_deref())?);
            run_detect(&config)
        }
    }
}

async fn serve(settings_file: Option<ExtensionConfig>, overrides: ConfigOverrides) {
    tracing::info!("Starting Z editor bridge");
    if !overrides.is_empty() {
        tracing::debug!(?overrides, "Command-line settings");
    }

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| {
        let server = ZServer::new(client).with_overrides(overrides);
        match settings_file {
            Some(config) => server.with_settings_file(config),
            None => server,
        }
    });
    Server::new(stdin, stdout, socket).serve(service).await;
}

async fn run_compile(
    file: PathBuf,
    config: &ExtensionConfig,
    force: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let language_id = force.then(|| triggers::LANGUAGE_ID.to_string());
    let document = SourceDocument::new(file, language_id);

    let task = triggers::compile_document(Some(&document), config, Arc::new(ConsoleSink))?;
    let result = task.join().await?;

    Ok(if result.exit_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_hover(
    file: &str,
    line: u32,
    column: u32,
    format: OutputFormat,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let source = if file == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(file)?
    };

    let Some(info) = hover::hover_at(&source, line, column) else {
        if matches!(format, OutputFormat::Json) {
            println!("null");
        } else {
            eprintln!("No hover information at {}:{}", line, column);
        }
        return Ok(ExitCode::SUCCESS);
    };

    match format {
        OutputFormat::Markdown => println!("{}", info.markdown()),
        OutputFormat::Plain => println!("{}", info.plain()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
    }

    Ok(ExitCode::SUCCESS)
}

fn run_detect(config: &ExtensionConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match which::which(&config.compiler_path) {
        Ok(path) => {
            println!("Compiler: {}", config.compiler_path);
            println!("Resolved: {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Compiler not found: {} ({})", config.compiler_path, e);
            Ok(ExitCode::FAILURE)
        }
    }
}
