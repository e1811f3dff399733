use clap::{Parser, Subcommand};
use std::io::Write;
use swiftpath_cli::readline;
use swiftpath_core::commands::{self, CommandContext};
use swiftpath_core::config;
use swiftpath_types::SpeedConfig;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();

    let config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("[CLI] Falling back to default config: {err}");
            SpeedConfig::default()
        }
    };
    let ctx = CommandContext {
        settings: config::settings_handle(&config),
        tracker: None,
        config_path: None,
    };

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "swiftpath config cli")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reload the config file and write back the normalized form
    Reload,
    /// Add a block to the path set
    Add {
        #[arg(short, long)]
        block: String,
    },
    /// Remove a block from the path set
    Remove {
        #[arg(short, long)]
        block: String,
    },
    /// List the configured path blocks
    List,
    /// Print the config file location
    Where,
    Exit,
}

fn respond(line: &str, ctx: &CommandContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "swiftpath".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    let output = match &cli.command {
        Some(Commands::Reload) => commands::reload(ctx)?,
        Some(Commands::Add { block }) => commands::add_block(ctx, block)?,
        Some(Commands::Remove { block }) => commands::remove_block(ctx, block)?,
        Some(Commands::List) => commands::list_blocks(ctx),
        Some(Commands::Where) => match config::default_config_path() {
            Some(path) => path.display().to_string(),
            None => "No config directory available on this platform.".to_string(),
        },
        Some(Commands::Exit) => return Ok(true),
        None => return Ok(false),
    };
    writeln!(std::io::stdout(), "{output}").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    Ok(false)
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
