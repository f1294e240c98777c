use anyhow::Result;
use clap::Parser;
use console::{Term, style};
use hostinfo_platform::{AsMap, PlatformInfo, get_platform_info};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// hostinfo - host and Rust-toolchain introspection
#[derive(Parser)]
#[command(name = "hostinfo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Force debug logging
    #[arg(short, long)]
    debug: bool,

    /// Increase verbosity (-v, -vv). Max verbosity: -vv
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Cap verbosity at 2
    let verbosity = cli.verbose.min(2);
    init_logging(verbosity, cli.debug);

    let term = Term::stderr();

    let info = match get_platform_info() {
        Ok(info) => info,
        Err(err) => {
            term.write_line(&format!(
                "{} Failed to initialize platform info: {}",
                style("error:").red().bold(),
                err
            ))?;
            std::process::exit(1);
        }
    };

    if verbosity > 1 {
        debug!(
            "platform info: {}",
            serde_json::to_string_pretty(&info.as_map())?
        );
        debug!(
            "platform specific info for OS {}: {}",
            info.system,
            serde_json::to_string_pretty(&info.platform_specific_info().as_map())?
        );
    } else {
        term.write_line(&format!(
            "{} Platform info initialized for {}",
            style("::").cyan().bold(),
            info.system
        ))?;
    }

    if verbosity >= 1 {
        print_summary(&info);
    }

    Ok(())
}

fn print_summary(info: &PlatformInfo) {
    info!("platform: {}", info.platform);
    info!("system:   {} {}", info.system, info.release);
    info!("machine:  {} ({})", info.machine, info.arch.bits);
    info!(
        "cpu:      {} x{}",
        info.processor.as_deref().unwrap_or("unknown"),
        hostinfo_platform::cpu_count()
    );
    info!(
        "rust:     {} ({} {})",
        info.runtime.version, info.runtime.channel, info.runtime.host
    );
}

/// Map the verbosity counter onto a log level: 0 -> warn, 1 -> info,
/// 2 (or --debug) -> debug. `RUST_LOG` still takes precedence when set.
fn init_logging(verbosity: u8, debug: bool) {
    let level = if debug || verbosity > 1 {
        "debug"
    } else if verbosity == 1 {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
