//! nodesnap - point-in-time snapshot of a node's low-level configuration.
//!
//! Captures loaded kernel modules, systemd unit properties, kernel boot
//! parameters and sysctl tunables into one structured document, for
//! diagnostics and drift detection across fleets of similar nodes.

use clap::{Parser, Subcommand};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use nodesnap_core::cancel::CancelToken;
use nodesnap_core::collector::{DefaultCollectorFactory, RealFs};
use nodesnap_core::serializer::{Format, Writer};
use nodesnap_core::snapshotter::NodeSnapshotter;

/// Node configuration snapshot tool.
#[derive(Parser)]
#[command(name = "nodesnap", about = "Node configuration snapshot tool", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a system configuration snapshot.
    ///
    /// Covers loaded kernel modules, systemd unit properties, kernel
    /// boot parameters and sysctl tunables. Output in JSON, YAML or
    /// table format.
    #[command(visible_alias = "snap")]
    Snapshot {
        /// Output format (json, yaml, table).
        #[arg(short, long, default_value = "json")]
        output: String,

        /// Systemd services to snapshot.
        #[arg(
            long = "systemd-services",
            value_delimiter = ',',
            default_values_t = [
                "containerd.service".to_string(),
                "docker.service".to_string(),
                "kubelet.service".to_string(),
            ]
        )]
        systemd_services: Vec<String>,

        /// Path to the proc filesystem (for testing against a fake tree).
        #[arg(long, default_value = "/proc")]
        proc_path: String,
    },
    /// Print version information.
    Version,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("nodesnap={}", level).parse().unwrap())
        .add_directive(format!("nodesnap_core={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_snapshot(output: &str, systemd_services: Vec<String>, proc_path: &str) -> bool {
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("received shutdown signal");
        handler_token.cancel();
    }) {
        warn!("failed to set Ctrl-C handler: {}", e);
    }

    let format = Format::parse_lossy(output);
    let factory = DefaultCollectorFactory::with_fs(RealFs::new(), proc_path)
        .systemd_units(systemd_services);

    let mut snapshotter =
        NodeSnapshotter::new(Box::new(factory), Box::new(Writer::stdout(format)));

    match snapshotter.run(&cancel) {
        Ok(()) => true,
        Err(e) => {
            error!("{}", e);
            false
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let ok = match cli.command {
        Command::Snapshot {
            output,
            systemd_services,
            proc_path,
        } => run_snapshot(&output, systemd_services, &proc_path),
        Command::Version => {
            println!(
                "{} version {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            );
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
}
