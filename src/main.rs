use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use cala::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` or `grep -q` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    init_tracing(global.verbose);

    match cli.command {
        Commands::Init(args) => cala::cli::commands::init::run(args),
        Commands::Cert(cmd) => cala::cli::commands::cert::run(cmd, &global),
        Commands::List(cmd) => cala::cli::commands::list::run(cmd, &global),
        Commands::Range(cmd) => cala::cli::commands::range::run(cmd, &global),
        Commands::Calc(args) => cala::cli::commands::calc::run(args, &global),
        Commands::Completions(args) => cala::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `CALA_LOG` overrides the level, `-v` raises the default
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "cala=debug" } else { "cala=warn" };
    let filter = EnvFilter::try_from_env("CALA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
