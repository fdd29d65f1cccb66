use anyhow::Result;
use densegroup::cli;
use densegroup::observability::{init_tracing, install_panic_hook};

fn main() -> Result<()> {
    let cli = cli::parse_args();
    init_tracing(cli.verbosity);
    install_panic_hook();
    cli::run(cli)
}
