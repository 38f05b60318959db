//! labu - multi-client conformance test harness run driver

mod driver;
mod error;

use clap::Parser;
use labu_config::{CliArgs, RunConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_level: u8) {
    let filter = match log_level {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "info",
        4 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.sim_loglevel);

    let config = RunConfig::try_from(args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let exit_code = runtime.block_on(driver::run(config))?;
    std::process::exit(exit_code);
}
