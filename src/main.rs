use log::{error, info};

use std::fmt::Display;
use std::io;
use std::process;

use hashchain_ledger::blockchain::Chain;
use hashchain_ledger::config::{Config, DEFAULT_LOG_FILTER};
use hashchain_ledger::driver::Session;

/// Reports a startup failure and exits with status 1
fn exit_with(err: impl Display) -> ! {
    error!("Startup failed: {}", err);
    eprintln!("{}", err);
    process::exit(1)
}

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(DEFAULT_LOG_FILTER));

    let config = Config::from_args(std::env::args().skip(1)).unwrap_or_else(|err| exit_with(err));

    info!("Mining genesis block with amount {}", config.initial_amount);
    let chain = Chain::new(config.initial_amount).unwrap_or_else(|err| exit_with(err));
    info!("Genesis block mined with nonce {}", chain.genesis().nonce());

    let stdin = io::stdin();
    let stdout = io::stdout();
    Session::new(chain, stdin.lock(), stdout.lock()).run()
}
