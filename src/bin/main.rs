use std::process::ExitCode;

use tracing::{error, info};

use buttonshutdown::{
    cli::{Cli, parse_args},
    config::load_config,
    daemon::Daemon,
    error::StartupError,
    logs::init_logging,
};

fn main() -> ExitCode {
    let args = parse_args();
    init_logging(args.log_level);
    info!("Daemon starting up");

    match start(args) {
        Ok(never) => match never {},
        Err(err) => {
            error!("{err}, exiting");
            ExitCode::FAILURE
        }
    }
}

fn start(args: Cli) -> Result<std::convert::Infallible, StartupError> {
    let config = load_config(args.config.as_deref())?;
    Daemon::new(config, args.foreground).start()
}
