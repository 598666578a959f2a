//! Trustlink Propagator CLI

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::{error, info};
use trustlink_propagator::link::{
    self, Config, Error, Invoker, Mode, Propagator, Request, ShellRunner,
};

/// Returns the version of the crate.
pub const fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Flag for verbose output
const VERBOSE_FLAG: &str = "verbose";

/// Exit code reported for malformed contract arguments
const USAGE_EXIT_CODE: u8 = 2;

/// Arguments shared by every subcommand
fn request_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .long("config")
                .default_value(link::DEFAULT_CONFIG)
                .help("Path to YAML network registry")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("task")
                .long("task")
                .default_value(link::DEFAULT_TASK)
                .help("Network set to use (\"test\" selects the test networks, anything else production)")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("contract")
                .long("contract")
                .help("Contract name used on both ends of every link")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("local-contract")
                .long("local-contract")
                .help("Contract name on the source network (requires --remote-contract)")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("remote-contract")
                .long("remote-contract")
                .help("Contract name on the target networks (requires --local-contract)")
                .value_parser(clap::value_parser!(String)),
        )
}

/// Loads the registry and builds a [Propagator] and [Request] from `matches`.
fn setup(matches: &ArgMatches) -> Result<(Propagator<ShellRunner>, Request), Error> {
    let config_path = matches.get_one::<PathBuf>("config").unwrap();
    let request = Request {
        mode: Mode::from(matches.get_one::<String>("task").unwrap().as_str()),
        contract: matches.get_one::<String>("contract").cloned(),
        local_contract: matches.get_one::<String>("local-contract").cloned(),
        remote_contract: matches.get_one::<String>("remote-contract").cloned(),
    };
    request.contracts()?;
    let config = Config::load(config_path)?;
    info!(path = ?config_path, "loaded configuration");
    let invoker = Invoker::new(config.tool.clone(), config.subcommand.clone(), ShellRunner);
    Ok((Propagator::new(config, invoker)?, request))
}

/// Maps a failed run to the process exit code.
fn failure(err: Error) -> std::process::ExitCode {
    if matches!(err, Error::InvalidRequest) {
        error!(error = %err, "invalid request");
        return std::process::ExitCode::from(USAGE_EXIT_CODE);
    }
    error!(error = %err, "failed to propagate trusted remotes");
    std::process::ExitCode::FAILURE
}

/// Entrypoint for the Trustlink Propagator CLI
#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Define application
    let matches = Command::new("propagator")
        .version(crate_version())
        .about("Set trusted remotes between contract deployments across networks.")
        .arg(
            Arg::new(VERBOSE_FLAG)
                .short('v')
                .long(VERBOSE_FLAG)
                .action(ArgAction::SetTrue),
        )
        .subcommand(request_args(
            Command::new(link::PROPAGATE_CMD)
                .about("Set a trusted remote from the source network to every other network, stopping at the first failure."),
        ))
        .subcommand(request_args(
            Command::new(link::PLAN_CMD)
                .about("Print the links that propagate would establish without running any command."),
        ))
        .get_matches();

    // Create logger
    let level = if matches.get_flag(VERBOSE_FLAG) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Parse subcommands
    match matches.subcommand() {
        Some((link::PROPAGATE_CMD, matches)) => {
            let (mut propagator, request) = match setup(matches) {
                Ok(setup) => setup,
                Err(e) => return failure(e),
            };
            match propagator.propagate(&request).await {
                Ok(_) => return std::process::ExitCode::SUCCESS,
                Err(e) => return failure(e),
            }
        }
        Some((link::PLAN_CMD, matches)) => {
            let (propagator, request) = match setup(matches) {
                Ok(setup) => setup,
                Err(e) => return failure(e),
            };
            match propagator.plan(&request) {
                Ok(tasks) => {
                    for task in &tasks {
                        let command = propagator.invoker().command(task);
                        info!(
                            source = task.source.as_str(),
                            target = task.target.as_str(),
                            %command,
                            "planned link"
                        );
                    }
                    info!(links = tasks.len(), "planned trusted remotes");
                    return std::process::ExitCode::SUCCESS;
                }
                Err(e) => return failure(e),
            }
        }
        Some((cmd, _)) => {
            error!(cmd, "invalid subcommand");
        }
        None => {
            error!("no subcommand provided");
        }
    }
    std::process::ExitCode::FAILURE
}
