mod commands;
mod terminal;

use commands::{CommandLine, Commands, check, run, validate};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    match commands.command {
        Commands::Run {
            config,
            targets,
            dry_run,
            concurrency,
        } => {
            print::header("starting monitoring run");
            run::run(&config, targets, dry_run, concurrency).await
        }
        Commands::Check {
            address,
            count,
            timeout,
        } => {
            print::header("single probe");
            check::check(&address, count, timeout).await
        }
        Commands::Validate { config } => {
            print::header("configuration");
            validate::validate(&config)
        }
    }
}
