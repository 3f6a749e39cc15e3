use clap::Parser;

mod client;
mod commands;
mod core;

use commands::Commands;
use core::error::SparkError;
use core::exit_code::ExitCode;
use core::logger::{init_tracing, Logger};

#[derive(Parser)]
#[command(name = "spark")]
#[command(
    about = "Runs the request cases of a spark config and saves every response. Runs './spark.json' if no subcommand is provided."
)]
#[command(version = crate::core::version::app_version())]
struct Args {
    #[arg(short, long, help = "Enable debug logging", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run_args: commands::run::RunArgs,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.debug);
    let logger = Logger::stdout();

    if let Err(e) = run(args, &logger).await {
        logger.error(&e);
        let exit_code = ExitCode::from(&e);
        std::process::exit(exit_code.code());
    }
}

async fn run(args: Args, logger: &Logger) -> Result<(), SparkError> {
    match args.command {
        Some(Commands::Init(init_args)) => commands::init::execute_init(&init_args, logger),
        None => commands::run::execute_run(&args.run_args, logger).await,
    }
}
