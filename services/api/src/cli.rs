use crate::demo::{run_demo, run_intelligence, run_search, DemoArgs, IntelligenceArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use freight_intel::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Freight Intelligence Service",
    about = "Score carriers, lanes, shippers, and CSRs from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Rank carriers for a lane and print both buckets
    Search(SearchArgs),
    /// Print the lane/CSR/shipper intelligence snapshot
    Intelligence(IntelligenceArgs),
    /// Run an end-to-end demo over a seeded brokerage network
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Hydrate the load book from a TMS CSV export instead of the seeded
    /// demo history
    #[arg(long)]
    pub(crate) loads_csv: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Search(args) => run_search(args),
        Command::Intelligence(args) => run_intelligence(args),
        Command::Demo(args) => run_demo(args),
    }
}
