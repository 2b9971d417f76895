use clap::Parser;
use clap::Subcommand;
use commands::commits::CommitsForPr;
use commands::create::Create;
use commands::verify::{VerifyBranch, VerifyFork, VerifyPull};

mod commands;
mod config;
mod core;
mod errors;
mod git;
mod github;

#[derive(Debug, Parser)]
#[command(name = "cppr")]
#[command(about = "Cherry-pick commits onto target branches and open a pull request per target", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Create(Create),
    CommitsForPr(CommitsForPr),
    VerifyPull(VerifyPull),
    VerifyBranch(VerifyBranch),
    VerifyFork(VerifyFork),
}

fn main() {
    env_logger::init();

    let args = Cli::parse();

    let result = match args.command {
        Commands::Create(create) => create.execute(),
        Commands::CommitsForPr(commits) => commits.execute(),
        Commands::VerifyPull(verify) => verify.execute(),
        Commands::VerifyBranch(verify) => verify.execute(),
        Commands::VerifyFork(verify) => verify.execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
