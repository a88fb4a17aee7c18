use clap::Parser;
use tablechat::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap()?;

    match cli.command {
        Command::Create(args) => cli::create::run(&config, args).await,
        Command::Schema(args) => cli::schema::run(args).await,
        Command::Chat(args) => cli::chat::run(&config, args).await,
        Command::Push(args) => cli::push::run(&config, args).await,
        Command::Pull(args) => cli::pull::run(&config, args).await,
        Command::Export(args) => cli::export::run(&config, args).await,
    }
}
