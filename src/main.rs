use clap::Parser;
use govm::cli::{Cli, CommandHandler};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let handler = match CommandHandler::new(&cli) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = handler.dispatch(cli.command).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
