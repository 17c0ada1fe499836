use std::net::SocketAddr;

use clap::Parser;
use taxcompare::api::cli::{Cli, Command, run_compare};
use taxcompare::api::logging::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Command::Serve(args) => {
            let addr = SocketAddr::new(args.bind, args.port);
            if let Err(e) = taxcompare::api::run_http_server(addr).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Compare(args) => match run_compare(&args) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }
}
