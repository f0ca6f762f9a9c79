use clap::Parser;
use cvtrain::Cli;
use cvtrain::cli::Prompter;
use cvtrain::logging::*;
use std::io;

#[tokio::main]
async fn main() {
    let log = DEFAULT.new(o!("function" => "main"));
    info!(log, "Starting up");

    let cli = Cli::parse();
    let wait = !cli.no_wait;
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let done = match cvtrain::run(cli, &mut prompter).await {
        Ok(report) => {
            info!(log, "finished"; "clean" => report.is_clean());
            println!();
            println!("{}", report);
            true
        }
        Err(err) => {
            error!(log, "run aborted"; "error" => %err);
            println!("{}", err);
            false
        }
    };

    match (done, wait) {
        (true, true) => prompter.pause("Done! Press Enter to exit"),
        (true, false) => println!("Done!"),
        (false, true) => prompter.pause("Press Enter to exit"),
        (false, false) => {}
    }
}
