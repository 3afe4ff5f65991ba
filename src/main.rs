use clap::Parser;
use kvpoll::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    kvpoll::logging::init(cli.debug);

    let command = cli.command.clone().unwrap_or(Commands::Poll);
    let result = match command {
        Commands::Poll => kvpoll::cli::commands::poll::execute(&cli),
        Commands::List { plain } => kvpoll::cli::commands::list::execute(&cli, plain),
        Commands::Get { ref name } => kvpoll::cli::commands::get::execute(&cli, name),
        Commands::Set {
            ref name,
            ref value,
        } => kvpoll::cli::commands::set::execute(&cli, name, value.as_deref()),
        Commands::Delete { ref name, force } => {
            kvpoll::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::Completions { ref shell } => kvpoll::cli::commands::completions::execute(shell),
    };

    // Only the entry point decides to terminate the process.
    if let Err(e) = result {
        kvpoll::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
