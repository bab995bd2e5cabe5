use super::args::{Cli, Commands};
use super::handlers;
use crate::context::{ExecutionContext, Overrides};
use crate::logging;
use anyhow::Result;
use caseorg_core::resolve_data_dir;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;
    let overrides = Overrides {
        server: cli.server.clone(),
        admin: cli.admin,
    };
    let command = cli.command.unwrap_or(Commands::Browse);

    if let Commands::Browse = command {
        handlers::browse::ensure_terminal()?;
        logging::init_file(cli.log_level, &data_dir)?;
    } else {
        logging::init_stderr(cli.log_level);
    }

    let format = cli.format;
    let context = || ExecutionContext::new(data_dir.clone(), &overrides, format);

    match command {
        Commands::Browse => handlers::browse::handle(&context()?),
        Commands::Search(args) => handlers::search::handle(&context()?, args),
        Commands::Cases { query } => handlers::cases::handle(&context()?, &query),
        Commands::Tree { path } => handlers::tree::handle(&context()?, path.as_deref()),
        Commands::Note {
            year,
            month,
            case,
            set,
        } => handlers::note::handle(&context()?, &year, &month, &case, set),
        Commands::Delete { path, yes } => handlers::delete::handle(&context()?, &path, yes),
        Commands::CaseLaw(args) => handlers::case_law::handle(&context()?, args),
        Commands::Config { command } => {
            handlers::config::handle(&data_dir, &overrides, command, format)
        }
    }
}
