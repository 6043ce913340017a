mod cli;
mod command;
mod config;
mod error;

use error::WrapErr;

use catalog::{AssociationsArgs, SearchCategoryQuery};
use clap::CommandFactory;
use clap::Parser;
use tracing::Level;

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;
    let command_line = cli::Cli::parse();

    let level = match command_line.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = command_line.command else {
        cli::Cli::command().print_help()?;
        return Ok(());
    };

    let cfg = config::Config::load().context("Load configuration error")?;
    let cmd: Box<dyn command::Command> = match command {
        cli::Commands::Index { documents } => Box::new(command::IndexCommand::new(cfg, documents)),
        cli::Commands::Products { store, ids, fields } => {
            Box::new(command::ProductsCommand::new(cfg, store, ids, fields))
        }
        cli::Commands::Categories {
            store,
            query,
            filter,
            fuzzy,
            fuzzy_level,
            skip,
            take,
            sort,
            ids,
            fields,
        } => {
            let query = SearchCategoryQuery {
                store_id: store,
                query,
                filter,
                fuzzy,
                fuzzy_level,
                skip,
                sort,
                object_ids: ids,
                include_fields: fields.iter().map(String::as_str).collect(),
                ..Default::default()
            };
            Box::new(command::CategoriesCommand::new(cfg, query, take))
        }
        cli::Commands::Associations {
            id,
            first,
            after,
            query,
            group,
        } => {
            let args = AssociationsArgs {
                first,
                after,
                query,
                group,
            };
            Box::new(command::AssociationsCommand::new(cfg, id, args))
        }
        cli::Commands::Explain { kind, fields, ids } => {
            Box::new(command::ExplainCommand::new(kind, fields, ids))
        }
    };
    cmd.execute().await?;

    Ok(())
}
