use clap::Parser;
use coletor::config::static_map::NeighborhoodMap;
use coletor::core::cascade::{Cascade, LevelState};
use coletor::core::session::{CITY_LEVEL, NEIGHBORHOOD_LEVEL, REGION_LEVEL};
use coletor::domain::model::ExportMode;
use coletor::domain::ports::{GeoCatalog, RecordStorage};
use coletor::utils::{logger, validation::Validate};
use coletor::{CascadeVariant, CliConfig, IbgeCatalog, JsonFileStorage, Session};
use std::io::{BufRead, Write};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting coletor");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let cascade = match config.cascade {
        CascadeVariant::Remote => Cascade::remote_two_level(),
        CascadeVariant::Static => {
            let Some(path) = config.neighborhoods.as_deref() else {
                // validate() already requires this; guard anyway.
                eprintln!("Configuration error: --neighborhoods is required when --cascade static");
                std::process::exit(1);
            };
            let table = NeighborhoodMap::from_file(Path::new(path))?;
            Cascade::static_three_level(table.bairros)
        }
    };

    let catalog = IbgeCatalog::new(&config.catalog_url);
    let storage = JsonFileStorage::new(&config.data_dir);
    let mut session = Session::new(catalog, storage, cascade);

    if !session.start().await? {
        println!("Could not load the region list. Type 'reload' to try again.");
    }
    println!("{}", session.table());
    print_help();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("coletor> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "reload" => {
                if session.load_regions().await {
                    print_level(&session, REGION_LEVEL);
                } else {
                    println!("Could not load the region list.");
                }
            }
            "regions" => print_level(&session, REGION_LEVEL),
            "cities" => print_level(&session, CITY_LEVEL),
            "neighborhoods" => print_level(&session, NEIGHBORHOOD_LEVEL),
            "region" => match session.select_region(rest).await {
                Ok(()) => print_level(&session, CITY_LEVEL),
                Err(e) => println!("{}", e),
            },
            "city" => match session.select_city(rest) {
                Ok(()) => print_level(&session, NEIGHBORHOOD_LEVEL),
                Err(e) => println!("{}", e),
            },
            "neighborhood" => match session.select_neighborhood(rest) {
                Ok(()) => println!("Selected neighborhood: {}", rest),
                Err(e) => println!("{}", e),
            },
            "add" => handle_add(&mut session, rest).await,
            "table" => println!("{}", session.table()),
            "export" => handle_export(&session, rest).await,
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    tracing::info!("Session ended with {} record(s)", session.record_count());
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  regions                                 list region options");
    println!("  region <CODE>                           select a region (loads its cities)");
    println!("  cities                                  list city options");
    println!("  city <NAME>                             select a city");
    println!("  neighborhoods                           list neighborhood options (static cascade)");
    println!("  neighborhood <NAME>                     select a neighborhood");
    println!("  add <name> | <contact> [| <neighborhood>]   add a record");
    println!("  table                                   show collected records");
    println!("  export [flat|grouped]                   write the spreadsheet file");
    println!("  reload                                  refetch the region list");
    println!("  help, quit");
}

fn print_level<G: GeoCatalog, S: RecordStorage>(session: &Session<G, S>, level: usize) {
    let cascade = session.cascade();
    let name = cascade.level_name(level);
    match cascade.state(level) {
        LevelState::AwaitingParent => println!("({}: select the level above first)", name),
        LevelState::Loading { parent } => println!("({}: loading options for {})", name, parent),
        LevelState::Failed => println!("({}: failed to load, reselect to retry)", name),
        LevelState::Ready { options } if options.is_empty() => {
            println!("({}: no options available)", name)
        }
        LevelState::Ready { options } => {
            for option in options {
                if option.value == option.label {
                    println!("  {}", option.label);
                } else {
                    println!("  {} - {}", option.value, option.label);
                }
            }
        }
    }
    if let Some(selected) = cascade.selected_label(level) {
        println!("Selected {}: {}", name, selected);
    }
}

async fn handle_add<G: GeoCatalog, S: RecordStorage>(session: &mut Session<G, S>, rest: &str) {
    let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
    let (name, contact, neighborhood) = match parts.as_slice() {
        [name, contact] => (*name, *contact, None),
        [name, contact, neighborhood] => (*name, *contact, Some(*neighborhood)),
        _ => {
            println!("Usage: add <name> | <contact> [| <neighborhood>]");
            return;
        }
    };

    match session.submit(name, contact, neighborhood).await {
        Ok(record) => {
            println!("{}", session.table());
            println!("Record added: {} ({}, {})", record.name, record.city, record.neighborhood);
        }
        Err(e) => println!("{}", e),
    }
}

async fn handle_export<G: GeoCatalog, S: RecordStorage>(session: &Session<G, S>, rest: &str) {
    let mode = match rest {
        "" | "flat" => ExportMode::Flat,
        "grouped" => ExportMode::Grouped,
        other => {
            println!("Unknown export mode '{}'. Use 'flat' or 'grouped'.", other);
            return;
        }
    };

    match session.export(mode).await {
        Ok(path) => println!("Export saved to: {}", path),
        Err(e) => println!("{}", e),
    }
}
