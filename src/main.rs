use clap::{Arg, ArgAction, Command as ClapCommand};
use log::{error, LevelFilter};
use std::process;

use tiffslab::commands::{CommandFactory, TiffslabCommandFactory};
use tiffslab::config::ReaderConfig;
use tiffslab::utils::logger::FileLogger;

fn main() {
    let matches = ClapCommand::new("tiffslab")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read-only GeoTIFF/BigTIFF hyperslab reader")
        .arg(
            Arg::new("input")
                .help("Input GeoTIFF file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("detect")
                .long("detect")
                .help("Only report whether the file is a GeoTIFF")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("read")
                .long("read")
                .help("Read a hyperslab of the data variable")
                .action(ArgAction::SetTrue)
                .conflicts_with("detect"),
        )
        .arg(
            Arg::new("start")
                .long("start")
                .help("Start index per axis, e.g. 0,0 or 1,0,0 (band,row,column)")
                .value_name("A,B[,C]")
                .requires("read"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .help("Element count per axis")
                .value_name("A,B[,C]")
                .requires("read"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the raw native-order bytes to this file")
                .value_name("FILE")
                .requires("read"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file with reader limits")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records to this file instead of stderr")
                .value_name("FILE"),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };
    match matches.get_one::<String>("log-file") {
        Some(path) => {
            if let Err(e) = FileLogger::init(path, level) {
                eprintln!("Error initializing log file {}: {}", path, e);
                process::exit(1);
            }
        }
        None => {
            let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
            if matches.get_flag("verbose") {
                builder.filter_level(level);
            }
            builder.init();
        }
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match ReaderConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => ReaderConfig::default(),
    };

    let factory = TiffslabCommandFactory::new();
    match factory.create_command(&matches, &config) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
