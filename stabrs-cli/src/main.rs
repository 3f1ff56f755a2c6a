mod overlap;

use anyhow::Result;
use clap::{ArgMatches, Command};
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "intervalOverlap";
}

fn build_parser() -> Command {
    overlap::cli::create_overlap_cli()
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
}

/// `RUST_LOG` applies only when no `-v` is given.
fn init_logging(matches: &ArgMatches) {
    let mut builder = match matches.get_count("verbose") {
        0 => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        }
        verbose => {
            let mut builder = env_logger::Builder::new();
            builder.filter_level(match verbose {
                1 => LevelFilter::Info,
                _ => LevelFilter::Debug,
            });
            builder
        }
    };
    builder.init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches);

    overlap::handlers::run_overlap(&matches)
}
