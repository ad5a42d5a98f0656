use clap::Parser;
use log::{debug, LevelFilter};

mod args;
mod groups;

fn main() {
    let args = args::Args::parse();

    if args.verbose {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .init();
    }
    debug!("args: {:?}", args);

    match groups::run_allocation(&args) {
        Ok(message) => {
            println!("{}", message);
        }
        Err(e) => {
            eprintln!("Cannot create the groups: {}", e);
            std::process::exit(1);
        }
    }
}
