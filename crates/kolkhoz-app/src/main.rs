#![deny(warnings)]

mod cli;
mod driver;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = cli::run_cli() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
