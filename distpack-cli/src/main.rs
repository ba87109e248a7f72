//! Binary entrypoint for distpack-cli.

fn main() {
    pretty_env_logger::init();
    log::info!("distpack {}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = distpack_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
