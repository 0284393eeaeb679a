use clap::Parser;
use gidtree::cli::{self, Cli};
use gidtree_config::{PathNormalizer, Settings};

/// Log level from `~/.gidtree/config.yaml`, ignoring any problem reading it;
/// the command itself reports those.
fn settings_log_level() -> log::LevelFilter {
    PathNormalizer::from_env()
        .and_then(|paths| Settings::load(&paths))
        .map(|settings| settings.log_level.to_level_filter())
        .unwrap_or(log::LevelFilter::Off)
}

fn main() {
    let cli = Cli::parse();

    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config.
    gidtree::debug::init_log_bridge(
        cli.log_level.map(|l| l.to_level_filter()),
        settings_log_level(),
    );
    log::info!("Starting gidtree {}", gidtree::VERSION);

    if let Err(e) = cli::run(cli) {
        log::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
