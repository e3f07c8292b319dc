use std::process;

use clap::{Parser, Subcommand};
use snowdrift::{HttpQueryClient, Pipeline, SiteConfig, CONFIG_FILE};

#[derive(Parser, Debug)]
#[clap(name = "snowdrift", about, version)]
struct Args {
    /// Increase output logging verbosity.
    #[clap(short, long)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Builds a snowdrift site in the current directory.
    ///
    /// Locates snowdrift.yaml, views, templates and static files in the
    /// current working directory and renders the site into ./site.
    Build,
}

fn main() {
    let args = Args::parse();
    simple_logger::init_with_level(if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    })
    .unwrap();

    let result = match args.command {
        Command::Build => build(),
    };
    match result {
        Ok(page_count) => log::info!("Built {} page(s)", page_count),
        Err(e) => {
            log::error!("Build failed: {:#}", e);
            process::exit(1);
        }
    }
}

fn build() -> eyre::Result<u64> {
    let project_root = std::env::current_dir()?;
    let config = SiteConfig::load(project_root.join(CONFIG_FILE))?;
    let client = HttpQueryClient::new(config.endpoint_url()?)?;
    let mut pipeline = Pipeline::new(&project_root, client)?;
    pipeline.build()
}
