use clap::Parser;
use cli::{Args, Commands};
use distrepo_config::paths::resolve_config_paths;
use distrepo_registry::RepoRegistry;
use distrepo_utils::system::host_arch;
use error::CliResult;
use logging::setup_logging;
use repos::{list_distros, list_repos, show_repos};
use tracing::debug;
use utils::set_color;

mod cli;
mod error;
mod logging;
mod repos;
mod utils;

fn load_registry(args: &Args) -> CliResult<RepoRegistry> {
    let config_paths = resolve_config_paths(args.config_paths.as_slice())?;
    debug!(
        "searching repositories in {}",
        config_paths
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(RepoRegistry::new(config_paths.as_slice())?)
}

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    let registry = load_registry(&args)?;

    match &args.command {
        Commands::Distros => list_distros(&registry, args.json)?,
        Commands::Repos {
            distro,
            arch,
            image_type,
            include_tagged,
        } => {
            list_repos(
                &registry,
                distro,
                arch.as_deref().unwrap_or_else(|| host_arch()),
                image_type.as_deref(),
                *include_tagged,
                args.json,
            )?
        }
        Commands::Show { distro, arch } => {
            show_repos(
                &registry,
                distro,
                arch.as_deref().unwrap_or_else(|| host_arch()),
                args.json,
            )?
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
