use distrepo_registry::{RegistryError, RepoConfig, RepoRegistry};
use nu_ansi_term::Color::{Blue, Cyan, Green, Magenta, Yellow};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{peaker::PriorityMax, themes::BorderCorrection, Panel, Style, Width},
};
use tracing::{debug, info, warn};

use crate::{
    error::CliResult,
    utils::{join_or_dash, term_width, Colored},
};

#[derive(Serialize)]
struct DistroEntry<'a> {
    name: &'a str,
    arches: Vec<&'a str>,
}

#[derive(Serialize)]
struct RepoListing<'a> {
    distro: &'a str,
    arch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_type: Option<&'a str>,
    repositories: &'a [&'a RepoConfig],
}

pub fn list_distros(registry: &RepoRegistry, json: bool) -> CliResult<()> {
    let distros: Vec<DistroEntry> = registry
        .list_distros()
        .into_iter()
        .map(|name| {
            DistroEntry {
                name,
                arches: registry.list_arches(name).unwrap_or_default(),
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&distros)?);
        return Ok(());
    }

    let mut builder = Builder::new();
    builder.push_record(["Distribution", "Architectures"]);
    for distro in &distros {
        builder.push_record([
            Colored(Blue, distro.name).to_string(),
            Colored(Cyan, distro.arches.join(", ")).to_string(),
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header("Distributions"))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();

    info!("\n{table}");
    Ok(())
}

pub fn list_repos(
    registry: &RepoRegistry,
    distro: &str,
    arch: &str,
    image_type: Option<&str>,
    include_tagged: bool,
    json: bool,
) -> CliResult<()> {
    debug!(
        distro = distro,
        arch = arch,
        image_type = ?image_type,
        include_tagged = include_tagged,
        "selecting repositories"
    );

    let repos = match image_type {
        Some(image_type) => registry.repos_by_image_type_name(distro, arch, image_type)?,
        None => registry.repos_by_arch_name(distro, arch, include_tagged)?,
    };

    if json {
        let listing = RepoListing {
            distro,
            arch,
            image_type,
            repositories: &repos,
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if repos.is_empty() {
        warn!("No repositories apply to {distro}/{arch}");
        return Ok(());
    }

    let title = match image_type {
        Some(image_type) => format!("{distro} / {arch} / {image_type}"),
        None => format!("{distro} / {arch}"),
    };
    info!("\n{}", repo_table(&title, &repos));

    Ok(())
}

pub fn show_repos(registry: &RepoRegistry, distro: &str, arch: &str, json: bool) -> CliResult<()> {
    let repos: Vec<&RepoConfig> = registry
        .distro_has_repos(distro, arch)
        .ok_or_else(|| {
            RegistryError::NotFound {
                distro: distro.to_string(),
                arch: arch.to_string(),
            }
        })?
        .iter()
        .collect();

    if json {
        let listing = RepoListing {
            distro,
            arch,
            image_type: None,
            repositories: &repos,
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if repos.is_empty() {
        warn!("{distro}/{arch} is configured without repositories");
        return Ok(());
    }

    info!("\n{}", repo_table(&format!("{distro} / {arch}"), &repos));
    Ok(())
}

fn repo_table(title: &str, repos: &[&RepoConfig]) -> String {
    let mut builder = Builder::new();
    builder.push_record(["#", "Name", "Source", "Image Types", "GPG"]);

    for (index, repo) in repos.iter().enumerate() {
        builder.push_record([
            (index + 1).to_string(),
            Colored(Blue, &repo.name).to_string(),
            Colored(Cyan, repo_source(repo)).to_string(),
            Colored(Magenta, join_or_dash(&repo.image_type_tags)).to_string(),
            gpg_status(repo),
        ]);
    }

    builder
        .build()
        .with(Panel::header(title))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .with(Width::wrap(term_width()).priority(PriorityMax::default()))
        .to_string()
}

fn repo_source(repo: &RepoConfig) -> String {
    if !repo.base_urls.is_empty() {
        join_or_dash(&repo.base_urls)
    } else if let Some(ref metalink) = repo.metalink {
        format!("metalink: {metalink}")
    } else if let Some(ref mirror_list) = repo.mirror_list {
        format!("mirrorlist: {mirror_list}")
    } else {
        "-".to_string()
    }
}

fn gpg_status(repo: &RepoConfig) -> String {
    match repo.check_gpg {
        Some(true) => Colored(Green, "check").to_string(),
        Some(false) => Colored(Yellow, "skip").to_string(),
        None => "-".to_string(),
    }
}
