use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration path to search for a `repositories` directory.
    /// Can be repeated; earlier paths take priority
    #[arg(short = 'c', long = "config-path", global = true)]
    pub config_paths: Vec<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List distributions and their architectures
    #[clap(name = "distros", visible_alias = "ls")]
    Distros,

    /// List the repositories to use for a build target
    #[command(arg_required_else_help = true)]
    Repos {
        /// Distribution name, e.g. fedora-40
        #[arg(required = true, short, long)]
        distro: String,

        /// Architecture name (defaults to the host architecture)
        #[arg(required = false, short, long)]
        arch: Option<String>,

        /// Only include repositories that apply to this image type
        #[arg(required = false, short, long, conflicts_with = "include_tagged")]
        image_type: Option<String>,

        /// Include repositories restricted to specific image types
        #[arg(required = false, short = 't', long)]
        include_tagged: bool,
    },

    /// Show every repository stored for a distribution and architecture
    #[command(arg_required_else_help = true)]
    Show {
        /// Distribution name
        #[arg(required = true, short, long)]
        distro: String,

        /// Architecture name (defaults to the host architecture)
        #[arg(required = false, short, long)]
        arch: Option<String>,
    },
}
