use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "stampo",
    about = "Generate projects from installed template bundles",
    version
)]
pub struct Cli {
    /// Template to generate, by name or by path to its root directory
    #[arg(required_unless_present = "list")]
    pub template: Option<String>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Additional template search paths, highest priority last (repeatable)
    #[arg(long = "search-paths", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// List installed templates and exit
    #[arg(long)]
    pub list: bool,

    /// Create the output directory if it does not exist
    #[arg(long)]
    pub mkdir: bool,

    /// Resolve only; skip extracting the project archive
    #[arg(long)]
    pub skip_generator: bool,

    /// Skip the template's post-generation runners
    #[arg(long)]
    pub skip_runners: bool,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,
}
