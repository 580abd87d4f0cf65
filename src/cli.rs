use crate::converters::conda::Conda;
use crate::converters::{Converter, ConverterOptions};
use crate::logger;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::error;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    version,
    about = "Convert a set of conda environment files (*.yml, *.yaml) to a pixi manifest."
)]
struct Cli {
    #[arg(
        value_name = "YAML",
        default_value = ".",
        help = "One or more conda environment files, or directories in which all *.yml and *.yaml files are used"
    )]
    inputs: Vec<PathBuf>,
    #[arg(
        short,
        long,
        default_value = "pixi.toml",
        help = "Path of the pixi manifest to write"
    )]
    output: PathBuf,
    #[arg(short, long, help = "Overwrite the pixi manifest if it already exists")]
    force: bool,
    #[arg(
        long,
        help = "Print the pixi manifest instead of writing it (useful to check the result of the conversion)"
    )]
    dry_run: bool,
    #[arg(
        long,
        help = "Name of the workspace [default: name of the current directory]"
    )]
    name: Option<String>,
    #[arg(
        long = "platform",
        value_name = "PLATFORM",
        default_value = "linux-64",
        help = "Platform supported by the workspace, can be passed several times"
    )]
    platforms: Vec<String>,
    #[arg(
        long,
        help = "Keep the dependencies of each environment file in a separate feature and environment, instead of merging them"
    )]
    features: bool,
    #[arg(
        long,
        help = "Convert versions pinned with a single \"=\" (e.g. \"numpy=1.2\") to wildcards (e.g. \"1.2.*\"), as conda interprets them"
    )]
    wildcard_pins: bool,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

pub fn cli() {
    let cli = Cli::parse();

    logger::configure(cli.verbose.log_level_filter());

    let converter = Conda {
        converter_options: ConverterOptions {
            inputs: cli.inputs,
            output: cli.output,
            force: cli.force,
            dry_run: cli.dry_run,
            workspace_name: cli.name,
            platforms: cli.platforms,
            split_features: cli.features,
            wildcard_pins: cli.wildcard_pins,
        },
    };

    if let Err(e) = converter.convert_to_pixi() {
        error!("{e}");
        process::exit(1);
    }
}
