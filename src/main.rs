use clap::Parser;
use miette::Result;
use pixsprite::cli::{Cli, Commands};
use pixsprite::discovery::load_manifest;
use pixsprite::output::{display_path, Printer};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::with_verbosity(cli.verbosity());

    let manifest = || -> pixsprite::Result<_> {
        let cwd = std::env::current_dir()?;
        let (manifest, source) = load_manifest(cli.config.as_deref(), &cwd)?;
        if let Some(path) = source {
            printer.verbose("Config", &display_path(&path));
        }
        Ok(manifest)
    };

    match cli.command {
        Commands::Pixelate(args) => {
            pixsprite::cli::pixelate::run(args, &manifest()?, &printer)?;
        }
        Commands::Pack(args) => {
            pixsprite::cli::pack::run(args, &manifest()?, &printer)?;
        }
        Commands::Init(args) => pixsprite::cli::init::run(args, &printer)?,
        Commands::Completions(args) => pixsprite::cli::completions::run(args)?,
    }

    Ok(())
}
