use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use galaxy::{Options, Viewer};

/// Procedural spiral galaxy with a live options panel.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML preset to start from (the panel's save button writes here).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Directory holding the planet's rock textures.
    #[arg(long, default_value = "assets/textures")]
    textures: PathBuf,

    /// Window title.
    #[arg(long, default_value = "Galaxy")]
    title: String,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args = Args::parse();

    let mut builder = Viewer::builder()
        .with_title(args.title)
        .with_textures(args.textures);

    if let Some(path) = args.options {
        let options = if path.exists() {
            match Options::load(&path) {
                Ok(options) => options,
                Err(e) => {
                    log::error!("{}: {e}", path.display());
                    return ExitCode::FAILURE;
                }
            }
        } else {
            log::info!("{} not found, starting from defaults", path.display());
            Options::default()
        };
        builder = builder.with_options(options).with_options_path(path);
    }

    match builder.build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
