//! Workspace build tasks: `cargo run -p galaxy-xtask -- <task>`.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(about = "Build tasks for the galaxy workspace")]
struct Cli {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Build the galaxy-ui panel and copy it into `crates/galaxy-ui/dist`,
    /// where the native binary embeds it.
    BuildUi {
        /// Build without optimizations.
        #[arg(long)]
        debug: bool,
    },
    /// Build the browser bundle into `web/pkg` with wasm-bindgen.
    BuildWeb,
}

fn main() -> Result<()> {
    let root = workspace_root()?;
    match Cli::parse().task {
        Task::BuildUi { debug } => build_ui(&root, debug),
        Task::BuildWeb => build_web(&root),
    }
}

fn workspace_root() -> Result<PathBuf> {
    let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

fn run(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("failed to launch {cmd:?}"))?;
    if !status.success() {
        bail!("{cmd:?} exited with {status}");
    }
    Ok(())
}

fn build_ui(root: &Path, debug: bool) -> Result<()> {
    let ui = root.join("crates/galaxy-ui");
    let profile = if debug { "debug" } else { "release" };

    let mut dx = Command::new("dx");
    let _ = dx.current_dir(&ui).args(["build", "--platform", "web"]);
    if !debug {
        let _ = dx.arg("--release");
    }
    run(&mut dx)?;

    let public = root
        .join("target/dx/galaxy-ui")
        .join(profile)
        .join("web/public");
    let dist = ui.join("dist");
    if dist.exists() {
        std::fs::remove_dir_all(&dist)
            .with_context(|| format!("clearing {}", dist.display()))?;
    }
    copy_dir(&public, &dist)?;
    println!("panel bundle copied to {}", dist.display());
    Ok(())
}

fn build_web(root: &Path) -> Result<()> {
    run(Command::new("cargo").current_dir(root).args([
        "rustc",
        "--release",
        "--lib",
        "--target",
        "wasm32-unknown-unknown",
        "--no-default-features",
        "--features",
        "web",
        "--crate-type",
        "cdylib",
    ]))?;

    let wasm = root.join("target/wasm32-unknown-unknown/release/galaxy.wasm");
    run(Command::new("wasm-bindgen").current_dir(root).args([
        "--target",
        "web",
        "--out-dir",
        "web/pkg",
    ]).arg(&wasm))?;
    println!("web bundle written to {}", root.join("web/pkg").display());
    Ok(())
}

fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    std::fs::create_dir_all(to)?;
    for entry in std::fs::read_dir(from)
        .with_context(|| format!("reading {}", from.display()))?
    {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            let _ = std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
