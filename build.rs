//! Build script: tracks the embedded galaxy-ui bundle for rebuilds.

use std::path::Path;

fn main() {
    // Only needed when the gui feature is enabled.
    if std::env::var("CARGO_FEATURE_GUI").is_err() {
        return;
    }

    // Ensure the galaxy-ui dist directory exists so rust-embed compiles
    // even before `cargo run -p galaxy-xtask -- build-ui` has been run. A
    // placeholder index.html is created when the real build output is
    // absent.
    let dist = Path::new("crates/galaxy-ui/dist");
    if !dist.exists() {
        std::fs::create_dir_all(dist).expect("failed to create dist dir");
    }

    let index = dist.join("index.html");
    if !index.exists() {
        std::fs::write(
            &index,
            "<!DOCTYPE html><html><body>galaxy-ui not built</body></html>",
        )
        .expect("failed to write placeholder index.html");
    }

    println!("cargo:rerun-if-changed=crates/galaxy-ui/dist");
}
