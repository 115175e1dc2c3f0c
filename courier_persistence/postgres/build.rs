//! Embeds the sql files in `migrations/` into the crate.
//!
//! Migrations are forward only and applied in lexicographical order of their
//! file names.

use std::path::{Path, PathBuf};

fn main() {
    println!("cargo::rerun-if-changed=migrations");

    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let mut files = dir
        .read_dir()
        .expect("Failed to read migrations directory")
        .map(|entry| entry.expect("Failed to read migrations directory entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
        .collect::<Vec<_>>();
    files.sort();

    let entries = files
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .expect("Invalid migration file name");
            format!("Migration {{ name: {name:?}, sql: include_str!({path:?}) }},")
        })
        .collect::<String>();

    let out = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is not set")).join("migrations.rs");
    std::fs::write(&out, format!("&[{entries}]")).expect("Failed to write migrations.rs");
    println!("cargo::rustc-env=MIGRATIONS={}", out.display());
}
