use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // This tells Cargo to rerun this script if something in /assets/ changes.
    println!("cargo:rerun-if-changed=assets/");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");

    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    if assets_src.exists() {
        copy_items(&[&assets_src], &out_dir, &copy_options)?;
    }

    // Demos fall back to this copy when the configured asset dir lacks a file.
    println!(
        "cargo:rustc-env=LEARN_NGIN_BUNDLED_ASSETS={}",
        out_dir.join("assets").display()
    );

    Ok(())
}
