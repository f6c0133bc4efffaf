use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let header = PathBuf::from(&crate_dir).join("include").join("post_sync.h");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("POST_SYNC_H")
        .generate()
    {
        Ok(bindings) => {
            if let Some(dir) = header.parent() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    println!("cargo:warning=cannot create {}: {e}", dir.display());
                    return;
                }
            }
            let mut contents = Vec::new();
            bindings.write(&mut contents);
            // Leave an unchanged header untouched so dependents don't rebuild.
            if std::fs::read(&header).ok().as_deref() == Some(contents.as_slice()) {
                return;
            }
            if let Err(e) = std::fs::write(&header, contents) {
                println!("cargo:warning=cannot write {}: {e}", header.display());
            }
        }
        Err(e) => println!("cargo:warning=cbindgen skipped header generation: {e}"),
    }
}
