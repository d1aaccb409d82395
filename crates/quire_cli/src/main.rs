//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quire_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use quire_core::{encode, Collection, CONTAINER_VERSION};

fn main() {
    println!("quire_core ping={}", quire_core::ping());
    println!("quire_core version={}", quire_core::core_version());
    println!("container format version={CONTAINER_VERSION}");

    // An empty collection encodes to a handful of bytes; a failure here
    // means the codec itself is broken.
    let collection = Collection::new();
    match encode(&collection) {
        Ok(bytes) => println!(
            "empty collection id={} encodes to {} bytes",
            collection.id,
            bytes.len()
        ),
        Err(err) => {
            eprintln!("container encode failed: {err}");
            std::process::exit(1);
        }
    }
}
