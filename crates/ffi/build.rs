use std::env;
use std::path::Path;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR");
    let header = Path::new(&crate_dir).join("../../GroveSimFFI.h");

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("GROVE_SIM_FFI_H".to_string()),
        documentation: true,
        cpp_compat: true,
        ..cbindgen::Config::default()
    };

    match cbindgen::generate_with_config(&crate_dir, config) {
        Ok(bindings) => {
            bindings.write_to_file(header);
        }
        Err(error) => panic!("GroveSimFFI.h generation failed: {error}"),
    }

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");
}
