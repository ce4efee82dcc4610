// Extension modules are loaded into an already running interpreter, which
// provides the Ruby/Python C API symbols at load time. The macOS linker
// rejects undefined symbols in a cdylib unless told to defer them.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    if std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() == "macos" {
        println!("cargo:rustc-cdylib-link-arg=-undefined");
        println!("cargo:rustc-cdylib-link-arg=dynamic_lookup");
    }
}
