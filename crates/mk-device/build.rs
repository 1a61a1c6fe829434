fn main() {
    println!("cargo:rerun-if-env-changed=MK_CUDA_LIB_DIR");

    if std::env::var_os("CARGO_FEATURE_CUDA").is_none() {
        return;
    }
    if let Ok(dir) = std::env::var("MK_CUDA_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
    }
    println!("cargo:rustc-link-lib=mkcuda");
    println!("cargo:rustc-link-lib=cudart");
}
