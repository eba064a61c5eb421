//! Build script for compiling the escape-time kernel to SPIR-V
fn main() {
    // Only build the kernel when a GPU backend is enabled
    #[cfg(feature = "wgpu")]
    build_spirv_kernel();
}

#[cfg(feature = "wgpu")]
fn build_spirv_kernel() {
    use spirv_builder::{MetadataPrintout, SpirvBuilder};
    use std::path::PathBuf;

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let kernel_path = PathBuf::from(manifest_dir).join("kernel");

    let result = SpirvBuilder::new(kernel_path, "spirv-unknown-vulkan1.1")
        .scalar_block_layout(true)
        .print_metadata(MetadataPrintout::Full)
        .build()
        .unwrap();

    println!(
        "cargo:warning=building SPIRV to: {}",
        result.module.unwrap_single().display()
    );

    // Export the kernel path for the runtime to use
    println!(
        "cargo:rustc-env=MANDELBROT_KERNEL_SPV_PATH={}",
        result.module.unwrap_single().display()
    );

    // The kernel crate exposes a single entry point
    println!(
        "cargo:rustc-env=MANDELBROT_KERNEL_SPV_ENTRY={}",
        result
            .entry_points
            .first()
            .map(String::as_str)
            .unwrap_or("mandelbrot_kernel")
    );
}
