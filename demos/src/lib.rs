//! Demos for the `depth-layers` crate.
//!
//! ## Available Binaries
//!
//! - `ssim_map`: SSIM dissimilarity map between two images
//! - `decoder`: run a `DepthDecoder` over a random feature pyramid
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin ssim_map -- reference.png candidate.png --output map.png
//! cargo run --bin decoder -- --height 192 --width 640
//! ```

pub mod backend;
pub mod image_io;

pub use backend::{create_device, SelectedBackend, SelectedDevice, BACKEND_NAME};
pub use image_io::{image_to_tensor, load_image, map_to_image};

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
