//! Backend selection from cargo features: `cuda`, then `wgpu`, falling back to `ndarray`.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "cuda")] {
        pub type SelectedBackend = burn::backend::Cuda;
        pub const BACKEND_NAME: &str = "CUDA (NVIDIA GPU)";
    } else if #[cfg(feature = "wgpu")] {
        pub type SelectedBackend = burn::backend::Wgpu;
        pub const BACKEND_NAME: &str = "WGPU (GPU)";
    } else {
        pub type SelectedBackend = burn::backend::NdArray;
        pub const BACKEND_NAME: &str = "NdArray (CPU)";
    }
}

pub type SelectedDevice = <SelectedBackend as burn::tensor::backend::Backend>::Device;

/// Default device of the selected backend.
pub fn create_device() -> SelectedDevice {
    let device = SelectedDevice::default();
    tracing::info!(backend = BACKEND_NAME, ?device, "using backend");
    device
}
