//! Platform detection utilities

use std::fs;

/// Detect whether a CUDA-capable GPU driver is present
///
/// Checks for the NVIDIA kernel driver in /proc and honours
/// `CUDA_VISIBLE_DEVICES`, where an empty value or `-1` hides every GPU.
pub fn cuda_available() -> bool {
    if let Ok(devices) = std::env::var("CUDA_VISIBLE_DEVICES") {
        if !devices_visible(&devices) {
            return false;
        }
    }

    fs::read_to_string("/proc/driver/nvidia/version").is_ok()
}

fn devices_visible(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "-1"
}
