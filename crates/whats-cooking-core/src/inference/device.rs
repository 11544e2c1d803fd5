//! Device selection for inference.

use candle_core::Device;
use tracing::info;

/// Returns the device to run inference on.
///
/// With `prefer_gpu`, uses Metal on macOS or CUDA on Linux/Windows when the
/// corresponding feature is enabled and a device is present. Falls back to CPU.
#[must_use]
pub fn get_device(prefer_gpu: bool) -> Device {
    if prefer_gpu {
        #[cfg(feature = "metal")]
        {
            if let Ok(device) = Device::new_metal(0) {
                info!("Using Metal device for inference");
                return device;
            }
        }

        #[cfg(feature = "cuda")]
        {
            if let Ok(device) = Device::new_cuda(0) {
                info!("Using CUDA device for inference");
                return device;
            }
        }
    }

    info!("Using CPU for inference");
    Device::Cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_when_gpu_not_preferred() {
        assert!(matches!(get_device(false), Device::Cpu));
    }

    #[test]
    fn test_get_device_returns_valid_device() {
        let _device = get_device(true);
    }
}
