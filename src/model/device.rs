//! Device configuration for local inference.

use std::str::FromStr;

use crate::WhatFlowerError;

/// Compute device for local inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    /// CPU execution (default).
    #[default]
    Cpu,

    /// CUDA GPU execution.
    #[cfg(feature = "cuda")]
    Cuda {
        /// GPU device ID (0-indexed).
        device_id: u32,
    },
}

impl Device {
    /// Create CPU device.
    pub fn cpu() -> Self {
        Self::Cpu
    }

    /// Create CUDA device with the given device ID.
    #[cfg(feature = "cuda")]
    pub fn cuda(device_id: u32) -> Self {
        Self::Cuda { device_id }
    }

    /// Get the device name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            #[cfg(feature = "cuda")]
            Self::Cuda { .. } => "CUDA",
        }
    }
}

impl FromStr for Device {
    type Err = WhatFlowerError;

    /// Parse `"cpu"`, `"cuda"` or `"cuda:<id>"` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "cpu" {
            return Ok(Self::Cpu);
        }

        let Some(rest) = s.strip_prefix("cuda") else {
            return Err(WhatFlowerError::Configuration(format!(
                "Unknown device '{s}', expected \"cpu\" or \"cuda[:id]\""
            )));
        };
        let device_id = match rest.strip_prefix(':') {
            Some(id) => id.parse::<u32>().map_err(|e| {
                WhatFlowerError::Configuration(format!("Invalid CUDA device id '{id}': {e}"))
            })?,
            None if rest.is_empty() => 0,
            None => {
                return Err(WhatFlowerError::Configuration(format!(
                    "Unknown device '{s}', expected \"cpu\" or \"cuda[:id]\""
                )));
            }
        };

        cuda_device(device_id)
    }
}

#[cfg(feature = "cuda")]
fn cuda_device(device_id: u32) -> crate::Result<Device> {
    Ok(Device::Cuda { device_id })
}

#[cfg(not(feature = "cuda"))]
fn cuda_device(_device_id: u32) -> crate::Result<Device> {
    Err(WhatFlowerError::Configuration(
        "CUDA device requested but whatflower was built without the `cuda` feature".to_string(),
    ))
}
