//! Device discovery
//!
//! One-shot snapshot of the devices that can actually be opened right now.
//! Handles stay open and are handed to the readers as-is.

use std::path::PathBuf;

use log::{debug, info, warn};

use super::device::InputBackend;

/// A device that opened successfully during discovery
#[derive(Debug)]
pub struct DiscoveredDevice<D> {
    pub path: PathBuf,
    pub device: D,
}

/// Open every candidate the backend lists, keeping those that succeed.
///
/// Open failures are expected (permissions, devices vanishing mid-scan) and
/// only drop the device. An enumeration failure yields an empty list.
/// Order follows the backend's candidate order.
pub fn discover_devices<B: InputBackend>(backend: &B) -> Vec<DiscoveredDevice<B::Device>> {
    let candidates = match backend.list_candidates() {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("{}", e);
            return Vec::new();
        }
    };

    let total = candidates.len();
    let mut devices = Vec::with_capacity(total);
    for path in candidates {
        match backend.open(&path) {
            Ok(device) => {
                debug!("Input device available: {}", path.display());
                devices.push(DiscoveredDevice { path, device });
            }
            Err(e) => debug!("Skipping input device: {}", e),
        }
    }

    info!("Discovered {} of {} input devices", devices.len(), total);
    devices
}
