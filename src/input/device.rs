//! evdev device access
//!
//! Devices are opened through the `evdev` crate and switched to
//! non-blocking mode, so a reader can give up waiting after a bounded
//! interval. The [`InputBackend`] and [`EventDevice`] traits are the seam
//! between the pipeline and the OS, so discovery and readers can run
//! against any event source.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use evdev::{Device, InputEvent};
use log::{debug, warn};
use nix::fcntl::{fcntl, FcntlArg, OFlag};

use super::keycodes::{EV_KEY, EV_REL};
use crate::config::DeviceConfig;
use crate::error::{InputError, Result};

/// Sleep between empty fetches while waiting for input
const IDLE_WAIT: Duration = Duration::from_millis(5);

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// EV_KEY
    Key,
    /// EV_REL
    Relative,
    /// Any other event type (sync, absolute, misc, ...)
    Other(u16),
}

impl From<u16> for EventKind {
    fn from(ty: u16) -> Self {
        match ty {
            EV_KEY => EventKind::Key,
            EV_REL => EventKind::Relative,
            other => EventKind::Other(other),
        }
    }
}

/// One raw event as delivered by a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawEvent {
    pub kind: EventKind,
    /// Key code or axis code
    pub code: u16,
    /// Key: 0=release, 1=press, 2=repeat. Axis: signed magnitude.
    pub value: i32,
}

impl RawEvent {
    pub fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    pub fn key(code: u16, value: i32) -> Self {
        Self::new(EventKind::Key, code, value)
    }

    pub fn relative(code: u16, value: i32) -> Self {
        Self::new(EventKind::Relative, code, value)
    }
}

impl From<&InputEvent> for RawEvent {
    fn from(ev: &InputEvent) -> Self {
        Self::new(EventKind::from(ev.event_type().0), ev.code(), ev.value())
    }
}

/// An opened input device, owned by exactly one reader.
///
/// Dropping the device closes it.
pub trait EventDevice: Send {
    /// Path the device was opened from
    fn path(&self) -> &Path;

    /// Wait up to `timeout` for the next event.
    ///
    /// `Ok(None)` means nothing arrived in time; an error means the device
    /// is gone and must not be read again.
    fn read_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>>;
}

/// Source of candidate devices
pub trait InputBackend {
    type Device: EventDevice + 'static;

    /// List candidate device paths, in enumeration order
    fn list_candidates(&self) -> Result<Vec<PathBuf>>;

    /// Open a candidate read-only
    fn open(&self, path: &Path) -> Result<Self::Device>;
}

/// Backend over the kernel's evdev nodes
#[derive(Debug, Clone)]
pub struct EvdevBackend {
    dir: PathBuf,
    prefix: String,
}

impl EvdevBackend {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(&config.dir, config.prefix.clone())
    }

    /// Keep prefixed entries, skipping unreadable ones, in numeric order
    fn collect_candidates(
        &self,
        entries: impl IntoIterator<Item = io::Result<PathBuf>>,
    ) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };
            let matches = path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with(&self.prefix))
                .unwrap_or(false);
            if matches {
                candidates.push(path);
            }
        }

        // event2 before event10
        candidates.sort_by(|a, b| {
            let key = |p: &Path| {
                let name = p.file_name().map(|n| n.to_string_lossy().into_owned());
                let index = name
                    .as_deref()
                    .and_then(|n| n.strip_prefix(self.prefix.as_str()))
                    .and_then(|n| n.parse::<u32>().ok());
                (index.unwrap_or(u32::MAX), name)
            };
            key(a).cmp(&key(b))
        });
        candidates
    }
}

impl Default for EvdevBackend {
    fn default() -> Self {
        Self::from_config(&DeviceConfig::default())
    }
}

impl InputBackend for EvdevBackend {
    type Device = EvdevDevice;

    fn list_candidates(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| InputError::Enumeration {
            dir: self.dir.clone(),
            source,
        })?;
        Ok(self.collect_candidates(entries.map(|entry| entry.map(|e| e.path()))))
    }

    fn open(&self, path: &Path) -> Result<EvdevDevice> {
        EvdevDevice::open(path)
    }
}

/// One opened /dev/input/eventN node
pub struct EvdevDevice {
    path: PathBuf,
    device: Device,
    /// Events fetched in the last batch but not yet handed out
    pending: VecDeque<RawEvent>,
}

impl fmt::Debug for EvdevDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvdevDevice")
            .field("path", &self.path)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl EvdevDevice {
    /// Open a device read-only and switch it to non-blocking reads
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |source| InputError::DeviceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let device = Device::open(path).map_err(unavailable)?;
        set_nonblocking(&device).map_err(unavailable)?;

        Ok(Self {
            path: path.to_path_buf(),
            device,
            pending: VecDeque::new(),
        })
    }

    /// Device name as reported by the kernel
    pub fn name(&self) -> Option<String> {
        self.device.name().map(str::to_string)
    }

    /// Fetch whatever the kernel has buffered into `pending`.
    /// Returns false if nothing was available.
    fn fill(&mut self) -> Result<bool> {
        match self.device.fetch_events() {
            Ok(events) => self.pending.extend(events.map(|ev| RawEvent::from(&ev))),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(false),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(false),
            Err(source) => {
                return Err(InputError::DeviceRead {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        Ok(!self.pending.is_empty())
    }
}

impl EventDevice for EvdevDevice {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }
            if self.fill()? {
                continue;
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            std::thread::sleep(IDLE_WAIT.min(deadline - now));
        }
    }
}

/// Preserve the existing file flags and add O_NONBLOCK
fn set_nonblocking(device: &Device) -> io::Result<()> {
    let fd = device.as_raw_fd();
    let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
    fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    Ok(())
}

impl Drop for EvdevDevice {
    fn drop(&mut self) {
        debug!("Closing input device {}", self.path.display());
    }
}
