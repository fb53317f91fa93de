//! Per-device readers
//!
//! Every discovered device gets its own thread that blocks on the device
//! and forwards raw events into one shared unbounded channel. The channel
//! preserves each device's own read order; events from different devices
//! interleave in arrival order.
//!
//! Readers end when their device fails, when the receiving side of the
//! channel is gone, or when the owning [`Listener`] is shut down. In every
//! case the device handle is dropped (closed) on the way out.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::mpsc;

use super::device::{EventDevice, InputBackend, RawEvent};
use super::discovery::discover_devices;
use crate::config::ReaderConfig;
use crate::error::{InputError, Result};

/// Write side of the shared event channel
pub type EventSender = mpsc::UnboundedSender<RawEvent>;
/// Read side of the shared event channel (exactly one consumer)
pub type EventReceiver = mpsc::UnboundedReceiver<RawEvent>;

/// Why a reader loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderExit {
    /// The device returned a read error (usually unplugged)
    DeviceFailed,
    /// Nobody is consuming the event channel anymore
    SinkClosed,
    /// The listener asked readers to stop
    Stopped,
}

/// Reader settings
#[derive(Debug, Clone, Copy)]
pub struct ListenOptions {
    /// Longest a reader blocks before re-checking the stop flag
    pub poll_interval: Duration,
}

impl Default for ListenOptions {
    fn default() -> Self {
        Self::from_config(&ReaderConfig::default())
    }
}

impl ListenOptions {
    pub fn from_config(config: &ReaderConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
        }
    }
}

/// Pump events from one device into the shared sink until it ends.
pub fn run_reader<D: EventDevice>(
    mut device: D,
    sink: EventSender,
    stop: &AtomicBool,
    poll_interval: Duration,
) -> ReaderExit {
    loop {
        if stop.load(Ordering::Relaxed) {
            debug!("Reader for {} stopped", device.path().display());
            return ReaderExit::Stopped;
        }

        match device.read_event(poll_interval) {
            Ok(Some(event)) => {
                if sink.send(event).is_err() {
                    debug!("Event channel closed, reader for {} exiting", device.path().display());
                    return ReaderExit::SinkClosed;
                }
            }
            Ok(None) => {
                if sink.is_closed() {
                    debug!("Event channel closed, reader for {} exiting", device.path().display());
                    return ReaderExit::SinkClosed;
                }
            }
            Err(e) => {
                warn!("{}", e);
                return ReaderExit::DeviceFailed;
            }
        }
    }
}

struct ReaderHandle {
    path: PathBuf,
    thread: JoinHandle<ReaderExit>,
}

/// Owner of all running readers.
///
/// Dropping the listener raises the stop flag without waiting; call
/// [`Listener::shutdown`] to also join the threads.
pub struct Listener {
    stop: Arc<AtomicBool>,
    readers: Vec<ReaderHandle>,
}

impl Listener {
    fn new() -> Self {
        Self {
            stop: Arc::new(AtomicBool::new(false)),
            readers: Vec::new(),
        }
    }

    /// Start a reader thread for one device
    pub fn spawn<D: EventDevice + 'static>(
        &mut self,
        path: PathBuf,
        device: D,
        sink: EventSender,
        options: &ListenOptions,
    ) -> Result<()> {
        let stop = Arc::clone(&self.stop);
        let poll_interval = options.poll_interval;
        let thread_name = match path.file_name() {
            Some(name) => format!("evchar-{}", name.to_string_lossy()),
            None => "evchar-reader".to_string(),
        };

        let thread = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || run_reader(device, sink, &stop, poll_interval))
            .map_err(|source| InputError::Spawn {
                path: path.clone(),
                source,
            })?;

        self.readers.push(ReaderHandle { path, thread });
        Ok(())
    }

    /// Number of readers started (running or finished)
    pub fn device_count(&self) -> usize {
        self.readers.len()
    }

    /// Stop every reader, wait for them, and report how each one ended
    pub fn shutdown(mut self) -> Vec<(PathBuf, ReaderExit)> {
        self.stop.store(true, Ordering::Relaxed);

        let readers = std::mem::take(&mut self.readers);
        let mut exits = Vec::with_capacity(readers.len());
        for reader in readers {
            let exit = match reader.thread.join() {
                Ok(exit) => exit,
                Err(_) => {
                    warn!("Reader for {} panicked", reader.path.display());
                    ReaderExit::DeviceFailed
                }
            };
            exits.push((reader.path, exit));
        }

        info!("Stopped {} input readers", exits.len());
        exits
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Discover devices and start one reader per device.
///
/// Returns the listener (reader ownership) and the single receiving end of
/// the shared event channel. Zero devices is not an error.
pub fn start_listening<B: InputBackend>(
    backend: &B,
    options: &ListenOptions,
) -> Result<(Listener, EventReceiver)> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut listener = Listener::new();

    for found in discover_devices(backend) {
        listener.spawn(found.path, found.device, tx.clone(), options)?;
    }

    if listener.device_count() == 0 {
        warn!("No input devices could be opened. Check permissions for the input device nodes.");
    } else {
        info!("Listening on {} input devices", listener.device_count());
    }

    Ok((listener, rx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keycodes::{KEY_A, KEY_B, KEY_PRESS};
    use std::collections::VecDeque;
    use std::path::Path;

    /// Replays a script, then either fails or idles
    struct ScriptedDevice {
        path: PathBuf,
        events: VecDeque<RawEvent>,
        fail_at_end: bool,
    }

    impl EventDevice for ScriptedDevice {
        fn path(&self) -> &Path {
            &self.path
        }

        fn read_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>> {
            if let Some(event) = self.events.pop_front() {
                return Ok(Some(event));
            }
            if self.fail_at_end {
                return Err(InputError::DeviceRead {
                    path: self.path.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
                });
            }
            std::thread::sleep(timeout);
            Ok(None)
        }
    }

    fn scripted(events: Vec<RawEvent>, fail_at_end: bool) -> ScriptedDevice {
        ScriptedDevice {
            path: PathBuf::from("/dev/input/event0"),
            events: events.into(),
            fail_at_end,
        }
    }

    #[test]
    fn test_forwards_in_order_then_exits_on_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let stop = AtomicBool::new(false);
        let events = vec![RawEvent::key(KEY_A, KEY_PRESS), RawEvent::key(KEY_B, KEY_PRESS)];

        let exit = run_reader(scripted(events.clone(), true), tx, &stop, Duration::from_millis(1));
        assert_eq!(exit, ReaderExit::DeviceFailed);
        assert_eq!(rx.try_recv().unwrap(), events[0]);
        assert_eq!(rx.try_recv().unwrap(), events[1]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_exits_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let stop = AtomicBool::new(false);

        let exit = run_reader(scripted(vec![], false), tx, &stop, Duration::from_millis(1));
        assert_eq!(exit, ReaderExit::SinkClosed);
    }

    #[test]
    fn test_exits_when_stopped() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let stop = AtomicBool::new(true);

        let exit = run_reader(scripted(vec![], false), tx, &stop, Duration::from_millis(1));
        assert_eq!(exit, ReaderExit::Stopped);
    }

    #[test]
    fn test_listener_shutdown_joins_idle_readers() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut listener = Listener::new();
        let options = ListenOptions {
            poll_interval: Duration::from_millis(5),
        };
        listener
            .spawn(PathBuf::from("/dev/input/event0"), scripted(vec![], false), tx.clone(), &options)
            .unwrap();
        listener
            .spawn(PathBuf::from("/dev/input/event1"), scripted(vec![], false), tx, &options)
            .unwrap();
        assert_eq!(listener.device_count(), 2);

        let exits = listener.shutdown();
        assert_eq!(exits.len(), 2);
        assert!(exits.iter().all(|(_, exit)| *exit == ReaderExit::Stopped));
        assert_eq!(exits[0].0, PathBuf::from("/dev/input/event0"));
    }

    #[test]
    fn test_poll_interval_never_zero() {
        let options = ListenOptions::from_config(&ReaderConfig { poll_interval_ms: 0 });
        assert_eq!(options.poll_interval, Duration::from_millis(1));
    }
}
