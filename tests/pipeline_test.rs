//! End-to-end pipeline tests over an in-memory device backend

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use evchar::input::keycodes::*;
use evchar::input::keymap::SYM_SCROLLUP;
use evchar::input::{
    cancel_pair, discover_devices, process_events, run, start_listening, EventDevice,
    InputBackend, ListenOptions, ProcessExit, RawEvent, ReaderExit, Translator,
};
use evchar::{InputError, Result};
use tokio::sync::mpsc;

/// How a fake device behaves once its script runs out
#[derive(Clone)]
enum AfterScript {
    Fail,
    Idle,
    /// Deliver whatever the test pushes into the queue later
    Live(Arc<Mutex<VecDeque<RawEvent>>>),
}

struct FakeDevice {
    path: PathBuf,
    script: VecDeque<RawEvent>,
    after: AfterScript,
    closed: Arc<Mutex<Vec<PathBuf>>>,
}

impl EventDevice for FakeDevice {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>> {
        if let Some(event) = self.script.pop_front() {
            return Ok(Some(event));
        }
        match &self.after {
            AfterScript::Fail => Err(InputError::DeviceRead {
                path: self.path.clone(),
                source: std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
            }),
            AfterScript::Idle => {
                std::thread::sleep(timeout);
                Ok(None)
            }
            AfterScript::Live(queue) => {
                if let Some(event) = queue.lock().unwrap().pop_front() {
                    return Ok(Some(event));
                }
                std::thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        self.closed.lock().unwrap().push(self.path.clone());
    }
}

#[derive(Default)]
struct FakeBackend {
    order: Vec<PathBuf>,
    scripts: HashMap<PathBuf, (Vec<RawEvent>, AfterScript)>,
    closed: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeBackend {
    fn device(mut self, path: &str, events: Vec<RawEvent>, after: AfterScript) -> Self {
        self.order.push(PathBuf::from(path));
        self.scripts.insert(PathBuf::from(path), (events, after));
        self
    }

    /// Listed but refuses to open
    fn locked(mut self, path: &str) -> Self {
        self.order.push(PathBuf::from(path));
        self
    }
}

impl InputBackend for FakeBackend {
    type Device = FakeDevice;

    fn list_candidates(&self) -> Result<Vec<PathBuf>> {
        Ok(self.order.clone())
    }

    fn open(&self, path: &Path) -> Result<FakeDevice> {
        let (events, after) = self.scripts.get(path).cloned().ok_or_else(|| {
            InputError::DeviceUnavailable {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }
        })?;
        Ok(FakeDevice {
            path: path.to_path_buf(),
            script: events.into(),
            after,
            closed: Arc::clone(&self.closed),
        })
    }
}

fn fast() -> ListenOptions {
    ListenOptions {
        poll_interval: Duration::from_millis(5),
    }
}

fn press(code: u16) -> RawEvent {
    RawEvent::key(code, KEY_PRESS)
}

fn release(code: u16) -> RawEvent {
    RawEvent::key(code, KEY_RELEASE)
}

#[test]
fn discovery_keeps_openable_devices_in_order() {
    let backend = FakeBackend::default()
        .device("/dev/input/event0", vec![], AfterScript::Idle)
        .locked("/dev/input/event1")
        .device("/dev/input/event2", vec![], AfterScript::Idle);

    let paths: Vec<PathBuf> = discover_devices(&backend).into_iter().map(|d| d.path).collect();
    assert_eq!(
        paths,
        vec![PathBuf::from("/dev/input/event0"), PathBuf::from("/dev/input/event2")]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn single_device_shift_sequence() {
    let backend = FakeBackend::default().device(
        "/dev/input/event0",
        vec![
            press(KEY_A),
            press(KEY_LEFTSHIFT),
            press(KEY_A),
            release(KEY_LEFTSHIFT),
            press(KEY_A),
        ],
        AfterScript::Fail,
    );

    let (listener, events) = start_listening(&backend, &fast()).unwrap();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let (_handle, cancel) = cancel_pair();

    // The only reader fails after its script, so the source closes on its own
    let exit = process_events(events, out_tx, cancel).await;
    assert_eq!(exit, ProcessExit::SourceClosed);

    let mut out = Vec::new();
    while let Some(sym) = out_rx.recv().await {
        out.push(sym);
    }
    assert_eq!(out, vec!['a', 'A', 'a']);

    let exits = listener.shutdown();
    assert_eq!(exits, vec![(PathBuf::from("/dev/input/event0"), ReaderExit::DeviceFailed)]);
    assert_eq!(*backend.closed.lock().unwrap(), vec![PathBuf::from("/dev/input/event0")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_devices_fan_in() {
    let backend = FakeBackend::default()
        .device(
            "/dev/input/event0",
            vec![press(KEY_H), press(KEY_I)],
            AfterScript::Fail,
        )
        .device(
            "/dev/input/event1",
            vec![
                RawEvent::relative(REL_X, 4),
                RawEvent::relative(REL_WHEEL, 1),
                RawEvent::relative(REL_WHEEL, 0),
            ],
            AfterScript::Fail,
        );

    let (listener, events) = start_listening(&backend, &fast()).unwrap();
    assert_eq!(listener.device_count(), 2);

    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let (_handle, cancel) = cancel_pair();
    let exit = process_events(events, out_tx, cancel).await;
    assert_eq!(exit, ProcessExit::SourceClosed);

    let mut out = Vec::new();
    while let Some(sym) = out_rx.recv().await {
        out.push(sym);
    }

    // Cross-device order is unspecified; per-device order is kept
    assert_eq!(out.len(), 3);
    let h = out.iter().position(|&c| c == 'h').unwrap();
    let i = out.iter().position(|&c| c == 'i').unwrap();
    assert!(h < i);
    assert!(out.contains(&SYM_SCROLLUP));

    listener.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancel_while_waiting_stops_translator_and_readers() {
    let live = Arc::new(Mutex::new(VecDeque::new()));
    let backend = FakeBackend::default()
        .device("/dev/input/event0", vec![], AfterScript::Live(Arc::clone(&live)))
        .device("/dev/input/event1", vec![], AfterScript::Idle);

    let (listener, events) = start_listening(&backend, &fast()).unwrap();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let (handle, cancel) = cancel_pair();

    let translator = tokio::spawn(process_events(events, out_tx, cancel));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!translator.is_finished());

    handle.cancel();
    // Input arriving after cancellation must not come out
    live.lock().unwrap().push_back(press(KEY_A));
    tokio::time::sleep(Duration::from_millis(20)).await;

    let exit = tokio::time::timeout(Duration::from_secs(1), translator)
        .await
        .expect("translator did not stop after cancel")
        .unwrap();
    assert_eq!(exit, ProcessExit::Cancelled);
    assert_eq!(out_rx.recv().await, None);

    let exits = listener.shutdown();
    assert_eq!(exits.len(), 2);
    assert!(exits.iter().all(|(_, exit)| *exit != ReaderExit::DeviceFailed));

    let mut closed = backend.closed.lock().unwrap().clone();
    closed.sort();
    assert_eq!(
        closed,
        vec![PathBuf::from("/dev/input/event0"), PathBuf::from("/dev/input/event1")]
    );
}

#[test]
fn no_devices_is_not_an_error() {
    let backend = FakeBackend::default().locked("/dev/input/event0");
    let (listener, _events) = start_listening(&backend, &fast()).unwrap();
    assert_eq!(listener.device_count(), 0);
    assert!(listener.shutdown().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn run_closes_every_device_on_cancel() {
    let backend = FakeBackend::default()
        .device("/dev/input/event0", vec![press(KEY_X)], AfterScript::Idle)
        .device("/dev/input/event1", vec![], AfterScript::Idle);

    let (out_tx, mut out_rx) = mpsc::unbounded_channel();
    let (handle, cancel) = cancel_pair();

    let consumer = tokio::spawn(async move {
        let first = out_rx.recv().await;
        handle.cancel();
        first
    });

    let exit = run(&backend, &fast(), Translator::default(), out_tx, cancel)
        .await
        .unwrap();
    assert_eq!(exit, ProcessExit::Cancelled);
    assert_eq!(consumer.await.unwrap(), Some('x'));
    assert_eq!(backend.closed.lock().unwrap().len(), 2);
}
