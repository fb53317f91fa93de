//! Input handling
//!
//! Turn every evdev device into one character stream.
//! - Discovery of openable /dev/input/eventN nodes
//! - One reader thread per device, fanned into a shared channel
//! - A single translator resolving key codes with shift/caps state

pub mod cancel;
pub mod device;
pub mod discovery;
pub mod keycodes;
pub mod keymap;
pub mod reader;
pub mod translator;

pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use device::{EventDevice, EventKind, EvdevBackend, EvdevDevice, InputBackend, RawEvent};
pub use discovery::{discover_devices, DiscoveredDevice};
pub use keymap::{describe_symbol, KeyMap, Keymaps, Layout};
pub use reader::{
    run_reader, start_listening, EventReceiver, EventSender, ListenOptions, Listener, ReaderExit,
};
pub use translator::{
    process_events, run, ModifierState, ProcessExit, SymbolReceiver, SymbolSender, Translator,
};
