//! evchar - one character stream from every Linux input device
//!
//! # Architecture
//!
//! ```text
//! /dev/input/event0 ─ reader thread ─┐
//! /dev/input/event1 ─ reader thread ─┼─► event channel ─► Translator ─► char stream
//! /dev/input/eventN ─ reader thread ─┘   (unbounded)     (shift/caps)
//! ```
//!
//! ```no_run
//! use evchar::input::{cancel_pair, start_listening, EvdevBackend, ListenOptions, Translator};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let (listener, events) = start_listening(&EvdevBackend::default(), &ListenOptions::default())?;
//! let (out_tx, mut out_rx) = tokio::sync::mpsc::unbounded_channel();
//! let (handle, cancel) = cancel_pair();
//!
//! let translator = tokio::spawn(Translator::default().run(events, out_tx, cancel));
//! while let Some(sym) = out_rx.recv().await {
//!     if sym == 'q' {
//!         handle.cancel();
//!     }
//! }
//! translator.await?;
//! listener.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod input;

pub use error::{InputError, Result};
