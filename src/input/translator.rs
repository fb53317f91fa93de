//! Raw event -> character translation
//!
//! The translator is the single consumer of the shared event channel. It
//! owns the modifier state outright, so nothing here is shared with the
//! reader threads.
//!
//! Shift and caps-lock drive one shared "shifted" flag: a shift press or
//! release flips it, and so does a caps-lock press. Caps-lock's own latch is
//! tracked separately for callers that want it, but it does not select a
//! table on its own.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::mpsc;

use super::cancel::CancelSignal;
use super::device::{EventKind, InputBackend, RawEvent};
use super::keycodes::{
    is_active, is_caps_lock, is_shift_key, KEY_PRESS, KEY_RELEASE, KEY_SCROLLDOWN, KEY_SCROLLUP,
    REL_WHEEL,
};
use super::keymap::{Keymaps, Layout};
use super::reader::{start_listening, EventReceiver, ListenOptions};
use crate::error::Result;

/// Write side of the output stream
pub type SymbolSender = mpsc::UnboundedSender<char>;
/// Read side of the output stream
pub type SymbolReceiver = mpsc::UnboundedReceiver<char>;

/// Modifier flags owned by the translator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    /// Selects the shifted table
    pub shift: bool,
    /// Caps-lock latch
    pub caps: bool,
}

/// Why [`Translator::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    Cancelled,
    /// Every reader (and every other sender) is gone
    SourceClosed,
    /// The output receiver was dropped
    OutputClosed,
}

/// Stateful raw event translator
#[derive(Debug, Clone)]
pub struct Translator {
    keymaps: Arc<Keymaps>,
    mods: ModifierState,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Keymaps::builtin(Layout::default()))
    }
}

impl Translator {
    pub fn new(keymaps: Arc<Keymaps>) -> Self {
        Self {
            keymaps,
            mods: ModifierState::default(),
        }
    }

    pub fn modifiers(&self) -> ModifierState {
        self.mods
    }

    /// Apply one event, returning the symbol it produces, if any
    pub fn translate(&mut self, event: &RawEvent) -> Option<char> {
        match event.kind {
            EventKind::Key => self.translate_key(event.code, event.value),
            EventKind::Relative if event.code == REL_WHEEL => self.translate_wheel(event.value),
            _ => None,
        }
    }

    fn translate_key(&mut self, code: u16, value: i32) -> Option<char> {
        if is_shift_key(code) {
            // Press and release flip; auto-repeat does not
            if value == KEY_RELEASE || value == KEY_PRESS {
                self.mods.shift = !self.mods.shift;
            }
        } else if is_caps_lock(code) && value == KEY_PRESS {
            self.mods.caps = !self.mods.caps;
            self.mods.shift = !self.mods.shift;
        }

        if !is_active(value) {
            return None;
        }
        self.keymaps.select(self.mods.shift).get(code)
    }

    fn translate_wheel(&self, value: i32) -> Option<char> {
        let code = match value {
            v if v > 0 => KEY_SCROLLUP,
            v if v < 0 => KEY_SCROLLDOWN,
            _ => return None,
        };
        self.keymaps.plain().get(code)
    }

    /// Consume `source` until cancelled, emitting symbols on `out`.
    ///
    /// Cancellation is checked before every event, so a steady stream of
    /// input cannot hold it off.
    pub async fn run(
        mut self,
        mut source: EventReceiver,
        out: SymbolSender,
        mut cancel: CancelSignal,
    ) -> ProcessExit {
        let exit = loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break ProcessExit::Cancelled,
                event = source.recv() => {
                    let Some(event) = event else {
                        break ProcessExit::SourceClosed;
                    };
                    if let Some(sym) = self.translate(&event) {
                        if out.send(sym).is_err() {
                            break ProcessExit::OutputClosed;
                        }
                    }
                }
            }
        };

        info!("Input translator finished: {:?}", exit);
        exit
    }
}

/// Run a default-layout translator over `source`. See [`Translator::run`].
pub async fn process_events(
    source: EventReceiver,
    out: SymbolSender,
    cancel: CancelSignal,
) -> ProcessExit {
    Translator::default().run(source, out, cancel).await
}

/// Listen on every device `backend` offers and translate until cancelled.
///
/// Readers are stopped and joined before returning, so every device handle
/// is closed by the time this resolves.
pub async fn run<B: InputBackend>(
    backend: &B,
    options: &ListenOptions,
    translator: Translator,
    out: SymbolSender,
    cancel: CancelSignal,
) -> Result<ProcessExit> {
    let (listener, events) = start_listening(backend, options)?;
    let exit = translator.run(events, out, cancel).await;

    match tokio::task::spawn_blocking(move || listener.shutdown()).await {
        Ok(exits) => {
            for (path, reader_exit) in exits {
                debug!("Reader {} ended: {:?}", path.display(), reader_exit);
            }
        }
        Err(e) => warn!("Reader shutdown task failed: {}", e),
    }
    Ok(exit)
}
