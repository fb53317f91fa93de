//! Key code to character tables
//!
//! Two tables exist per layout: one for the unshifted state and one for the
//! shifted state. Only the shift-sensitive keys (letters and the symbol keys)
//! differ between them; control, keypad, navigation and media keys are
//! shared so both tables resolve them identically.
//!
//! Navigation and media keys have no character of their own. They resolve to
//! the synthetic code point `0x100 | keycode` (Home = U+0166), which keeps
//! them out of the ASCII range while still fitting in a `char`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use super::keycodes::*;

/// Map an evdev key code onto its synthetic symbol (`0x100 | code`)
pub const fn synthetic(code: u16) -> char {
    match char::from_u32(0x100 | code as u32) {
        Some(c) => c,
        None => char::REPLACEMENT_CHARACTER,
    }
}

/// Carriage return (Enter, keypad Enter, OK, Select)
pub const SYM_ENTER: char = '\r';
/// Escape
pub const SYM_ESC: char = '\u{1b}';
/// Backspace
pub const SYM_BACKSPACE: char = '\u{8}';
pub const SYM_TAB: char = '\t';

pub const SYM_HOME: char = synthetic(KEY_HOME);
pub const SYM_UP: char = synthetic(KEY_UP);
pub const SYM_PAGEUP: char = synthetic(KEY_PAGEUP);
pub const SYM_LEFT: char = synthetic(KEY_LEFT);
pub const SYM_RIGHT: char = synthetic(KEY_RIGHT);
pub const SYM_END: char = synthetic(KEY_END);
pub const SYM_DOWN: char = synthetic(KEY_DOWN);
pub const SYM_PAGEDOWN: char = synthetic(KEY_PAGEDOWN);
pub const SYM_INSERT: char = synthetic(KEY_INSERT);
pub const SYM_DELETE: char = synthetic(KEY_DELETE);
pub const SYM_MUTE: char = synthetic(KEY_MUTE);
pub const SYM_VOLUMEDOWN: char = synthetic(KEY_VOLUMEDOWN);
pub const SYM_VOLUMEUP: char = synthetic(KEY_VOLUMEUP);
pub const SYM_POWER: char = synthetic(KEY_POWER);
pub const SYM_PAUSE: char = synthetic(KEY_PAUSE);
pub const SYM_STOP: char = synthetic(KEY_STOP);
pub const SYM_MENU: char = synthetic(KEY_MENU);
pub const SYM_BACK: char = synthetic(KEY_BACK);
pub const SYM_FORWARD: char = synthetic(KEY_FORWARD);
pub const SYM_NEXTSONG: char = synthetic(KEY_NEXTSONG);
pub const SYM_PLAYPAUSE: char = synthetic(KEY_PLAYPAUSE);
pub const SYM_PREVIOUSSONG: char = synthetic(KEY_PREVIOUSSONG);
pub const SYM_REWIND: char = synthetic(KEY_REWIND);
/// Wheel moved up one or more notches
pub const SYM_SCROLLUP: char = synthetic(KEY_SCROLLUP);
/// Wheel moved down one or more notches
pub const SYM_SCROLLDOWN: char = synthetic(KEY_SCROLLDOWN);
pub const SYM_PLAY: char = synthetic(KEY_PLAY);
pub const SYM_FASTFORWARD: char = synthetic(KEY_FASTFORWARD);
pub const SYM_BASSBOOST: char = synthetic(KEY_BASSBOOST);
pub const SYM_SEARCH: char = synthetic(KEY_SEARCH);

/// Keys that resolve the same way regardless of shift state
const SHIFT_INVARIANT: &[(u16, char)] = &[
    (KEY_ESC, SYM_ESC),
    (KEY_BACKSPACE, SYM_BACKSPACE),
    (KEY_TAB, SYM_TAB),
    (KEY_ENTER, SYM_ENTER),
    (KEY_SPACE, ' '),
    // Keypad
    (KEY_KPASTERISK, '*'),
    (KEY_KP7, '7'),
    (KEY_KP8, '8'),
    (KEY_KP9, '9'),
    (KEY_KPMINUS, '-'),
    (KEY_KP4, '4'),
    (KEY_KP5, '5'),
    (KEY_KP6, '6'),
    (KEY_KPPLUS, '+'),
    (KEY_KP1, '1'),
    (KEY_KP2, '2'),
    (KEY_KP3, '3'),
    (KEY_KP0, '0'),
    (KEY_KPDOT, '.'),
    (KEY_KPENTER, SYM_ENTER),
    (KEY_KPSLASH, '/'),
    (KEY_KPEQUAL, '='),
    (KEY_KPCOMMA, ','),
    (KEY_KPLEFTPAREN, '('),
    (KEY_KPRIGHTPAREN, ')'),
    // Navigation
    (KEY_HOME, SYM_HOME),
    (KEY_UP, SYM_UP),
    (KEY_PAGEUP, SYM_PAGEUP),
    (KEY_LEFT, SYM_LEFT),
    (KEY_RIGHT, SYM_RIGHT),
    (KEY_END, SYM_END),
    (KEY_DOWN, SYM_DOWN),
    (KEY_PAGEDOWN, SYM_PAGEDOWN),
    (KEY_INSERT, SYM_INSERT),
    (KEY_DELETE, SYM_DELETE),
    // Multimedia / system
    (KEY_MUTE, SYM_MUTE),
    (KEY_VOLUMEDOWN, SYM_VOLUMEDOWN),
    (KEY_VOLUMEUP, SYM_VOLUMEUP),
    (KEY_POWER, SYM_POWER),
    (KEY_PAUSE, SYM_PAUSE),
    (KEY_STOP, SYM_STOP),
    (KEY_MENU, SYM_MENU),
    (KEY_BACK, SYM_BACK),
    (KEY_FORWARD, SYM_FORWARD),
    (KEY_NEXTSONG, SYM_NEXTSONG),
    (KEY_PLAYPAUSE, SYM_PLAYPAUSE),
    (KEY_PREVIOUSSONG, SYM_PREVIOUSSONG),
    (KEY_REWIND, SYM_REWIND),
    (KEY_SCROLLUP, SYM_SCROLLUP),
    (KEY_SCROLLDOWN, SYM_SCROLLDOWN),
    (KEY_PLAY, SYM_PLAY),
    (KEY_FASTFORWARD, SYM_FASTFORWARD),
    (KEY_BASSBOOST, SYM_BASSBOOST),
    (KEY_SEARCH, SYM_SEARCH),
    // Remote control / phone pad
    (KEY_OK, SYM_ENTER),
    (KEY_SELECT, SYM_ENTER),
    (KEY_NUMERIC_0, '0'),
    (KEY_NUMERIC_1, '1'),
    (KEY_NUMERIC_2, '2'),
    (KEY_NUMERIC_3, '3'),
    (KEY_NUMERIC_4, '4'),
    (KEY_NUMERIC_5, '5'),
    (KEY_NUMERIC_6, '6'),
    (KEY_NUMERIC_7, '7'),
    (KEY_NUMERIC_8, '8'),
    (KEY_NUMERIC_9, '9'),
    (KEY_NUMERIC_STAR, '*'),
    (KEY_NUMERIC_POUND, '#'),
];

const LETTERS: &[(u16, char)] = &[
    (KEY_Q, 'q'),
    (KEY_W, 'w'),
    (KEY_E, 'e'),
    (KEY_R, 'r'),
    (KEY_T, 't'),
    (KEY_Y, 'y'),
    (KEY_U, 'u'),
    (KEY_I, 'i'),
    (KEY_O, 'o'),
    (KEY_P, 'p'),
    (KEY_A, 'a'),
    (KEY_S, 's'),
    (KEY_D, 'd'),
    (KEY_F, 'f'),
    (KEY_G, 'g'),
    (KEY_H, 'h'),
    (KEY_J, 'j'),
    (KEY_K, 'k'),
    (KEY_L, 'l'),
    (KEY_Z, 'z'),
    (KEY_X, 'x'),
    (KEY_C, 'c'),
    (KEY_V, 'v'),
    (KEY_B, 'b'),
    (KEY_N, 'n'),
    (KEY_M, 'm'),
];

// (code, unshifted, shifted)
const GB_SYMBOLS: &[(u16, char, char)] = &[
    (KEY_1, '1', '!'),
    (KEY_2, '2', '"'),
    (KEY_3, '3', '£'),
    (KEY_4, '4', '$'),
    (KEY_5, '5', '%'),
    (KEY_6, '6', '^'),
    (KEY_7, '7', '&'),
    (KEY_8, '8', '*'),
    (KEY_9, '9', '('),
    (KEY_0, '0', ')'),
    (KEY_MINUS, '-', '_'),
    (KEY_EQUAL, '=', '+'),
    (KEY_LEFTBRACE, '[', '{'),
    (KEY_RIGHTBRACE, ']', '}'),
    (KEY_SEMICOLON, ';', ':'),
    (KEY_APOSTROPHE, '\'', '@'),
    (KEY_BACKSLASH, '#', '~'),
    (KEY_COMMA, ',', '<'),
    (KEY_DOT, '.', '>'),
    (KEY_SLASH, '/', '?'),
];

const US_SYMBOLS: &[(u16, char, char)] = &[
    (KEY_1, '1', '!'),
    (KEY_2, '2', '@'),
    (KEY_3, '3', '#'),
    (KEY_4, '4', '$'),
    (KEY_5, '5', '%'),
    (KEY_6, '6', '^'),
    (KEY_7, '7', '&'),
    (KEY_8, '8', '*'),
    (KEY_9, '9', '('),
    (KEY_0, '0', ')'),
    (KEY_MINUS, '-', '_'),
    (KEY_EQUAL, '=', '+'),
    (KEY_LEFTBRACE, '[', '{'),
    (KEY_RIGHTBRACE, ']', '}'),
    (KEY_SEMICOLON, ';', ':'),
    (KEY_APOSTROPHE, '\'', '"'),
    (KEY_BACKSLASH, '\\', '|'),
    (KEY_COMMA, ',', '<'),
    (KEY_DOT, '.', '>'),
    (KEY_SLASH, '/', '?'),
];

/// Physical keyboard layout the symbol row is interpreted with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// UK layout (`"` on Shift+2, `£` on Shift+3, `#`/`~` next to Enter)
    #[default]
    Gb,
    /// US layout
    Us,
}

impl Layout {
    fn symbols(self) -> &'static [(u16, char, char)] {
        match self {
            Layout::Gb => GB_SYMBOLS,
            Layout::Us => US_SYMBOLS,
        }
    }
}

/// Immutable key code -> character mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    entries: HashMap<u16, char>,
}

impl KeyMap {
    fn from_entries(entries: impl IntoIterator<Item = (u16, char)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Resolve a key code. `None` means the key has no printable resolution.
    #[inline]
    pub fn get(&self, code: u16) -> Option<char> {
        self.entries.get(&code).copied()
    }

    pub fn contains(&self, code: u16) -> bool {
        self.entries.contains_key(&code)
    }

    /// Iterate over all (code, symbol) pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (u16, char)> + '_ {
        self.entries.iter().map(|(&code, &sym)| (code, sym))
    }
}

/// The plain/shifted table pair used by the translator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymaps {
    plain: KeyMap,
    shifted: KeyMap,
}

impl Keymaps {
    /// Build both tables for a layout
    pub fn new(layout: Layout) -> Self {
        let symbols = layout.symbols();

        let plain = KeyMap::from_entries(
            SHIFT_INVARIANT
                .iter()
                .copied()
                .chain(LETTERS.iter().copied())
                .chain(symbols.iter().map(|&(code, plain, _)| (code, plain))),
        );
        let shifted = KeyMap::from_entries(
            SHIFT_INVARIANT
                .iter()
                .copied()
                .chain(LETTERS.iter().map(|&(code, c)| (code, c.to_ascii_uppercase())))
                .chain(symbols.iter().map(|&(code, _, shifted)| (code, shifted))),
        );

        Self { plain, shifted }
    }

    /// Shared built-in tables, constructed on first use
    pub fn builtin(layout: Layout) -> Arc<Keymaps> {
        static GB: OnceLock<Arc<Keymaps>> = OnceLock::new();
        static US: OnceLock<Arc<Keymaps>> = OnceLock::new();

        let cell = match layout {
            Layout::Gb => &GB,
            Layout::Us => &US,
        };
        cell.get_or_init(|| Arc::new(Keymaps::new(layout))).clone()
    }

    /// Build tables for a layout, then apply per-code overrides
    pub fn with_overrides(
        layout: Layout,
        plain: impl IntoIterator<Item = (u16, char)>,
        shifted: impl IntoIterator<Item = (u16, char)>,
    ) -> Self {
        let mut maps = Self::new(layout);
        maps.plain.entries.extend(plain);
        maps.shifted.entries.extend(shifted);
        maps
    }

    pub fn plain(&self) -> &KeyMap {
        &self.plain
    }

    pub fn shifted(&self) -> &KeyMap {
        &self.shifted
    }

    /// Table selected by the current shift state
    #[inline]
    pub fn select(&self, shift: bool) -> &KeyMap {
        if shift {
            &self.shifted
        } else {
            &self.plain
        }
    }
}

impl Default for Keymaps {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}

/// Name of a control or synthetic symbol, if it has one
pub fn symbol_name(sym: char) -> Option<&'static str> {
    let name = match sym {
        SYM_ENTER => "ENTER",
        SYM_ESC => "ESC",
        SYM_BACKSPACE => "BACKSPACE",
        SYM_TAB => "TAB",
        SYM_HOME => "HOME",
        SYM_UP => "UP",
        SYM_PAGEUP => "PAGEUP",
        SYM_LEFT => "LEFT",
        SYM_RIGHT => "RIGHT",
        SYM_END => "END",
        SYM_DOWN => "DOWN",
        SYM_PAGEDOWN => "PAGEDOWN",
        SYM_INSERT => "INSERT",
        SYM_DELETE => "DELETE",
        SYM_MUTE => "MUTE",
        SYM_VOLUMEDOWN => "VOLUMEDOWN",
        SYM_VOLUMEUP => "VOLUMEUP",
        SYM_POWER => "POWER",
        SYM_PAUSE => "PAUSE",
        SYM_STOP => "STOP",
        SYM_MENU => "MENU",
        SYM_BACK => "BACK",
        SYM_FORWARD => "FORWARD",
        SYM_NEXTSONG => "NEXTSONG",
        SYM_PLAYPAUSE => "PLAYPAUSE",
        SYM_PREVIOUSSONG => "PREVIOUSSONG",
        SYM_REWIND => "REWIND",
        SYM_SCROLLUP => "SCROLLUP",
        SYM_SCROLLDOWN => "SCROLLDOWN",
        SYM_PLAY => "PLAY",
        SYM_FASTFORWARD => "FASTFORWARD",
        SYM_BASSBOOST => "BASSBOOST",
        SYM_SEARCH => "SEARCH",
        _ => return None,
    };
    Some(name)
}

/// Format a symbol as `U+XXXX` followed by its name or quoted character
pub fn describe_symbol(sym: char) -> String {
    match symbol_name(sym) {
        Some(name) => format!("U+{:04X} {}", sym as u32, name),
        None if sym.is_control() => format!("U+{:04X}", sym as u32),
        None => format!("U+{:04X} '{}'", sym as u32, sym),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_codes() {
        assert_eq!(SYM_HOME as u32, 102 | 0x100);
        assert_eq!(SYM_SCROLLUP as u32, 177 | 0x100);
        assert_eq!(SYM_SEARCH as u32, 217 | 0x100);
    }

    #[test]
    fn test_same_codes_in_both_tables() {
        for layout in [Layout::Gb, Layout::Us] {
            let maps = Keymaps::new(layout);
            assert_eq!(maps.plain().iter().count(), maps.shifted().iter().count());
            for (code, _) in maps.plain().iter() {
                assert!(maps.shifted().contains(code), "code {} missing from shifted", code);
            }
        }
    }

    #[test]
    fn test_shift_invariant_keys() {
        let maps = Keymaps::default();
        for &(code, sym) in SHIFT_INVARIANT {
            assert_eq!(maps.plain().get(code), Some(sym));
            assert_eq!(maps.shifted().get(code), Some(sym));
        }
    }

    #[test]
    fn test_only_shift_sensitive_keys_differ() {
        let maps = Keymaps::default();
        for (code, plain) in maps.plain().iter() {
            let shifted = maps.shifted().get(code);
            let sensitive = LETTERS.iter().any(|&(c, _)| c == code)
                || GB_SYMBOLS.iter().any(|&(c, _, _)| c == code);
            if !sensitive {
                assert_eq!(shifted, Some(plain), "code {} changed under shift", code);
            }
        }
    }

    #[test]
    fn test_letters_case() {
        let maps = Keymaps::default();
        for &(code, lower) in LETTERS {
            assert!(lower.is_ascii_lowercase());
            assert_eq!(maps.plain().get(code), Some(lower));
            assert_eq!(maps.shifted().get(code), Some(lower.to_ascii_uppercase()));
        }
    }

    #[test]
    fn test_gb_symbol_row() {
        let maps = Keymaps::builtin(Layout::Gb);
        assert_eq!(maps.shifted().get(KEY_2), Some('"'));
        assert_eq!(maps.shifted().get(KEY_3), Some('£'));
        assert_eq!(maps.plain().get(KEY_BACKSLASH), Some('#'));
        assert_eq!(maps.shifted().get(KEY_APOSTROPHE), Some('@'));
    }

    #[test]
    fn test_us_symbol_row() {
        let maps = Keymaps::builtin(Layout::Us);
        assert_eq!(maps.shifted().get(KEY_2), Some('@'));
        assert_eq!(maps.shifted().get(KEY_3), Some('#'));
        assert_eq!(maps.plain().get(KEY_BACKSLASH), Some('\\'));
        assert_eq!(maps.shifted().get(KEY_APOSTROPHE), Some('"'));
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = Keymaps::builtin(Layout::Gb);
        let b = Keymaps::builtin(Layout::Gb);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_modifiers_unmapped() {
        let maps = Keymaps::default();
        assert_eq!(maps.plain().get(KEY_LEFTSHIFT), None);
        assert_eq!(maps.plain().get(KEY_CAPSLOCK), None);
        assert_eq!(maps.shifted().get(KEY_RIGHTSHIFT), None);
    }

    #[test]
    fn test_overrides() {
        let maps = Keymaps::with_overrides(Layout::Gb, [(KEY_A, 'ä')], [(KEY_A, 'Ä')]);
        assert_eq!(maps.plain().get(KEY_A), Some('ä'));
        assert_eq!(maps.shifted().get(KEY_A), Some('Ä'));
        assert_eq!(maps.plain().get(KEY_B), Some('b'));
    }

    #[test]
    fn test_describe_symbol() {
        assert_eq!(describe_symbol('a'), "U+0061 'a'");
        assert_eq!(describe_symbol(SYM_ENTER), "U+000D ENTER");
        assert_eq!(describe_symbol(SYM_HOME), "U+0166 HOME");
        assert_eq!(describe_symbol('\u{7f}'), "U+007F");
    }
}
