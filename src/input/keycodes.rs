//! evdev code constants
//!
//! Plain `u16` views of the evdev crate's event types, axes and keys that
//! the translator and the key tables refer to. [`RawEvent`] carries bare
//! codes so test backends need no evdev types.
//!
//! [`RawEvent`]: super::device::RawEvent

use evdev::{EventType, Key, RelativeAxisType};

// ============================================================================
// Event Types
// ============================================================================

/// Synchronization marker
pub const EV_SYN: u16 = EventType::SYNCHRONIZATION.0;

/// Key / button state change
pub const EV_KEY: u16 = EventType::KEY.0;

/// Relative axis motion
pub const EV_REL: u16 = EventType::RELATIVE.0;

// ============================================================================
// Relative Axes
// ============================================================================

pub const REL_X: u16 = RelativeAxisType::REL_X.0;
pub const REL_Y: u16 = RelativeAxisType::REL_Y.0;
pub const REL_HWHEEL: u16 = RelativeAxisType::REL_HWHEEL.0;

/// Vertical scroll wheel
pub const REL_WHEEL: u16 = RelativeAxisType::REL_WHEEL.0;

// ============================================================================
// Key States (EV_KEY values)
// ============================================================================

pub const KEY_RELEASE: i32 = 0;
pub const KEY_PRESS: i32 = 1;
pub const KEY_REPEAT: i32 = 2;

// ============================================================================
// Main Block
// ============================================================================

pub const KEY_ESC: u16 = Key::KEY_ESC.code();
pub const KEY_1: u16 = Key::KEY_1.code();
pub const KEY_2: u16 = Key::KEY_2.code();
pub const KEY_3: u16 = Key::KEY_3.code();
pub const KEY_4: u16 = Key::KEY_4.code();
pub const KEY_5: u16 = Key::KEY_5.code();
pub const KEY_6: u16 = Key::KEY_6.code();
pub const KEY_7: u16 = Key::KEY_7.code();
pub const KEY_8: u16 = Key::KEY_8.code();
pub const KEY_9: u16 = Key::KEY_9.code();
pub const KEY_0: u16 = Key::KEY_0.code();
pub const KEY_MINUS: u16 = Key::KEY_MINUS.code();
pub const KEY_EQUAL: u16 = Key::KEY_EQUAL.code();
pub const KEY_BACKSPACE: u16 = Key::KEY_BACKSPACE.code();
pub const KEY_TAB: u16 = Key::KEY_TAB.code();
pub const KEY_Q: u16 = Key::KEY_Q.code();
pub const KEY_W: u16 = Key::KEY_W.code();
pub const KEY_E: u16 = Key::KEY_E.code();
pub const KEY_R: u16 = Key::KEY_R.code();
pub const KEY_T: u16 = Key::KEY_T.code();
pub const KEY_Y: u16 = Key::KEY_Y.code();
pub const KEY_U: u16 = Key::KEY_U.code();
pub const KEY_I: u16 = Key::KEY_I.code();
pub const KEY_O: u16 = Key::KEY_O.code();
pub const KEY_P: u16 = Key::KEY_P.code();
pub const KEY_LEFTBRACE: u16 = Key::KEY_LEFTBRACE.code();
pub const KEY_RIGHTBRACE: u16 = Key::KEY_RIGHTBRACE.code();
pub const KEY_ENTER: u16 = Key::KEY_ENTER.code();
pub const KEY_A: u16 = Key::KEY_A.code();
pub const KEY_S: u16 = Key::KEY_S.code();
pub const KEY_D: u16 = Key::KEY_D.code();
pub const KEY_F: u16 = Key::KEY_F.code();
pub const KEY_G: u16 = Key::KEY_G.code();
pub const KEY_H: u16 = Key::KEY_H.code();
pub const KEY_J: u16 = Key::KEY_J.code();
pub const KEY_K: u16 = Key::KEY_K.code();
pub const KEY_L: u16 = Key::KEY_L.code();
pub const KEY_SEMICOLON: u16 = Key::KEY_SEMICOLON.code();
pub const KEY_APOSTROPHE: u16 = Key::KEY_APOSTROPHE.code();
pub const KEY_BACKSLASH: u16 = Key::KEY_BACKSLASH.code();
pub const KEY_Z: u16 = Key::KEY_Z.code();
pub const KEY_X: u16 = Key::KEY_X.code();
pub const KEY_C: u16 = Key::KEY_C.code();
pub const KEY_V: u16 = Key::KEY_V.code();
pub const KEY_B: u16 = Key::KEY_B.code();
pub const KEY_N: u16 = Key::KEY_N.code();
pub const KEY_M: u16 = Key::KEY_M.code();
pub const KEY_COMMA: u16 = Key::KEY_COMMA.code();
pub const KEY_DOT: u16 = Key::KEY_DOT.code();
pub const KEY_SLASH: u16 = Key::KEY_SLASH.code();
pub const KEY_SPACE: u16 = Key::KEY_SPACE.code();

// ============================================================================
// Modifier Keys
// ============================================================================

/// Left Control key
pub const KEY_LEFTCTRL: u16 = Key::KEY_LEFTCTRL.code();

/// Left Shift key
pub const KEY_LEFTSHIFT: u16 = Key::KEY_LEFTSHIFT.code();

/// Right Shift key
pub const KEY_RIGHTSHIFT: u16 = Key::KEY_RIGHTSHIFT.code();

/// Left Alt key
pub const KEY_LEFTALT: u16 = Key::KEY_LEFTALT.code();

/// Caps Lock key
pub const KEY_CAPSLOCK: u16 = Key::KEY_CAPSLOCK.code();

// ============================================================================
// Numeric Keypad
// ============================================================================

pub const KEY_KPASTERISK: u16 = Key::KEY_KPASTERISK.code();
pub const KEY_KP7: u16 = Key::KEY_KP7.code();
pub const KEY_KP8: u16 = Key::KEY_KP8.code();
pub const KEY_KP9: u16 = Key::KEY_KP9.code();
pub const KEY_KPMINUS: u16 = Key::KEY_KPMINUS.code();
pub const KEY_KP4: u16 = Key::KEY_KP4.code();
pub const KEY_KP5: u16 = Key::KEY_KP5.code();
pub const KEY_KP6: u16 = Key::KEY_KP6.code();
pub const KEY_KPPLUS: u16 = Key::KEY_KPPLUS.code();
pub const KEY_KP1: u16 = Key::KEY_KP1.code();
pub const KEY_KP2: u16 = Key::KEY_KP2.code();
pub const KEY_KP3: u16 = Key::KEY_KP3.code();
pub const KEY_KP0: u16 = Key::KEY_KP0.code();
pub const KEY_KPDOT: u16 = Key::KEY_KPDOT.code();
pub const KEY_KPENTER: u16 = Key::KEY_KPENTER.code();
pub const KEY_KPSLASH: u16 = Key::KEY_KPSLASH.code();
pub const KEY_KPEQUAL: u16 = Key::KEY_KPEQUAL.code();
pub const KEY_KPCOMMA: u16 = Key::KEY_KPCOMMA.code();
pub const KEY_KPLEFTPAREN: u16 = Key::KEY_KPLEFTPAREN.code();
pub const KEY_KPRIGHTPAREN: u16 = Key::KEY_KPRIGHTPAREN.code();

// ============================================================================
// Navigation Keys
// ============================================================================

/// Home key
pub const KEY_HOME: u16 = Key::KEY_HOME.code();

/// Up arrow key
pub const KEY_UP: u16 = Key::KEY_UP.code();

/// Page Up key
pub const KEY_PAGEUP: u16 = Key::KEY_PAGEUP.code();

/// Left arrow key
pub const KEY_LEFT: u16 = Key::KEY_LEFT.code();

/// Right arrow key
pub const KEY_RIGHT: u16 = Key::KEY_RIGHT.code();

/// End key
pub const KEY_END: u16 = Key::KEY_END.code();

/// Down arrow key
pub const KEY_DOWN: u16 = Key::KEY_DOWN.code();

/// Page Down key
pub const KEY_PAGEDOWN: u16 = Key::KEY_PAGEDOWN.code();

/// Insert key
pub const KEY_INSERT: u16 = Key::KEY_INSERT.code();

/// Delete key
pub const KEY_DELETE: u16 = Key::KEY_DELETE.code();

// ============================================================================
// Multimedia / System Keys
// ============================================================================

pub const KEY_MUTE: u16 = Key::KEY_MUTE.code();
pub const KEY_VOLUMEDOWN: u16 = Key::KEY_VOLUMEDOWN.code();
pub const KEY_VOLUMEUP: u16 = Key::KEY_VOLUMEUP.code();
pub const KEY_POWER: u16 = Key::KEY_POWER.code();
pub const KEY_PAUSE: u16 = Key::KEY_PAUSE.code();
pub const KEY_STOP: u16 = Key::KEY_STOP.code();
pub const KEY_MENU: u16 = Key::KEY_MENU.code();
pub const KEY_BACK: u16 = Key::KEY_BACK.code();
pub const KEY_FORWARD: u16 = Key::KEY_FORWARD.code();
pub const KEY_NEXTSONG: u16 = Key::KEY_NEXTSONG.code();
pub const KEY_PLAYPAUSE: u16 = Key::KEY_PLAYPAUSE.code();
pub const KEY_PREVIOUSSONG: u16 = Key::KEY_PREVIOUSSONG.code();
pub const KEY_REWIND: u16 = Key::KEY_REWIND.code();

/// Synthetic target for wheel-up motion
pub const KEY_SCROLLUP: u16 = Key::KEY_SCROLLUP.code();

/// Synthetic target for wheel-down motion
pub const KEY_SCROLLDOWN: u16 = Key::KEY_SCROLLDOWN.code();

pub const KEY_PLAY: u16 = Key::KEY_PLAY.code();
pub const KEY_FASTFORWARD: u16 = Key::KEY_FASTFORWARD.code();
pub const KEY_BASSBOOST: u16 = Key::KEY_BASSBOOST.code();
pub const KEY_SEARCH: u16 = Key::KEY_SEARCH.code();

// ============================================================================
// Remote Control / Phone Keys
// ============================================================================

pub const KEY_OK: u16 = Key::KEY_OK.code();
pub const KEY_SELECT: u16 = Key::KEY_SELECT.code();
pub const KEY_NUMERIC_0: u16 = Key::KEY_NUMERIC_0.code();
pub const KEY_NUMERIC_1: u16 = Key::KEY_NUMERIC_1.code();
pub const KEY_NUMERIC_2: u16 = Key::KEY_NUMERIC_2.code();
pub const KEY_NUMERIC_3: u16 = Key::KEY_NUMERIC_3.code();
pub const KEY_NUMERIC_4: u16 = Key::KEY_NUMERIC_4.code();
pub const KEY_NUMERIC_5: u16 = Key::KEY_NUMERIC_5.code();
pub const KEY_NUMERIC_6: u16 = Key::KEY_NUMERIC_6.code();
pub const KEY_NUMERIC_7: u16 = Key::KEY_NUMERIC_7.code();
pub const KEY_NUMERIC_8: u16 = Key::KEY_NUMERIC_8.code();
pub const KEY_NUMERIC_9: u16 = Key::KEY_NUMERIC_9.code();
pub const KEY_NUMERIC_STAR: u16 = Key::KEY_NUMERIC_STAR.code();
pub const KEY_NUMERIC_POUND: u16 = Key::KEY_NUMERIC_POUND.code();

// ============================================================================
// Helper Functions
// ============================================================================

/// Check if keycode is a Shift key
#[inline]
pub const fn is_shift_key(keycode: u16) -> bool {
    keycode == KEY_LEFTSHIFT || keycode == KEY_RIGHTSHIFT
}

/// Check if keycode is Caps Lock
#[inline]
pub const fn is_caps_lock(keycode: u16) -> bool {
    keycode == KEY_CAPSLOCK
}

/// Check if a key value means the key is down (press or auto-repeat)
#[inline]
pub const fn is_active(value: i32) -> bool {
    value > KEY_RELEASE
}
