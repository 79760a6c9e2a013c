//! Platform-specific key bindings

use crossterm::event::KeyModifiers;

/// Platform-appropriate modifier for shortcuts
/// - macOS: SUPER (Cmd key), CONTROL also accepted
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const SHORTCUT_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Submit shortcut display for form help text
/// Ctrl+S works on all platforms
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

/// Choose avatar shortcut display
#[cfg(target_os = "macos")]
pub const CHOOSE_FILE_SHORTCUT: &str = "Cmd+O";

#[cfg(not(target_os = "macos"))]
pub const CHOOSE_FILE_SHORTCUT: &str = "Ctrl+O";

/// Clear avatar shortcut display
#[cfg(target_os = "macos")]
pub const CLEAR_FILE_SHORTCUT: &str = "Cmd+X";

#[cfg(not(target_os = "macos"))]
pub const CLEAR_FILE_SHORTCUT: &str = "Ctrl+X";

/// True when `modifiers` hold the platform shortcut modifier (or Ctrl)
pub fn is_shortcut(modifiers: KeyModifiers) -> bool {
    modifiers.contains(SHORTCUT_MODIFIER) || modifiers.contains(KeyModifiers::CONTROL)
}
