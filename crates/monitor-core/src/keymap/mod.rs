//! Host key identifiers and their translation tables.
//!
//! The canonical representation inside the viewer is [`HostKey`].  Input
//! sources translate whatever they receive (key names typed on stdin, X11
//! KeySyms) into a `HostKey` at their boundary, and only `HostKey` values ever
//! reach the keyboard matrix.

pub mod host;
pub mod x11;

pub use host::HostKey;

/// Unified key mapper providing all translation directions.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates an X11 KeySym to a [`HostKey`].
    ///
    /// Returns [`HostKey::Unknown`] if no mapping exists for `keysym`.
    pub fn x11_keysym_to_host(keysym: u32) -> HostKey {
        x11::keysym_to_host(keysym)
    }

    /// Looks up a [`HostKey`] by its name (case-insensitive).
    ///
    /// Returns `None` if the name matches no key.
    pub fn host_from_name(name: &str) -> Option<HostKey> {
        HostKey::from_name(name)
    }
}
