//! The 16-color palette and the hex byte-swap used to build it.
//!
//! # Why swap? (for beginners)
//!
//! Palette constants are written the way humans write colors: `"RRGGBB"`.
//! The pixel word the display expects is laid out the other way round:
//! `0x00BBGGRR`.  Rather than reorder bytes on every pixel, each of the
//! 16 constants is reordered once at startup with [`swap_rgb_hex`], and the
//! result is parsed directly into the pixel word a [`Color`] carries.
//!
//! ```text
//! "68372b"  --swap-->  "2b3768"  --parse-->  0x002b3768  (r=0x68 g=0x37 b=0x2b)
//! ```

use thiserror::Error;

/// The C64 palette as `"RRGGBB"` constants, index 0 (black) to 15 (light grey).
pub const C64_PALETTE_HEX: [&str; 16] = [
    "000000", // 0  black
    "FFFFFF", // 1  white
    "68372b", // 2  red
    "70a4b2", // 3  cyan
    "6f3d86", // 4  purple
    "588d43", // 5  green
    "352879", // 6  blue
    "b8c76f", // 7  yellow
    "6f4f25", // 8  orange
    "433900", // 9  brown
    "9a6759", // 10 light red
    "444444", // 11 dark grey
    "6c6c6c", // 12 grey
    "9ad284", // 13 light green
    "6c5eB5", // 14 light blue
    "959595", // 15 light grey
];

/// Number of palette entries; a grid byte's low nibble indexes into it.
pub const PALETTE_LEN: usize = 16;

/// Error type for palette construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("color constant {0:?} is not six hex digits")]
    InvalidHex(String),
}

/// Reorders a `"RRGGBB"` hex string into `"BBGGRR"`.
///
/// Digits 4–5 come first, then 2–3, then 0–1.  An optional `0x` prefix is
/// kept as-is in front of the result.
///
/// # Errors
///
/// Returns [`PaletteError::InvalidHex`] unless the string (after the optional
/// prefix) is exactly six ASCII hex digits.
pub fn swap_rgb_hex(hex: &str) -> Result<String, PaletteError> {
    let (prefix, digits) = match hex.strip_prefix("0x") {
        Some(rest) => ("0x", rest),
        None => ("", hex),
    };
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PaletteError::InvalidHex(hex.to_string()));
    }
    Ok(format!(
        "{prefix}{}{}{}",
        &digits[4..6],
        &digits[2..4],
        &digits[0..2]
    ))
}

/// A resolved display color, stored as the `0x00BBGGRR` pixel word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(u32);

impl Color {
    /// Builds a color from separate channels.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((b as u32) << 16) | ((g as u32) << 8) | r as u32)
    }

    /// Builds a color from an `"RRGGBB"` constant by swapping it to
    /// `"BBGGRR"` and parsing the result as the pixel word.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidHex`] if `hex` is not six hex digits.
    pub fn from_rgb_hex(hex: &str) -> Result<Self, PaletteError> {
        let swapped = swap_rgb_hex(hex)?;
        let digits = swapped.trim_start_matches("0x");
        u32::from_str_radix(digits, 16)
            .map(Color)
            .map_err(|_| PaletteError::InvalidHex(hex.to_string()))
    }

    /// The `0x00BBGGRR` pixel word.
    pub const fn pixel(self) -> u32 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub const fn b(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }
}

/// Immutable 16-entry lookup from color index to [`Color`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: [Color; PALETTE_LEN],
}

impl ColorTable {
    /// Builds a table from 16 `"RRGGBB"` constants.
    ///
    /// # Errors
    ///
    /// Returns the first [`PaletteError`] encountered.
    pub fn from_hex(constants: &[&str; PALETTE_LEN]) -> Result<Self, PaletteError> {
        let mut entries = [Color::default(); PALETTE_LEN];
        for (entry, hex) in entries.iter_mut().zip(constants) {
            *entry = Color::from_rgb_hex(hex)?;
        }
        Ok(Self { entries })
    }

    /// The built-in C64 palette.
    pub fn c64() -> Self {
        // The constants are fixed and covered by tests, so this cannot fail.
        Self::from_hex(&C64_PALETTE_HEX).expect("built-in palette constants are valid hex")
    }

    /// Resolves a raw grid byte.  Only the low four bits are used.
    #[inline]
    pub fn lookup(&self, raw: u8) -> Color {
        self.entries[usize::from(raw & 0x0F)]
    }

    pub fn entries(&self) -> &[Color; PALETTE_LEN] {
        &self.entries
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::c64()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
