// Layer index -> input source language mapping

use std::fmt;

/// Firmware layer that selects the Russian input source
pub const RU_LAYER: u8 = 1;

/// Language token handed to the input source adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    En,
    Ru,
}

impl Language {
    /// Decode a firmware layer index. Layer 1 is Russian, every other layer English.
    pub fn from_layer(layer: u8) -> Self {
        if layer == RU_LAYER {
            Language::Ru
        } else {
            Language::En
        }
    }

    /// Two-letter lowercase code passed on the adapter command line
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Check that `s` is a language code adapters accept (`^[a-z]{2}$`)
pub fn is_language_code(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_lowercase())
}
