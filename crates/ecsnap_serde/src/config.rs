//! Wire formats and file persistence settings.

use crate::options::Options;

/// Byte encoding of a document.
///
/// Every format carries the same document; JSON is the canonical text form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Format {
    /// Compact JSON.
    #[default]
    Json,
    /// Indented JSON.
    JsonPretty,
    /// `MessagePack` with named struct fields.
    MessagePack,
}

impl Format {
    /// The conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json | Self::JsonPretty => "json",
            Self::MessagePack => "msgpack",
        }
    }

    /// Returns true for the JSON formats.
    #[must_use]
    pub fn is_text(self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty)
    }
}

/// Settings for [`save_to_file`](crate::save_to_file) and
/// [`load_from_file`](crate::load_from_file).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveConfig {
    /// Encoding of the file.
    pub format: Format,
    /// Filters applied while saving or loading.
    pub options: Options,
}

impl SaveConfig {
    /// Creates a configuration with JSON and no filtering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the format.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Builder method to set the filters.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}
