//! Byte, text, and file front ends for the document codec.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ecsnap_foundation::{Error, ErrorKind, Result};
use ecsnap_storage::World;

use crate::codec::{from_document, to_document};
use crate::config::{Format, SaveConfig};
use crate::document::Document;
use crate::options::Options;

/// Serializes a world to bytes in the given format.
///
/// # Errors
///
/// Returns an error if a value fails to serialize.
pub fn serialize(world: &World, format: Format, options: &Options) -> Result<Vec<u8>> {
    to_document(world, options)?.to_bytes(format)
}

/// Deserializes bytes in the given format into a world.
///
/// # Errors
///
/// Returns [`ErrorKind::MalformedDocument`] if the bytes do not parse, and
/// any error of [`from_document`](crate::from_document) otherwise.
pub fn deserialize(bytes: &[u8], world: &mut World, format: Format, options: &Options) -> Result<()> {
    let document = Document::from_bytes(bytes, format)?;
    from_document(document, world, options)
}

/// Serializes a world to indented JSON text.
///
/// # Errors
///
/// Returns an error if a value fails to serialize.
pub fn to_string(world: &World, options: &Options) -> Result<String> {
    let document = to_document(world, options)?;
    serde_json::to_string_pretty(&document).map_err(|e| Error::serialization(e.to_string()))
}

/// Deserializes JSON text into a world.
///
/// # Errors
///
/// See [`deserialize`].
pub fn from_str(text: &str, world: &mut World, options: &Options) -> Result<()> {
    deserialize(text.as_bytes(), world, Format::Json, options)
}

/// Saves a world to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(world: &World, path: P, config: &SaveConfig) -> Result<()> {
    let path = path.as_ref();
    let bytes = serialize(world, config.format, &config.options)?;

    let file = File::create(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to create file '{}': {e}",
            path.display()
        )))
    })?;
    let mut writer = BufWriter::new(file);

    writer.write_all(&bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to write to file '{}': {e}",
            path.display()
        )))
    })?;

    writer.flush().map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to flush file '{}': {e}",
            path.display()
        )))
    })?;

    Ok(())
}

/// Loads a file into a world.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P, world: &mut World, config: &SaveConfig) -> Result<()> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to open file '{}': {e}",
            path.display()
        )))
    })?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| {
        Error::new(ErrorKind::IoError(format!(
            "failed to read file '{}': {e}",
            path.display()
        )))
    })?;

    deserialize(&bytes, world, config.format, &config.options)
}
