/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use thiserror::Error;
use tracing::{debug, warn};

pub const FORM_ID: [u8; 4] = *b"FORM";
pub const IFRS_ID: [u8; 4] = *b"IFRS";
pub const RESOURCE_INDEX_ID: [u8; 4] = *b"RIdx";
pub const EXEC_USAGE: [u8; 4] = *b"Exec";
pub const ZCODE_ID: [u8; 4] = *b"ZCOD";

const CHUNK_HEADER_SIZE: usize = 8;
const PREAMBLE_SIZE: usize = 12;
const RESOURCE_ENTRY_SIZE: usize = 12;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlorbError {
    #[error("not a blorb file")]
    NotBlorb,
    #[error("blorb truncated: {needed} bytes needed at offset {offset:#X}")]
    Truncated { offset: usize, needed: usize },
    #[error("blorb has no z-code executable")]
    MissingExecutable,
    #[error("executable resource points at a `{found}` chunk at {offset:#X}")]
    NotZCode { offset: usize, found: String },
}

/// One IFF chunk. `offset` is where the chunk header starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub id: [u8; 4],
    pub offset: usize,
    pub data: &'a [u8],
}

impl Chunk<'_> {
    #[must_use]
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }
}

fn slice(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8], BlorbError> {
    bytes
        .get(offset..offset + len)
        .ok_or(BlorbError::Truncated {
            offset,
            needed: len,
        })
}

fn id_at(bytes: &[u8], offset: usize) -> Result<[u8; 4], BlorbError> {
    let mut id = [0; 4];
    id.copy_from_slice(slice(bytes, offset, 4)?);
    Ok(id)
}

fn u32_at(bytes: &[u8], offset: usize) -> Result<u32, BlorbError> {
    Ok(u32::from_be_bytes(id_at(bytes, offset)?))
}

/// `true` for an IFF `FORM` of type `IFRS`.
#[must_use]
pub fn is_blorb(bytes: &[u8]) -> bool {
    bytes.len() >= PREAMBLE_SIZE && bytes[0..4] == FORM_ID && bytes[8..12] == IFRS_ID
}

/// Reads the chunk whose header starts at `offset`.
///
/// # Errors
/// If the header or the data runs past the end of `bytes`.
pub fn chunk_at(bytes: &[u8], offset: usize) -> Result<Chunk<'_>, BlorbError> {
    let id = id_at(bytes, offset)?;
    let len = u32_at(bytes, offset + 4)? as usize;
    let data = slice(bytes, offset + CHUNK_HEADER_SIZE, len)?;
    Ok(Chunk { id, offset, data })
}

/// All chunks inside the `FORM`, in file order.
///
/// # Errors
/// If `bytes` is not a blorb or a chunk is cut short.
pub fn chunks(bytes: &[u8]) -> Result<Vec<Chunk<'_>>, BlorbError> {
    if !is_blorb(bytes) {
        return Err(BlorbError::NotBlorb);
    }

    let form_len = u32_at(bytes, 4)? as usize;
    let end = (CHUNK_HEADER_SIZE + form_len).min(bytes.len());
    if end < CHUNK_HEADER_SIZE + form_len {
        warn!(
            declared = form_len,
            actual = bytes.len() - CHUNK_HEADER_SIZE,
            "blorb FORM is shorter than declared"
        );
    }

    let mut found = Vec::new();
    let mut offset = PREAMBLE_SIZE;
    while offset + CHUNK_HEADER_SIZE <= end {
        let chunk = chunk_at(bytes, offset)?;
        // chunks are padded to an even length
        offset += CHUNK_HEADER_SIZE + chunk.data.len() + (chunk.data.len() & 1);
        found.push(chunk);
    }

    Ok(found)
}

/// Start offset of resource `number` with `usage` in a `RIdx` chunk body.
///
/// # Errors
/// If the index is cut short.
pub fn find_resource(
    index: &[u8],
    usage: [u8; 4],
    number: u32,
) -> Result<Option<usize>, BlorbError> {
    let count = u32_at(index, 0)? as usize;
    for entry in 0..count {
        let base = 4 + entry * RESOURCE_ENTRY_SIZE;
        if id_at(index, base)? == usage && u32_at(index, base + 4)? == number {
            return Ok(Some(u32_at(index, base + 8)? as usize));
        }
    }
    Ok(None)
}

/// Returns the story file carried by a blorb.
///
/// The resource index entry for executable 0 wins. Without one, the first
/// `ZCOD` chunk is used.
///
/// # Errors
/// If `bytes` is not a well formed blorb or carries no z-code.
pub fn extract_executable(bytes: &[u8]) -> Result<&[u8], BlorbError> {
    let chunks = chunks(bytes)?;

    let indexed = match chunks.iter().find(|chunk| chunk.id == RESOURCE_INDEX_ID) {
        Some(index) => find_resource(index.data, EXEC_USAGE, 0)?,
        None => None,
    };

    if let Some(offset) = indexed {
        let chunk = chunk_at(bytes, offset)?;
        if chunk.id != ZCODE_ID {
            return Err(BlorbError::NotZCode {
                offset,
                found: chunk.id_str(),
            });
        }
        debug!(offset, len = chunk.data.len(), "executable from resource index");
        return Ok(chunk.data);
    }

    let chunk = chunks
        .iter()
        .find(|chunk| chunk.id == ZCODE_ID)
        .ok_or(BlorbError::MissingExecutable)?;
    debug!(
        offset = chunk.offset,
        len = chunk.data.len(),
        "executable from first ZCOD chunk"
    );
    Ok(chunk.data)
}

/// The story file to load: the executable when `bytes` is a blorb, `bytes`
/// itself otherwise.
///
/// # Errors
/// If `bytes` looks like a blorb but the executable can not be found.
pub fn unwrap_story(bytes: &[u8]) -> Result<&[u8], BlorbError> {
    if is_blorb(bytes) {
        extract_executable(bytes)
    } else {
        Ok(bytes)
    }
}
