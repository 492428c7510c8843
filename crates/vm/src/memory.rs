/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::header::{Header, HeaderField, HeaderMut};
use std::ops::Range;
use std::rc::Rc;
use thiserror::Error;
use zloom_vm_isa::{to_signed_byte, to_signed_word};

/// Last byte covered by the fixed header.
pub const HEADER_LAST_BYTE: u32 = 0x36;

/// The fixed header occupies the first 64 bytes of every image.
pub const HEADER_SIZE: usize = 0x40;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("address {address:#06X} is outside the {len} byte image")]
    OutOfBounds { address: u32, len: usize },
    #[error("game tried to write in static memory at {address:#06X} (static base {static_base:#06X})")]
    StaticWrite { address: u32, static_base: u16 },
    #[error("game tried to write in non-dynamic header byte {address:#04X}")]
    HeaderWrite { address: u32 },
}

/// The story image.
///
/// Layout (from lower to higher addresses):
///
/// 1. **Header**: 64 bytes at fixed offsets, see [`HeaderField`].
/// 2. **Dynamic memory**: writable by the game, up to the static base.
/// 3. **Static memory**: read-only for the game.
/// 4. **High memory**: routines and strings, also read-only.
///
/// The bytes as loaded are kept next to the live copy so the machine can be
/// restarted.
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: Vec<u8>,
    original: Rc<[u8]>,
}

impl Memory {
    #[must_use]
    pub fn new(image: Vec<u8>) -> Self {
        let original = Rc::from(image.as_slice());
        Self {
            bytes: image,
            original,
        }
    }

    #[must_use]
    pub fn from_original(original: Rc<[u8]>) -> Self {
        Self {
            bytes: original.to_vec(),
            original,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn original(&self) -> &Rc<[u8]> {
        &self.original
    }

    #[must_use]
    pub const fn header(&self) -> Header<'_> {
        Header::new(self)
    }

    pub const fn header_mut(&mut self) -> HeaderMut<'_> {
        HeaderMut::new(self)
    }

    fn out_of_bounds(&self, address: u32) -> MemoryError {
        MemoryError::OutOfBounds {
            address,
            len: self.bytes.len(),
        }
    }

    fn next_address(&self, address: u32) -> Result<u32, MemoryError> {
        address
            .checked_add(1)
            .ok_or_else(|| self.out_of_bounds(address))
    }

    fn range(&self, address: u32, len: usize) -> Result<Range<usize>, MemoryError> {
        let start = address as usize;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| self.out_of_bounds(address))?;
        Ok(start..end)
    }

    fn index(&self, address: u32) -> Result<usize, MemoryError> {
        let index = address as usize;
        if index < self.bytes.len() {
            Ok(index)
        } else {
            Err(self.out_of_bounds(address))
        }
    }

    pub fn read_byte(&self, address: u32) -> Result<u8, MemoryError> {
        Ok(self.bytes[self.index(address)?])
    }

    /// Big-endian word made of two byte reads.
    pub fn read_word(&self, address: u32) -> Result<u16, MemoryError> {
        let high = self.read_byte(address)?;
        let low = self.read_byte(self.next_address(address)?)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    pub fn read_signed_byte(&self, address: u32) -> Result<i16, MemoryError> {
        self.read_byte(address).map(to_signed_byte)
    }

    pub fn read_signed_word(&self, address: u32) -> Result<i16, MemoryError> {
        self.read_word(address).map(to_signed_word)
    }

    pub fn read_slice(&self, address: u32, len: usize) -> Result<&[u8], MemoryError> {
        let range = self.range(address, len)?;
        Ok(&self.bytes[range])
    }

    /// Rejects game writes outside dynamic memory.
    ///
    /// The header is read-only for the game except offset 0x10, the first
    /// byte of `flags2`.
    pub fn check_dynamic(&self, address: u32) -> Result<(), MemoryError> {
        let static_base = self.header().get(HeaderField::StaticMemBase)?;
        if address >= u32::from(static_base) {
            return Err(MemoryError::StaticWrite {
                address,
                static_base,
            });
        }
        if address <= HEADER_LAST_BYTE && address != HeaderField::Flags2.offset() {
            return Err(MemoryError::HeaderWrite { address });
        }
        Ok(())
    }

    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryError> {
        self.check_dynamic(address)?;
        self.poke_byte(address, value)
    }

    pub fn write_word(&mut self, address: u32, value: u16) -> Result<(), MemoryError> {
        self.check_dynamic(address)?;
        self.poke_word(address, value)
    }

    /// Interpreter-side write. Skips the dynamic memory check.
    pub(crate) fn poke_byte(&mut self, address: u32, value: u8) -> Result<(), MemoryError> {
        let index = self.index(address)?;
        self.bytes[index] = value;
        Ok(())
    }

    pub(crate) fn poke_word(&mut self, address: u32, value: u16) -> Result<(), MemoryError> {
        let high = self.index(address)?;
        let low = self.index(self.next_address(address)?)?;
        let [high_byte, low_byte] = value.to_be_bytes();
        self.bytes[high] = high_byte;
        self.bytes[low] = low_byte;
        Ok(())
    }

    pub(crate) fn poke_slice(&mut self, address: u32, values: &[u8]) -> Result<(), MemoryError> {
        let range = self.range(address, values.len())?;
        self.bytes[range].copy_from_slice(values);
        Ok(())
    }
}
