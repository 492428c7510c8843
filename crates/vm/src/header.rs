/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::memory::{Memory, MemoryError};
use tracing::trace;

pub const SERIAL_OFFSET: u32 = 0x12;
pub const SERIAL_LEN: usize = 6;

/// Interpreter number reported to v4+ games (Apple IIe). Beyond Zork picks
/// its character graphics from this value.
pub const INTERPRETER_NUMBER: u8 = 2;

pub const SCREEN_WIDTH_CHARS: u8 = 80;
pub const SCREEN_HEIGHT_LINES: u8 = 40;
pub const SCREEN_WIDTH_UNITS: u16 = 80;
pub const SCREEN_HEIGHT_UNITS: u16 = 40;
pub const FONT_SIZE_UNITS: u8 = 1;

/// Status line, split screen and variable pitch font (bits 4, 5, 6).
const FLAGS1_V3_KEEP: u16 = 0b1000_1111;
/// Only bits 4 and 6 survive on v4+: no colour, pictures, bold, italic,
/// sound or timed input.
const FLAGS1_V4_KEEP: u16 = 0b0101_0000;
const FLAGS1_V4_FIXED_FONT: u16 = 0b0001_0000;

/// Clears pictures (3), undo (4), mouse (5), sound (7) and menus (8).
pub const FLAGS2_DYNAMIC_KEEP: u16 = 0b1111_1110_0100_0111;

/// Bits of `flags2` that survive a restart: transcripting and fixed pitch.
pub const FLAGS2_RESET_KEEP: u16 = 0b11;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FieldWidth {
    Byte,
    Word,
}

/// Fixed header fields. Everything from `InterpNumber` on is only meaningful
/// from version 4.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HeaderField {
    Version,
    Flags1,
    Release,
    HighMemBase,
    Pc,
    DictBase,
    ObjTabBase,
    GlobalVarBase,
    StaticMemBase,
    Flags2,
    AbbrevBase,
    FileLen,
    Checksum,
    InterpNumber,
    InterpVersion,
    ScreenHeightLines,
    ScreenWidthChars,
    ScreenWidthUnits,
    ScreenHeightUnits,
    FontWidthUnits,
    FontHeightUnits,
    RoutineOffset,
    StringOffset,
    DefaultBgColor,
    DefaultFgColor,
    TermCharsBase,
    StdRevNumber,
    AlphaTabBase,
    HdrExtTabBase,
}

impl HeaderField {
    pub const ALL: [Self; 29] = [
        Self::Version,
        Self::Flags1,
        Self::Release,
        Self::HighMemBase,
        Self::Pc,
        Self::DictBase,
        Self::ObjTabBase,
        Self::GlobalVarBase,
        Self::StaticMemBase,
        Self::Flags2,
        Self::AbbrevBase,
        Self::FileLen,
        Self::Checksum,
        Self::InterpNumber,
        Self::InterpVersion,
        Self::ScreenHeightLines,
        Self::ScreenWidthChars,
        Self::ScreenWidthUnits,
        Self::ScreenHeightUnits,
        Self::FontWidthUnits,
        Self::FontHeightUnits,
        Self::RoutineOffset,
        Self::StringOffset,
        Self::DefaultBgColor,
        Self::DefaultFgColor,
        Self::TermCharsBase,
        Self::StdRevNumber,
        Self::AlphaTabBase,
        Self::HdrExtTabBase,
    ];

    #[must_use]
    pub const fn layout(self) -> (u32, FieldWidth) {
        use FieldWidth::{Byte, Word};
        match self {
            Self::Version => (0x00, Byte),
            Self::Flags1 => (0x01, Byte),
            Self::Release => (0x02, Word),
            Self::HighMemBase => (0x04, Word),
            Self::Pc => (0x06, Word),
            Self::DictBase => (0x08, Word),
            Self::ObjTabBase => (0x0a, Word),
            Self::GlobalVarBase => (0x0c, Word),
            Self::StaticMemBase => (0x0e, Word),
            Self::Flags2 => (0x10, Word),
            Self::AbbrevBase => (0x18, Word),
            Self::FileLen => (0x1a, Word),
            Self::Checksum => (0x1c, Word),
            Self::InterpNumber => (0x1e, Byte),
            Self::InterpVersion => (0x1f, Byte),
            Self::ScreenHeightLines => (0x20, Byte),
            Self::ScreenWidthChars => (0x21, Byte),
            Self::ScreenWidthUnits => (0x22, Word),
            Self::ScreenHeightUnits => (0x24, Word),
            Self::FontWidthUnits => (0x26, Byte),
            Self::FontHeightUnits => (0x27, Byte),
            // stored divided by 8
            Self::RoutineOffset => (0x28, Word),
            Self::StringOffset => (0x2a, Word),
            Self::DefaultBgColor => (0x2c, Byte),
            Self::DefaultFgColor => (0x2d, Byte),
            Self::TermCharsBase => (0x2e, Word),
            Self::StdRevNumber => (0x32, Word),
            Self::AlphaTabBase => (0x34, Word),
            Self::HdrExtTabBase => (0x36, Word),
        }
    }

    #[must_use]
    pub const fn offset(self) -> u32 {
        self.layout().0
    }

    #[must_use]
    pub const fn width(self) -> FieldWidth {
        self.layout().1
    }
}

fn read_field(memory: &Memory, field: HeaderField) -> Result<u16, MemoryError> {
    match field.layout() {
        (offset, FieldWidth::Byte) => memory.read_byte(offset).map(u16::from),
        (offset, FieldWidth::Word) => memory.read_word(offset),
    }
}

/// Read-only view over the header of an image.
#[derive(Debug, Copy, Clone)]
pub struct Header<'a> {
    memory: &'a Memory,
}

impl<'a> Header<'a> {
    #[must_use]
    pub const fn new(memory: &'a Memory) -> Self {
        Self { memory }
    }

    pub fn get(&self, field: HeaderField) -> Result<u16, MemoryError> {
        read_field(self.memory, field)
    }

    pub fn get_signed(&self, field: HeaderField) -> Result<i16, MemoryError> {
        match field.layout() {
            (offset, FieldWidth::Byte) => self.memory.read_signed_byte(offset),
            (offset, FieldWidth::Word) => self.memory.read_signed_word(offset),
        }
    }

    pub fn version(&self) -> Result<u8, MemoryError> {
        self.memory.read_byte(HeaderField::Version.offset())
    }

    pub fn flags1(&self) -> Result<u8, MemoryError> {
        self.memory.read_byte(HeaderField::Flags1.offset())
    }

    pub fn flags2(&self) -> Result<u16, MemoryError> {
        self.get(HeaderField::Flags2)
    }

    pub fn pc(&self) -> Result<u16, MemoryError> {
        self.get(HeaderField::Pc)
    }

    pub fn static_mem_base(&self) -> Result<u16, MemoryError> {
        self.get(HeaderField::StaticMemBase)
    }

    pub fn global_var_base(&self) -> Result<u16, MemoryError> {
        self.get(HeaderField::GlobalVarBase)
    }

    pub fn serial(&self) -> Result<[u8; SERIAL_LEN], MemoryError> {
        let mut serial = [0; SERIAL_LEN];
        serial.copy_from_slice(self.memory.read_slice(SERIAL_OFFSET, SERIAL_LEN)?);
        Ok(serial)
    }
}

/// Writable view over the header.
///
/// These are interpreter writes: they do not go through the game's
/// dynamic memory check, since most header fields are read-only to the game.
#[derive(Debug)]
pub struct HeaderMut<'a> {
    memory: &'a mut Memory,
}

impl<'a> HeaderMut<'a> {
    pub const fn new(memory: &'a mut Memory) -> Self {
        Self { memory }
    }

    pub fn get(&self, field: HeaderField) -> Result<u16, MemoryError> {
        read_field(self.memory, field)
    }

    /// Stores `value`, truncated to the width of the field.
    pub fn set(&mut self, field: HeaderField, value: u16) -> Result<(), MemoryError> {
        match field.layout() {
            (offset, FieldWidth::Byte) => self.memory.poke_byte(offset, (value & 0xff) as u8),
            (offset, FieldWidth::Word) => self.memory.poke_word(offset, value),
        }
    }

    pub fn update(
        &mut self,
        field: HeaderField,
        f: impl FnOnce(u16) -> u16,
    ) -> Result<(), MemoryError> {
        let value = self.get(field)?;
        self.set(field, f(value))
    }

    pub fn set_serial(&mut self, serial: &[u8; SERIAL_LEN]) -> Result<(), MemoryError> {
        self.memory.poke_slice(SERIAL_OFFSET, serial)
    }
}

/// Advertises only the capabilities this interpreter has.
///
/// Runs once when an image is loaded and again on every restart.
pub fn set_standard_flags(memory: &mut Memory) -> Result<(), MemoryError> {
    let version = memory.header().version()?;
    let mut header = memory.header_mut();

    if version < 4 {
        header.update(HeaderField::Flags1, |flags| flags & FLAGS1_V3_KEEP)?;
    } else {
        header.update(HeaderField::Flags1, |flags| {
            (flags & FLAGS1_V4_KEEP) | FLAGS1_V4_FIXED_FONT
        })?;
        header.set(HeaderField::InterpNumber, u16::from(INTERPRETER_NUMBER))?;

        header.set(HeaderField::ScreenWidthChars, u16::from(SCREEN_WIDTH_CHARS))?;
        header.set(HeaderField::ScreenHeightLines, u16::from(SCREEN_HEIGHT_LINES))?;
        header.set(HeaderField::ScreenWidthUnits, SCREEN_WIDTH_UNITS)?;
        header.set(HeaderField::ScreenHeightUnits, SCREEN_HEIGHT_UNITS)?;

        header.set(HeaderField::FontWidthUnits, u16::from(FONT_SIZE_UNITS))?;
        header.set(HeaderField::FontHeightUnits, u16::from(FONT_SIZE_UNITS))?;
    }

    trace!(version, flags1 = header.get(HeaderField::Flags1)?, "standard flags set");

    Ok(())
}

/// Clears the optional `flags2` capabilities the game may have asked for.
///
/// Called before every instruction, so whatever the game wrote to these
/// bits is overwritten on the next step.
pub fn clamp_dynamic_flags(memory: &mut Memory) -> Result<(), MemoryError> {
    memory
        .header_mut()
        .update(HeaderField::Flags2, |flags| flags & FLAGS2_DYNAMIC_KEEP)
}
