/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use std::fmt::{Display, Formatter};

/// Width tag of a single operand.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OperandSize {
    /// `00`: 16-bit big-endian constant.
    Word,
    /// `01`: 8-bit constant.
    Byte,
    /// `10`: one byte naming a variable, replaced by the variable's value.
    Variable,
}

impl OperandSize {
    /// Maps a 2-bit size field. `0b11` (omitted operand) has no width.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            0b00 => Some(Self::Word),
            0b01 => Some(Self::Byte),
            0b10 => Some(Self::Variable),
            _ => None,
        }
    }

    /// Number of instruction bytes the operand occupies.
    #[must_use]
    pub const fn octet_count(&self) -> u32 {
        match self {
            Self::Word => 2,
            Self::Byte | Self::Variable => 1,
        }
    }
}

impl Display for OperandSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Word => "word",
            Self::Byte => "byte",
            Self::Variable => "var",
        };
        write!(f, "{name}")
    }
}

/// Appends the widths found in `descriptor` to `sizes`.
///
/// Fields are scanned from bit offset 6 down to 0; the first `0b11` field
/// ends the list.
pub fn scan_descriptor(descriptor: u8, sizes: &mut Vec<OperandSize>) {
    for offset in [6, 4, 2, 0] {
        match OperandSize::from_bits(descriptor >> offset) {
            Some(size) => sizes.push(size),
            None => break,
        }
    }
}

#[must_use]
pub fn operand_sizes(descriptor: u8) -> Vec<OperandSize> {
    let mut sizes = Vec::with_capacity(4);
    scan_descriptor(descriptor, &mut sizes);
    sizes
}

/// Short form keeps its single width in opcode bits 4-5. Placing them at the
/// top of an otherwise all-ones descriptor yields at most one operand.
#[must_use]
pub const fn short_form_descriptor(opcode: u8) -> u8 {
    (((opcode >> 4) & 0b11) << 6) | 0x3f
}

/// Long form: bit 6 describes the first operand and bit 5 the second.
#[must_use]
pub const fn long_form_sizes(opcode: u8) -> [OperandSize; 2] {
    const fn size_for_bit(opcode: u8, bit: u8) -> OperandSize {
        if (opcode >> bit) & 1 == 1 {
            OperandSize::Variable
        } else {
            OperandSize::Byte
        }
    }
    [size_for_bit(opcode, 6), size_for_bit(opcode, 5)]
}
