/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::to_signed_word;
use std::fmt::{Display, Formatter};

const POLARITY_BIT: u8 = 0x80;
const SHORT_OFFSET_BIT: u8 = 0x40;
const OFFSET_MASK: u8 = 0x3f;
const FOURTEEN_BIT_SIGN: u16 = 0x2000;
const SIGN_EXTENSION: u16 = 0xc000;

/// Conditional branch decoded from the descriptor byte(s) after an instruction.
///
/// Offsets 0 and 1 mean "return false" and "return true"; that is left to the
/// handler.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Branch {
    pub on_true: bool,
    pub offset: i16,
}

impl Branch {
    /// `true` when the descriptor needs a second byte to complete a 14-bit offset.
    #[must_use]
    pub const fn needs_second_byte(first: u8) -> bool {
        first & SHORT_OFFSET_BIT == 0
    }

    /// Single byte form: the low six bits are the whole, unsigned offset.
    #[must_use]
    pub const fn from_short(first: u8) -> Self {
        Self {
            on_true: first & POLARITY_BIT != 0,
            offset: (first & OFFSET_MASK) as i16,
        }
    }

    /// Two byte form: a signed 14-bit offset.
    #[must_use]
    pub const fn from_long(first: u8, second: u8) -> Self {
        let raw = (((first & OFFSET_MASK) as u16) << 8) | second as u16;
        Self {
            on_true: first & POLARITY_BIT != 0,
            offset: sign_extend_14(raw),
        }
    }

    #[must_use]
    pub const fn is_return(&self) -> bool {
        self.offset == 0 || self.offset == 1
    }
}

/// Widens a 14-bit two's-complement value to 16 bits.
#[must_use]
pub const fn sign_extend_14(value: u16) -> i16 {
    let value = value & 0x3fff;
    if value & FOURTEEN_BIT_SIGN != 0 {
        to_signed_word(value | SIGN_EXTENSION)
    } else {
        to_signed_word(value)
    }
}

impl Display for Branch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let polarity = if self.on_true { "" } else { "~" };
        match self.offset {
            0 => write!(f, "?{polarity}rfalse"),
            1 => write!(f, "?{polarity}rtrue"),
            offset => write!(f, "?{polarity}{offset:+}"),
        }
    }
}
