/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
pub mod branch;
pub mod form;
pub mod opcode;
pub mod operand;
pub mod prelude;

pub use branch::Branch;

use crate::form::{InstructionForm, OperandCount};
use crate::operand::OperandSize;

/// The escape byte that introduces an extended-form instruction.
/// The real opcode number is the byte that follows it.
pub const EXTENDED_ESCAPE: u8 = 190;

/// `call_vs2`: variable-form, carries a second size descriptor.
pub const CALL_VS2: u8 = 236;
/// `call_vn2`: variable-form, carries a second size descriptor.
pub const CALL_VN2: u8 = 250;

/// `print`: followed by an inline packed text literal.
pub const PRINT: u8 = 178;
/// `print_ret`: followed by an inline packed text literal.
pub const PRINT_RET: u8 = 179;

/// Two's-complement view of an 8-bit value (`v - 256` when the high bit is set).
#[must_use]
pub const fn to_signed_byte(value: u8) -> i16 {
    value as i8 as i16
}

/// Two's-complement view of a 16-bit value (`v - 65536` when the high bit is set).
#[must_use]
pub const fn to_signed_word(value: u16) -> i16 {
    value as i16
}

#[must_use]
pub const fn to_unsigned_word(value: i16) -> u16 {
    value as u16
}

#[must_use]
pub const fn has_second_descriptor(opcode: u8) -> bool {
    opcode == CALL_VS2 || opcode == CALL_VN2
}

#[must_use]
pub const fn has_inline_text(opcode: u8, form: InstructionForm) -> bool {
    !matches!(form, InstructionForm::Extended) && (opcode == PRINT || opcode == PRINT_RET)
}

/// A fully resolved instruction, ready to be handed to an opcode handler.
///
/// Operands that were encoded as variable references already hold the value
/// read from that variable. The packed text after `print`/`print_ret` is kept
/// raw in `text`, including the terminating word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub address: u32,
    pub opcode: u8,
    pub form: InstructionForm,
    pub count: OperandCount,
    pub sizes: Vec<OperandSize>,
    pub operands: Vec<u16>,
    pub store_var: Option<u8>,
    pub branch: Option<Branch>,
    pub text: Option<Vec<u16>>,
    pub next_pc: u32,
}

impl DecodedInstruction {
    #[must_use]
    pub fn operand(&self, index: usize) -> Option<u16> {
        self.operands.get(index).copied()
    }

    #[must_use]
    pub fn signed_operand(&self, index: usize) -> Option<i16> {
        self.operand(index).map(to_signed_word)
    }

    /// Encoded size in bytes. Zero for a value where `next_pc` is not past
    /// `address`.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.next_pc.saturating_sub(self.address)
    }

    #[must_use]
    pub const fn is_extended(&self) -> bool {
        matches!(self.form, InstructionForm::Extended)
    }
}
