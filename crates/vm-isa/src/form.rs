/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::EXTENDED_ESCAPE;
use std::fmt::{Display, Formatter};

/// How the operand widths of an instruction are encoded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InstructionForm {
    /// `0b0xxx_xxxx`: two operands, widths in opcode bits 6 and 5.
    Long,
    /// `0b10xx_xxxx`: zero or one operand, width in opcode bits 4-5.
    Short,
    /// `0b11xx_xxxx`: widths in a size descriptor byte.
    Variable,
    /// Escape byte 190, opcode in the next byte, then a size descriptor.
    Extended,
}

impl InstructionForm {
    #[must_use]
    pub const fn classify(opcode: u8) -> Self {
        if opcode == EXTENDED_ESCAPE {
            return Self::Extended;
        }
        match opcode >> 6 {
            0b11 => Self::Variable,
            0b10 => Self::Short,
            _ => Self::Long,
        }
    }
}

impl Display for InstructionForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Long => "long",
            Self::Short => "short",
            Self::Variable => "var",
            Self::Extended => "ext",
        };
        write!(f, "{name}")
    }
}

/// Informational operand count class. Decoding never depends on it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OperandCount {
    Zero,
    One,
    Two,
    Variable,
}

impl OperandCount {
    #[must_use]
    pub const fn of(opcode: u8, form: InstructionForm) -> Self {
        match form {
            InstructionForm::Variable => {
                if (opcode >> 5) & 1 == 1 {
                    Self::Variable
                } else {
                    Self::Two
                }
            }
            InstructionForm::Short => {
                if (opcode >> 4) & 3 == 3 {
                    Self::Zero
                } else {
                    Self::One
                }
            }
            InstructionForm::Extended => Self::Variable,
            InstructionForm::Long => Self::Two,
        }
    }
}

impl Display for OperandCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Zero => "0OP",
            Self::One => "1OP",
            Self::Two => "2OP",
            Self::Variable => "VAR",
        };
        write!(f, "{name}")
    }
}
