/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
pub use crate::{
    Branch, DecodedInstruction,
    form::{InstructionForm, OperandCount},
    opcode::{OpcodeInfo, extended_info, standard_info},
    operand::{OperandSize, long_form_sizes, operand_sizes, short_form_descriptor},
    to_signed_byte, to_signed_word, to_unsigned_word,
};
