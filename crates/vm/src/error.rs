/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::memory::MemoryError;
use thiserror::Error;
use zloom_vm_isa::form::InstructionForm;

/// Everything that stops the machine. None of these are recoverable: they
/// mean the image is corrupt, unsupported, or asks for something that is
/// not implemented.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VmError {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error("image is {len} bytes, too small for the {required} byte header")]
    ImageTooSmall { len: usize, required: usize },
    #[error("unknown z-machine version {0}")]
    UnsupportedVersion(u8),
    #[error("opcode not implemented: {opcode} ({form} form) at {address:#06X}")]
    UnimplementedOpcode {
        opcode: u8,
        form: InstructionForm,
        address: u32,
    },
    #[error("call stack is empty")]
    EmptyCallStack,
    #[error("evaluation stack underflow reading variable sp")]
    StackUnderflow,
    #[error("local variable {index} read, but the routine only has {count} locals")]
    MissingLocal { index: u8, count: usize },
    #[error("{0}")]
    Executor(String),
}
