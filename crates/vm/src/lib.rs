/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::error::VmError;
use crate::header::{FLAGS2_RESET_KEEP, Header, HeaderField, set_standard_flags};
use crate::memory::{HEADER_SIZE, Memory};
use crate::output::OutputState;
use std::ops::RangeInclusive;
use std::rc::Rc;
use tracing::debug;

pub mod dispatch;
pub mod error;
pub mod header;
pub mod memory;
pub mod output;
pub mod prelude;
pub mod step;
pub mod variables;

pub const SUPPORTED_VERSIONS: RangeInclusive<u8> = 1..=8;

/// A routine activation. The executor decides what goes in here; the
/// decoder only reads `locals` and pops `stack` through the standard
/// variable reader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallFrame {
    pub return_pc: u32,
    pub locals: Vec<u16>,
    pub stack: Vec<u16>,
    /// Where the caller wants the return value, `None` for `call_*n`.
    pub store_var: Option<u8>,
    pub arg_count: u8,
}

impl CallFrame {
    /// The frame the game starts in. It has no locals and can not be
    /// returned from.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }
}

pub struct Environment {
    memory: Memory,
    version: u8,

    // Execution state
    pc: u32,
    call_stack: Vec<CallFrame>,
    execution_complete: bool,

    // Where the last store variable byte and branch descriptor were read.
    // Only needed to write save files.
    last_store_var_ptr: Option<u32>,
    last_branch_ptr: Option<u32>,

    pub output: OutputState,
}

impl Environment {
    /// Loads an image and normalises its header.
    ///
    /// # Errors
    /// If the image can not hold a header or has an unknown version.
    pub fn new(image: Vec<u8>) -> Result<Self, VmError> {
        Self::from_memory(Memory::new(image))
    }

    fn from_memory(mut memory: Memory) -> Result<Self, VmError> {
        if memory.len() < HEADER_SIZE {
            return Err(VmError::ImageTooSmall {
                len: memory.len(),
                required: HEADER_SIZE,
            });
        }

        let version = memory.header().version()?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(VmError::UnsupportedVersion(version));
        }

        set_standard_flags(&mut memory)?;

        let pc = u32::from(memory.header().pc()?);

        debug!(version, pc, len = memory.len(), "environment created");

        Ok(Self {
            memory,
            version,
            pc,
            call_stack: vec![CallFrame::root()],
            execution_complete: false,
            last_store_var_ptr: None,
            last_branch_ptr: None,
            output: OutputState::new(),
        })
    }

    /// Rebuilds the machine from the image as it was loaded.
    ///
    /// Only the two low bits of `flags2` (transcripting and fixed pitch
    /// font) survive.
    ///
    /// # Errors
    /// Only if the original image has become unloadable, which it can not.
    pub fn reset(&mut self) -> Result<(), VmError> {
        let preserved = self.memory.header().flags2()? & FLAGS2_RESET_KEEP;

        let mut fresh = Self::from_memory(Memory::from_original(Rc::clone(
            self.memory.original(),
        )))?;
        fresh
            .memory
            .header_mut()
            .update(HeaderField::Flags2, |flags| {
                (flags & !FLAGS2_RESET_KEEP) | preserved
            })?;

        *self = fresh;

        debug!(preserved, "environment reset");

        Ok(())
    }

    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    #[must_use]
    pub const fn header(&self) -> Header<'_> {
        self.memory.header()
    }

    #[must_use]
    pub const fn version(&self) -> u8 {
        self.version
    }

    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    pub const fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    #[must_use]
    pub fn call_stack(&self) -> &[CallFrame] {
        &self.call_stack
    }

    pub const fn call_stack_mut(&mut self) -> &mut Vec<CallFrame> {
        &mut self.call_stack
    }

    /// # Errors
    /// If every frame has been popped.
    pub fn current_frame(&self) -> Result<&CallFrame, VmError> {
        self.call_stack.last().ok_or(VmError::EmptyCallStack)
    }

    /// # Errors
    /// If every frame has been popped.
    pub fn current_frame_mut(&mut self) -> Result<&mut CallFrame, VmError> {
        self.call_stack.last_mut().ok_or(VmError::EmptyCallStack)
    }

    #[must_use]
    pub const fn last_store_var_ptr(&self) -> Option<u32> {
        self.last_store_var_ptr
    }

    #[must_use]
    pub const fn last_branch_ptr(&self) -> Option<u32> {
        self.last_branch_ptr
    }

    /// Stops [`step::Stepper::run`] after the current instruction.
    pub const fn halt(&mut self) {
        self.execution_complete = true;
    }

    #[must_use]
    pub const fn is_execution_complete(&self) -> bool {
        self.execution_complete
    }
}
