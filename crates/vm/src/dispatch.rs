/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::Environment;
use crate::error::VmError;
use crate::variables::VariableAccess;
use zloom_vm_isa::DecodedInstruction;
use zloom_vm_isa::form::InstructionForm;
use zloom_vm_isa::opcode::{OpcodeInfo, extended_info, standard_info};

pub type OpcodeHandler = fn(&mut Environment, &DecodedInstruction) -> Result<(), VmError>;

const OPCODE_COUNT: usize = 256;

/// Handlers and decode flags for one opcode space, indexed by opcode byte.
///
/// The store and branch flags are read by the decoder, so they have to be
/// right even for opcodes whose handler is missing.
#[derive(Clone)]
pub struct OpcodeTable {
    handlers: [OpcodeHandler; OPCODE_COUNT],
    has_store_var: [bool; OPCODE_COUNT],
    has_branch: [bool; OPCODE_COUNT],
}

impl OpcodeTable {
    /// A table where every opcode is unimplemented, stores nothing and never
    /// branches.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: [const { execute_unimplemented as OpcodeHandler }; OPCODE_COUNT],
            has_store_var: [false; OPCODE_COUNT],
            has_branch: [false; OPCODE_COUNT],
        }
    }

    fn with_info(lookup: impl Fn(u8) -> Option<OpcodeInfo>) -> Self {
        let mut table = Self::new();
        for opcode in 0..=u8::MAX {
            if let Some(info) = lookup(opcode) {
                table.set_store_var(opcode, info.stores);
                table.set_branch(opcode, info.branches);
            }
        }
        table
    }

    /// Store and branch flags for the long, short and variable forms of
    /// `version`.
    #[must_use]
    pub fn standard(version: u8) -> Self {
        Self::with_info(|opcode| standard_info(opcode, version))
    }

    #[must_use]
    pub fn extended(version: u8) -> Self {
        Self::with_info(|opcode| extended_info(opcode, version))
    }

    pub fn register(&mut self, opcode: u8, handler: OpcodeHandler) -> &mut Self {
        self.handlers[opcode as usize] = handler;
        self
    }

    pub fn set_store_var(&mut self, opcode: u8, has_store_var: bool) -> &mut Self {
        self.has_store_var[opcode as usize] = has_store_var;
        self
    }

    pub fn set_branch(&mut self, opcode: u8, has_branch: bool) -> &mut Self {
        self.has_branch[opcode as usize] = has_branch;
        self
    }

    #[must_use]
    pub fn handler(&self, opcode: u8) -> OpcodeHandler {
        self.handlers[opcode as usize]
    }

    #[must_use]
    pub fn has_store_var(&self, opcode: u8) -> bool {
        self.has_store_var[opcode as usize]
    }

    #[must_use]
    pub fn has_branch(&self, opcode: u8) -> bool {
        self.has_branch[opcode as usize]
    }
}

impl Default for OpcodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the stepper needs from the executor. Filled in once before the
/// first step and not touched afterwards.
#[derive(Clone)]
pub struct DispatchTables {
    pub standard: OpcodeTable,
    pub extended: OpcodeTable,
    pub variables: VariableAccess,
}

impl DispatchTables {
    /// Tables with the opcode metadata of `version`, standard variable access
    /// and no handlers.
    #[must_use]
    pub fn for_version(version: u8) -> Self {
        Self {
            standard: OpcodeTable::standard(version),
            extended: OpcodeTable::extended(version),
            variables: VariableAccess::STANDARD,
        }
    }

    #[must_use]
    pub const fn table(&self, form: InstructionForm) -> &OpcodeTable {
        match form {
            InstructionForm::Extended => &self.extended,
            _ => &self.standard,
        }
    }

    pub const fn table_mut(&mut self, form: InstructionForm) -> &mut OpcodeTable {
        match form {
            InstructionForm::Extended => &mut self.extended,
            _ => &mut self.standard,
        }
    }
}

fn execute_unimplemented(
    _env: &mut Environment,
    instruction: &DecodedInstruction,
) -> Result<(), VmError> {
    Err(VmError::UnimplementedOpcode {
        opcode: instruction.opcode,
        form: instruction.form,
        address: instruction.address,
    })
}
