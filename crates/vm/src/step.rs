/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::Environment;
use crate::dispatch::DispatchTables;
use crate::error::VmError;
use crate::header::clamp_dynamic_flags;
use crate::memory::{Memory, MemoryError};
use tracing::debug;
use zloom_vm_disasm::{disasm, disasm_color};
use zloom_vm_isa::form::{InstructionForm, OperandCount};
use zloom_vm_isa::operand::{
    OperandSize, long_form_sizes, operand_sizes, scan_descriptor, short_form_descriptor,
};
use zloom_vm_isa::{Branch, DecodedInstruction, has_inline_text, has_second_descriptor};

const TEXT_END_BIT: u16 = 0x8000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepConfig {
    /// Log every decoded instruction at debug level.
    pub trace_steps: bool,
    /// Use terminal colours in the trace lines.
    pub trace_color: bool,
}

/// Reads instruction bytes from the image, one step at a time.
struct DecodeCursor {
    position: u32,
}

impl DecodeCursor {
    const fn new(position: u32) -> Self {
        Self { position }
    }

    const fn position(&self) -> u32 {
        self.position
    }

    fn next_byte(&mut self, memory: &Memory) -> Result<u8, MemoryError> {
        let octet = memory.read_byte(self.position)?;
        self.position += 1;
        Ok(octet)
    }

    fn next_word(&mut self, memory: &Memory) -> Result<u16, MemoryError> {
        let word = memory.read_word(self.position)?;
        self.position += 2;
        Ok(word)
    }
}

/// Fetch, decode and dispatch.
pub struct Stepper<'a> {
    tables: &'a DispatchTables,
    config: StepConfig,
}

impl<'a> Stepper<'a> {
    #[must_use]
    pub const fn new(tables: &'a DispatchTables, config: StepConfig) -> Self {
        Self { tables, config }
    }

    #[must_use]
    pub const fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Decodes the instruction at the program counter without committing it.
    ///
    /// Variable operands are read immediately, so decoding an instruction
    /// that names the stack variable pops the stack. The store and branch
    /// byte locations are recorded in the environment.
    ///
    /// # Errors
    /// If the instruction runs past the end of the image or a variable can
    /// not be read.
    pub fn decode(&self, env: &mut Environment) -> Result<DecodedInstruction, VmError> {
        let address = env.pc();
        let mut cursor = DecodeCursor::new(address);

        let first = cursor.next_byte(env.memory())?;
        let form = InstructionForm::classify(first);
        let count = OperandCount::of(first, form);

        let opcode = match form {
            InstructionForm::Extended => cursor.next_byte(env.memory())?,
            _ => first,
        };

        let sizes = Self::resolve_sizes(env.memory(), &mut cursor, opcode, form)?;
        let operands = self.materialize(env, &mut cursor, &sizes)?;

        let text = if has_inline_text(opcode, form) {
            Some(Self::read_inline_text(env.memory(), &mut cursor)?)
        } else {
            None
        };

        let table = self.tables.table(form);

        let store_var = if table.has_store_var(opcode) {
            env.last_store_var_ptr = Some(cursor.position());
            Some(cursor.next_byte(env.memory())?)
        } else {
            None
        };

        let branch = if table.has_branch(opcode) {
            env.last_branch_ptr = Some(cursor.position());
            let descriptor = cursor.next_byte(env.memory())?;
            if Branch::needs_second_byte(descriptor) {
                let low = cursor.next_byte(env.memory())?;
                Some(Branch::from_long(descriptor, low))
            } else {
                Some(Branch::from_short(descriptor))
            }
        } else {
            None
        };

        Ok(DecodedInstruction {
            address,
            opcode,
            form,
            count,
            sizes,
            operands,
            store_var,
            branch,
            text,
            next_pc: cursor.position(),
        })
    }

    fn resolve_sizes(
        memory: &Memory,
        cursor: &mut DecodeCursor,
        opcode: u8,
        form: InstructionForm,
    ) -> Result<Vec<OperandSize>, MemoryError> {
        let sizes = match form {
            InstructionForm::Short => operand_sizes(short_form_descriptor(opcode)),
            InstructionForm::Long => long_form_sizes(opcode).to_vec(),
            InstructionForm::Variable => {
                let mut sizes = operand_sizes(cursor.next_byte(memory)?);
                if has_second_descriptor(opcode) {
                    scan_descriptor(cursor.next_byte(memory)?, &mut sizes);
                }
                sizes
            }
            InstructionForm::Extended => operand_sizes(cursor.next_byte(memory)?),
        };
        Ok(sizes)
    }

    fn materialize(
        &self,
        env: &mut Environment,
        cursor: &mut DecodeCursor,
        sizes: &[OperandSize],
    ) -> Result<Vec<u16>, VmError> {
        let mut operands = Vec::with_capacity(sizes.len());

        for size in sizes {
            let value = match size {
                OperandSize::Word => cursor.next_word(env.memory())?,
                OperandSize::Byte => u16::from(cursor.next_byte(env.memory())?),
                OperandSize::Variable => {
                    let variable = cursor.next_byte(env.memory())?;
                    let value = self.tables.variables.read_variable(env, variable)?;
                    if self.config.trace_steps {
                        debug!(
                            "      found {value} in {}",
                            self.tables.variables.variable_name(variable)
                        );
                    }
                    value
                }
            };
            operands.push(value);
        }

        Ok(operands)
    }

    /// Packed text runs until a word with the top bit set, that word included.
    fn read_inline_text(
        memory: &Memory,
        cursor: &mut DecodeCursor,
    ) -> Result<Vec<u16>, MemoryError> {
        let mut words = Vec::new();
        loop {
            let word = cursor.next_word(memory)?;
            words.push(word);
            if word & TEXT_END_BIT != 0 {
                return Ok(words);
            }
        }
    }

    /// Executes one instruction.
    ///
    /// The program counter is moved past the instruction before the handler
    /// runs, so jumps and calls can simply overwrite it.
    ///
    /// # Errors
    /// Decode errors, or whatever the handler returns.
    pub fn step(&self, env: &mut Environment) -> Result<(), VmError> {
        clamp_dynamic_flags(env.memory_mut())?;

        let instruction = self.decode(env)?;

        env.set_pc(instruction.next_pc);

        if self.config.trace_steps {
            self.trace(env, &instruction);
        }

        let handler = self.tables.table(instruction.form).handler(instruction.opcode);
        handler(env, &instruction)
    }

    fn trace(&self, env: &Environment, instruction: &DecodedInstruction) {
        let variables = &self.tables.variables;
        let line = if self.config.trace_color {
            disasm_color(instruction, env.version(), |index| {
                variables.variable_name(index)
            })
        } else {
            disasm(instruction, env.version(), |index| {
                variables.variable_name(index)
            })
        };

        debug!(
            pc = instruction.address,
            opcode = instruction.opcode,
            form = %instruction.form,
            count = %instruction.count,
            sizes = ?instruction.sizes,
            operands = ?instruction.operands,
            next_pc = instruction.next_pc,
            "{line}"
        );
    }

    /// Steps until a handler halts the environment.
    ///
    /// # Errors
    /// The first error from [`Self::step`].
    pub fn run(&self, env: &mut Environment) -> Result<(), VmError> {
        while !env.is_execution_complete() {
            self.step(env)?;
        }
        Ok(())
    }

    /// Like [`Self::run`], but gives up after `max_steps` instructions.
    /// Returns the number of instructions executed.
    ///
    /// # Errors
    /// The first error from [`Self::step`].
    pub fn run_for(&self, env: &mut Environment, max_steps: usize) -> Result<usize, VmError> {
        let mut executed = 0;
        while executed < max_steps && !env.is_execution_complete() {
            self.step(env)?;
            executed += 1;
        }
        Ok(executed)
    }
}
