/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::Environment;
use crate::error::VmError;

/// Variable 0 is the top of the routine's evaluation stack.
pub const STACK_VARIABLE: u8 = 0;
pub const LAST_LOCAL: u8 = 15;
pub const FIRST_GLOBAL: u8 = 16;

pub type VariableReader = fn(&mut Environment, u8) -> Result<u16, VmError>;
pub type VariableNamer = fn(u8) -> String;

/// How the decoder turns a variable operand into a value, and how it names
/// variables in trace output. Writing variables is up to the handlers.
#[derive(Clone, Copy)]
pub struct VariableAccess {
    pub read: VariableReader,
    pub name: VariableNamer,
}

impl VariableAccess {
    pub const STANDARD: Self = Self {
        read: read_standard_variable,
        name: standard_variable_name,
    };

    /// # Errors
    /// Whatever the reader reports, see [`read_standard_variable`].
    pub fn read_variable(&self, env: &mut Environment, index: u8) -> Result<u16, VmError> {
        (self.read)(env, index)
    }

    #[must_use]
    pub fn variable_name(&self, index: u8) -> String {
        (self.name)(index)
    }
}

impl Default for VariableAccess {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Reads variable `index` the standard way: the stack is popped, locals come
/// from the current frame and globals from the global variable table.
///
/// # Errors
/// On an empty stack, a local the routine does not have, or a global table
/// that runs past the end of the image.
pub fn read_standard_variable(env: &mut Environment, index: u8) -> Result<u16, VmError> {
    match index {
        STACK_VARIABLE => env
            .current_frame_mut()?
            .stack
            .pop()
            .ok_or(VmError::StackUnderflow),
        1..=LAST_LOCAL => {
            let frame = env.current_frame()?;
            frame
                .locals
                .get(usize::from(index - 1))
                .copied()
                .ok_or(VmError::MissingLocal {
                    index,
                    count: frame.locals.len(),
                })
        }
        _ => {
            let base = u32::from(env.header().global_var_base()?);
            let address = base + 2 * u32::from(index - FIRST_GLOBAL);
            Ok(env.memory().read_word(address)?)
        }
    }
}

#[must_use]
pub fn standard_variable_name(index: u8) -> String {
    match index {
        STACK_VARIABLE => "sp".to_string(),
        1..=LAST_LOCAL => format!("local{}", index - 1),
        _ => format!("g{:02x}", index - FIRST_GLOBAL),
    }
}
