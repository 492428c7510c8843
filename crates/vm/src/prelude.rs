/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
pub use crate::{
    CallFrame, Environment,
    dispatch::{DispatchTables, OpcodeHandler, OpcodeTable},
    error::VmError,
    header::{Header, HeaderField, HeaderMut},
    memory::{Memory, MemoryError},
    output::OutputState,
    step::{StepConfig, Stepper},
    variables::VariableAccess,
};
