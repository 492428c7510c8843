/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use zloom_vm::Environment;
use zloom_vm::dispatch::DispatchTables;
use zloom_vm::header::{FieldWidth, HeaderField};
use zloom_vm::step::{StepConfig, Stepper};
use zloom_vm_isa::DecodedInstruction;

pub const IMAGE_LEN: usize = 0x400;
pub const DEFAULT_PC: u16 = 0x100;
pub const DEFAULT_GLOBALS: u16 = 0x200;
pub const DEFAULT_STATIC_BASE: u16 = 0x300;

/// Builds small story images by hand.
///
/// Layout: header, code at [`DEFAULT_PC`], the global variable table at
/// [`DEFAULT_GLOBALS`] and static memory from [`DEFAULT_STATIC_BASE`].
#[derive(Debug, Clone)]
pub struct ImageBuilder {
    bytes: Vec<u8>,
}

impl ImageBuilder {
    #[must_use]
    pub fn new(version: u8) -> Self {
        let mut builder = Self {
            bytes: vec![0; IMAGE_LEN],
        };
        builder.bytes[0] = version;
        builder
            .field(HeaderField::Pc, DEFAULT_PC)
            .field(HeaderField::GlobalVarBase, DEFAULT_GLOBALS)
            .field(HeaderField::StaticMemBase, DEFAULT_STATIC_BASE)
    }

    /// Writes a header field, byte or word depending on the field.
    #[must_use]
    pub fn field(mut self, field: HeaderField, value: u16) -> Self {
        let offset = field.offset() as usize;
        match field.width() {
            FieldWidth::Byte => self.bytes[offset] = (value & 0xff) as u8,
            FieldWidth::Word => {
                self.bytes[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
            }
        }
        self
    }

    #[must_use]
    pub fn bytes_at(mut self, address: u16, values: &[u8]) -> Self {
        let start = address as usize;
        self.bytes[start..start + values.len()].copy_from_slice(values);
        self
    }

    #[must_use]
    pub fn word_at(self, address: u16, value: u16) -> Self {
        self.bytes_at(address, &value.to_be_bytes())
    }

    /// Places instruction bytes at the initial program counter.
    #[must_use]
    pub fn code(self, values: &[u8]) -> Self {
        self.bytes_at(DEFAULT_PC, values)
    }

    /// Sets global variable `variable` (16 and up).
    #[must_use]
    pub fn global(self, variable: u8, value: u16) -> Self {
        let address = DEFAULT_GLOBALS + 2 * u16::from(variable - 16);
        self.word_at(address, value)
    }

    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    /// # Panics
    /// If the image is rejected.
    #[must_use]
    pub fn environment(self) -> Environment {
        Environment::new(self.bytes).unwrap()
    }
}

#[must_use]
pub fn stepper(tables: &DispatchTables) -> Stepper<'_> {
    Stepper::new(
        tables,
        StepConfig {
            trace_steps: true,
            trace_color: false,
        },
    )
}

/// Decodes the first instruction of `code` in a fresh environment.
///
/// # Panics
/// If the instruction can not be decoded.
#[must_use]
pub fn decode_one(version: u8, code: &[u8]) -> DecodedInstruction {
    let mut env = ImageBuilder::new(version).code(code).environment();
    let tables = DispatchTables::for_version(version);
    stepper(&tables).decode(&mut env).unwrap()
}

/// Hex dump of `len` bytes starting at `address`, for assertion messages.
#[must_use]
pub fn dump(env: &Environment, address: usize, len: usize) -> String {
    hexify::format_hex(&env.memory().bytes()[address..address + len])
}

pub fn compare_bytes(env: &Environment, address: usize, expected: &[u8]) {
    let encountered = &env.memory().bytes()[address..address + expected.len()];
    if encountered != expected {
        eprintln!("{}", dump(env, address, expected.len()));
    }
    assert_eq!(encountered, expected);
}
