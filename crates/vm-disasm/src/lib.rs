/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use std::fmt::Write;
use zloom_vm_isa::DecodedInstruction;
use zloom_vm_isa::opcode::{extended_info, standard_info};
use zloom_vm_isa::operand::OperandSize;

#[must_use]
pub fn mnemonic(instruction: &DecodedInstruction, version: u8) -> String {
    let info = if instruction.is_extended() {
        extended_info(instruction.opcode, version)
    } else {
        standard_info(instruction.opcode, version)
    };

    match info {
        Some(info) => info.mnemonic.to_string(),
        None if instruction.is_extended() => format!("ext_{:02X}", instruction.opcode),
        None => format!("op_{:02X}", instruction.opcode),
    }
}

fn operand_text(size: Option<&OperandSize>, value: u16) -> String {
    match size {
        Some(OperandSize::Byte) => format!("#{value:02X}"),
        Some(OperandSize::Variable) => format!("*{value:04X}"),
        Some(OperandSize::Word) | None => format!("#{value:04X}"),
    }
}

/// One line per instruction:
///
/// `04F05: je #01 *0004 ?+12  [long/2OP]`
///
/// Operands read through a variable are shown with `*` and already hold the
/// variable's value.
#[must_use]
pub fn disasm(
    instruction: &DecodedInstruction,
    version: u8,
    variable_name: impl Fn(u8) -> String,
) -> String {
    render(instruction, version, variable_name, false)
}

#[must_use]
pub fn disasm_color(
    instruction: &DecodedInstruction,
    version: u8,
    variable_name: impl Fn(u8) -> String,
) -> String {
    render(instruction, version, variable_name, true)
}

fn paint(color: bool, text: &str, painter: impl Fn(&str) -> String) -> String {
    if color {
        painter(text)
    } else {
        text.to_string()
    }
}

fn render(
    instruction: &DecodedInstruction,
    version: u8,
    variable_name: impl Fn(u8) -> String,
    color: bool,
) -> String {
    let mut out = String::new();

    let address = format!("{:05X}:", instruction.address);
    let name = mnemonic(instruction, version);
    write!(
        out,
        "{} {}",
        paint(color, &address, |s| tinter::bright_black(s).to_string()),
        paint(color, &name, |s| tinter::bright_cyan(s).to_string()),
    )
    .expect("insert");

    for (index, value) in instruction.operands.iter().enumerate() {
        let text = operand_text(instruction.sizes.get(index), *value);
        write!(out, " {text}").expect("insert");
    }

    if let Some(words) = &instruction.text {
        write!(out, " \"<{} words>\"", words.len()).expect("insert");
    }

    if let Some(store_var) = instruction.store_var {
        let target = format!("-> {}", variable_name(store_var));
        write!(
            out,
            " {}",
            paint(color, &target, |s| tinter::green(s).to_string())
        )
        .expect("insert");
    }

    if let Some(branch) = instruction.branch {
        write!(
            out,
            " {}",
            paint(color, &branch.to_string(), |s| tinter::bright_magenta(s)
                .to_string())
        )
        .expect("insert");
    }

    let class = format!("[{}/{}]", instruction.form, instruction.count);
    write!(
        out,
        "  {}",
        paint(color, &class, |s| tinter::bright_black(s).to_string())
    )
    .expect("insert");

    out
}
