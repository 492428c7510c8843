/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use crate::form::{InstructionForm, OperandCount};

/// Static facts about an opcode that the decoder needs: whether a store
/// variable byte and a branch descriptor follow the operands.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub stores: bool,
    pub branches: bool,
}

const fn plain(mnemonic: &'static str) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        stores: false,
        branches: false,
    })
}

const fn store(mnemonic: &'static str) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        stores: true,
        branches: false,
    })
}

const fn branch(mnemonic: &'static str) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        stores: false,
        branches: true,
    })
}

const fn store_branch(mnemonic: &'static str) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        stores: true,
        branches: true,
    })
}

/// Looks up an opcode byte of the long, short or variable form.
///
/// The opcode is the full first byte of the instruction, the same key the
/// standard dispatch table uses.
#[must_use]
pub fn standard_info(opcode: u8, version: u8) -> Option<OpcodeInfo> {
    let form = InstructionForm::classify(opcode);
    if form == InstructionForm::Extended {
        return None;
    }
    match OperandCount::of(opcode, form) {
        OperandCount::Two => two_op(opcode & 0x1f, version),
        OperandCount::One => one_op(opcode & 0x0f, version),
        OperandCount::Zero => zero_op(opcode & 0x0f, version),
        OperandCount::Variable => var_op(opcode & 0x1f, version),
    }
}

fn two_op(number: u8, version: u8) -> Option<OpcodeInfo> {
    match number {
        0x01 => branch("je"),
        0x02 => branch("jl"),
        0x03 => branch("jg"),
        0x04 => branch("dec_chk"),
        0x05 => branch("inc_chk"),
        0x06 => branch("jin"),
        0x07 => branch("test"),
        0x08 => store("or"),
        0x09 => store("and"),
        0x0a => branch("test_attr"),
        0x0b => plain("set_attr"),
        0x0c => plain("clear_attr"),
        0x0d => plain("store"),
        0x0e => plain("insert_obj"),
        0x0f => store("loadw"),
        0x10 => store("loadb"),
        0x11 => store("get_prop"),
        0x12 => store("get_prop_addr"),
        0x13 => store("get_next_prop"),
        0x14 => store("add"),
        0x15 => store("sub"),
        0x16 => store("mul"),
        0x17 => store("div"),
        0x18 => store("mod"),
        0x19 if version >= 4 => store("call_2s"),
        0x1a if version >= 5 => plain("call_2n"),
        0x1b if version >= 5 => plain("set_colour"),
        0x1c if version >= 5 => plain("throw"),
        _ => None,
    }
}

fn one_op(number: u8, version: u8) -> Option<OpcodeInfo> {
    match number {
        0x00 => branch("jz"),
        0x01 => store_branch("get_sibling"),
        0x02 => store_branch("get_child"),
        0x03 => store("get_parent"),
        0x04 => store("get_prop_len"),
        0x05 => plain("inc"),
        0x06 => plain("dec"),
        0x07 => plain("print_addr"),
        0x08 if version >= 4 => store("call_1s"),
        0x09 => plain("remove_obj"),
        0x0a => plain("print_obj"),
        0x0b => plain("ret"),
        0x0c => plain("jump"),
        0x0d => plain("print_paddr"),
        0x0e => store("load"),
        0x0f if version >= 5 => plain("call_1n"),
        0x0f => store("not"),
        _ => None,
    }
}

fn zero_op(number: u8, version: u8) -> Option<OpcodeInfo> {
    match number {
        0x00 => plain("rtrue"),
        0x01 => plain("rfalse"),
        0x02 => plain("print"),
        0x03 => plain("print_ret"),
        0x04 => plain("nop"),
        0x05 if version <= 3 => branch("save"),
        0x05 if version == 4 => store("save"),
        0x06 if version <= 3 => branch("restore"),
        0x06 if version == 4 => store("restore"),
        0x07 => plain("restart"),
        0x08 => plain("ret_popped"),
        0x09 if version >= 5 => store("catch"),
        0x09 => plain("pop"),
        0x0a => plain("quit"),
        0x0b => plain("new_line"),
        0x0c if version <= 3 => plain("show_status"),
        0x0d => branch("verify"),
        0x0f if version >= 5 => branch("piracy"),
        _ => None,
    }
}

fn var_op(number: u8, version: u8) -> Option<OpcodeInfo> {
    match number {
        0x00 => store(if version >= 4 { "call_vs" } else { "call" }),
        0x01 => plain("storew"),
        0x02 => plain("storeb"),
        0x03 => plain("put_prop"),
        0x04 if version >= 5 => store("aread"),
        0x04 => plain("sread"),
        0x05 => plain("print_char"),
        0x06 => plain("print_num"),
        0x07 => store("random"),
        0x08 => plain("push"),
        0x09 if version == 6 => store("pull"),
        0x09 => plain("pull"),
        0x0a => plain("split_window"),
        0x0b => plain("set_window"),
        0x0c if version >= 4 => store("call_vs2"),
        0x0d => plain("erase_window"),
        0x0e => plain("erase_line"),
        0x0f => plain("set_cursor"),
        0x10 if version >= 4 => plain("get_cursor"),
        0x11 => plain("set_text_style"),
        0x12 => plain("buffer_mode"),
        0x13 => plain("output_stream"),
        0x14 => plain("input_stream"),
        0x15 => plain("sound_effect"),
        0x16 if version >= 4 => store("read_char"),
        0x17 if version >= 4 => store_branch("scan_table"),
        0x18 if version >= 5 => store("not"),
        0x19 if version >= 5 => plain("call_vn"),
        0x1a if version >= 5 => plain("call_vn2"),
        0x1b if version >= 5 => plain("tokenise"),
        0x1c if version >= 5 => plain("encode_text"),
        0x1d if version >= 5 => plain("copy_table"),
        0x1e if version >= 5 => plain("print_table"),
        0x1f if version >= 5 => branch("check_arg_count"),
        _ => None,
    }
}

/// Looks up the opcode byte that follows the extended escape.
#[must_use]
pub fn extended_info(opcode: u8, version: u8) -> Option<OpcodeInfo> {
    if version < 5 {
        return None;
    }
    match opcode {
        0x00 => store("save"),
        0x01 => store("restore"),
        0x02 => store("log_shift"),
        0x03 => store("art_shift"),
        0x04 => store("set_font"),
        0x05 => plain("draw_picture"),
        0x06 => branch("picture_data"),
        0x07 => plain("erase_picture"),
        0x08 => plain("set_margins"),
        0x09 => store("save_undo"),
        0x0a => store("restore_undo"),
        0x0b => plain("print_unicode"),
        0x0c => store("check_unicode"),
        0x0d => plain("set_true_colour"),
        0x10 => plain("move_window"),
        0x11 => plain("window_size"),
        0x12 => plain("window_style"),
        0x13 => store("get_wind_prop"),
        0x14 => plain("scroll_window"),
        0x15 => plain("pop_stack"),
        0x16 => plain("read_mouse"),
        0x17 => plain("mouse_window"),
        0x18 => branch("push_stack"),
        0x19 => plain("put_wind_prop"),
        0x1a => plain("print_form"),
        0x1b => branch("make_menu"),
        0x1c => plain("picture_table"),
        0x1d => store("buffer_screen"),
        _ => None,
    }
}
