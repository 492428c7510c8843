/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use zloom_vm_isa::branch::sign_extend_14;
use zloom_vm_isa::prelude::*;

#[test]
fn single_byte_descriptor() {
    assert!(!Branch::needs_second_byte(0xc0));
    let branch = Branch::from_short(0xc0);
    assert!(branch.on_true);
    assert_eq!(branch.offset, 0);
    assert!(branch.is_return());

    let branch = Branch::from_short(0x7f);
    assert!(!branch.on_true);
    assert_eq!(branch.offset, 63);
}

#[test]
fn two_byte_descriptor_positive() {
    assert!(Branch::needs_second_byte(0x00));
    let branch = Branch::from_long(0x00, 0x05);
    assert!(!branch.on_true);
    assert_eq!(branch.offset, 5);

    let branch = Branch::from_long(0x9f, 0xff);
    assert!(branch.on_true);
    assert_eq!(branch.offset, 0x1fff);
}

#[test]
fn two_byte_descriptor_with_bit_13_is_negative() {
    // low six bits 0b10_0000 put bit 13 of the 14-bit offset on
    let branch = Branch::from_long(0x20, 0x05);
    assert!(!branch.on_true);
    assert_eq!(branch.offset, -8187);

    let branch = Branch::from_long(0xbf, 0xfe);
    assert!(branch.on_true);
    assert_eq!(branch.offset, -2);
}

#[test]
fn fourteen_bit_sign_extension() {
    assert!(sign_extend_14(0x2001) < 0);
    assert_eq!(sign_extend_14(0x2001), to_signed_word(0xe001));
    assert_eq!(sign_extend_14(0x3fff), -1);
    assert_eq!(sign_extend_14(0x1fff), 0x1fff);
    assert_eq!(sign_extend_14(0x0000), 0);
}

#[test]
fn signed_conversions() {
    for value in 0..=u16::MAX {
        let signed = to_signed_word(value);
        assert_eq!(to_unsigned_word(signed), value);
        assert_eq!(signed < 0, value & 0x8000 != 0);
        let expected = if value & 0x8000 != 0 {
            i32::from(value) - 65536
        } else {
            i32::from(value)
        };
        assert_eq!(i32::from(signed), expected);
    }

    assert_eq!(to_signed_byte(0xff), -1);
    assert_eq!(to_signed_byte(0x80), -128);
    assert_eq!(to_signed_byte(0x7f), 127);
}

#[test]
fn branch_display() {
    assert_eq!(Branch::from_short(0xc1).to_string(), "?rtrue");
    assert_eq!(Branch::from_short(0x40).to_string(), "?~rfalse");
    assert_eq!(Branch::from_long(0x80, 0x10).to_string(), "?+16");
    assert_eq!(Branch::from_long(0x3f, 0xfe).to_string(), "?~-2");
}
