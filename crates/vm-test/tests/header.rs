/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use zloom_vm::{CallFrame, Environment};
use zloom_vm::error::VmError;
use zloom_vm::header::{FieldWidth, HeaderField, INTERPRETER_NUMBER};
use zloom_vm::memory::HEADER_SIZE;
use zloom_vm_test::util::{DEFAULT_PC, ImageBuilder, compare_bytes};

#[test]
fn version_3_keeps_only_status_line_bits() {
    let env = ImageBuilder::new(3)
        .field(HeaderField::Flags1, 0xff)
        .environment();

    assert_eq!(env.header().flags1().unwrap(), 0b1000_1111);
    assert_eq!(env.header().get(HeaderField::InterpNumber).unwrap(), 0);
    assert_eq!(env.version(), 3);
}

#[test]
fn version_3_leaves_other_flags1_bits_untouched() {
    let env = ImageBuilder::new(3)
        .field(HeaderField::Flags1, 0x8a)
        .environment();

    assert_eq!(env.header().flags1().unwrap(), 0x8a);
}

#[test]
fn version_3_clears_status_line_bits_on_their_own() {
    let env = ImageBuilder::new(3)
        .field(HeaderField::Flags1, 0b0111_0000)
        .environment();

    assert_eq!(env.header().flags1().unwrap(), 0);
}

#[test]
fn version_5_advertises_fixed_capabilities() {
    let env = ImageBuilder::new(5)
        .field(HeaderField::Flags1, 0xff)
        .environment();

    assert_eq!(env.header().flags1().unwrap(), 0b0101_0000);
    assert_eq!(
        env.header().get(HeaderField::InterpNumber).unwrap(),
        u16::from(INTERPRETER_NUMBER)
    );

    // lines, chars, width units, height units, font width, font height
    compare_bytes(&env, 0x20, &[40, 80, 0, 80, 0, 40, 1, 1]);
}

#[test]
fn version_4_always_sets_fixed_pitch_bit() {
    let env = ImageBuilder::new(4).environment();

    assert_eq!(env.header().flags1().unwrap(), 0b0001_0000);
}

#[test]
fn loading_leaves_flags2_alone() {
    let env = ImageBuilder::new(5)
        .field(HeaderField::Flags2, 0xffff)
        .environment();

    assert_eq!(env.header().flags2().unwrap(), 0xffff);
}

#[test]
fn pc_comes_from_header() {
    let env = ImageBuilder::new(3).environment();

    assert_eq!(env.pc(), u32::from(DEFAULT_PC));
    assert_eq!(env.call_stack().len(), 1);
    assert!(!env.is_execution_complete());
}

#[test]
fn too_small_image_is_rejected() {
    let result = Environment::new(vec![3; 0x20]);

    assert!(matches!(
        result,
        Err(VmError::ImageTooSmall {
            len: 0x20,
            required: HEADER_SIZE
        })
    ));
}

#[test]
fn unknown_version_is_rejected() {
    let image = ImageBuilder::new(9).build();

    assert!(matches!(
        Environment::new(image),
        Err(VmError::UnsupportedVersion(9))
    ));
}

#[test]
fn serial_is_six_bytes_at_0x12() {
    let env = ImageBuilder::new(3)
        .bytes_at(0x12, b"840726")
        .environment();

    assert_eq!(&env.header().serial().unwrap(), b"840726");
}

#[test]
fn header_field_writes_truncate_to_field_width() {
    let mut env = ImageBuilder::new(3).environment();

    env.memory_mut()
        .header_mut()
        .set(HeaderField::DefaultFgColor, 0x1234)
        .unwrap();

    assert_eq!(env.header().get(HeaderField::DefaultFgColor).unwrap(), 0x34);
    assert_eq!(env.header().get(HeaderField::DefaultBgColor).unwrap(), 0);
}

#[test]
fn signed_header_read() {
    let env = ImageBuilder::new(3)
        .field(HeaderField::Checksum, 0xfffe)
        .environment();

    assert_eq!(env.header().get_signed(HeaderField::Checksum).unwrap(), -2);
}

#[test]
fn every_field_is_inside_the_header() {
    for field in HeaderField::ALL {
        let width = match field.width() {
            FieldWidth::Byte => 1,
            FieldWidth::Word => 2,
        };
        assert!(
            field.offset() as usize + width <= HEADER_SIZE,
            "{field:?}"
        );
    }
}

#[test]
fn reset_restores_image_and_keeps_low_flags2_bits() {
    let mut env = ImageBuilder::new(5)
        .field(HeaderField::Flags2, 0x0100)
        .environment();

    env.memory_mut().write_word(0x10, 0x0003).unwrap();
    env.memory_mut().write_byte(0x40, 0x99).unwrap();
    env.set_pc(0x123);
    env.call_stack_mut().push(CallFrame::default());
    env.halt();

    env.reset().unwrap();

    // bit 8 comes back from the image, bits 0 and 1 survive the reset
    assert_eq!(env.header().flags2().unwrap(), 0x0103);
    assert_eq!(env.memory().read_byte(0x40).unwrap(), 0);
    assert_eq!(env.pc(), u32::from(DEFAULT_PC));
    assert_eq!(env.call_stack().len(), 1);
    assert!(!env.is_execution_complete());
    assert_eq!(env.header().flags1().unwrap(), 0b0001_0000);
}

#[test]
fn reset_clears_low_flags2_bits_that_were_turned_off() {
    let mut env = ImageBuilder::new(3)
        .field(HeaderField::Flags2, 0x0003)
        .environment();

    env.memory_mut()
        .header_mut()
        .set(HeaderField::Flags2, 0)
        .unwrap();

    env.reset().unwrap();

    assert_eq!(env.header().flags2().unwrap(), 0);
}
