/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use zloom_vm_isa::prelude::*;

#[test]
fn escape_byte_is_always_extended() {
    assert_eq!(InstructionForm::classify(190), InstructionForm::Extended);
    // 190 is 0b1011_1110, which would otherwise be short form
    assert_eq!(InstructionForm::classify(0b1011_1111), InstructionForm::Short);
}

#[test]
fn every_byte_gets_exactly_one_form() {
    for opcode in 0..=u8::MAX {
        let form = InstructionForm::classify(opcode);
        let expected = if opcode == 190 {
            InstructionForm::Extended
        } else if opcode >= 0xc0 {
            InstructionForm::Variable
        } else if opcode >= 0x80 {
            InstructionForm::Short
        } else {
            InstructionForm::Long
        };
        assert_eq!(form, expected, "opcode {opcode:#04X}");
    }
}

#[test]
fn operand_count_classes() {
    assert_eq!(
        OperandCount::of(0xe0, InstructionForm::Variable),
        OperandCount::Variable
    );
    assert_eq!(
        OperandCount::of(0xc1, InstructionForm::Variable),
        OperandCount::Two
    );
    assert_eq!(
        OperandCount::of(0xb0, InstructionForm::Short),
        OperandCount::Zero
    );
    assert_eq!(
        OperandCount::of(0x8c, InstructionForm::Short),
        OperandCount::One
    );
    assert_eq!(
        OperandCount::of(0xa0, InstructionForm::Short),
        OperandCount::One
    );
    assert_eq!(
        OperandCount::of(0x04, InstructionForm::Extended),
        OperandCount::Variable
    );
    assert_eq!(
        OperandCount::of(0x54, InstructionForm::Long),
        OperandCount::Two
    );
}

#[test]
fn opcode_metadata() {
    let je = standard_info(0x01, 3).unwrap();
    assert_eq!(je.mnemonic, "je");
    assert!(je.branches);
    assert!(!je.stores);

    // same 2OP reached through the variable form
    assert_eq!(standard_info(0xc1, 3), Some(je));

    let get_child = standard_info(0x92, 3).unwrap();
    assert!(get_child.stores && get_child.branches);

    assert!(standard_info(0xb5, 3).unwrap().branches);
    assert!(standard_info(0xb5, 4).unwrap().stores);
    assert_eq!(standard_info(0xb5, 5), None);

    assert!(standard_info(0x8f, 3).unwrap().stores);
    assert!(!standard_info(0x8f, 5).unwrap().stores);

    assert_eq!(standard_info(190, 5), None);
    assert_eq!(extended_info(0x09, 5).unwrap().mnemonic, "save_undo");
    assert_eq!(extended_info(0x09, 3), None);
}
