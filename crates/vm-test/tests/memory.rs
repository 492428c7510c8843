/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use zloom_vm::memory::MemoryError;
use zloom_vm_test::util::{DEFAULT_STATIC_BASE, IMAGE_LEN, ImageBuilder};

#[test]
fn dynamic_memory_is_writable() {
    let mut env = ImageBuilder::new(3).environment();
    let memory = env.memory_mut();

    memory.write_byte(0x37, 0x11).unwrap();
    memory.write_word(0x40, 0xabcd).unwrap();
    memory
        .write_byte(u32::from(DEFAULT_STATIC_BASE) - 1, 0x22)
        .unwrap();

    assert_eq!(memory.read_byte(0x37).unwrap(), 0x11);
    assert_eq!(memory.read_word(0x40).unwrap(), 0xabcd);
    assert_eq!(memory.read_byte(0x40).unwrap(), 0xab);
    assert_eq!(memory.read_byte(0x41).unwrap(), 0xcd);
}

#[test]
fn static_memory_is_read_only() {
    let mut env = ImageBuilder::new(3).environment();

    let result = env
        .memory_mut()
        .write_byte(u32::from(DEFAULT_STATIC_BASE), 1);

    assert_eq!(
        result,
        Err(MemoryError::StaticWrite {
            address: u32::from(DEFAULT_STATIC_BASE),
            static_base: DEFAULT_STATIC_BASE,
        })
    );
    assert_eq!(
        env.memory()
            .read_byte(u32::from(DEFAULT_STATIC_BASE))
            .unwrap(),
        0
    );
}

#[test]
fn header_is_read_only_except_flags2() {
    let mut env = ImageBuilder::new(3).environment();
    let memory = env.memory_mut();

    for address in [0x00, 0x06, 0x0e, 0x11, 0x36] {
        assert_eq!(
            memory.write_byte(address, 0xff),
            Err(MemoryError::HeaderWrite { address }),
            "{address:#04X}"
        );
    }

    memory.write_byte(0x10, 0x80).unwrap();
    assert_eq!(memory.read_byte(0x10).unwrap(), 0x80);
}

#[test]
fn reads_past_the_end_fail() {
    let env = ImageBuilder::new(3).environment();
    let memory = env.memory();
    let last = (IMAGE_LEN - 1) as u32;

    assert!(memory.read_byte(last).is_ok());
    assert!(matches!(
        memory.read_byte(last + 1),
        Err(MemoryError::OutOfBounds { .. })
    ));
    assert!(matches!(
        memory.read_word(last),
        Err(MemoryError::OutOfBounds { .. })
    ));
}

#[test]
fn signed_reads() {
    let env = ImageBuilder::new(3)
        .bytes_at(0x50, &[0xff, 0x80, 0x7f])
        .environment();
    let memory = env.memory();

    assert_eq!(memory.read_signed_byte(0x50).unwrap(), -1);
    assert_eq!(memory.read_signed_byte(0x51).unwrap(), -128);
    assert_eq!(memory.read_signed_word(0x50).unwrap(), -128);
    assert_eq!(memory.read_signed_word(0x51).unwrap(), -32641);
}

#[test]
fn original_image_is_kept() {
    let mut env = ImageBuilder::new(3).environment();

    env.memory_mut().write_byte(0x40, 0x55).unwrap();

    assert_eq!(env.memory().original()[0x40], 0);
    assert_eq!(env.memory().len(), IMAGE_LEN);
}

#[test]
fn addresses_at_the_top_of_the_range_fail_cleanly() {
    let env = ImageBuilder::new(3).environment();
    let memory = env.memory();

    assert_eq!(
        memory.read_word(u32::MAX),
        Err(MemoryError::OutOfBounds {
            address: u32::MAX,
            len: IMAGE_LEN,
        })
    );
    assert!(matches!(
        memory.read_signed_word(u32::MAX),
        Err(MemoryError::OutOfBounds { .. })
    ));
    assert!(matches!(
        memory.read_slice(u32::MAX, 4),
        Err(MemoryError::OutOfBounds { .. })
    ));
    assert!(matches!(
        memory.read_slice(0, usize::MAX),
        Err(MemoryError::OutOfBounds { .. })
    ));
}

#[test]
fn slices_must_fit_in_the_image() {
    let env = ImageBuilder::new(3).environment();
    let memory = env.memory();
    let last = (IMAGE_LEN - 1) as u32;

    assert_eq!(memory.read_slice(last, 1).unwrap().len(), 1);
    assert!(memory.read_slice(last, 2).is_err());
    assert!(memory.read_slice(0, IMAGE_LEN).is_ok());
}
