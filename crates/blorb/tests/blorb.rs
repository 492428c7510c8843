/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use zloom_blorb::{
    BlorbError, chunks, extract_executable, find_resource, is_blorb, unwrap_story,
};

fn chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend((data.len() as u32).to_be_bytes());
    out.extend(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn form(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body: Vec<u8> = chunks.concat();
    let mut out = b"FORM".to_vec();
    out.extend((body.len() as u32 + 4).to_be_bytes());
    out.extend(b"IFRS");
    out.extend(body);
    out
}

fn resource_index(entries: &[(&[u8; 4], u32, u32)]) -> Vec<u8> {
    let mut data = (entries.len() as u32).to_be_bytes().to_vec();
    for (usage, number, start) in entries {
        data.extend(*usage);
        data.extend(number.to_be_bytes());
        data.extend(start.to_be_bytes());
    }
    chunk(b"RIdx", &data)
}

#[test]
fn detects_container() {
    assert!(is_blorb(&form(&[])));
    assert!(!is_blorb(b"FORM\0\0\0\x04AIFF"));
    assert!(!is_blorb(&[3, 0, 0, 0]));
}

#[test]
fn plain_story_passes_through() {
    let story = [3u8, 0, 0, 1];

    assert_eq!(unwrap_story(&story), Ok(&story[..]));
}

#[test_log::test]
fn odd_chunks_are_padded() {
    let blorb = form(&[chunk(b"AUTH", b"abc"), chunk(b"ZCOD", &[5, 0, 0])]);

    let found = chunks(&blorb).unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id_str(), "AUTH");
    assert_eq!(found[1].data, [5, 0, 0]);
    assert_eq!(found[1].offset, 12 + 8 + 4);
}

#[test_log::test]
fn executable_found_through_resource_index() {
    let decoy = chunk(b"ZCOD", &[3, 3]);
    let story = chunk(b"ZCOD", &[5, 1, 2, 3]);
    // preamble, index with two entries (8 + 4 + 24), decoy (8 + 2)
    let index = resource_index(&[(b"Pict", 0, 0), (b"Exec", 0, 12 + 36 + 10)]);
    let blorb = form(&[index, decoy, story]);

    assert_eq!(extract_executable(&blorb), Ok(&[5u8, 1, 2, 3][..]));
}

#[test_log::test]
fn falls_back_to_first_zcode_chunk() {
    let blorb = form(&[chunk(b"Fspc", &[0; 4]), chunk(b"ZCOD", &[8, 8])]);

    assert_eq!(unwrap_story(&blorb), Ok(&[8u8, 8][..]));
}

#[test_log::test]
fn indexed_chunk_must_be_zcode() {
    let blorb = form(&[
        resource_index(&[(b"Exec", 0, 12 + 24)]),
        chunk(b"GLUL", &[1, 2]),
    ]);

    assert_eq!(
        extract_executable(&blorb),
        Err(BlorbError::NotZCode {
            offset: 36,
            found: "GLUL".to_string()
        })
    );
}

#[test]
fn missing_executable() {
    let blorb = form(&[chunk(b"AUTH", b"me")]);

    assert_eq!(
        extract_executable(&blorb),
        Err(BlorbError::MissingExecutable)
    );
}

#[test]
fn truncated_chunk() {
    let mut blorb = form(&[chunk(b"ZCOD", &[1, 2, 3, 4])]);
    blorb.truncate(blorb.len() - 2);

    assert!(matches!(
        extract_executable(&blorb),
        Err(BlorbError::Truncated { .. })
    ));
}

#[test]
fn resource_lookup_by_usage_and_number() {
    let index = resource_index(&[(b"Exec", 1, 100), (b"Exec", 0, 200)]);
    let body = &index[8..];

    assert_eq!(find_resource(body, *b"Exec", 0), Ok(Some(200)));
    assert_eq!(find_resource(body, *b"Exec", 1), Ok(Some(100)));
    assert_eq!(find_resource(body, *b"Pict", 0), Ok(None));
}
