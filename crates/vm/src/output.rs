/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use std::collections::BTreeSet;

pub const STREAM_SCREEN: u8 = 1;
pub const STREAM_TRANSCRIPT: u8 = 2;
pub const STREAM_MEMORY: u8 = 3;
pub const STREAM_COMMANDS: u8 = 4;

pub const WINDOW_LOWER: u8 = 0;
pub const WINDOW_UPPER: u8 = 1;

/// Output bookkeeping owned by the environment. The decoder never looks at
/// it; the output opcodes are the only readers and writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputState {
    /// Screen text per window, `[lower, upper]`.
    pub windows: [String; 2],
    pub transcript: String,
    pub memory_stream: String,
    pub command_stream: String,
    /// `(row, column)` per window. The lower window cursor is tracked but
    /// `set_cursor` never moves it.
    pub cursors: [(u16, u16); 2],
    pub selected_streams: BTreeSet<u8>,
    /// Table addresses of nested memory streams, innermost last.
    pub memory_stream_stack: Vec<u32>,
    pub buffered: bool,
    pub current_window: u8,
    pub upper_window_height: u16,
}

impl OutputState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            windows: [String::new(), String::new()],
            transcript: String::new(),
            memory_stream: String::new(),
            command_stream: String::new(),
            cursors: [(0, 0); 2],
            selected_streams: BTreeSet::from([STREAM_SCREEN]),
            memory_stream_stack: Vec::new(),
            buffered: true,
            current_window: WINDOW_LOWER,
            upper_window_height: 0,
        }
    }

    #[must_use]
    pub fn is_selected(&self, stream: u8) -> bool {
        self.selected_streams.contains(&stream)
    }
}

impl Default for OutputState {
    fn default() -> Self {
        Self::new()
    }
}
