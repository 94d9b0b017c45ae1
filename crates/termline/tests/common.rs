// Shared helpers for termline integration tests

use std::collections::VecDeque;
use std::io::{self, Read};

/// Byte source that yields one scripted chunk per blocking read, then
/// reports end-of-stream. Splitting input across chunks simulates escape
/// sequences arriving over several reads.
pub struct ScriptedInput {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedInput {
    pub fn chunks(chunks: &[&[u8]]) -> Self {
        ScriptedInput {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        }
    }

    /// A script delivered in a single read.
    pub fn bytes(bytes: &[u8]) -> Self {
        Self::chunks(&[bytes])
    }
}

impl Read for ScriptedInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.chunks.pop_front() {
            Some(mut chunk) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    chunk.drain(..n);
                    self.chunks.push_front(chunk);
                }
                Ok(n)
            }
            None => Ok(0),
        }
    }
}
