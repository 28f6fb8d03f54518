//! Identifier generators for students, strokes, and chat messages.
//!
//! Entropy comes from the random bytes of v4 UUIDs, which works the same
//! natively and in the browser. Draws use rejection sampling so every
//! character and index is equally likely.

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Byte offsets that carry the v4 version and variant bits.
const FIXED_BYTES: [usize; 2] = [6, 8];

/// Uniform draws from the random bytes of successive v4 UUIDs.
struct Sampler<F> {
    source: F,
    buf: [u8; 16],
    pos: usize,
}

impl<F: FnMut() -> [u8; 16]> Sampler<F> {
    fn new(source: F) -> Self {
        Self { source, buf: [0; 16], pos: 16 }
    }

    fn next_byte(&mut self) -> u8 {
        loop {
            if self.pos == self.buf.len() {
                self.buf = (self.source)();
                self.pos = 0;
            }
            let i = self.pos;
            self.pos += 1;
            if !FIXED_BYTES.contains(&i) {
                return self.buf[i];
            }
        }
    }

    /// Uniform value in `0..bound` by rejection; draws at or above the
    /// largest multiple of `bound` are discarded.
    fn below(&mut self, bound: u64) -> u64 {
        let bound = bound.max(1);
        let zone = u64::MAX - u64::MAX % bound;
        loop {
            let mut word = [0u8; 8];
            for byte in &mut word {
                *byte = self.next_byte();
            }
            let v = u64::from_le_bytes(word);
            if v < zone {
                return v % bound;
            }
        }
    }
}

fn uuid_sampler() -> Sampler<impl FnMut() -> [u8; 16]> {
    Sampler::new(|| Uuid::new_v4().into_bytes())
}

/// `len` random base-36 characters.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn random_base36(len: usize) -> String {
    let mut sampler = uuid_sampler();
    (0..len).map(|_| char::from(BASE36[sampler.below(36) as usize])).collect()
}

/// `student_xxxxxx`
#[must_use]
pub fn student_id() -> String {
    format!("student_{}", random_base36(6))
}

/// `path_<ms>_<9 chars>`
#[must_use]
pub fn path_id(now_ms: i64) -> String {
    format!("path_{now_ms}_{}", random_base36(9))
}

/// `msg_<ms>_<6 chars>`
#[must_use]
pub fn message_id(now_ms: i64) -> String {
    format!("msg_{now_ms}_{}", random_base36(6))
}

/// Uniform index in `0..len`. A zero `len` yields 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn random_index(len: usize) -> usize {
    uuid_sampler().below(len as u64) as usize
}
