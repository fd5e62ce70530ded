//! Reversible XOR + base64 transform applied to persisted text.
//!
//! This is obfuscation, not encryption: the key is a single byte and the
//! transform is deterministic. It only keeps data files from being casually
//! readable.

use crate::error::{Result, StoreError};
use base64::{engine::general_purpose, Engine as _};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obfuscator {
    key: u8,
}

impl Obfuscator {
    pub fn new(key: u8) -> Self {
        Self { key }
    }

    pub fn key(&self) -> u8 {
        self.key
    }

    /// `base64(xor(utf8(text), key))`
    pub fn obfuscate(&self, text: &str) -> String {
        let bytes = self.xor(text.as_bytes());
        general_purpose::STANDARD.encode(bytes)
    }

    /// Exact inverse of [`Obfuscator::obfuscate`].
    pub fn deobfuscate(&self, encoded: &str) -> Result<String> {
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| StoreError::Decode(format!("invalid base64: {}", e)))?;
        String::from_utf8(self.xor(&bytes))
            .map_err(|e| StoreError::Decode(format!("invalid UTF-8 after XOR: {}", e)))
    }

    fn xor(&self, bytes: &[u8]) -> Vec<u8> {
        bytes.iter().map(|b| b ^ self.key).collect()
    }
}
