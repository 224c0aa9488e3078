//! Identifier generation for decoded palettes and layers
//!
//! Decoding has to name the palettes and the layer it reconstructs. The
//! naming scheme belongs to the caller, so the decoder takes an [`IdSource`]
//! instead of reaching for a global generator.

/// A supplier of fresh, unique identifiers.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Counter-based ids: `palette-0`, `palette-1`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 0 }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("palette")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<F: FnMut() -> String> IdSource for F {
    fn next_id(&mut self) -> String {
        self()
    }
}
