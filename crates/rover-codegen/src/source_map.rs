//! Source mapping: generated JavaScript line → RoverScript source location.
//!
//! The web client uses this to point runtime errors thrown by the generated
//! method back at the script line that produced them.

use rover_types::Span;
use serde::{Deserialize, Serialize};

/// A complete source map for one transpiled script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMap {
    pub entries: Vec<SourceMapEntry>,
}

/// The first source item emitted on a generated line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapEntry {
    /// 1-based line in the generated JavaScript.
    pub js_line: u32,
    pub span: Span,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, js_line: u32, span: Span) {
        self.entries.push(SourceMapEntry { js_line, span });
    }

    /// Source span for a generated line.
    pub fn find_by_js_line(&self, js_line: u32) -> Option<&SourceMapEntry> {
        self.entries.iter().find(|e| e.js_line == js_line)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(data: &str) -> Option<Self> {
        serde_json::from_str(data).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_json() {
        let mut sm = SourceMap::new();
        sm.push(1, Span::new(1, 1, 1, 5));
        sm.push(2, Span::new(3, 1, 3, 9));
        let sm2 = SourceMap::from_json(&sm.to_json()).expect("parse failed");
        assert_eq!(sm2, sm);
    }

    #[test]
    fn find_by_js_line() {
        let mut sm = SourceMap::new();
        sm.push(1, Span::new(1, 1, 1, 5));
        sm.push(2, Span::new(4, 3, 4, 9));
        assert_eq!(sm.find_by_js_line(2).map(|e| e.span.start_line), Some(4));
        assert!(sm.find_by_js_line(7).is_none());
    }
}
