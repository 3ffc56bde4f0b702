//! Traditional⇄Simplified conversion table.
//!
//! The table is a JSON array of `{t, s}` pairs. Conversion is applied
//! character-by-character; characters outside the table pass through
//! unchanged, so round-tripping inside the table domain is the identity.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::DictError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TraditionalToSimplified,
    SimplifiedToTraditional,
}

#[derive(Debug, Deserialize)]
pub struct TsPair {
    pub t: String,
    pub s: String,
}

pub struct ConversionTable {
    t2s: HashMap<char, char>,
    s2t: HashMap<char, char>,
}

impl ConversionTable {
    pub fn empty() -> Self {
        Self {
            t2s: HashMap::new(),
            s2t: HashMap::new(),
        }
    }

    pub fn from_pairs(pairs: &[TsPair]) -> Self {
        let mut t2s = HashMap::new();
        let mut s2t = HashMap::new();
        for pair in pairs {
            let (Some(t), Some(s)) = (pair.t.chars().next(), pair.s.chars().next()) else {
                continue;
            };
            // First mapping wins; later duplicates would break round-tripping.
            if !t2s.contains_key(&t) && !s2t.contains_key(&s) {
                t2s.insert(t, s);
                s2t.insert(s, t);
            }
        }
        Self { t2s, s2t }
    }

    pub fn load(path: &Path) -> Result<Self, DictError> {
        let bytes = fs::read(path)?;
        let pairs: Vec<TsPair> = serde_json::from_slice(&bytes)
            .map_err(|e| DictError::ConversionTable(e.to_string()))?;
        Ok(Self::from_pairs(&pairs))
    }

    pub fn len(&self) -> usize {
        self.t2s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t2s.is_empty()
    }

    pub fn convert(&self, text: &str, direction: Direction) -> String {
        let map = match direction {
            Direction::TraditionalToSimplified => &self.t2s,
            Direction::SimplifiedToTraditional => &self.s2t,
        };
        text.chars().map(|c| *map.get(&c).unwrap_or(&c)).collect()
    }
}
