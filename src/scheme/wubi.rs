//! Wubi scheme: shape codes `a..y`, at most four codes per character,
//! complete at four. Keys are the raw letter codes.

use crate::dict::{DictionaryStore, LookupKey};
use crate::keys;

use super::{Materialized, Scheme, SchemeProcessor};

pub const MAX_CODES: usize = 4;

fn is_code(ch: char) -> bool {
    ch.is_ascii_lowercase() && ch != 'z'
}

pub struct WubiProcessor {
    codes: Vec<char>,
}

impl WubiProcessor {
    pub fn new() -> Self {
        Self { codes: Vec::new() }
    }
}

impl Default for WubiProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeProcessor for WubiProcessor {
    fn scheme(&self) -> Scheme {
        Scheme::Wubi
    }

    fn accepts_key(&self, vkey: u32, modifiers: u32) -> bool {
        keys::printable(vkey, modifiers).is_some_and(is_code)
    }

    fn append(&mut self, vkey: u32, modifiers: u32) -> bool {
        if self.codes.len() >= MAX_CODES {
            return false;
        }
        match keys::printable(vkey, modifiers).filter(|&ch| is_code(ch)) {
            Some(ch) => {
                self.codes.push(ch);
                true
            }
            None => false,
        }
    }

    fn retract(&mut self) -> bool {
        self.codes.pop().is_some()
    }

    fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn atom_count(&self) -> usize {
        self.codes.len()
    }

    fn is_complete(&self) -> bool {
        self.codes.len() >= MAX_CODES
    }

    fn display(&self) -> String {
        self.codes.iter().collect()
    }

    fn materialize(&self, _dict: &DictionaryStore) -> Materialized {
        Materialized {
            lookup: LookupKey::Exact(self.codes.iter().collect()),
            direct: None,
        }
    }

    fn reset(&mut self) {
        self.codes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::{ConversionTable, DictionaryStore};
    use crate::keys::*;

    #[test]
    fn complete_at_four() {
        let mut p = WubiProcessor::new();
        for i in 0..4 {
            assert!(p.append(VK_A + i, 0));
        }
        assert!(p.is_complete());
        assert!(!p.append(VK_A + 4, 0));
    }

    #[test]
    fn key_is_letter_codes() {
        let dict = DictionaryStore::from_entries(vec![], ConversionTable::empty());
        let mut p = WubiProcessor::new();
        p.append(VK_A + 6, 0); // g
        p.append(VK_A + 6, 0); // g
        assert_eq!(p.materialize(&dict).lookup, LookupKey::Exact("gg".into()));
        assert_eq!(p.display(), "gg");
    }

    #[test]
    fn z_rejected() {
        let p = WubiProcessor::new();
        assert!(!p.accepts_key(VK_Z, 0));
    }
}
