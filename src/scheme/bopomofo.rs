//! Bopomofo (Zhuyin) scheme: standard keyboard layout, 37 symbols plus tone
//! marks. A tone mark completes the current syllable; lookup keys are the
//! toneless syllables, space-joined for phrases.

use crate::dict::{DictionaryStore, LookupKey, BOPOMOFO_KEY_SEPARATOR};
use crate::keys;

use super::{Materialized, Scheme, SchemeProcessor};

/// Standard Zhuyin keyboard: US key character → symbol.
static LAYOUT: &[(char, char)] = &[
    ('1', 'ㄅ'),
    ('2', 'ㄉ'),
    ('3', 'ˇ'),
    ('4', 'ˋ'),
    ('5', 'ㄓ'),
    ('6', 'ˊ'),
    ('7', '˙'),
    ('8', 'ㄚ'),
    ('9', 'ㄞ'),
    ('0', 'ㄢ'),
    ('-', 'ㄦ'),
    ('q', 'ㄆ'),
    ('w', 'ㄊ'),
    ('e', 'ㄍ'),
    ('r', 'ㄐ'),
    ('t', 'ㄔ'),
    ('y', 'ㄗ'),
    ('u', 'ㄧ'),
    ('i', 'ㄛ'),
    ('o', 'ㄟ'),
    ('p', 'ㄣ'),
    ('a', 'ㄇ'),
    ('s', 'ㄋ'),
    ('d', 'ㄎ'),
    ('f', 'ㄑ'),
    ('g', 'ㄕ'),
    ('h', 'ㄘ'),
    ('j', 'ㄨ'),
    ('k', 'ㄜ'),
    ('l', 'ㄠ'),
    (';', 'ㄤ'),
    ('z', 'ㄈ'),
    ('x', 'ㄌ'),
    ('c', 'ㄏ'),
    ('v', 'ㄒ'),
    ('b', 'ㄖ'),
    ('n', 'ㄙ'),
    ('m', 'ㄩ'),
    (',', 'ㄝ'),
    ('.', 'ㄡ'),
    ('/', 'ㄥ'),
];

fn symbol_for(vkey: u32, modifiers: u32) -> Option<char> {
    let ch = keys::printable(vkey, modifiers)?;
    LAYOUT.iter().find(|&&(k, _)| k == ch).map(|&(_, z)| z)
}

pub fn is_tone(ch: char) -> bool {
    matches!(ch, 'ˇ' | 'ˋ' | 'ˊ' | '˙')
}

pub struct BopomofoProcessor {
    symbols: Vec<char>,
}

impl BopomofoProcessor {
    pub fn new() -> Self {
        Self { symbols: Vec::new() }
    }

    /// Toneless syllables, split at tone marks.
    fn syllables(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut current = String::new();
        for &ch in &self.symbols {
            if is_tone(ch) {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            } else {
                current.push(ch);
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

impl Default for BopomofoProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeProcessor for BopomofoProcessor {
    fn scheme(&self) -> Scheme {
        Scheme::Bopomofo
    }

    fn accepts_key(&self, vkey: u32, modifiers: u32) -> bool {
        symbol_for(vkey, modifiers).is_some_and(|sym| !(is_tone(sym) && self.symbols.is_empty()))
    }

    fn append(&mut self, vkey: u32, modifiers: u32) -> bool {
        match symbol_for(vkey, modifiers) {
            Some(sym) if !(is_tone(sym) && self.symbols.is_empty()) => {
                self.symbols.push(sym);
                true
            }
            _ => false,
        }
    }

    fn retract(&mut self) -> bool {
        self.symbols.pop().is_some()
    }

    fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn atom_count(&self) -> usize {
        self.symbols.len()
    }

    fn is_complete(&self) -> bool {
        self.symbols.last().copied().is_some_and(is_tone)
    }

    fn display(&self) -> String {
        self.symbols.iter().collect()
    }

    fn materialize(&self, _dict: &DictionaryStore) -> Materialized {
        let syllables = self.syllables();
        let key = if syllables.len() > 1 {
            let mut joined = String::new();
            for (i, s) in syllables.iter().enumerate() {
                if i > 0 {
                    joined.push(BOPOMOFO_KEY_SEPARATOR);
                }
                joined.push_str(s);
            }
            joined
        } else {
            syllables.into_iter().next().unwrap_or_default()
        };
        Materialized {
            lookup: LookupKey::Exact(key),
            direct: None,
        }
    }

    fn reset(&mut self) {
        self.symbols.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::{ConversionTable, DictionaryStore};
    use crate::keys::*;

    fn dict() -> DictionaryStore {
        DictionaryStore::from_entries(vec![], ConversionTable::empty())
    }

    #[test]
    fn ma_from_keyboard() {
        let mut p = BopomofoProcessor::new();
        assert!(p.append(VK_A, 0)); // ㄇ
        assert!(p.append(VK_0 + 8, 0)); // ㄚ
        assert_eq!(p.display(), "ㄇㄚ");
        let m = p.materialize(&dict());
        assert_eq!(m.lookup, LookupKey::Exact("ㄇㄚ".into()));
    }

    #[test]
    fn tone_completes_syllable() {
        let mut p = BopomofoProcessor::new();
        p.append(VK_A, 0);
        p.append(VK_0 + 8, 0);
        assert!(!p.is_complete());
        p.append(VK_0 + 3, 0); // ˇ
        assert!(p.is_complete());
        // Tone marks are stripped from the lookup key.
        let m = p.materialize(&dict());
        assert_eq!(m.lookup, LookupKey::Exact("ㄇㄚ".into()));
    }

    #[test]
    fn tone_rejected_on_empty_buffer() {
        let mut p = BopomofoProcessor::new();
        assert!(!p.accepts_key(VK_0 + 3, 0));
        assert!(!p.append(VK_0 + 3, 0));
    }

    #[test]
    fn phrase_key_is_space_joined() {
        let mut p = BopomofoProcessor::new();
        p.append(VK_A, 0); // ㄇ
        p.append(VK_0 + 8, 0); // ㄚ
        p.append(VK_0 + 3, 0); // ˇ
        p.append(VK_A, 0); // ㄇ
        p.append(VK_0 + 8, 0); // ㄚ
        let m = p.materialize(&dict());
        assert_eq!(m.lookup, LookupKey::Exact("ㄇㄚ ㄇㄚ".into()));
    }

    #[test]
    fn retract_and_reset() {
        let mut p = BopomofoProcessor::new();
        p.append(VK_A, 0);
        assert!(p.retract());
        assert!(!p.retract());
        p.append(VK_A, 0);
        p.reset();
        assert!(p.is_empty());
    }

    #[test]
    fn rejects_unmapped_keys() {
        let p = BopomofoProcessor::new();
        assert!(!p.accepts_key(VK_OEM_7, 0));
        assert!(!p.accepts_key(VK_RETURN, 0));
        assert!(!p.accepts_key(VK_A, MOD_CONTROL));
    }

    #[test]
    fn layout_covers_37_symbols_and_tones() {
        let symbols: Vec<char> = LAYOUT.iter().map(|&(_, z)| z).collect();
        assert_eq!(symbols.len(), 41);
        assert_eq!(symbols.iter().filter(|&&z| is_tone(z)).count(), 4);
    }
}
