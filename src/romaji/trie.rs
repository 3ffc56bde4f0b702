use std::collections::HashMap;
use std::sync::OnceLock;

use super::table::TABLE;

/// Outcome of matching a romaji fragment against the table.
#[derive(Debug, PartialEq, Eq)]
pub enum KanaMatch {
    /// Not a mapping and not the start of one.
    None,
    /// The start of one or more longer mappings.
    Partial,
    /// A complete mapping with no longer continuation.
    Kana(&'static str),
    /// A complete mapping that is also the start of a longer one
    /// (e.g. `n` vs `na`).
    KanaAndPartial(&'static str),
}

struct Node {
    children: HashMap<u8, Node>,
    kana: Option<&'static str>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            kana: None,
        }
    }
}

pub struct KanaTrie {
    root: Node,
}

impl KanaTrie {
    /// The process-wide table trie.
    pub fn global() -> &'static KanaTrie {
        static INSTANCE: OnceLock<KanaTrie> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let mut trie = KanaTrie { root: Node::new() };
            for &(romaji, kana) in TABLE {
                trie.insert(romaji, kana);
            }
            trie
        })
    }

    fn insert(&mut self, romaji: &str, kana: &'static str) {
        let mut node = &mut self.root;
        for &b in romaji.as_bytes() {
            node = node.children.entry(b).or_insert_with(Node::new);
        }
        node.kana = Some(kana);
    }

    pub fn lookup(&self, romaji: &str) -> KanaMatch {
        let mut node = &self.root;
        for &b in romaji.as_bytes() {
            match node.children.get(&b) {
                Some(child) => node = child,
                None => return KanaMatch::None,
            }
        }
        let extends = !node.children.is_empty();
        match node.kana {
            Some(kana) if extends => KanaMatch::KanaAndPartial(kana),
            Some(kana) => KanaMatch::Kana(kana),
            None if extends => KanaMatch::Partial,
            None => KanaMatch::None,
        }
    }
}
