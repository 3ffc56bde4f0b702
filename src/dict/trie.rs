//! Byte-keyed prefix trie backing the per-scheme dictionary indices.

use std::collections::HashMap;

struct Node {
    children: HashMap<u8, Node>,
    value: Option<u32>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }
}

pub struct ByteTrie {
    root: Node,
    len: usize,
}

impl ByteTrie {
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, key: &str, id: u32) {
        let mut node = &mut self.root;
        for &b in key.as_bytes() {
            node = node.children.entry(b).or_insert_with(Node::new);
        }
        if node.value.replace(id).is_none() {
            self.len += 1;
        }
    }

    pub fn exact(&self, key: &str) -> Option<u32> {
        let mut node = &self.root;
        for &b in key.as_bytes() {
            node = node.children.get(&b)?;
        }
        node.value
    }

    /// All `(key, id)` pairs whose key starts with `prefix`, in lexicographic
    /// byte order, up to `limit` keys. The prefix itself is included when it
    /// is a stored key.
    pub fn predictive(&self, prefix: &str, limit: usize) -> Vec<(String, u32)> {
        let mut node = &self.root;
        for &b in prefix.as_bytes() {
            match node.children.get(&b) {
                Some(child) => node = child,
                None => return Vec::new(),
            }
        }
        let mut out = Vec::new();
        let mut key = prefix.as_bytes().to_vec();
        collect(node, &mut key, limit, &mut out);
        out
    }

    /// Stored keys that are prefixes of `query`, shortest first, as
    /// `(byte_len, id)` pairs.
    pub fn common_prefix(&self, query: &str) -> Vec<(usize, u32)> {
        let mut out = Vec::new();
        let mut node = &self.root;
        for (i, &b) in query.as_bytes().iter().enumerate() {
            match node.children.get(&b) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(id) = node.value {
                out.push((i + 1, id));
            }
        }
        out
    }
}

impl Default for ByteTrie {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(node: &Node, key: &mut Vec<u8>, limit: usize, out: &mut Vec<(String, u32)>) {
    if out.len() >= limit {
        return;
    }
    if let Some(id) = node.value {
        out.push((String::from_utf8_lossy(key).into_owned(), id));
    }
    let mut bytes: Vec<u8> = node.children.keys().copied().collect();
    bytes.sort_unstable();
    for b in bytes {
        if out.len() >= limit {
            return;
        }
        key.push(b);
        collect(&node.children[&b], key, limit, out);
        key.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ByteTrie {
        let mut t = ByteTrie::new();
        t.insert("ni", 0);
        t.insert("ni'hao", 1);
        t.insert("nin", 2);
        t.insert("hao", 3);
        t
    }

    #[test]
    fn exact_hit_and_miss() {
        let t = sample();
        assert_eq!(t.exact("ni"), Some(0));
        assert_eq!(t.exact("ni'hao"), Some(1));
        assert_eq!(t.exact("nih"), None);
        assert_eq!(t.exact(""), None);
    }

    #[test]
    fn predictive_lexicographic() {
        let t = sample();
        let keys: Vec<String> = t.predictive("ni", 10).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ni", "ni'hao", "nin"]);
    }

    #[test]
    fn predictive_limit() {
        let t = sample();
        assert_eq!(t.predictive("ni", 2).len(), 2);
        assert_eq!(t.predictive("ni", 0).len(), 0);
    }

    #[test]
    fn predictive_no_match() {
        let t = sample();
        assert!(t.predictive("xyz", 10).is_empty());
    }

    #[test]
    fn common_prefix_shortest_first() {
        let t = sample();
        let hits = t.common_prefix("nin'hao");
        assert_eq!(hits, vec![(2, 0), (3, 2)]);
    }

    #[test]
    fn reinsert_overwrites() {
        let mut t = sample();
        t.insert("ni", 9);
        assert_eq!(t.exact("ni"), Some(9));
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn multibyte_keys() {
        let mut t = ByteTrie::new();
        t.insert("ㄇㄚ", 7);
        assert_eq!(t.exact("ㄇㄚ"), Some(7));
        let hits = t.predictive("ㄇ", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "ㄇㄚ");
    }
}
