//! Per-scheme dictionary tables: JSON sources, cached binary sidecars,
//! ranked lookups.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use std::fs;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::cache;
use super::convert::{ConversionTable, Direction};
use super::trie::ByteTrie;
use crate::error::DictError;
use crate::scheme::pinyin::SyllableIndex;
use crate::scheme::Scheme;

/// Separator between syllables in pinyin dictionary keys (`"ni'hao"`).
pub const PINYIN_KEY_SEPARATOR: char = '\'';
/// Separator between syllables in bopomofo phrase keys.
pub const BOPOMOFO_KEY_SEPARATOR: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    pub key: String,
    #[serde(rename = "value")]
    pub text: String,
    pub frequency: u32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// How a scheme wants its composition matched against the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Exact(String),
    Prefix(String),
    Syllables(Vec<String>),
}

impl LookupKey {
    /// The flat query string this key resolves to for the owning scheme.
    pub fn query(&self) -> String {
        match self {
            LookupKey::Exact(s) | LookupKey::Prefix(s) => s.clone(),
            LookupKey::Syllables(parts) => {
                let mut out = String::new();
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        out.push(PINYIN_KEY_SEPARATOR);
                    }
                    out.push_str(p);
                }
                out
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    pub key: &'a str,
    pub entry: &'a DictEntry,
}

/// One scheme's index: grouped entries plus a prefix trie over the keys.
struct SchemeTable {
    keys: Vec<String>,
    groups: Vec<Vec<DictEntry>>,
    trie: ByteTrie,
}

impl SchemeTable {
    fn from_entries(entries: Vec<DictEntry>) -> Self {
        let mut grouped: BTreeMap<String, Vec<DictEntry>> = BTreeMap::new();
        for e in entries {
            grouped.entry(e.key.clone()).or_default().push(e);
        }
        let mut keys = Vec::with_capacity(grouped.len());
        let mut groups = Vec::with_capacity(grouped.len());
        let mut trie = ByteTrie::new();
        for (key, mut group) in grouped {
            group.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.text.cmp(&b.text)));
            trie.insert(&key, keys.len() as u32);
            keys.push(key);
            groups.push(group);
        }
        Self { keys, groups, trie }
    }

    fn exact<'a>(&'a self, key: &str, out: &mut Vec<Hit<'a>>) {
        if let Some(id) = self.trie.exact(key) {
            let id = id as usize;
            for entry in &self.groups[id] {
                out.push(Hit {
                    key: &self.keys[id],
                    entry,
                });
            }
        }
    }

    fn predictive<'a>(&'a self, prefix: &str, key_limit: usize, out: &mut Vec<Hit<'a>>) {
        for (_, id) in self.trie.predictive(prefix, key_limit) {
            let id = id as usize;
            for entry in &self.groups[id] {
                out.push(Hit {
                    key: &self.keys[id],
                    entry,
                });
            }
        }
    }

    fn counts(&self) -> (usize, usize) {
        (self.keys.len(), self.groups.iter().map(|g| g.len()).sum())
    }
}

/// In-lookup ordering: frequency descending, key length descending (phrase
/// matches first), then lexicographic. The ranker depends on this being
/// deterministic.
fn rank_hits(hits: &mut Vec<Hit<'_>>) {
    hits.sort_by(|a, b| {
        b.entry
            .frequency
            .cmp(&a.entry.frequency)
            .then_with(|| b.key.len().cmp(&a.key.len()))
            .then_with(|| a.key.cmp(b.key))
            .then_with(|| a.entry.text.cmp(&b.entry.text))
    });
}

#[derive(Debug, Default)]
pub struct LoadReport {
    /// Per-scheme load time in milliseconds.
    pub scheme_ms: Vec<(Scheme, u64)>,
    /// Schemes that failed to load and why; they are marked unavailable.
    pub failures: Vec<(Scheme, String)>,
    pub conversion_error: Option<String>,
}

pub struct DictionaryStore {
    tables: [Option<SchemeTable>; Scheme::COUNT],
    conversion: ConversionTable,
    syllables: SyllableIndex,
}

impl DictionaryStore {
    /// Load all scheme sources from `dict_dir`.
    ///
    /// A warm load goes through the `.mdx` sidecar cache; a cold or stale
    /// load parses the JSON and rewrites the cache atomically. Per-scheme
    /// failures degrade that scheme; only a fully empty store is an error.
    pub fn load(dict_dir: &Path) -> Result<(Self, LoadReport), DictError> {
        let mut report = LoadReport::default();
        let mut tables: [Option<SchemeTable>; Scheme::COUNT] = Default::default();

        for scheme in Scheme::ALL {
            let started = Instant::now();
            match load_scheme(dict_dir, scheme) {
                Ok(entries) => {
                    tables[scheme as usize] = Some(SchemeTable::from_entries(entries));
                    let ms = started.elapsed().as_millis() as u64;
                    info!(scheme = scheme.name(), ms, "dictionary loaded");
                    report.scheme_ms.push((scheme, ms));
                }
                Err(e) => {
                    warn!(scheme = scheme.name(), error = %e, "dictionary unavailable");
                    report.failures.push((scheme, e.to_string()));
                }
            }
        }

        if tables.iter().all(Option::is_none) {
            return Err(DictError::NoSchemesAvailable);
        }

        let conversion = match ConversionTable::load(&dict_dir.join("ts_table.json")) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "conversion table unavailable, using identity");
                report.conversion_error = Some(e.to_string());
                ConversionTable::empty()
            }
        };

        let syllables = build_syllable_index(tables[Scheme::Pinyin as usize].as_ref());

        Ok((
            Self {
                tables,
                conversion,
                syllables,
            },
            report,
        ))
    }

    /// Build a store directly from in-memory entries. Used by tests and by
    /// `imetool inspect`.
    pub fn from_entries(
        per_scheme: Vec<(Scheme, Vec<DictEntry>)>,
        conversion: ConversionTable,
    ) -> Self {
        let mut tables: [Option<SchemeTable>; Scheme::COUNT] = Default::default();
        for (scheme, entries) in per_scheme {
            tables[scheme as usize] = Some(SchemeTable::from_entries(entries));
        }
        let syllables = build_syllable_index(tables[Scheme::Pinyin as usize].as_ref());
        Self {
            tables,
            conversion,
            syllables,
        }
    }

    pub fn available(&self, scheme: Scheme) -> bool {
        self.tables[scheme as usize].is_some()
    }

    /// Ranked lookup, matching per the scheme's rule.
    pub fn lookup<'a>(&'a self, scheme: Scheme, key: &LookupKey, limit: usize) -> Vec<Hit<'a>> {
        let Some(table) = self.tables[scheme as usize].as_ref() else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }
        let key_limit = limit.max(32);
        let mut hits = Vec::new();
        match (scheme, key) {
            (Scheme::Cangjie | Scheme::Wubi, LookupKey::Exact(k)) => table.exact(k, &mut hits),
            (Scheme::English, LookupKey::Prefix(p)) => table.predictive(p, key_limit, &mut hits),
            (Scheme::Pinyin, LookupKey::Syllables(_)) => {
                let query = key.query();
                table.exact(&query, &mut hits);
                if hits.is_empty() {
                    table.predictive(&query, key_limit, &mut hits);
                }
            }
            (Scheme::Bopomofo, LookupKey::Exact(k)) => {
                table.exact(k, &mut hits);
                if hits.is_empty() {
                    table.predictive(k, key_limit, &mut hits);
                }
            }
            (Scheme::Japanese, LookupKey::Exact(kana)) => {
                table.exact(kana, &mut hits);
                let exact_len = hits.len();
                table.predictive(kana, key_limit, &mut hits);
                // predictive() re-yields the exact key; drop those duplicates
                hits = dedup_hits(hits, exact_len, kana);
            }
            // A scheme handed a key shape it does not use matches nothing.
            _ => {}
        }
        rank_hits(&mut hits);
        hits.truncate(limit);
        hits
    }

    pub fn convert_t_s(&self, text: &str, direction: Direction) -> String {
        self.conversion.convert(text, direction)
    }

    pub fn conversion(&self) -> &ConversionTable {
        &self.conversion
    }

    pub fn syllables(&self) -> &SyllableIndex {
        &self.syllables
    }

    /// `(key_count, entry_count)` for one scheme, `(0, 0)` when unavailable.
    pub fn stats(&self, scheme: Scheme) -> (usize, usize) {
        self.tables[scheme as usize]
            .as_ref()
            .map(SchemeTable::counts)
            .unwrap_or((0, 0))
    }
}

fn dedup_hits<'a>(hits: Vec<Hit<'a>>, exact_len: usize, exact_key: &str) -> Vec<Hit<'a>> {
    let mut out = Vec::with_capacity(hits.len());
    for (i, hit) in hits.into_iter().enumerate() {
        if i >= exact_len && hit.key == exact_key {
            continue;
        }
        out.push(hit);
    }
    out
}

fn build_syllable_index(pinyin: Option<&SchemeTable>) -> SyllableIndex {
    match pinyin {
        Some(table) => SyllableIndex::build(table.keys.iter().enumerate().map(|(i, key)| {
            let freq: u64 = table.groups[i].iter().map(|e| e.frequency as u64).sum();
            (key.as_str(), freq)
        })),
        None => SyllableIndex::build(std::iter::empty()),
    }
}

fn load_scheme(dict_dir: &Path, scheme: Scheme) -> Result<Vec<DictEntry>, DictError> {
    let source_path = dict_dir.join(format!("{}.json", scheme.name()));
    let source = fs::read(&source_path)?;
    let hash = cache::source_hash(&source);
    let cache_path = dict_dir.join(format!("{}.mdx", scheme.name()));

    if cache_path.exists() {
        match cache::read(&cache_path, hash) {
            Ok(entries) => return Ok(entries),
            Err(e) => {
                warn!(scheme = scheme.name(), error = %e, "cache rejected, rebuilding");
            }
        }
    }

    let entries: Vec<DictEntry> = serde_json::from_slice(&source).map_err(|e| {
        DictError::Source {
            scheme,
            reason: e.to_string(),
        }
    })?;
    if let Err(e) = cache::write(&cache_path, hash, &entries) {
        // The cache is an optimization; a failed write must not fail the load.
        warn!(scheme = scheme.name(), error = %e, "cache write failed");
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::convert::TsPair;

    fn entry(key: &str, text: &str, frequency: u32) -> DictEntry {
        DictEntry {
            key: key.into(),
            text: text.into(),
            frequency,
            tags: vec![],
        }
    }

    fn store() -> DictionaryStore {
        DictionaryStore::from_entries(
            vec![
                (
                    Scheme::Bopomofo,
                    vec![
                        entry("ㄇㄚ", "媽", 900),
                        entry("ㄇㄚ", "馬", 800),
                        entry("ㄇㄚ", "嗎", 700),
                    ],
                ),
                (
                    Scheme::Pinyin,
                    vec![
                        entry("ni'hao", "你好", 950),
                        entry("ni", "你", 900),
                        entry("ni", "妮", 300),
                        entry("hao", "好", 880),
                    ],
                ),
                (
                    Scheme::English,
                    vec![
                        entry("program", "program", 500),
                        entry("progress", "progress", 420),
                        entry("protect", "protect", 300),
                    ],
                ),
                (Scheme::Cangjie, vec![entry("jv", "安", 640)]),
            ],
            ConversionTable::from_pairs(&[TsPair {
                t: "媽".into(),
                s: "妈".into(),
            }]),
        )
    }

    #[test]
    fn bopomofo_exact_frequency_order() {
        let s = store();
        let hits = s.lookup(Scheme::Bopomofo, &LookupKey::Exact("ㄇㄚ".into()), 9);
        let texts: Vec<&str> = hits.iter().map(|h| h.entry.text.as_str()).collect();
        assert_eq!(texts, vec!["媽", "馬", "嗎"]);
    }

    #[test]
    fn pinyin_syllable_exact() {
        let s = store();
        let key = LookupKey::Syllables(vec!["ni".into(), "hao".into()]);
        let hits = s.lookup(Scheme::Pinyin, &key, 9);
        assert_eq!(hits[0].entry.text, "你好");
    }

    #[test]
    fn pinyin_prefix_fallback() {
        let s = store();
        let key = LookupKey::Syllables(vec!["ni".into(), "ha".into()]);
        let hits = s.lookup(Scheme::Pinyin, &key, 9);
        assert!(hits.iter().any(|h| h.entry.text == "你好"));
    }

    #[test]
    fn english_prefix_search() {
        let s = store();
        let hits = s.lookup(Scheme::English, &LookupKey::Prefix("prog".into()), 9);
        let texts: Vec<&str> = hits.iter().map(|h| h.entry.text.as_str()).collect();
        assert_eq!(texts, vec!["program", "progress"]);
    }

    #[test]
    fn cangjie_exact_only() {
        let s = store();
        assert_eq!(
            s.lookup(Scheme::Cangjie, &LookupKey::Exact("jv".into()), 9).len(),
            1
        );
        assert!(s
            .lookup(Scheme::Cangjie, &LookupKey::Exact("j".into()), 9)
            .is_empty());
    }

    #[test]
    fn unavailable_scheme_is_empty() {
        let s = store();
        assert!(!s.available(Scheme::Wubi));
        assert!(s
            .lookup(Scheme::Wubi, &LookupKey::Exact("a".into()), 9)
            .is_empty());
    }

    #[test]
    fn lookup_limit_respected() {
        let s = store();
        let hits = s.lookup(Scheme::Bopomofo, &LookupKey::Exact("ㄇㄚ".into()), 2);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn deterministic_ordering_on_equal_frequency() {
        let s = DictionaryStore::from_entries(
            vec![(
                Scheme::Bopomofo,
                vec![entry("ㄅ", "乙", 100), entry("ㄅ", "甲", 100)],
            )],
            ConversionTable::empty(),
        );
        let hits = s.lookup(Scheme::Bopomofo, &LookupKey::Exact("ㄅ".into()), 9);
        let texts: Vec<&str> = hits.iter().map(|h| h.entry.text.as_str()).collect();
        assert_eq!(texts, vec!["乙", "甲"]);
    }

    #[test]
    fn load_builds_and_reuses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let src = serde_json::json!([
            {"key": "ni'hao", "value": "你好", "frequency": 950},
            {"key": "ni", "value": "你", "frequency": 900},
        ]);
        fs::write(dir.path().join("pinyin.json"), src.to_string()).unwrap();

        let (s, report) = DictionaryStore::load(dir.path()).unwrap();
        assert!(s.available(Scheme::Pinyin));
        assert!(dir.path().join("pinyin.mdx").exists());
        // Five schemes have no source files.
        assert_eq!(report.failures.len(), 5);
        assert!(report.conversion_error.is_some());

        // Second load comes from the cache.
        let (s2, _) = DictionaryStore::load(dir.path()).unwrap();
        assert_eq!(s2.stats(Scheme::Pinyin), s.stats(Scheme::Pinyin));
    }

    #[test]
    fn corrupted_cache_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let src = serde_json::json!([{"key": "a", "value": "x", "frequency": 1}]);
        fs::write(dir.path().join("english.json"), src.to_string()).unwrap();
        fs::write(dir.path().join("english.mdx"), b"garbage").unwrap();

        let (s, _) = DictionaryStore::load(dir.path()).unwrap();
        assert!(s.available(Scheme::English));
        assert_eq!(s.stats(Scheme::English), (1, 1));
    }

    #[test]
    fn corrupt_source_marks_scheme_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pinyin.json"), b"{not json").unwrap();
        fs::write(
            dir.path().join("english.json"),
            serde_json::json!([{"key": "a", "value": "a", "frequency": 1}]).to_string(),
        )
        .unwrap();

        let (s, report) = DictionaryStore::load(dir.path()).unwrap();
        assert!(!s.available(Scheme::Pinyin));
        assert!(s.available(Scheme::English));
        assert!(report.failures.iter().any(|(sch, _)| *sch == Scheme::Pinyin));
    }

    #[test]
    fn all_sources_missing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = DictionaryStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, DictError::NoSchemesAvailable));
    }
}
