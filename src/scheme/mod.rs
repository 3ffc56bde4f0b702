//! Input schemes: a closed set of keystroke interpreters sharing one
//! capability surface.
//!
//! Each processor owns its composition buffer. The session decides *when* to
//! append/retract/materialize; the processor decides *whether* a keystroke
//! belongs to the composition and what the dictionary should be asked.

pub mod bopomofo;
pub mod cangjie;
pub mod english;
pub mod japanese;
pub mod pinyin;
pub mod wubi;

use crate::dict::{DictionaryStore, LookupKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Scheme {
    Bopomofo = 0,
    Cangjie = 1,
    Wubi = 2,
    Pinyin = 3,
    English = 4,
    Japanese = 5,
}

impl Scheme {
    pub const COUNT: usize = 6;
    pub const ALL: [Scheme; Self::COUNT] = [
        Scheme::Bopomofo,
        Scheme::Cangjie,
        Scheme::Wubi,
        Scheme::Pinyin,
        Scheme::English,
        Scheme::Japanese,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Bopomofo => "bopomofo",
            Scheme::Cangjie => "cangjie",
            Scheme::Wubi => "wubi",
            Scheme::Pinyin => "pinyin",
            Scheme::English => "english",
            Scheme::Japanese => "japanese",
        }
    }

    pub fn from_name(name: &str) -> Option<Scheme> {
        Scheme::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl TryFrom<i32> for Scheme {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, i32> {
        match value {
            0 => Ok(Scheme::Bopomofo),
            1 => Ok(Scheme::Cangjie),
            2 => Ok(Scheme::Wubi),
            3 => Ok(Scheme::Pinyin),
            4 => Ok(Scheme::English),
            5 => Ok(Scheme::Japanese),
            other => Err(other),
        }
    }
}

/// What a composition resolves to when the dictionary is consulted.
pub struct Materialized {
    pub lookup: LookupKey,
    /// Text committable without a dictionary hit (kana for Japanese).
    pub direct: Option<String>,
}

pub trait SchemeProcessor: Send {
    fn scheme(&self) -> Scheme;

    /// Whether this keystroke belongs to the composition in the current
    /// buffer state.
    fn accepts_key(&self, vkey: u32, modifiers: u32) -> bool;

    /// Extend the composition. Returns false when the scheme rejects the
    /// atom (e.g. a sixth Cangjie radical).
    fn append(&mut self, vkey: u32, modifiers: u32) -> bool;

    /// Remove the last atom. Returns false when the buffer was empty.
    fn retract(&mut self) -> bool;

    fn is_empty(&self) -> bool;

    fn atom_count(&self) -> usize;

    /// Scheme-specific completion (Cangjie at 5 radicals, Bopomofo on a tone
    /// mark). Space always completes regardless.
    fn is_complete(&self) -> bool;

    /// The composition as shown to the user.
    fn display(&self) -> String;

    fn materialize(&self, dict: &DictionaryStore) -> Materialized;

    fn reset(&mut self);
}

pub fn make_processor(scheme: Scheme) -> Box<dyn SchemeProcessor> {
    match scheme {
        Scheme::Bopomofo => Box::new(bopomofo::BopomofoProcessor::new()),
        Scheme::Cangjie => Box::new(cangjie::CangjieProcessor::new()),
        Scheme::Wubi => Box::new(wubi::WubiProcessor::new()),
        Scheme::Pinyin => Box::new(pinyin::PinyinProcessor::new()),
        Scheme::English => Box::new(english::EnglishProcessor::new()),
        Scheme::Japanese => Box::new(japanese::JapaneseProcessor::new()),
    }
}
