//! Error types for each subsystem and their mapping to flat FFI status codes.

use std::io;

use thiserror::Error;

use crate::scheme::Scheme;

/// Flat status codes crossing the C ABI. 0 = success, negative = error.
pub mod status {
    pub const OK: i32 = 0;
    pub const NOT_INITIALIZED: i32 = -1;
    pub const ALREADY_INITIALIZED: i32 = -2;
    pub const BUFFER_TOO_SMALL: i32 = -3;
    pub const INVALID_SCHEME: i32 = -4;
    pub const BUSY_COMPOSING: i32 = -5;
    pub const DICTIONARY_LOAD: i32 = -6;
    pub const USER_DICT_IO: i32 = -7;
    pub const INVALID_ARGUMENT: i32 = -8;
    pub const INVALID_STATE: i32 = -9;
    pub const INTERNAL: i32 = -10;
    /// The keystroke does not belong to the composition; the host decides.
    pub const NOT_CONSUMED: i32 = -11;
    pub const INVALID_SESSION: i32 = -12;
}

#[derive(Debug, Error)]
pub enum DictError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("dictionary source for {scheme:?} is not valid JSON: {reason}")]
    Source { scheme: Scheme, reason: String },
    #[error("conversion table is not valid JSON: {0}")]
    ConversionTable(String),
    #[error("cache header is invalid")]
    InvalidHeader,
    #[error("cache magic mismatch")]
    InvalidMagic,
    #[error("unsupported cache version {0}")]
    UnsupportedVersion(u8),
    #[error("cache content hash does not match source")]
    HashMismatch,
    #[error("cache body failed to decode: {0}")]
    Decode(String),
    #[error("cache body failed to encode: {0}")]
    Encode(String),
    #[error("no dictionary source could be loaded for any scheme")]
    NoSchemesAvailable,
}

#[derive(Debug, Error)]
pub enum UserDictError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("user dictionary is not valid JSON: {0}")]
    Parse(String),
    #[error("archive does not contain a user dictionary JSON")]
    ArchiveEmpty,
    #[error("archive error: {0}")]
    Archive(String),
}

/// LLM bridge failures. Never surfaced through the FFI; recorded as
/// diagnostic events and the provisional ranking is retained.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("endpoint unreachable: {0}")]
    Unavailable(String),
    #[error("deadline expired")]
    Timeout,
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine is not initialized")]
    NotInitialized,
    #[error("engine is already initialized")]
    AlreadyInitialized,
    #[error("caller buffer too small, {required} bytes required")]
    BufferTooSmall { required: usize },
    #[error("invalid or unavailable scheme {0}")]
    InvalidScheme(i32),
    #[error("operation not allowed while composing")]
    BusyComposing,
    #[error("dictionary load failed: {0}")]
    DictionaryLoad(#[from] DictError),
    #[error("user dictionary: {0}")]
    UserDict(#[from] UserDictError),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("call not valid in the current state")]
    InvalidState,
    #[error("unknown session {0}")]
    InvalidSession(u64),
    #[error("settings: {0}")]
    Settings(#[from] crate::settings::SettingsError),
    #[error("internal fault")]
    Internal,
}

impl EngineError {
    pub fn status(&self) -> i32 {
        match self {
            EngineError::NotInitialized => status::NOT_INITIALIZED,
            EngineError::AlreadyInitialized => status::ALREADY_INITIALIZED,
            EngineError::BufferTooSmall { .. } => status::BUFFER_TOO_SMALL,
            EngineError::InvalidScheme(_) => status::INVALID_SCHEME,
            EngineError::BusyComposing => status::BUSY_COMPOSING,
            EngineError::DictionaryLoad(_) => status::DICTIONARY_LOAD,
            EngineError::UserDict(_) => status::USER_DICT_IO,
            EngineError::InvalidArgument(_) => status::INVALID_ARGUMENT,
            EngineError::InvalidState => status::INVALID_STATE,
            EngineError::InvalidSession(_) => status::INVALID_SESSION,
            EngineError::Settings(_) => status::INVALID_ARGUMENT,
            EngineError::Internal => status::INTERNAL,
        }
    }
}
