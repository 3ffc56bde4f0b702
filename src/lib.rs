pub mod dict;
pub mod error;
pub mod keys;
pub mod romaji;
pub mod scheme;
pub mod settings;
