mod convert;
mod table;
mod trie;

pub use convert::{drain, Drained};
pub use trie::{KanaMatch, KanaTrie};
