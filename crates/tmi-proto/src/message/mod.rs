//! Line tokenizer: [`RawMessage`] parsing and serialization.

mod nom_parser;
mod parse;
mod serialize;
/// Tag mapping and IRCv3 escaping.
pub mod tags;
mod types;

pub use self::parse::parse_message;
pub use self::serialize::build_message;
pub use self::tags::Tags;
pub use self::types::RawMessage;
