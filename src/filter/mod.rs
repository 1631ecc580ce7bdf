//! Ad-hoc filter query codec
//!
//! Converts between a list of filter clauses and the single-line query
//! expression stored on a data-source query, and provides the editing and
//! matching operations built on top of it.
//!
//! # Syntax
//!
//! ```text
//! {key<op>"value",key<op>"value",...}
//! ```
//!
//! Keys are word characters plus `.`. Values are double-quoted and may hold
//! anything except `"`; there is no escaping. Decoding does not need the
//! braces or the commas and skips anything that is not a complete clause.
//!
//! # Operators
//!
//! - `=` / `!=` - equal / not equal
//! - `<` / `>` - less than / greater than
//! - `=~` / `!~` - regex match / regex non-match
//!
//! # Examples
//!
//! ```text
//! {client="frontend"}                     # Edges from the frontend
//! {client="frontend",server!="db"}        # ...except those hitting the db
//! {server=~"checkout.*"}                  # Any checkout service
//! ```

pub mod clause;
pub mod editor;
pub mod encoder;
pub mod error;
pub mod matcher;
pub mod parser;

pub use clause::{Clause, Operator, is_key_char};
pub use editor::{FilterSet, add_clause, change_clause, remove_clause};
pub use encoder::encode;
pub use error::FilterError;
pub use matcher::{ClauseMatcher, LabelSet, labels_from_json};
pub use parser::decode;
