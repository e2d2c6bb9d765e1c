//! Text macros: ordered macro sets, `$(NAME)` / `${NAME}` expansion.

pub mod expand;
pub mod scope;
pub mod tokenizer;

pub use expand::{expand, MacroLookup, MAX_EXPANDED_LEN, MAX_EXPANSION_DEPTH, MAX_LOOKUPS};
pub use scope::Macros;
