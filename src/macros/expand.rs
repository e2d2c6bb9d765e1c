//! Macro expansion.
//!
//! References are expanded recursively: a value that itself contains
//! references is expanded before it is inserted, and a nested name like
//! `$(P$(N))` is expanded before it is looked up. A name that is already
//! being expanded further up the chain refers to itself and is left as
//! written. Unknown references are left as written too.
//!
//! Expansion is bounded three ways: the chain is at most
//! [`MAX_EXPANSION_DEPTH`] names deep, one call performs at most
//! [`MAX_LOOKUPS`] lookups, and a reference whose value would push the
//! output past [`MAX_EXPANDED_LEN`] bytes is left unexpanded.

use tracing::warn;

use super::tokenizer::{tokenize, Token};

/// Deepest chain of macros expanding one another.
pub const MAX_EXPANSION_DEPTH: usize = 20;

/// Lookups one expansion may perform.
pub const MAX_LOOKUPS: usize = 10_000;

/// Longest text an expansion produces.
pub const MAX_EXPANDED_LEN: usize = 1 << 20;

/// Source of macro values.
pub trait MacroLookup {
    /// Value for `name`, if known.
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> MacroLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Expand all references in `text` using `lookup`.
pub fn expand(text: &str, lookup: &dyn MacroLookup) -> String {
    if !text.contains('$') {
        return text.to_string();
    }
    let mut expander = Expander {
        lookup,
        active: Vec::new(),
        lookups_left: MAX_LOOKUPS,
        warned: false,
    };
    expander.expand_text(text)
}

struct Expander<'l> {
    lookup: &'l dyn MacroLookup,
    active: Vec<String>,
    lookups_left: usize,
    warned: bool,
}

impl Expander<'_> {
    fn expand_text(&mut self, text: &str) -> String {
        let tokens = tokenize(text);
        let mut pos = 0;
        let (out, _) = self.expand_tokens(&tokens, &mut pos, None);
        out
    }

    /// Expand tokens from `pos` until `close` (consumed) or the end. Returns
    /// the text and whether `close` was found.
    fn expand_tokens(
        &mut self,
        tokens: &[(Token, &str)],
        pos: &mut usize,
        close: Option<Token>,
    ) -> (String, bool) {
        let mut out = String::new();

        while let Some(&(token, slice)) = tokens.get(*pos) {
            *pos += 1;
            let inner_close = match token {
                Token::OpenParen => Token::CloseParen,
                Token::OpenBrace => Token::CloseBrace,
                _ if Some(token) == close => return (out, true),
                _ => {
                    out.push_str(slice);
                    continue;
                }
            };

            let (name, closed) = self.expand_tokens(tokens, pos, Some(inner_close));
            if !closed {
                out.push_str(slice);
                out.push_str(&name);
                continue;
            }
            let end = if inner_close == Token::CloseParen { ")" } else { "}" };
            match self.reference(name.trim(), out.len()) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push_str(slice);
                    out.push_str(&name);
                    out.push_str(end);
                }
            }
        }

        (out, false)
    }

    /// Expanded value of `name`, or `None` to leave the reference as written.
    fn reference(&mut self, name: &str, written: usize) -> Option<String> {
        if self.active.iter().any(|active| active == name) {
            self.give_up(name, "macro refers to itself");
            return None;
        }
        if self.active.len() >= MAX_EXPANSION_DEPTH {
            self.give_up(name, "macro expansion too deep");
            return None;
        }
        if self.lookups_left == 0 {
            self.give_up(name, "too many macro lookups");
            return None;
        }
        self.lookups_left -= 1;

        let value = self.lookup.lookup(name)?;
        let value = if value.contains('$') {
            self.active.push(name.to_string());
            let expanded = self.expand_text(&value);
            self.active.pop();
            expanded
        } else {
            value
        };

        if written.saturating_add(value.len()) > MAX_EXPANDED_LEN {
            self.give_up(name, "macro expansion too long");
            return None;
        }
        Some(value)
    }

    fn give_up(&mut self, name: &str, reason: &str) {
        if !self.warned {
            warn!(name, reason, "macro left unexpanded");
            self.warned = true;
        }
    }
}
