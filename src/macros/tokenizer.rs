//! logos-based tokenizer for macro references.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (`$(` beats `$` followed by `(`)
//! 2. For equal length matches, literal tokens beat character classes
//!
//! Every input character belongs to some token, so lexing never fails.

use logos::Logos;

/// Token of a text that may contain `$(NAME)` or `${NAME}` references.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `$(`
    #[token("$(")]
    OpenParen,

    /// `${`
    #[token("${")]
    OpenBrace,

    /// `)`
    #[token(")")]
    CloseParen,

    /// `}`
    #[token("}")]
    CloseBrace,

    /// A `$`, `(` or `{` that does not start a reference.
    #[token("$")]
    #[token("(")]
    #[token("{")]
    Stray,

    /// Run of ordinary text.
    #[regex(r"[^$(){}]+")]
    Text,
}

/// Tokenize `input` into `(Token, &str)` pairs covering the whole input.
pub fn tokenize(input: &str) -> Vec<(Token, &str)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, &input[span])))
        .collect()
}
