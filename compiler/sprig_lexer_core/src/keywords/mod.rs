//! Keyword recognition.
//!
//! The keyword set is tiny, so lookup dispatches on length first and then
//! compares at most two candidates. No hashing, no allocation.

use crate::TokenTag;

/// Resolve a scanned identifier to a keyword tag, if it is one.
#[inline]
pub fn lookup_keyword(ident: &[u8]) -> Option<TokenTag> {
    match ident.len() {
        2 if ident == b"if" => Some(TokenTag::KwIf),
        3 if ident == b"for" => Some(TokenTag::KwFor),
        4 => match ident {
            b"elif" => Some(TokenTag::KwElif),
            b"else" => Some(TokenTag::KwElse),
            _ => None,
        },
        5 if ident == b"while" => Some(TokenTag::KwWhile),
        _ => None,
    }
}
