use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

/// Helper: tokenize with `flags`, returning `(tag, text)` pairs (excluding Eof).
fn lex_with(source: &[u8], flags: TokenizerFlags) -> Vec<(TokenTag, String)> {
    let buf = SourceBuffer::from_bytes(source);
    Tokenizer::with_flags(&buf, flags)
        .map(|tok| (tok.tag, String::from_utf8_lossy(buf.text(tok)).into_owned()))
        .collect()
}

fn lex(source: &str) -> Vec<(TokenTag, String)> {
    lex_with(source.as_bytes(), TokenizerFlags::empty())
}

fn tags(source: &str) -> Vec<TokenTag> {
    lex(source).into_iter().map(|(tag, _)| tag).collect()
}

/// Helper: first token of `source` with the given flags.
fn first(source: &str, flags: TokenizerFlags) -> (TokenTag, String) {
    let buf = SourceBuffer::new(source);
    let tok = Tokenizer::with_flags(&buf, flags).next_token();
    (
        tok.tag,
        String::from_utf8_lossy(buf.text(tok)).into_owned(),
    )
}

fn t(tag: TokenTag, text: &str) -> (TokenTag, String) {
    (tag, text.to_owned())
}

// === Tables ===

#[test]
fn radix_digit_table() {
    assert!(Radix::Bin.is_digit(b'1'));
    assert!(!Radix::Bin.is_digit(b'2'));
    assert!(Radix::Oct.is_digit(b'7'));
    assert!(!Radix::Oct.is_digit(b'8'));
    assert!(Radix::Dec.is_digit(b'9'));
    assert!(!Radix::Dec.is_digit(b'a'));
    assert!(Radix::Hex.is_digit(b'f'));
    assert!(Radix::Hex.is_digit(b'F'));
    assert!(!Radix::Hex.is_digit(b'g'));
    for radix in [Radix::Bin, Radix::Oct, Radix::Dec, Radix::Hex] {
        assert!(!radix.is_digit(0), "sentinel must never be a digit");
    }
}

#[test]
fn radix_bases() {
    assert_eq!(Radix::Bin.base(), 2);
    assert_eq!(Radix::Oct.base(), 8);
    assert_eq!(Radix::Dec.base(), 10);
    assert_eq!(Radix::Hex.base(), 16);
}

#[test]
fn parser_flags_track_indentation_only() {
    assert_eq!(TokenizerFlags::PARSER, TokenizerFlags::TRACK_INDENTATION);
}

// === Symbols ===

#[test]
fn single_byte_symbols() {
    use TokenTag::*;
    assert_eq!(
        tags("( ) [ ] { } + - * / ^ , | . = : ;"),
        vec![
            LParen, RParen, LBracket, RBracket, LBrace, RBrace, Plus, Minus, Star, Slash, Caret,
            Comma, Pipe, Dot, Equal, Colon, Semicolon,
        ]
    );
}

#[test]
fn compound_symbols() {
    use TokenTag::*;
    assert_eq!(tags("() ++"), vec![EmptyParens, PlusPlus]);
    assert_eq!(tags("(+ +("), vec![LParen, Plus, Plus, LParen]);
    assert_eq!(tags("+++"), vec![PlusPlus, Plus]);
    assert_eq!(tags("(()"), vec![LParen, EmptyParens]);
}

#[test]
fn symbols_need_no_spaces() {
    use TokenTag::*;
    assert_eq!(
        tags(".a[b=1]"),
        vec![Dot, Identifier, LBracket, Identifier, Equal, Number, RBracket]
    );
}

// === Identifiers & keywords ===

#[test]
fn identifiers_and_keywords() {
    use TokenTag::*;
    assert_eq!(
        tags("if elif else for while iffy _x a1 Else"),
        vec![KwIf, KwElif, KwElse, KwFor, KwWhile, Identifier, Identifier, Identifier, Identifier]
    );
}

#[test]
fn identifier_followed_by_illegal_byte() {
    assert_eq!(
        lex("ab\"c\""),
        vec![t(TokenTag::Invalid, "ab\""), t(TokenTag::Invalid, "c\"")]
    );
}

#[test]
fn identifier_then_string_after_space() {
    assert_eq!(
        lex("ab \"c\""),
        vec![t(TokenTag::Identifier, "ab"), t(TokenTag::String, "\"c\"")]
    );
}

// === Numbers ===

#[test]
fn valid_numbers() {
    for src in [
        "0", "7", "42", "007", "0.5", "1.5", "1e10", "2.5E-3", "3e+0", "0b101", "0o17", "0xFF",
        "0x1e5", "0x1p4", "0x1.8p+1", "0b1.1",
    ] {
        assert_eq!(lex(src), vec![t(TokenTag::Number, src)], "source: {src}");
    }
}

#[test]
fn numbers_end_at_symbols() {
    use TokenTag::*;
    assert_eq!(tags("1+2"), vec![Number, Plus, Number]);
    assert_eq!(tags("(3)"), vec![LParen, Number, RParen]);
    assert_eq!(tags("1,2|3"), vec![Number, Comma, Number, Pipe, Number]);
    assert_eq!(tags("2^-1"), vec![Number, Caret, Minus, Number]);
}

#[test]
fn invalid_numbers_consume_the_offending_byte() {
    assert_eq!(lex("12a"), vec![t(TokenTag::Invalid, "12a")]);
    assert_eq!(lex("0b2"), vec![t(TokenTag::Invalid, "0b2")]);
    assert_eq!(lex("0o8"), vec![t(TokenTag::Invalid, "0o8")]);
    assert_eq!(lex("1.x"), vec![t(TokenTag::Invalid, "1.x")]);
    assert_eq!(lex("1e_"), vec![t(TokenTag::Invalid, "1e_")]);
    assert_eq!(
        lex("1.2.3"),
        vec![t(TokenTag::Invalid, "1.2."), t(TokenTag::Number, "3")]
    );
}

#[test]
fn base_prefixes_are_lowercase() {
    assert_eq!(
        lex("0X1"),
        vec![t(TokenTag::Invalid, "0X"), t(TokenTag::Number, "1")]
    );
}

#[test]
fn binary_and_octal_have_no_exponent() {
    assert_eq!(
        lex("0b1e1"),
        vec![t(TokenTag::Invalid, "0b1e"), t(TokenTag::Number, "1")]
    );
}

#[test]
fn space_after_open_fraction_is_invalid() {
    assert_eq!(lex("1. "), vec![t(TokenTag::Invalid, "1. ")]);
}

#[test]
fn truncated_numbers_are_incomplete() {
    for src in ["0x", "0b", "1.", "1e", "1e-", "0x1p"] {
        assert_eq!(lex(src), vec![t(TokenTag::Incomplete, src)], "source: {src}");
    }
}

// === Strings ===

#[test]
fn strings() {
    assert_eq!(lex("\"hi there\""), vec![t(TokenTag::String, "\"hi there\"")]);
    assert_eq!(lex(r#""a\"b""#), vec![t(TokenTag::String, r#""a\"b""#)]);
    assert_eq!(lex("\"tab\there\""), vec![t(TokenTag::String, "\"tab\there\"")]);
    assert_eq!(lex("\"héllo\""), vec![t(TokenTag::String, "\"héllo\"")]);
}

#[test]
fn unterminated_string_is_incomplete() {
    assert_eq!(lex("\"abc"), vec![t(TokenTag::Incomplete, "\"abc")]);
    assert_eq!(lex("\"abc\\"), vec![t(TokenTag::Incomplete, "\"abc\\")]);
}

#[test]
fn newline_in_string_is_invalid() {
    assert_eq!(first("\"ab\ncd\"", TokenizerFlags::empty()), t(TokenTag::Invalid, "\"ab\n"));
}

// === Chars ===

#[test]
fn chars() {
    assert_eq!(
        lex(r"'a' '\n' '\'' '\t' '\r'"),
        vec![
            t(TokenTag::Char, "'a'"),
            t(TokenTag::Char, r"'\n'"),
            t(TokenTag::Char, r"'\''"),
            t(TokenTag::Char, r"'\t'"),
            t(TokenTag::Char, r"'\r'"),
        ]
    );
}

#[test]
fn malformed_chars() {
    assert_eq!(first("''", TokenizerFlags::empty()), t(TokenTag::Invalid, "''"));
    assert_eq!(first("'ab'", TokenizerFlags::empty()), t(TokenTag::Invalid, "'ab"));
    assert_eq!(first(r"'\q'", TokenizerFlags::empty()), t(TokenTag::Invalid, r"'\q"));
    assert_eq!(lex("'a"), vec![t(TokenTag::Incomplete, "'a")]);
}

// === Unknown bytes ===

#[test]
fn unknown_byte_is_single_invalid() {
    assert_eq!(
        lex("a @ b"),
        vec![
            t(TokenTag::Identifier, "a"),
            t(TokenTag::Invalid, "@"),
            t(TokenTag::Identifier, "b"),
        ]
    );
}

#[test]
fn non_ascii_outside_string_is_invalid_per_byte() {
    assert_eq!(tags("é"), vec![TokenTag::Invalid, TokenTag::Invalid]);
}

#[test]
fn interior_nul_is_invalid() {
    assert_eq!(
        lex_with(b"x \0 y", TokenizerFlags::empty()),
        vec![
            t(TokenTag::Identifier, "x"),
            t(TokenTag::Invalid, "\0"),
            t(TokenTag::Identifier, "y"),
        ]
    );
}

// === Whitespace ===

#[test]
fn spaces_are_skipped_by_default() {
    assert_eq!(tags("a  \t b\nc"), vec![TokenTag::Identifier; 3]);
}

#[test]
fn spaces_on_request() {
    assert_eq!(
        lex_with(b"a \t b", TokenizerFlags::EMIT_SPACES),
        vec![
            t(TokenTag::Identifier, "a"),
            t(TokenTag::Space, " \t "),
            t(TokenTag::Identifier, "b"),
        ]
    );
}

#[test]
fn next_from_spaces_forces_a_space_token() {
    let buf = SourceBuffer::new("   x");
    let mut tok = Tokenizer::new(&buf);
    let space = tok.next_from(State::Spaces);
    assert_eq!(space.tag, TokenTag::Space);
    assert_eq!(space.len(), 3);
    assert_eq!(tok.next_token().tag, TokenTag::Identifier);
}

// === Indentation ===

#[test]
fn indentation_tokens() {
    assert_eq!(
        lex_with(b"a\n  b\n\n   \nc", TokenizerFlags::PARSER),
        vec![
            t(TokenTag::Identifier, "a"),
            t(TokenTag::Indent, "  "),
            t(TokenTag::Identifier, "b"),
            t(TokenTag::Indent, ""),
            t(TokenTag::Identifier, "c"),
        ]
    );
}

#[test]
fn crlf_line_endings() {
    assert_eq!(
        lex_with(b"a\r\n  b\r\n\r\nc", TokenizerFlags::PARSER),
        vec![
            t(TokenTag::Identifier, "a"),
            t(TokenTag::Indent, "  "),
            t(TokenTag::Identifier, "b"),
            t(TokenTag::Indent, ""),
            t(TokenTag::Identifier, "c"),
        ]
    );
}

#[test]
fn trailing_blank_lines_reach_eof() {
    assert_eq!(
        lex_with(b"a\n\n  \n", TokenizerFlags::PARSER),
        vec![t(TokenTag::Identifier, "a")]
    );
}

#[test]
fn tab_in_indentation_is_invalid() {
    assert_eq!(
        lex_with(b"a\n \tb", TokenizerFlags::PARSER),
        vec![
            t(TokenTag::Identifier, "a"),
            t(TokenTag::Invalid, " \t"),
            t(TokenTag::Identifier, "b"),
        ]
    );
}

#[test]
fn first_line_indentation_via_line_start() {
    let buf = SourceBuffer::new("\n\n    .a");
    let mut tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARSER);
    let indent = tok.next_from(State::LineStart);
    assert_eq!(indent.tag, TokenTag::Indent);
    assert_eq!(buf.text(indent), b"    ");
    assert_eq!(tok.next_token().tag, TokenTag::Dot);
}

#[test]
fn blank_buffer_from_line_start_is_eof() {
    let buf = SourceBuffer::new("  \n \n");
    let mut tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARSER);
    let eof = tok.next_from(State::LineStart);
    assert_eq!(eof.tag, TokenTag::Eof);
    assert_eq!(eof.start, buf.len());
}

// === Pull API ===

#[test]
fn peek_does_not_consume() {
    let buf = SourceBuffer::new("a b");
    let mut tok = Tokenizer::new(&buf);
    let peeked = tok.peek();
    assert_eq!(tok.next_token(), peeked);
    assert_eq!(tok.peek().start, 2);
}

#[test]
fn eof_repeats() {
    let buf = SourceBuffer::new("x");
    let mut tok = Tokenizer::new(&buf);
    tok.next_token();
    for _ in 0..3 {
        let eof = tok.next_token();
        assert_eq!(eof.tag, TokenTag::Eof);
        assert!(eof.is_empty());
    }
}

#[test]
fn tokenize_collects_without_eof() {
    let buf = SourceBuffer::new("1 + 2");
    let all = tokenize(&buf);
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].tag, TokenTag::Plus);
}

// === Locations ===

#[test]
fn token_locations() {
    let buf = SourceBuffer::new(".a\n  1\n\n  \"x\ny\"");
    let mut tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARSER);
    let mut seen = Vec::new();
    loop {
        let token = tok.next_token();
        seen.push((token.tag, tok.location().to_string()));
        if token.tag == TokenTag::Eof {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![
            (TokenTag::Dot, "1:1".to_owned()),
            (TokenTag::Identifier, "1:2".to_owned()),
            (TokenTag::Indent, "2:1".to_owned()),
            (TokenTag::Number, "2:3".to_owned()),
            (TokenTag::Indent, "4:1".to_owned()),
            (TokenTag::Invalid, "4:3".to_owned()),
            (TokenTag::Invalid, "5:1".to_owned()),
            (TokenTag::Eof, "5:3".to_owned()),
        ]
    );
}

#[test]
fn tokenizer_and_buffer_agree_on_locations() {
    let buf = SourceBuffer::new("a\n  bb\n    ccc dd\n");
    let mut tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARSER);
    loop {
        let token = tok.next_token();
        assert_eq!(tok.location(), buf.location(token.start), "{token:?}");
        if token.tag == TokenTag::Eof {
            break;
        }
    }
}

// === Partial input ===

#[test]
fn partial_chunk_leaves_number_incomplete() {
    let buf = SourceBuffer::new("12");
    let mut tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARTIAL_INPUT);
    assert_eq!(tok.next_token().tag, TokenTag::Incomplete);
    assert_eq!(tok.end_state(), State::Integer(Radix::Dec));

    let next = SourceBuffer::new(".5e3 x");
    let mut tok2 = Tokenizer::with_flags(&next, TokenizerFlags::PARTIAL_INPUT);
    let rest = tok2.next_from(State::Integer(Radix::Dec));
    assert_eq!(rest.tag, TokenTag::Number);
    assert_eq!(next.text(rest), b".5e3");
}

#[test]
fn partial_chunk_resumes_string() {
    let buf = SourceBuffer::new("\"ab");
    let mut tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARTIAL_INPUT);
    assert_eq!(tok.next_token().tag, TokenTag::Incomplete);
    assert_eq!(tok.end_state(), State::String);

    let next = SourceBuffer::new("cd\" y");
    let rest = Tokenizer::new(&next).next_from(tok.end_state());
    assert_eq!(rest.tag, TokenTag::String);
    assert_eq!(rest.end, 3);
}

#[test]
fn partial_chunk_compound_symbols() {
    assert_eq!(first("(", TokenizerFlags::PARTIAL_INPUT).0, TokenTag::Incomplete);
    assert_eq!(first("+", TokenizerFlags::PARTIAL_INPUT).0, TokenTag::Incomplete);
    assert_eq!(first("(", TokenizerFlags::empty()).0, TokenTag::LParen);
    assert_eq!(first("-", TokenizerFlags::PARTIAL_INPUT).0, TokenTag::Minus);
}

#[test]
fn partial_chunk_between_tokens_is_eof() {
    let buf = SourceBuffer::new("a ");
    let mut tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARTIAL_INPUT);
    assert_eq!(tok.next_token().tag, TokenTag::Identifier);
    assert_eq!(tok.next_token().tag, TokenTag::Eof);
    assert_eq!(tok.end_state(), State::Start);
}

#[test]
fn partial_chunk_in_indentation() {
    let flags = TokenizerFlags::PARSER | TokenizerFlags::PARTIAL_INPUT;
    let buf = SourceBuffer::new("a\n  ");
    let mut tok = Tokenizer::with_flags(&buf, flags);
    assert_eq!(tok.next_token().tag, TokenTag::Identifier);
    let cut = tok.next_token();
    assert_eq!(cut.tag, TokenTag::Incomplete);
    assert_eq!(cut.len(), 2);
    assert_eq!(tok.end_state(), State::LineStart);
}

// === Properties ===

const ALPHABET: &[u8] = b"abexp_019.()[]+-*/^,|=\"'\\@ \t";

/// Well-formed numeric literals used for prefix properties.
const LITERALS: &[&str] = &[
    "0", "9", "10", "0.25", "12.5e-3", "6E2", "0b1011", "0o777", "0xBEEF", "0x1.8p+4", "0b1.01",
];

proptest! {
    #[test]
    fn token_lengths_sum_to_source_length(
        bytes in proptest::collection::vec(proptest::sample::select(ALPHABET.to_vec()), 0..64)
    ) {
        let buf = SourceBuffer::from_bytes(&bytes);
        let mut end = 0;
        let mut total = 0;
        for tok in Tokenizer::with_flags(&buf, TokenizerFlags::EMIT_SPACES) {
            prop_assert_eq!(tok.start, end, "tokens must be contiguous");
            prop_assert!(!tok.is_empty());
            end = tok.end;
            total += tok.len();
        }
        prop_assert_eq!(total, buf.len());
    }

    #[test]
    fn tokens_cover_every_non_blank_byte(
        bytes in proptest::collection::vec(
            proptest::sample::select(b"ab1.()+\"' \n\r".to_vec()),
            0..64,
        )
    ) {
        let buf = SourceBuffer::from_bytes(&bytes);
        let mut covered = vec![false; bytes.len()];
        let mut last_end = 0;
        for tok in Tokenizer::with_flags(&buf, TokenizerFlags::PARSER) {
            prop_assert!(tok.start >= last_end);
            prop_assert!(tok.end as usize <= bytes.len());
            last_end = tok.end;
            for flag in &mut covered[tok.start as usize..tok.end as usize] {
                *flag = true;
            }
        }
        for (i, &b) in bytes.iter().enumerate() {
            if !matches!(b, b' ' | b'\n' | b'\r') {
                prop_assert!(covered[i], "byte {} ({:?}) not covered", i, b as char);
            }
        }
    }

    #[test]
    fn literal_prefixes_are_incomplete_in_partial_chunks(index in 0..LITERALS.len()) {
        let literal = LITERALS[index];
        for cut in 1..=literal.len() {
            let prefix = &literal[..cut];
            let buf = SourceBuffer::new(prefix);
            let tok = Tokenizer::with_flags(&buf, TokenizerFlags::PARTIAL_INPUT).next_token();
            prop_assert_eq!(tok.tag, TokenTag::Incomplete, "prefix {:?}", prefix);
            prop_assert_eq!(tok.len() as usize, cut);
        }
    }

    #[test]
    fn literal_prefix_plus_illegal_byte_is_invalid(index in 0..LITERALS.len()) {
        let literal = LITERALS[index];
        for cut in 1..=literal.len() {
            let source = format!("{}@", &literal[..cut]);
            let buf = SourceBuffer::new(&source);
            let tok = Tokenizer::new(&buf).next_token();
            prop_assert_eq!(tok.tag, TokenTag::Invalid, "source {:?}", source);
            prop_assert_eq!(tok.len() as usize, cut + 1);
        }
    }

    #[test]
    fn delimited_literal_is_one_number(index in 0..LITERALS.len()) {
        let literal = LITERALS[index];
        let source = format!("{literal} ");
        let buf = SourceBuffer::new(&source);
        let tok = Tokenizer::new(&buf).next_token();
        prop_assert_eq!(tok.tag, TokenTag::Number);
        prop_assert_eq!(tok.len() as usize, literal.len());
    }
}
