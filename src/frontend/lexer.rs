//! Raw C/C++ lexer.
//!
//! Produces the token stream of the header exactly as written, before any
//! macro erasure, so marker identifiers keep their original spans. Uses the
//! logos library; tokens are converted to [`Token`] after lexing.

use super::token::{Token, TokenKind};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n\f\v]|\\\r?\n)+")]
enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r#"(u8|u|U|L)?R"[^ ()\\\t\r\n"]*\("#, raw_string)]
    RawString,

    #[regex(r#"(u8|u|U|L)?"([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"(u8|u|U|L)?'([^'\\\n]|\\.)*'")]
    Char,

    #[regex(r"[0-9]([0-9a-zA-Z_.']|[eEpP][+-])*")]
    #[regex(r"\.[0-9]([0-9a-zA-Z_.']|[eEpP][+-])*")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    #[regex(
        r"::|->\*|->|\.\.\.|\.\*|<=>|<<=|>>=|<<|>>|<=|>=|==|!=|&&|\|\||\+\+|--|\+=|-=|\*=|/=|%=|&=|\|=|\^=|##"
    )]
    #[regex(r"[\[\](){};:,.?~!%^&*|+=<>/#\-]")]
    Punct,
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    // "/*" is consumed, find the closing "*/"
    let remainder = lex.remainder();
    match remainder.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(remainder.len()),
    }
    true
}

fn raw_string(lex: &mut logos::Lexer<RawToken>) -> bool {
    // Slice is the opener, e.g. `R"delim(`
    let opener = lex.slice();
    let delimiter = opener
        .find('"')
        .map(|quote| &opener[quote + 1..opener.len() - 1])
        .unwrap_or_default();
    let closer = format!("){delimiter}\"");
    let remainder = lex.remainder();
    match remainder.find(&closer) {
        Some(end) => lex.bump(end + closer.len()),
        None => lex.bump(remainder.len()),
    }
    true
}

fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "alignas"
            | "alignof"
            | "and"
            | "and_eq"
            | "asm"
            | "auto"
            | "bitand"
            | "bitor"
            | "bool"
            | "break"
            | "case"
            | "catch"
            | "char"
            | "char8_t"
            | "char16_t"
            | "char32_t"
            | "class"
            | "compl"
            | "concept"
            | "const"
            | "consteval"
            | "constexpr"
            | "constinit"
            | "const_cast"
            | "continue"
            | "co_await"
            | "co_return"
            | "co_yield"
            | "decltype"
            | "default"
            | "delete"
            | "do"
            | "double"
            | "dynamic_cast"
            | "else"
            | "enum"
            | "explicit"
            | "export"
            | "extern"
            | "false"
            | "float"
            | "for"
            | "friend"
            | "goto"
            | "if"
            | "inline"
            | "int"
            | "long"
            | "mutable"
            | "namespace"
            | "new"
            | "noexcept"
            | "not"
            | "not_eq"
            | "nullptr"
            | "operator"
            | "or"
            | "or_eq"
            | "private"
            | "protected"
            | "public"
            | "register"
            | "reinterpret_cast"
            | "requires"
            | "restrict"
            | "return"
            | "short"
            | "signed"
            | "sizeof"
            | "static"
            | "static_assert"
            | "static_cast"
            | "struct"
            | "switch"
            | "template"
            | "this"
            | "thread_local"
            | "throw"
            | "true"
            | "try"
            | "typedef"
            | "typeid"
            | "typename"
            | "union"
            | "unsigned"
            | "using"
            | "virtual"
            | "void"
            | "volatile"
            | "wchar_t"
            | "while"
            | "xor"
            | "xor_eq"
            | "_Alignas"
            | "_Alignof"
            | "_Atomic"
            | "_Bool"
            | "_Complex"
            | "_Generic"
            | "_Noreturn"
            | "_Static_assert"
            | "_Thread_local"
    )
}

/// `#` is the first token on its line
fn starts_line(source: &str, offset: usize) -> bool {
    source[..offset]
        .bytes()
        .rev()
        .take_while(|&b| b != b'\n')
        .all(|b| b == b' ' || b == b'\t')
}

/// End of the directive starting at `offset`, honoring line continuations
fn directive_end(source: &str, offset: usize) -> usize {
    let bytes = source.as_bytes();
    let mut index = offset;
    while index < bytes.len() {
        if bytes[index] == b'\n' {
            let mut before = index;
            if before > 0 && bytes[before - 1] == b'\r' {
                before -= 1;
            }
            if before == 0 || bytes[before - 1] != b'\\' {
                return index;
            }
        }
        index += 1;
    }
    bytes.len()
}

/// Lex `source` into raw tokens in source order.
///
/// Characters the lexer does not recognize become punctuation tokens so
/// that no byte of the header is silently dropped.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut directive_until = 0;

    for (result, span) in RawToken::lexer(source).spanned() {
        let text = &source[span.clone()];
        let kind = match result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => TokenKind::Comment,
            Ok(RawToken::RawString | RawToken::String | RawToken::Char | RawToken::Number) => {
                TokenKind::Literal
            }
            Ok(RawToken::Word) if is_keyword(text) => TokenKind::Keyword,
            Ok(RawToken::Word) => TokenKind::Identifier,
            Ok(RawToken::Punct) | Err(_) => TokenKind::Punctuation,
        };

        if kind == TokenKind::Punctuation && text == "#" && starts_line(source, span.start) {
            directive_until = directive_end(source, span.start);
        }
        let in_directive = span.start < directive_until;
        tokens.push(Token::new(kind, text, span, in_directive));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .map(|t| (t.kind, t.spelling))
            .collect()
    }

    #[test]
    fn test_marker_is_identifier_and_int_is_keyword() {
        let tokens = kinds("REGISTER_PROPERTY int x;");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, "REGISTER_PROPERTY".to_string()),
                (TokenKind::Keyword, "int".to_string()),
                (TokenKind::Identifier, "x".to_string()),
                (TokenKind::Punctuation, ";".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_are_single_tokens() {
        let tokens = tokenize("// REGISTER_CLASS\n/* REGISTER_ENUM\n */ int a;");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].spelling, "// REGISTER_CLASS");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert!(tokens[1].spelling.ends_with("*/"));
        assert!(tokens.iter().all(|t| !t.is_identifier("REGISTER_ENUM")));
    }

    #[test]
    fn test_literals_hide_identifiers() {
        let tokens = tokenize(r#"const char* s = "REGISTER_CLASS"; auto r = R"x(a ) " b)x";"#);
        assert!(tokens.iter().all(|t| !t.is_identifier("REGISTER_CLASS")));
        let raw = tokens
            .iter()
            .find(|t| t.spelling.starts_with("R\""))
            .expect("raw string token");
        assert_eq!(raw.kind, TokenKind::Literal);
        assert_eq!(raw.spelling, r#"R"x(a ) " b)x""#);
    }

    #[test]
    fn test_directive_lines_are_flagged() {
        let source = "#define REGISTER_CLASS \\\n  \nclass REGISTER_CLASS Foo {};";
        let tokens = tokenize(source);
        let flagged: Vec<_> = tokens
            .iter()
            .filter(|t| t.in_directive)
            .map(|t| t.spelling.as_str())
            .collect();
        assert_eq!(flagged, vec!["#", "define", "REGISTER_CLASS"]);
        let marker = tokens
            .iter()
            .filter(|t| t.is_identifier("REGISTER_CLASS"))
            .nth(1)
            .unwrap();
        assert!(!marker.in_directive);
    }

    #[test]
    fn test_hash_inside_line_is_not_a_directive() {
        let tokens = tokenize("int a; # define X");
        assert!(tokens.iter().all(|t| !t.in_directive));
    }

    #[test]
    fn test_multi_char_punctuation() {
        let tokens = kinds("a::b->c...");
        let spellings: Vec<_> = tokens.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(spellings, vec!["a", "::", "b", "->", "c", "..."]);
    }
}
