//! Stylesheet tree builder using the `cssparser` crate.
//!
//! The builder only recovers structure: which text is a declaration, which is
//! a style rule prelude and which is an at-rule prelude. Values are stored as
//! raw text with comments removed, and no property is validated.

use std::ops::Range;

use cssparser::{
    ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, SourceLocation,
    SourcePosition, Token,
};

use crate::logging::targets;
use crate::tree::{ScopeId, Stylesheet};
use crate::{Error, Result};

/// How a statement ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    /// `;`
    Semicolon,
    /// `{ ... }` follows the prelude.
    Block,
    /// A stray `}`.
    Stray,
    /// End of the enclosing block or of the input.
    End,
}

/// What to do with the token just read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Stop(Boundary),
    Comment,
    /// A function, `(`, or `[` block whose contents belong to the text.
    Nested,
    Token,
}

impl Step {
    fn of(token: &Token<'_>) -> Self {
        match token {
            Token::Semicolon => Step::Stop(Boundary::Semicolon),
            Token::CurlyBracketBlock => Step::Stop(Boundary::Block),
            Token::CloseCurlyBracket => Step::Stop(Boundary::Stray),
            Token::Comment(_) => Step::Comment,
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => Step::Nested,
            _ => Step::Token,
        }
    }
}

/// Parse CSS text into a [`Stylesheet`] tree.
///
/// Top-level and nested blocks may contain declarations, style rules and
/// block at-rules in any order. Statement at-rules (`@import ...;`) are
/// skipped. Malformed declarations are skipped with a warning logged.
///
/// # Example
///
/// ```ignore
/// let sheet = parse_stylesheet(":root { --gap: 4px } .card { margin: var(--gap) }")?;
/// assert_eq!(sheet.declarations().len(), 2);
/// ```
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut sheet = Stylesheet::new();
    let root = sheet.root();

    parse_block_contents(&mut parser, &mut sheet, root)?;

    tracing::debug!(
        target: targets::PARSER,
        declarations = sheet.declaration_count(),
        "parsed stylesheet"
    );
    Ok(sheet)
}

/// Parse the statements of one block into `scope`.
fn parse_block_contents(
    parser: &mut Parser<'_, '_>,
    sheet: &mut Stylesheet,
    scope: ScopeId,
) -> Result<()> {
    loop {
        parser.skip_whitespace();

        if parser.is_exhausted() {
            return Ok(());
        }

        let location = parser.current_source_location();
        let (text, boundary) = read_statement(parser);
        let text = text.trim();

        match boundary {
            Boundary::Block => {
                let child = open_scope(sheet, scope, text, location)?;
                parser
                    .parse_nested_block(|p| {
                        parse_block_contents(p, sheet, child).map_err(|e| p.new_custom_error(e))
                    })
                    .map_err(into_error)?;
            }
            Boundary::Semicolon | Boundary::End => {
                add_statement(sheet, scope, text, location)?;
            }
            Boundary::Stray => {
                tracing::warn!(
                    target: targets::PARSER,
                    line = location.line + 1,
                    "skipping statement closed by a stray '}}'"
                );
            }
        }
    }
}

fn into_error(error: CssParseError<'_, Error>) -> Error {
    match error.kind {
        ParseErrorKind::Custom(error) => error,
        ParseErrorKind::Basic(kind) => Error::parse(
            format!("{kind:?}"),
            error.location.line + 1,
            error.location.column,
        ),
    }
}

/// Consume tokens up to the next statement boundary, returning the text
/// before it.
///
/// Function and bracket blocks are consumed whole, so a `;` or `}` inside
/// them never ends the statement.
fn read_statement(parser: &mut Parser<'_, '_>) -> (String, Boundary) {
    let start = parser.position();
    let mut comments = Vec::new();

    loop {
        let before = parser.position();
        let step = match parser.next_including_whitespace_and_comments() {
            Ok(token) => Step::of(token),
            Err(_) => Step::Stop(Boundary::End),
        };

        match step {
            Step::Stop(boundary) => {
                let end = if boundary == Boundary::End { parser.position() } else { before };
                return (text_without_comments(parser, start..end, &comments), boundary);
            }
            Step::Comment => comments.push(before..parser.position()),
            Step::Nested => consume_nested_block(parser, &mut comments),
            Step::Token => {}
        }
    }
}

/// Consume the block opened by the last token, recording comment spans.
fn consume_nested_block(parser: &mut Parser<'_, '_>, comments: &mut Vec<Range<SourcePosition>>) {
    let location = parser.current_source_location();
    let consumed: std::result::Result<(), CssParseError<'_, ()>> =
        parser.parse_nested_block(|p| {
            consume_block_tokens(p, comments);
            Ok(())
        });

    if let Err(e) = consumed {
        tracing::warn!(
            target: targets::PARSER,
            line = location.line + 1,
            column = location.column,
            "unterminated block: {:?}",
            e.kind
        );
    }
}

/// Consume every remaining token of the current block.
fn consume_block_tokens(parser: &mut Parser<'_, '_>, comments: &mut Vec<Range<SourcePosition>>) {
    loop {
        let before = parser.position();
        let step = match parser.next_including_whitespace_and_comments() {
            Ok(token) => Step::of(token),
            Err(_) => return,
        };

        match step {
            Step::Comment => comments.push(before..parser.position()),
            Step::Nested | Step::Stop(Boundary::Block) => consume_nested_block(parser, comments),
            Step::Stop(_) | Step::Token => {}
        }
    }
}

/// The source text of `span` with the given comment spans cut out.
fn text_without_comments(
    parser: &Parser<'_, '_>,
    span: Range<SourcePosition>,
    comments: &[Range<SourcePosition>],
) -> String {
    let mut text = String::new();
    let mut from = span.start;
    for comment in comments {
        text.push_str(parser.slice(from..comment.start));
        from = comment.end;
    }
    text.push_str(parser.slice(from..span.end));
    text
}

/// Split `text` at top-level tokens for which `is_separator` holds.
///
/// Tokens inside functions, parentheses and brackets are never separators.
/// Comments are dropped, each piece is trimmed and empty pieces are skipped.
///
/// # Example
///
/// ```ignore
/// let pieces = split_top_level("a, rgb(1, 2), b", |token| matches!(token, Token::Comma));
/// assert_eq!(pieces, ["a", "rgb(1, 2)", "b"]);
/// ```
pub fn split_top_level(text: &str, is_separator: impl Fn(&Token<'_>) -> bool) -> Vec<String> {
    let mut input = ParserInput::new(text);
    let mut parser = Parser::new(&mut input);
    let mut pieces = Vec::new();
    let mut comments = Vec::new();
    let mut piece_start = parser.position();

    loop {
        let before = parser.position();
        let (separator, step) = match parser.next_including_whitespace_and_comments() {
            Ok(token) => (is_separator(token), Step::of(token)),
            Err(_) => break,
        };

        if separator {
            pieces.push(text_without_comments(&parser, piece_start..before, &comments));
            comments.clear();
            piece_start = parser.position();
            continue;
        }
        match step {
            Step::Comment => comments.push(before..parser.position()),
            Step::Nested | Step::Stop(Boundary::Block) => consume_nested_block(&mut parser, &mut comments),
            Step::Stop(_) | Step::Token => {}
        }
    }
    let end = parser.position();
    pieces.push(text_without_comments(&parser, piece_start..end, &comments));

    pieces
        .iter()
        .map(|piece| piece.trim())
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// Split a selector list at its top-level commas.
pub fn split_top_level_commas(text: &str) -> Vec<String> {
    split_top_level(text, |token| matches!(token, Token::Comma))
}

/// Create the scope a `prelude { ... }` block opens.
fn open_scope(
    sheet: &mut Stylesheet,
    parent: ScopeId,
    prelude: &str,
    location: SourceLocation,
) -> Result<ScopeId> {
    if prelude.is_empty() || prelude == "@" {
        return Err(Error::parse(
            "block without a selector or at-rule name",
            location.line + 1,
            location.column,
        ));
    }

    match prelude.strip_prefix('@') {
        Some(at_rule) => {
            let name_end = at_rule
                .find(|c: char| c.is_whitespace() || c == '(')
                .unwrap_or(at_rule.len());
            let (name, params) = at_rule.split_at(name_end);
            sheet.add_at_rule(parent, name, params.trim())
        }
        None => sheet.add_rule(parent, split_top_level_commas(prelude)),
    }
}

/// Add a `;`-terminated statement to `scope`.
fn add_statement(
    sheet: &mut Stylesheet,
    scope: ScopeId,
    text: &str,
    location: SourceLocation,
) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }

    if text.starts_with('@') {
        tracing::debug!(target: targets::PARSER, statement = text, "skipping statement at-rule");
        return Ok(());
    }

    let Some((property, value)) = text.split_once(':') else {
        tracing::warn!(
            target: targets::PARSER,
            line = location.line + 1,
            column = location.column,
            "skipping declaration without ':': {}",
            text
        );
        return Ok(());
    };

    let property = property.trim();
    if property.is_empty() {
        tracing::warn!(
            target: targets::PARSER,
            line = location.line + 1,
            column = location.column,
            "skipping declaration without a property name"
        );
        return Ok(());
    }

    let (value, important) = split_important(value.trim());
    sheet.add_declaration(scope, property, value, important)?;
    Ok(())
}

/// Split a trailing `!important` off a value.
fn split_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, ScopeKind};

    #[test]
    fn parse_root_and_rule_declarations() {
        let sheet = parse_stylesheet(":root { --x: 1px; } .a { --x: 2px; width: var(--x); }").unwrap();
        let root = sheet.scope(sheet.root());

        assert_eq!(root.children().len(), 2);
        let decls = sheet.declarations();
        assert_eq!(decls.len(), 3);
        assert_eq!(sheet.declaration(decls[2]).property(), "width");
        assert_eq!(sheet.declaration(decls[2]).value(), "var(--x)");
    }

    #[test]
    fn parse_selector_list() {
        let sheet = parse_stylesheet(".a, .b:is(.c, .d) { color: red }").unwrap();
        let Node::Scope(rule) = sheet.scope(sheet.root()).children()[0] else {
            panic!("expected a rule");
        };

        assert_eq!(
            sheet.scope(rule).selectors(),
            &[".a".to_string(), ".b:is(.c, .d)".to_string()]
        );
    }

    #[test]
    fn parse_nested_at_rule() {
        let sheet = parse_stylesheet("@media (max-width: 300px) { .a { --x: 1px } }").unwrap();
        let Node::Scope(media) = sheet.scope(sheet.root()).children()[0] else {
            panic!("expected an at-rule");
        };

        assert_eq!(
            sheet.scope(media).kind(),
            &ScopeKind::AtRule {
                name: "media".into(),
                params: "(max-width: 300px)".into(),
            }
        );
        assert_eq!(sheet.scope(media).children().len(), 1);
    }

    #[test]
    fn parse_important_flag() {
        let sheet = parse_stylesheet(":root { --x: 1px !important; --y: 2px ! IMPORTANT }").unwrap();
        let decls = sheet.declarations();

        assert!(sheet.declaration(decls[0]).is_important());
        assert_eq!(sheet.declaration(decls[0]).value(), "1px");
        assert!(sheet.declaration(decls[1]).is_important());
        assert_eq!(sheet.declaration(decls[1]).value(), "2px");
    }

    #[test]
    fn value_keeps_nested_functions() {
        let sheet = parse_stylesheet(".a { width: calc(1px + var(--x, 2px)); }").unwrap();
        let decls = sheet.declarations();

        assert_eq!(sheet.declaration(decls[0]).value(), "calc(1px + var(--x, 2px))");
    }

    #[test]
    fn function_values_survive_a_following_declaration() {
        let sheet = parse_stylesheet(
            ":root { --a: var(--b); --b: 1px } .a { width: calc(1px + 2px); height: 3px }",
        )
        .unwrap();
        let values: Vec<_> = sheet
            .declarations()
            .into_iter()
            .map(|id| {
                let decl = sheet.declaration(id);
                format!("{}={}", decl.property(), decl.value())
            })
            .collect();

        assert_eq!(values, ["--a=var(--b)", "--b=1px", "width=calc(1px + 2px)", "height=3px"]);
    }

    #[test]
    fn semicolons_inside_functions_do_not_end_a_value() {
        let sheet = parse_stylesheet(".a { content: attr(x, \"a;b\"); --y: [a;b]; color: red }").unwrap();
        let decls = sheet.declarations();

        assert_eq!(decls.len(), 3);
        assert_eq!(sheet.declaration(decls[0]).value(), "attr(x, \"a;b\")");
        assert_eq!(sheet.declaration(decls[1]).value(), "[a;b]");
    }

    #[test]
    fn comments_are_dropped() {
        let sheet = parse_stylesheet(
            ".a /* card */, .b { width: 1px /* note */; margin: calc(1px /* x */+ 2px); }",
        )
        .unwrap();
        let Node::Scope(rule) = sheet.scope(sheet.root()).children()[0] else {
            panic!("expected a rule");
        };
        let decls = sheet.declarations();

        assert_eq!(sheet.scope(rule).selectors(), &[".a".to_string(), ".b".to_string()]);
        assert_eq!(sheet.declaration(decls[0]).value(), "1px");
        assert_eq!(sheet.declaration(decls[1]).value(), "calc(1px + 2px)");
    }

    #[test]
    fn nested_errors_keep_their_location() {
        let err = parse_stylesheet("@media print {\n  .a { color: red }\n  { color: blue }\n}").unwrap_err();

        assert!(matches!(err, Error::Parse { line: 3, .. }));
    }

    #[test]
    fn statement_at_rules_are_skipped() {
        let sheet = parse_stylesheet("@import url(a.css); :root { --x: 1 }").unwrap();

        assert_eq!(sheet.scope(sheet.root()).children().len(), 1);
        assert_eq!(sheet.declarations().len(), 1);
    }

    #[test]
    fn malformed_declaration_is_skipped() {
        let sheet = parse_stylesheet(".a { nonsense; color: red }").unwrap();
        let decls = sheet.declarations();

        assert_eq!(decls.len(), 1);
        assert_eq!(sheet.declaration(decls[0]).property(), "color");
    }

    #[test]
    fn block_without_prelude_is_an_error() {
        let err = parse_stylesheet(".a { color: red }\n{ color: blue }").unwrap_err();

        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn split_commas_respects_nesting() {
        assert_eq!(
            split_top_level_commas("--a, rgb(1, 2, 3), 'x,y'"),
            vec!["--a", "rgb(1, 2, 3)", "'x,y'"]
        );
        assert!(split_top_level_commas("  ").is_empty());
    }

    #[test]
    fn split_on_custom_separators() {
        let pieces = split_top_level("a > b(c > d) e", |token| matches!(token, Token::Delim('>')));

        assert_eq!(pieces, ["a", "b(c > d) e"]);
    }
}
