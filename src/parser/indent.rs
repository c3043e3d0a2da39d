//! Indentation pre-pass
//!
//! Block structure is defined by leading whitespace. This pass walks the
//! source line by line, lexes each logical line, and turns changes in
//! indentation into explicit `Indent`/`Dedent` tokens so the grammar can
//! treat blocks like bracketed groups. Every logical line ends in `Newline`.

use crate::error::ParseError;
use crate::parser::lexer::{lex_line, Span, Token};

/// Columns a tab counts for
const TAB_WIDTH: usize = 2;

/// Tokenize `source` into a flat stream with structural tokens
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, Vec<ParseError>> {
    let mut out = Vec::new();
    let mut errors = Vec::new();
    let mut levels: Vec<usize> = vec![0];
    let mut offset = 0;

    for raw_line in source.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();

        let line = raw_line.trim_end_matches(['\n', '\r']);
        let content = line.trim_start_matches([' ', '\t']);
        let indent_len = line.len() - content.len();
        if content.trim().is_empty() || content.starts_with("--") {
            continue;
        }

        let content_start = line_start + indent_len;
        let tokens = match lex_line(content, content_start) {
            Ok(tokens) if tokens.is_empty() => continue,
            Ok(tokens) => tokens,
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        let width: usize = line[..indent_len]
            .chars()
            .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
            .sum();
        let marker = content_start..content_start;
        let current = levels.last().copied().unwrap_or(0);

        if width > current {
            levels.push(width);
            out.push((Token::Indent, marker));
        } else {
            while width < levels.last().copied().unwrap_or(0) {
                levels.pop();
                out.push((Token::Dedent, marker.clone()));
            }
            if width != levels.last().copied().unwrap_or(0) {
                errors.push(ParseError::Indentation {
                    span: line_start..content_start,
                    message: "Unindent does not match any outer indentation level".to_string(),
                });
            }
        }

        let line_end = line_start + line.len();
        out.extend(tokens);
        out.push((Token::Newline, line_end..line_end));
    }

    let end = source.len();
    for _ in levels.iter().skip(1) {
        out.push((Token::Dedent, end..end));
    }

    if errors.is_empty() {
        Ok(out)
    } else {
        Err(errors)
    }
}
