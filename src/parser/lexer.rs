//! Lexer for the StagScribe language using logos
//!
//! Lines are lexed one at a time by the indentation pre-pass in
//! [`super::indent`], which also produces the structural `Newline`,
//! `Indent` and `Dedent` tokens. Logos never emits those three.

use std::fmt;

use logos::Logos;

use crate::error::ParseError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    // Element keywords
    #[token("canvas")]
    Canvas,
    #[token("rectangle")]
    Rectangle,
    #[token("rect")]
    Rect,
    #[token("circle")]
    Circle,
    #[token("ellipse")]
    Ellipse,
    #[token("line")]
    Line,
    #[token("path")]
    Path,
    #[token("polygon")]
    Polygon,
    #[token("text")]
    Text,
    #[token("group")]
    Group,
    #[token("image")]
    Image,
    #[token("gear")]
    Gear,
    #[token("arc")]
    Arc,

    // Statement keywords
    #[token("is")]
    Is,
    #[token("colors")]
    Colors,
    #[token("define")]
    Define,
    #[token("place")]
    Place,
    #[token("for")]
    For,
    #[token("from")]
    From,
    #[token("to")]
    To,
    #[token("step")]
    Step,
    #[token("by")]
    By,
    #[token("with")]
    With,
    #[token("and")]
    And,
    #[token("of")]
    Of,

    // Property keywords
    #[token("width")]
    Width,
    #[token("height")]
    Height,
    #[token("radius")]
    Radius,
    #[token("fill")]
    Fill,
    #[token("gradient")]
    Gradient,
    #[token("stroke")]
    Stroke,
    #[token("dashed")]
    Dashed,
    #[token("dotted")]
    Dotted,
    #[token("background")]
    Background,
    #[token("opacity")]
    Opacity,
    #[token("rounded")]
    Rounded,
    #[token("rotate")]
    Rotate,
    #[token("scale")]
    Scale,
    #[token("font")]
    Font,
    #[token("size")]
    Size,
    #[token("color")]
    Color,
    #[token("bold")]
    Bold,
    #[token("light")]
    Light,
    #[token("normal")]
    Normal,
    #[token("italic")]
    Italic,
    #[token("align")]
    Align,
    #[token("points")]
    Points,
    #[token("src")]
    Src,
    #[token("href")]
    Href,
    #[token("teeth")]
    Teeth,
    #[token("module")]
    Module,

    // Position keywords
    #[token("at")]
    At,
    #[token("center")]
    Center,
    #[token("top")]
    Top,
    #[token("bottom")]
    Bottom,
    #[token("left")]
    Left,
    #[token("right")]
    Right,
    #[token("above")]
    Above,
    #[token("below")]
    Below,
    #[token("inside")]
    Inside,
    #[token("gap")]
    Gap,
    #[token("mesh")]
    Mesh,
    #[token("on")]
    On,
    #[token("the")]
    The,
    #[token("wall")]
    Wall,
    #[token("north")]
    North,
    #[token("south")]
    South,
    #[token("east")]
    East,
    #[token("west")]
    West,

    // Operators and delimiters
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    String(String),

    #[regex(r"[0-9]+(\.[0-9]+)?|\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"([0-9]+(\.[0-9]+)?|\.[0-9]+)%", |lex| {
        let s = lex.slice();
        s[..s.len() - 1].parse::<f64>().ok()
    })]
    Percent(f64),

    #[regex(r"#[0-9a-zA-Z]+", |lex| lex.slice().to_string())]
    HexColor(String),

    // Comments run to end of line
    #[regex(r"--[^\n]*", logos::skip)]
    Comment,

    // Structure, produced by the indentation pre-pass
    Newline,
    Indent,
    Dedent,
}

fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Percent(n) => write!(f, "percentage {}%", n),
            Token::HexColor(c) => write!(f, "color {}", c),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::ParenOpen => f.write_str("'('"),
            Token::ParenClose => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
            Token::Comment => f.write_str("comment"),
            Token::Newline => f.write_str("end of line"),
            Token::Indent => f.write_str("indentation"),
            Token::Dedent => f.write_str("dedent"),
            keyword => write!(f, "keyword '{}'", keyword.keyword().unwrap_or("?")),
        }
    }
}

impl Token {
    /// Source spelling of a keyword token
    pub fn keyword(&self) -> Option<&'static str> {
        Some(match self {
            Token::Canvas => "canvas",
            Token::Rectangle => "rectangle",
            Token::Rect => "rect",
            Token::Circle => "circle",
            Token::Ellipse => "ellipse",
            Token::Line => "line",
            Token::Path => "path",
            Token::Polygon => "polygon",
            Token::Text => "text",
            Token::Group => "group",
            Token::Image => "image",
            Token::Gear => "gear",
            Token::Arc => "arc",
            Token::Is => "is",
            Token::Colors => "colors",
            Token::Define => "define",
            Token::Place => "place",
            Token::For => "for",
            Token::From => "from",
            Token::To => "to",
            Token::Step => "step",
            Token::By => "by",
            Token::With => "with",
            Token::And => "and",
            Token::Of => "of",
            Token::Width => "width",
            Token::Height => "height",
            Token::Radius => "radius",
            Token::Fill => "fill",
            Token::Gradient => "gradient",
            Token::Stroke => "stroke",
            Token::Dashed => "dashed",
            Token::Dotted => "dotted",
            Token::Background => "background",
            Token::Opacity => "opacity",
            Token::Rounded => "rounded",
            Token::Rotate => "rotate",
            Token::Scale => "scale",
            Token::Font => "font",
            Token::Size => "size",
            Token::Color => "color",
            Token::Bold => "bold",
            Token::Light => "light",
            Token::Normal => "normal",
            Token::Italic => "italic",
            Token::Align => "align",
            Token::Points => "points",
            Token::Src => "src",
            Token::Href => "href",
            Token::Teeth => "teeth",
            Token::Module => "module",
            Token::At => "at",
            Token::Center => "center",
            Token::Top => "top",
            Token::Bottom => "bottom",
            Token::Left => "left",
            Token::Right => "right",
            Token::Above => "above",
            Token::Below => "below",
            Token::Inside => "inside",
            Token::Gap => "gap",
            Token::Mesh => "mesh",
            Token::On => "on",
            Token::The => "the",
            Token::Wall => "wall",
            Token::North => "north",
            Token::South => "south",
            Token::East => "east",
            Token::West => "west",
            _ => return None,
        })
    }
}

/// Lex one line of source. `offset` is the byte position of `line` in the
/// full source, so spans point into the original text.
pub fn lex_line(line: &str, offset: usize) -> Result<Vec<(Token, Span)>, ParseError> {
    let mut tokens = Vec::new();
    for (tok, span) in Token::lexer(line).spanned() {
        let span = span.start + offset..span.end + offset;
        match tok {
            Ok(tok) => tokens.push((tok, span)),
            Err(()) => {
                let bad = &line[span.start - offset..span.end - offset];
                return Err(ParseError::Lexical {
                    span,
                    message: format!("Unexpected character '{}'", bad),
                });
            }
        }
    }
    Ok(tokens)
}

/// Lex a single line of input, dropping anything that fails to lex
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
