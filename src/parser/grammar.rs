//! Chumsky grammar over the indentation-aware token stream

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::color::resolve_color;
use crate::error::ParseError;
use crate::layout::gear::MAX_TEETH;
use crate::parser::ast::*;
use crate::parser::builder::{PendingElement, PendingPlacement, Prop};
use crate::parser::indent::tokenize;
use crate::parser::lexer::Token;
use crate::value::{format_number, NaturalSize, Unit, Value};

type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Helper to convert SimpleSpan to our Span type
fn span_range(span: &SimpleSpan) -> Span {
    span.start()..span.end()
}

/// Parse a StagScribe document
pub fn parse(input: &str) -> Result<Document, Vec<ParseError>> {
    let tokens = tokenize(input)?;

    let len = input.len();
    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    let mut doc = document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(ParseError::from).collect::<Vec<_>>())?;

    locate_statements(&mut doc.statements, input);
    Ok(doc)
}

fn locate_statements(statements: &mut [Spanned<Statement>], source: &str) {
    for stmt in statements {
        match &mut stmt.node {
            Statement::Element(el) => locate_element(el, source),
            Statement::Define { body, .. } => {
                for el in body {
                    locate_element(el, source);
                }
            }
            Statement::For(for_loop) => locate_statements(&mut for_loop.body, source),
            Statement::Assign { .. } | Statement::Colors(_) | Statement::Place(_) => {}
        }
    }
}

fn locate_element(el: &mut Element, source: &str) {
    el.location = Location::from_offset(source, el.span.start);
    for child in &mut el.children {
        locate_element(child, source);
    }
}

/// Any identifier, or a keyword used where a plain name is expected
/// (palette entries such as `wall is beige`)
fn word<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    any()
        .try_map(|tok: Token, span| match tok {
            Token::Ident(s) => Ok(s),
            other => match other.keyword() {
                Some(kw) => Ok(kw.to_string()),
                None => Err(Rich::custom(span, format!("Expected a name, found {}", other))),
            },
        })
        .labelled("name")
}

fn string_literal<'a, I>() -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! { Token::String(s) => s }.labelled("string")
}

fn expression<'a, I>() -> impl Parser<'a, I, Expr, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|expr| {
        let unit = select! { Token::Ident(s) => s }
            .try_map(|s, span| s.parse::<Unit>().map_err(|e| Rich::custom(span, e.to_string())));

        let number = select! { Token::Number(n) => n }
            .then(unit.or_not())
            .map(|(n, unit)| Expr::Literal(Value::new(n, unit)));

        let percent = select! { Token::Percent(n) => Expr::Literal(Value::with_unit(n, Unit::Percent)) };

        // A bare natural size stands for one of that unit
        let name = select! { Token::Ident(s) => s }.map(|s| match NaturalSize::from_name(&s) {
            Some(size) => Expr::Literal(Value::with_unit(1.0, Unit::Natural(size))),
            None => Expr::Var(s),
        });

        let atom = choice((
            number,
            percent,
            name,
            expr.delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        ))
        .labelled("expression");

        let unary = recursive(|unary| {
            just(Token::Minus)
                .ignore_then(unary)
                .map(|e| Expr::Negate(Box::new(e)))
                .or(atom)
        });

        let product_op = choice((
            just(Token::Star).to(BinaryOp::Mul),
            just(Token::Slash).to(BinaryOp::Div),
        ));
        let product = unary
            .clone()
            .then(product_op.then(unary).repeated().collect::<Vec<_>>())
            .map(|(first, rest)| {
                rest.into_iter()
                    .fold(first, |left, (op, right)| Expr::binary(op, left, right))
            });

        let sum_op = choice((
            just(Token::Plus).to(BinaryOp::Add),
            just(Token::Minus).to(BinaryOp::Sub),
        ));
        product
            .clone()
            .then(sum_op.then(product).repeated().collect::<Vec<_>>())
            .map(|(first, rest)| {
                rest.into_iter()
                    .fold(first, |left, (op, right)| Expr::binary(op, left, right))
            })
    })
}

fn color<'a, I>() -> impl Parser<'a, I, ColorRef, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let hex = select! { Token::HexColor(h) => h }
        .map(|h| ColorRef::Literal(resolve_color(&h).unwrap_or(h)));

    let channel = select! { Token::Number(n) => n };
    let rgb = select! { Token::Ident(s) => s }
        .filter(|s: &String| s == "rgb")
        .ignore_then(
            channel
                .then_ignore(just(Token::Comma))
                .then(channel)
                .then_ignore(just(Token::Comma))
                .then(channel)
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
        )
        .map(|((r, g), b)| {
            ColorRef::Literal(format!(
                "rgb({},{},{})",
                format_number(r),
                format_number(g),
                format_number(b)
            ))
        });

    // Two-word names such as "light blue"
    let two_words = word()
        .then(word())
        .try_map(|(first, second), span| {
            resolve_color(&format!("{} {}", first, second))
                .map(ColorRef::Literal)
                .ok_or_else(|| Rich::custom(span, "not a color"))
        });

    let single = word().map(|w| match resolve_color(&w) {
        Some(canonical) => ColorRef::Literal(canonical),
        None => ColorRef::Var(w),
    });

    choice((hex, rgb, two_words, single)).labelled("color")
}

fn anchor<'a, I>() -> impl Parser<'a, I, Anchor, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let pair = |a: Token, b: Token, anchor: Anchor| just(a).then(just(b)).to(anchor);
    choice((
        pair(Token::Top, Token::Left, Anchor::TopLeft),
        pair(Token::Top, Token::Right, Anchor::TopRight),
        pair(Token::Bottom, Token::Left, Anchor::BottomLeft),
        pair(Token::Bottom, Token::Right, Anchor::BottomRight),
        pair(Token::Center, Token::Left, Anchor::Left),
        pair(Token::Center, Token::Right, Anchor::Right),
        pair(Token::Center, Token::Top, Anchor::Top),
        pair(Token::Center, Token::Bottom, Anchor::Bottom),
        just(Token::Center).to(Anchor::Center),
        just(Token::Top).to(Anchor::Top),
        just(Token::Bottom).to(Anchor::Bottom),
        just(Token::Left).to(Anchor::Left),
        just(Token::Right).to(Anchor::Right),
    ))
    .labelled("anchor")
}

fn position<'a, I, E>(expr: E) -> impl Parser<'a, I, Position<Expr>, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    E: Parser<'a, I, Expr, Extra<'a>> + Clone,
{
    let at_anchor = just(Token::At)
        .ignore_then(anchor())
        .then(just(Token::Of).ignore_then(string_literal()).or_not())
        .map(|(anchor, reference)| Position::anchored(anchor, reference));

    let at_coords = just(Token::At)
        .ignore_then(expr.clone())
        .then(expr.clone())
        .map(|(x, y)| Position::at(x, y));

    let relation = choice((
        just(Token::Above).to(Relation::Above),
        just(Token::Below).to(Relation::Below),
        just(Token::Inside).to(Relation::Inside),
        just(Token::Left).then(just(Token::Of)).to(Relation::LeftOf),
        just(Token::Right).then(just(Token::Of)).to(Relation::RightOf),
    ));

    let relative = relation
        .then(string_literal())
        .then(just(Token::At).ignore_then(anchor()).or_not())
        .then(
            just(Token::With)
                .then(just(Token::Gap))
                .ignore_then(expr)
                .or_not(),
        )
        .map(|(((relation, reference), ref_anchor), gap)| Position {
            ref_anchor,
            gap,
            ..Position::relative(relation, reference)
        });

    let mesh = just(Token::Mesh)
        .then(just(Token::With))
        .ignore_then(string_literal())
        .map(|drive| Position {
            mesh: Some(drive),
            ..Position::default()
        });

    let wall = just(Token::On)
        .then(just(Token::The).or_not())
        .ignore_then(choice((
            just(Token::North).to(Wall::North),
            just(Token::South).to(Wall::South),
            just(Token::East).to(Wall::East),
            just(Token::West).to(Wall::West),
        )))
        .then_ignore(just(Token::Wall))
        .map(|wall| Position {
            wall: Some(wall),
            ..Position::default()
        });

    choice((at_anchor, at_coords, relative, mesh, wall)).labelled("position")
}

fn property<'a, I, E>(expr: E) -> impl Parser<'a, I, Prop, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
    E: Parser<'a, I, Expr, Extra<'a>> + Clone + 'a,
{
    // `width of 50%` reads the same as `width 50%`
    let quantity = |kw: Token| {
        just(kw)
            .then(just(Token::Of).or_not())
            .ignore_then(expr.clone())
    };

    let point = expr
        .clone()
        .then_ignore(just(Token::Comma))
        .then(expr.clone())
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    let whole_number = select! { Token::Number(n) => n }.try_map(|n, span| {
        if n >= 1.0 && n <= f64::from(MAX_TEETH) && n.fract() == 0.0 {
            Ok(n as u32)
        } else {
            Err(Rich::custom(
                span,
                format!("teeth must be a whole number from 1 to {}", MAX_TEETH),
            ))
        }
    });

    let dimensions = quantity(Token::Width)
        .map(Prop::Width)
        .or(quantity(Token::Height).map(Prop::Height))
        .or(quantity(Token::Radius).map(Prop::Radius))
        .or(expr
            .clone()
            .then_ignore(just(Token::By))
            .then(expr.clone())
            .map(|(w, h)| Prop::Dimensions(w, h)));

    let paint = choice((
        just(Token::Fill)
            .ignore_then(
                just(Token::Gradient)
                    .ignore_then(color())
                    .then_ignore(just(Token::To))
                    .then(color())
                    .map(|(from, to)| {
                        Paint::Gradient(GradientFill {
                            from,
                            to,
                            direction: GradientDirection::Vertical,
                        })
                    })
                    .or(color().map(Paint::Solid)),
            )
            .map(Prop::Fill),
        just(Token::Stroke)
            .ignore_then(color())
            .then(expr.clone().or_not())
            .map(|(color, width)| Prop::Stroke { color, width }),
        just(Token::Dashed).to(Prop::Dash(Dash::Dashed)),
        just(Token::Dotted).to(Prop::Dash(Dash::Dotted)),
        just(Token::Background).ignore_then(color()).map(Prop::Background),
        quantity(Token::Opacity).map(Prop::Opacity),
        quantity(Token::Rounded).map(Prop::Rounded),
        quantity(Token::Rotate).map(Prop::Rotate),
        quantity(Token::Scale).map(Prop::Scale),
    ));

    let text = choice((
        just(Token::Font).ignore_then(string_literal()).map(Prop::Font),
        quantity(Token::Size).map(Prop::TextSize),
        just(Token::Color).ignore_then(color()).map(Prop::TextColor),
        just(Token::Bold).to(Prop::Weight(FontWeight::Bold)),
        just(Token::Light).to(Prop::Weight(FontWeight::Light)),
        just(Token::Normal).to(Prop::Weight(FontWeight::Normal)),
        just(Token::Italic).to(Prop::Italic),
        just(Token::Align)
            .ignore_then(choice((
                just(Token::Left).to(TextAlign::Left),
                just(Token::Center).to(TextAlign::Center),
                just(Token::Right).to(TextAlign::Right),
            )))
            .map(Prop::Align),
    ));

    let geometry = choice((
        just(Token::Points)
            .ignore_then(point.repeated().at_least(1).collect::<Vec<_>>())
            .map(Prop::Points),
        just(Token::From)
            .ignore_then(expr.clone().then(expr.clone()))
            .map(Prop::LineFrom),
        just(Token::To)
            .ignore_then(expr.clone().then(expr.clone()))
            .map(Prop::LineTo),
        select! { Token::Ident(s) => s }
            .filter(|s: &String| s == "d")
            .ignore_then(string_literal())
            .map(Prop::PathData),
        choice((just(Token::Src), just(Token::Href)))
            .ignore_then(string_literal())
            .map(Prop::Src),
        just(Token::Teeth).ignore_then(whole_number).map(Prop::Teeth),
        just(Token::Module)
            .ignore_then(select! { Token::Number(n) => n })
            .map(Prop::Module),
    ));

    choice((
        position(expr).map(Prop::Position),
        paint,
        text,
        geometry,
        dimensions,
    ))
    .labelled("property")
    .boxed()
}

fn element_kind<'a, I>() -> impl Parser<'a, I, ElementKind, Extra<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! {
        Token::Canvas => ElementKind::Canvas,
        Token::Rectangle => ElementKind::Rectangle,
        Token::Rect => ElementKind::Rectangle,
        Token::Circle => ElementKind::Circle,
        Token::Ellipse => ElementKind::Ellipse,
        Token::Line => ElementKind::Line,
        Token::Path => ElementKind::Path,
        Token::Polygon => ElementKind::Polygon,
        Token::Text => ElementKind::Text,
        Token::Group => ElementKind::Group,
        Token::Image => ElementKind::Image,
        Token::Gear => ElementKind::Gear,
        Token::Arc => ElementKind::Arc,
    }
    .labelled("element")
}

/// A line inside an element's block
enum BodyItem {
    Child(Element),
    Prop(Prop),
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, Extra<'a>>
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let expr = expression().boxed();
    let prop = property(expr.clone());
    let newline = just(Token::Newline);
    let name = select! { Token::Ident(s) => s }.labelled("identifier");

    // Inline properties may be joined with `with` or `and`
    let inline_props = choice((just(Token::With), just(Token::And)))
        .or_not()
        .ignore_then(prop.clone())
        .repeated()
        .collect::<Vec<_>>();

    let element = recursive(|element| {
        // A color prefix is only a color when an element keyword follows
        let head = choice((
            color().then(element_kind()).map(|(c, k)| (Some(c), k)),
            element_kind().map(|k| (None, k)),
        ));

        let header = head
            .then(string_literal().or_not())
            .then(
                expr.clone()
                    .then_ignore(just(Token::By))
                    .then(expr.clone())
                    .or_not(),
            )
            .then(inline_props.clone())
            .then_ignore(newline.clone());

        let body_item = choice((
            element.map(BodyItem::Child),
            prop.clone().then_ignore(newline.clone()).map(BodyItem::Prop),
        ));

        header
            .then(
                body_item
                    .repeated()
                    .at_least(1)
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::Indent), just(Token::Dedent))
                    .or_not(),
            )
            .try_map(|((((head, name), dims), props), body), span: SimpleSpan| {
                let (prefix, kind) = head;
                let mut pending = PendingElement::new(kind, name);
                let prefix = prefix.map(|c| Prop::Fill(Paint::Solid(c)));
                let dims = dims.map(|(w, h)| Prop::Dimensions(w, h));
                for p in prefix.into_iter().chain(dims).chain(props) {
                    pending.apply(p).map_err(|msg| Rich::custom(span, msg))?;
                }
                for item in body.unwrap_or_default() {
                    match item {
                        BodyItem::Child(child) => pending.add_child(child),
                        BodyItem::Prop(p) => pending.apply(p).map_err(|msg| Rich::custom(span, msg))?,
                    }
                }
                Ok(pending.finish(span_range(&span)))
            })
            .boxed()
    });

    let assign = name
        .clone()
        .then_ignore(just(Token::Is))
        .then(expr.clone())
        .then_ignore(newline.clone())
        .map(|(name, expr)| Statement::Assign { name, expr });

    let color_assignment = word()
        .then_ignore(just(Token::Is))
        .then(color())
        .then_ignore(newline.clone())
        .map(|(name, color)| ColorAssignment { name, color });

    let colors = just(Token::Colors)
        .then(just(Token::Colon))
        .then(newline.clone())
        .ignore_then(
            color_assignment
                .repeated()
                .at_least(1)
                .collect::<Vec<_>>()
                .delimited_by(just(Token::Indent), just(Token::Dedent)),
        )
        .map(Statement::Colors);

    let define = just(Token::Define)
        .ignore_then(word())
        .then_ignore(just(Token::Colon))
        .then_ignore(newline.clone())
        .then(
            element
                .clone()
                .repeated()
                .at_least(1)
                .collect::<Vec<_>>()
                .delimited_by(just(Token::Indent), just(Token::Dedent)),
        )
        .map(|(name, body)| Statement::Define { name, body });

    let place = just(Token::Place)
        .ignore_then(word())
        .then(string_literal().or_not())
        .then(inline_props)
        .then_ignore(newline.clone())
        .then(
            prop.then_ignore(newline.clone())
                .repeated()
                .at_least(1)
                .collect::<Vec<_>>()
                .delimited_by(just(Token::Indent), just(Token::Dedent))
                .or_not(),
        )
        .try_map(|(((template, instance), inline), body), span| {
            let mut pending = PendingPlacement::new(template, instance);
            for p in inline.into_iter().chain(body.unwrap_or_default()) {
                pending.apply(p).map_err(|msg| Rich::custom(span, msg))?;
            }
            Ok(Statement::Place(pending.finish()))
        });

    let statement = recursive(|stmt| {
        let for_loop = just(Token::For)
            .ignore_then(name)
            .then_ignore(just(Token::From))
            .then(expr.clone())
            .then_ignore(just(Token::To))
            .then(expr.clone())
            .then(just(Token::Step).ignore_then(expr.clone()).or_not())
            .then_ignore(newline.clone())
            .then(
                stmt.repeated()
                    .at_least(1)
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::Indent), just(Token::Dedent)),
            )
            .map(|((((var, start), end), step), body)| {
                Statement::For(ForLoop {
                    var,
                    start,
                    end,
                    step,
                    body,
                })
            });

        // Order matters: `name is ...` must be tried before a color-prefixed element
        choice((
            assign.clone(),
            colors.clone(),
            define.clone(),
            place.clone(),
            for_loop,
            element.clone().map(Statement::Element),
        ))
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())))
        .boxed()
    });

    statement
        .repeated()
        .collect()
        .then_ignore(end())
        .map(|statements| Document { statements })
}
