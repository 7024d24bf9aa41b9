//! Parser for JDL source tokens.
//!
//! This module transforms the significant tokens produced by the
//! [`lexer`](super::lexer) into the syntax tree defined in
//! [`parser_types`](super::parser_types). The public entry point is
//! [`build_jdl`].
//!
//! Parsing is all-or-nothing: the first mismatch aborts with a diagnostic
//! naming the unexpected token and its position. Declarations commit with
//! [`cut_err`] once their leading keyword is seen, so errors point inside
//! the construct rather than at its start.

use winnow::{
    Parser as _,
    combinator::{opt, peek, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use jdl_core::{entity::ValidationKind, relationship::RelationshipKind};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{Keyword, PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) where a committed construct started
    StartOffset(usize),
}

type Input<'t, 'src> = TokenSlice<'t, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// Run `f` and turn any failure into a committed error remembering where
/// the construct started.
fn cut_err<'t, 'src, O, F>(input: &mut Input<'t, 'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'t, 'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Helper to create a Backtrack error naming what was expected
fn expected(label: &'static str) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    ErrMode::Backtrack(e)
}

/// Look at the next token without consuming it.
fn lookahead<'t, 'src>(
    input: &mut Input<'t, 'src>,
    label: &'static str,
) -> IResult<&'t PositionedToken<'src>> {
    peek(any).context(Context::Label(label)).parse_next(input)
}

/// Match one punctuation token.
fn punct<'t, 'src: 't>(
    expected: Token<'static>,
    label: &'static str,
) -> impl FnMut(&mut Input<'t, 'src>) -> IResult<Span> {
    move |input: &mut Input<'t, 'src>| {
        any.verify_map(|token: &PositionedToken<'src>| {
            (token.token == expected).then_some(token.span)
        })
        .context(Context::Label(label))
        .parse_next(input)
    }
}

fn keyword<'t, 'src: 't>(keyword: Keyword) -> impl FnMut(&mut Input<'t, 'src>) -> IResult<Span> {
    move |input: &mut Input<'t, 'src>| {
        any.verify_map(|token: &PositionedToken<'src>| match token.token {
            Token::Keyword(found) if found == keyword => Some(token.span),
            _ => None,
        })
        .context(Context::Label(keyword.as_str()))
        .parse_next(input)
    }
}

fn comma<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Span> {
    punct(Token::Comma, "`,`").parse_next(input)
}

fn left_paren<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Span> {
    punct(Token::LeftParen, "`(`").parse_next(input)
}

fn right_paren<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Span> {
    punct(Token::RightParen, "`)`").parse_next(input)
}

fn left_brace<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Span> {
    punct(Token::LeftBrace, "`{`").parse_next(input)
}

fn right_brace<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Span> {
    punct(Token::RightBrace, "`}`").parse_next(input)
}

/// Parse any word usable as a name; keywords and vocabulary words included.
fn named<'t, 'src: 't>(
    label: &'static str,
) -> impl FnMut(&mut Input<'t, 'src>) -> IResult<Spanned<&'src str>> {
    move |input: &mut Input<'t, 'src>| {
        any.verify_map(|token: &PositionedToken<'src>| {
            token.token.word().map(|word| Spanned::new(word, token.span))
        })
        .context(Context::Label(label))
        .parse_next(input)
    }
}

fn name<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<&'src str>> {
    named("name").parse_next(input)
}

fn names<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Vec<Spanned<&'src str>>> {
    separated(1.., named("entity name"), comma).parse_next(input)
}

/// Parse a bare word, a number or a string literal.
fn literal<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<types::Literal<'src>>> {
    any.verify_map(|token: &PositionedToken<'src>| {
        let literal = match &token.token {
            Token::Number(raw) => types::Literal::Number(*raw),
            Token::StringLiteral(text) => types::Literal::String(text.clone()),
            other => types::Literal::Word(other.word()?),
        };
        Some(Spanned::new(literal, token.span))
    })
    .context(Context::Label("value"))
    .parse_next(input)
}

/// Parse `(literal)`, committing after the opening parenthesis.
fn parenthesized_literal<'t, 'src>(
    input: &mut Input<'t, 'src>,
) -> IResult<Option<Spanned<types::Literal<'src>>>> {
    if opt(left_paren).parse_next(input)?.is_none() {
        return Ok(None);
    }
    cut_err(input, |input| {
        let value = literal(input)?;
        right_paren(input)?;
        Ok(Some(value))
    })
}

/// Parse consecutive documentation comments; the last one wins.
fn doc_comments<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Option<&'src str>> {
    repeat(
        0..,
        any.verify_map(|token: &PositionedToken<'src>| match token.token {
            Token::DocComment(text) => Some(text),
            _ => None,
        }),
    )
    .fold(|| None, |_, text| Some(text))
    .parse_next(input)
}

/// Parse `@Name` or `@Name(value)`
fn annotation<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Annotation<'src>> {
    punct(Token::At, "`@`").parse_next(input)?;
    cut_err(input, |input| {
        let name = named("annotation name").parse_next(input)?;
        let value = parenthesized_literal(input)?;
        Ok(types::Annotation { name, value })
    })
}

fn annotations<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Vec<types::Annotation<'src>>> {
    repeat(0.., annotation).parse_next(input)
}

/// Parse documentation and annotations in either order.
fn prefix<'t, 'src>(
    input: &mut Input<'t, 'src>,
) -> IResult<(Option<&'src str>, Vec<types::Annotation<'src>>)> {
    let before = doc_comments(input)?;
    let annotations = annotations(input)?;
    let after = doc_comments(input)?;
    Ok((after.or(before), annotations))
}

/// Parse `*` or `A, B, C`
fn entity_list<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<types::EntityList<'src>>> {
    if let Some(span) = opt(punct(Token::Star, "`*`")).parse_next(input)? {
        return Ok(Spanned::new(types::EntityList::All, span));
    }

    let names = names
        .context(Context::Label("`*` or entity names"))
        .parse_next(input)?;
    let span = names
        .iter()
        .map(|name| name.span())
        .reduce(|acc, span| acc.union(span))
        .unwrap_or_default();
    Ok(Spanned::new(types::EntityList::Names(names), span))
}

/// Parse an optional `except A, B`
fn except_clause<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Vec<Spanned<&'src str>>> {
    if opt(keyword(Keyword::Except)).parse_next(input)?.is_none() {
        return Ok(Vec::new());
    }
    cut_err(input, names)
}

/// Parse `skipClient <entities>`, `dto <entities> with <value>` or
/// `use <values> for <entities>`, each with an optional `except` clause.
fn option_decl<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::OptionDecl<'src>> {
    let head = lookahead(input, "option declaration")?;

    match head.token {
        Token::UnaryOption(_) => cut_err(input, |input| {
            let name = name(input)?;
            let list = entity_list(input)?;
            let except = except_clause(input)?;
            Ok(types::OptionDecl::Unary {
                name,
                selector: types::EntitySelector { list, except },
            })
        }),
        Token::BinaryOption(_) => cut_err(input, |input| {
            let name = name(input)?;
            let list = entity_list(input)?;
            keyword(Keyword::With).parse_next(input)?;
            let value = literal(input)?;
            let except = except_clause(input)?;
            Ok(types::OptionDecl::Binary {
                name,
                selector: types::EntitySelector { list, except },
                value,
            })
        }),
        Token::Keyword(Keyword::Use) => cut_err(input, |input| {
            keyword(Keyword::Use).parse_next(input)?;
            let values = separated(1.., named("option value"), comma).parse_next(input)?;
            keyword(Keyword::For).parse_next(input)?;
            let list = entity_list(input)?;
            let except = except_clause(input)?;
            Ok(types::OptionDecl::Use {
                values,
                selector: types::EntitySelector { list, except },
            })
        }),
        _ => Err(expected("option declaration")),
    }
}

/// Parse `key value` or `key [a, b]`
fn config_entry<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::ConfigEntry<'src>> {
    let name = named("option name").parse_next(input)?;

    cut_err(input, |input| {
        let Some(open) = opt(punct(Token::LeftBracket, "`[`")).parse_next(input)? else {
            let value = literal(input)?;
            let span = value.span();
            return Ok(types::ConfigEntry {
                name,
                value: Spanned::new(types::ConfigValue::Single(value.into_inner()), span),
            });
        };

        let values: Vec<Spanned<types::Literal<'src>>> =
            separated(0.., literal, comma).parse_next(input)?;
        let close = punct(Token::RightBracket, "`]`").parse_next(input)?;
        Ok(types::ConfigEntry {
            name,
            value: Spanned::new(types::ConfigValue::List(values), open.union(close)),
        })
    })
}

/// Parse `{ key value ... }`
fn config_body<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Vec<types::ConfigEntry<'src>>> {
    left_brace(input)?;
    let entries = repeat(0.., config_entry).parse_next(input)?;
    right_brace(input)?;
    Ok(entries)
}

/// Parse `config { ... }` or `config(<blueprint>) { ... }`
fn config_block<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::ConfigBlock<'src>> {
    keyword(Keyword::Config).parse_next(input)?;
    cut_err(input, |input| {
        let namespace = if opt(left_paren).parse_next(input)?.is_some() {
            let namespace = named("blueprint name").parse_next(input)?;
            right_paren(input)?;
            Some(namespace)
        } else {
            None
        };
        let entries = config_body(input)?;
        Ok(types::ConfigBlock { namespace, entries })
    })
}

/// Parse `application { ... }`
fn application<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Application<'src>> {
    cut_err(input, |input| {
        let keyword_span = keyword(Keyword::Application).parse_next(input)?;
        left_brace(input)?;

        let mut application = types::Application {
            keyword: keyword_span,
            configs: Vec::new(),
            entities: None,
            options: Vec::new(),
        };

        loop {
            doc_comments(input)?;
            let head = lookahead(input, "`}`")?;
            match head.token {
                Token::RightBrace => {
                    right_brace(input)?;
                    break;
                }
                Token::Keyword(Keyword::Config) => {
                    application.configs.push(config_block(input)?);
                }
                Token::Keyword(Keyword::Entities) => {
                    keyword(Keyword::Entities).parse_next(input)?;
                    let list = entity_list(input)?;
                    let except = except_clause(input)?;
                    application.entities = Some(types::EntitySelector { list, except });
                }
                _ => application.options.push(option_decl(input)?),
            }
        }

        Ok(application)
    })
}

/// Parse a validation argument: number, constant, pattern or string.
fn validation_arg<'t, 'src>(
    input: &mut Input<'t, 'src>,
) -> IResult<Spanned<types::ValidationArg<'src>>> {
    any.verify_map(|token: &PositionedToken<'src>| {
        let argument = match &token.token {
            Token::Number(raw) => types::ValidationArg::Number(*raw),
            Token::Pattern(pattern) => types::ValidationArg::Pattern(*pattern),
            Token::StringLiteral(text) => types::ValidationArg::String(text.clone()),
            Token::Identifier(name) => types::ValidationArg::Constant(*name),
            _ => return None,
        };
        Some(Spanned::new(argument, token.span))
    })
    .context(Context::Label("validation value"))
    .parse_next(input)
}

fn validation_kind<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<ValidationKind>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Validation(kind) => Some(Spanned::new(kind, token.span)),
        _ => None,
    })
    .context(Context::Label("validation"))
    .parse_next(input)
}

/// Parse `required`, `min(3)`, `pattern(/[a-z]+/)`...
fn validation<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Validation<'src>> {
    let kind = validation_kind(input)?;

    if opt(left_paren).parse_next(input)?.is_none() {
        return Ok(types::Validation {
            kind,
            argument: None,
        });
    }

    cut_err(input, |input| {
        let argument = validation_arg(input)?;
        right_paren(input)?;
        Ok(types::Validation {
            kind,
            argument: Some(argument),
        })
    })
}

/// Parse `[doc] [@Ann] name Type [validations] [,]`
fn field<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Field<'src>> {
    let (documentation, annotations) = prefix(input)?;
    let name = named("field name").parse_next(input)?;

    cut_err(input, |input| {
        let field_type = named("field type").parse_next(input)?;
        let validations = repeat(0.., validation).parse_next(input)?;
        opt(comma).parse_next(input)?;
        Ok(types::Field {
            documentation,
            annotations,
            name,
            field_type,
            validations,
        })
    })
}

/// Parse `entity Name [(table)] [{ fields }]`
fn entity<'t, 'src>(
    input: &mut Input<'t, 'src>,
    documentation: Option<&'src str>,
    annotations: Vec<types::Annotation<'src>>,
) -> IResult<types::Entity<'src>> {
    cut_err(input, |input| {
        keyword(Keyword::Entity).parse_next(input)?;
        let name = named("entity name").parse_next(input)?;

        let table_name = if opt(left_paren).parse_next(input)?.is_some() {
            let table_name = named("table name").parse_next(input)?;
            right_paren(input)?;
            Some(table_name)
        } else {
            None
        };

        let fields = if opt(left_brace).parse_next(input)?.is_some() {
            let fields = repeat(0.., field).parse_next(input)?;
            doc_comments(input)?;
            right_brace(input)?;
            fields
        } else {
            Vec::new()
        };

        Ok(types::Entity {
            documentation,
            annotations,
            name,
            table_name,
            fields,
        })
    })
}

/// Parse `[doc] KEY [(value)] [,]`
fn enum_value<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::EnumValue<'src>> {
    let documentation = doc_comments(input)?;
    let name = named("enum value").parse_next(input)?;
    let value = parenthesized_literal(input)?;
    opt(comma).parse_next(input)?;
    Ok(types::EnumValue {
        documentation,
        name,
        value,
    })
}

/// Parse `enum Name { KEY [(value)], ... }`
fn enumeration<'t, 'src>(
    input: &mut Input<'t, 'src>,
    documentation: Option<&'src str>,
    annotations: Vec<types::Annotation<'src>>,
) -> IResult<types::Enum<'src>> {
    cut_err(input, |input| {
        keyword(Keyword::Enum).parse_next(input)?;
        let name = named("enum name").parse_next(input)?;
        left_brace(input)?;
        let values = repeat(0.., enum_value).parse_next(input)?;
        doc_comments(input)?;
        right_brace(input)?;
        Ok(types::Enum {
            documentation,
            annotations,
            name,
            values,
        })
    })
}

/// Parse the injected field of a relationship side, which cannot be `required`.
fn injected_field<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Validation(ValidationKind::Required) => None,
        _ => token.token.word().map(|word| Spanned::new(word, token.span)),
    })
    .context(Context::Label("injected field"))
    .parse_next(input)
}

fn required<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Validation(ValidationKind::Required) => Some(token.span),
        _ => None,
    })
    .context(Context::Label("`required`"))
    .parse_next(input)
}

/// Parse `[doc] [@Ann] Entity[{field[(display)] [required]}]`
fn relationship_side<'t, 'src>(
    input: &mut Input<'t, 'src>,
) -> IResult<types::RelationshipSide<'src>> {
    let (documentation, annotations) = prefix(input)?;
    let entity = named("entity name").parse_next(input)?;

    let mut side = types::RelationshipSide {
        documentation,
        annotations,
        entity,
        injected_field: None,
        display_field: None,
        required: false,
    };

    if opt(left_brace).parse_next(input)?.is_none() {
        return Ok(side);
    }

    cut_err(input, |input| {
        side.injected_field = opt(injected_field).parse_next(input)?;
        if side.injected_field.is_some() && opt(left_paren).parse_next(input)?.is_some() {
            side.display_field = Some(named("display field").parse_next(input)?);
            right_paren(input)?;
        }
        side.required = opt(required).parse_next(input)?.is_some();
        right_brace(input)?;
        Ok(side)
    })
}

/// Parse `with builtInEntity` or `with name(value)`
fn with_clause<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Annotation<'src>> {
    keyword(Keyword::With).parse_next(input)?;
    cut_err(input, |input| {
        let name = named("relationship option").parse_next(input)?;
        let value = parenthesized_literal(input)?;
        Ok(types::Annotation { name, value })
    })
}

/// Parse `From{field} to To{field} [with ...] [,]`
fn relationship<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Relationship<'src>> {
    let from = relationship_side(input)?;

    cut_err(input, |input| {
        keyword(Keyword::To).parse_next(input)?;
        let to = relationship_side(input)?;
        let with = repeat(0.., with_clause).parse_next(input)?;
        opt(comma).parse_next(input)?;
        Ok(types::Relationship { from, to, with })
    })
}

fn relationship_kind<'t, 'src>(
    input: &mut Input<'t, 'src>,
) -> IResult<Spanned<RelationshipKind>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::RelationshipKind(kind) => Some(Spanned::new(kind, token.span)),
        _ => None,
    })
    .context(Context::Label("relationship type"))
    .parse_next(input)
}

/// Parse `relationship <Kind> { ... }`
fn relationship_group<'t, 'src>(
    input: &mut Input<'t, 'src>,
) -> IResult<types::RelationshipGroup<'src>> {
    cut_err(input, |input| {
        keyword(Keyword::Relationship).parse_next(input)?;
        let kind = relationship_kind(input)?;
        left_brace(input)?;
        let relationships = repeat(1.., relationship).parse_next(input)?;
        doc_comments(input)?;
        right_brace(input)?;
        Ok(types::RelationshipGroup {
            kind,
            relationships,
        })
    })
}

/// Parse `deployment { ... }`
fn deployment<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Deployment<'src>> {
    cut_err(input, |input| {
        let keyword_span = keyword(Keyword::Deployment).parse_next(input)?;
        let entries = config_body(input)?;
        Ok(types::Deployment {
            keyword: keyword_span,
            entries,
        })
    })
}

fn number<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Number(raw) => Some(Spanned::new(raw, token.span)),
        _ => None,
    })
    .context(Context::Label("number"))
    .parse_next(input)
}

/// Parse `NAME = 42`
fn constant<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Constant<'src>> {
    cut_err(input, |input| {
        let name = named("constant name").parse_next(input)?;
        punct(Token::Equals, "`=`").parse_next(input)?;
        let value = number(input)?;
        Ok(types::Constant { name, value })
    })
}

/// Parse one top-level declaration.
fn declaration<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Declaration<'src>> {
    let (documentation, annotations) = prefix(input)?;
    let head = lookahead(input, "declaration")?;

    match head.token {
        Token::Keyword(Keyword::Entity) => {
            entity(input, documentation, annotations).map(types::Declaration::Entity)
        }
        Token::Keyword(Keyword::Enum) => {
            enumeration(input, documentation, annotations).map(types::Declaration::Enum)
        }
        _ if !annotations.is_empty() => Err(expected("`entity` or `enum` after annotations")),
        Token::Keyword(Keyword::Application) => {
            application(input).map(types::Declaration::Application)
        }
        Token::Keyword(Keyword::Relationship) => {
            relationship_group(input).map(types::Declaration::Relationship)
        }
        Token::Keyword(Keyword::Deployment) => {
            deployment(input).map(types::Declaration::Deployment)
        }
        Token::Keyword(Keyword::Use) | Token::UnaryOption(_) | Token::BinaryOption(_) => {
            option_decl(input).map(types::Declaration::Option)
        }
        Token::Identifier(_) => constant(input).map(types::Declaration::Constant),
        _ => Err(expected("declaration")),
    }
}

/// Parse every declaration up to the end of input.
fn jdl<'t, 'src>(input: &mut Input<'t, 'src>) -> IResult<types::Jdl<'src>> {
    let mut declarations = Vec::new();

    loop {
        // Documentation with nothing after it is ignored
        let checkpoint = input.checkpoint();
        doc_comments(input)?;
        if input.eof_offset() == 0 {
            break;
        }
        input.reset(&checkpoint);

        declarations.push(declaration(input)?);
    }

    Ok(types::Jdl { declarations })
}

/// Convert a winnow error into a diagnostic pointing at the offending token.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    // The innermost label is the most specific expectation
    let label = context.context().find_map(|ctx| match ctx {
        Context::Label(label) => Some(*label),
        Context::StartOffset(_) => None,
    });
    // The outermost start offset is the enclosing declaration
    let start = context
        .context()
        .filter_map(|ctx| match ctx {
            Context::StartOffset(remaining) => tokens.get(tokens.len() - remaining),
            Context::Label(_) => None,
        })
        .last();

    let offset = tokens.len() - current_remaining;
    let mut diag = match tokens.get(offset) {
        Some(token) => Diagnostic::error(format!(
            "found an invalid token '{}' at line {} and column {}",
            token.token, token.line, token.column
        ))
        .with_code(ErrorCode::E100)
        .with_label(token.span, "unexpected token"),
        None => {
            let end = tokens
                .last()
                .map(|token| Span::new(token.span.end()..token.span.end()))
                .unwrap_or_default();
            Diagnostic::error("unexpected end of input")
                .with_code(ErrorCode::E101)
                .with_label(end, "input ends here")
        }
    };

    if let Some(start) = start.filter(|start| Some(*start) != tokens.get(offset)) {
        diag = diag.with_secondary_label(start.span, "while parsing this");
    }
    if let Some(label) = label {
        diag = diag.with_help(format!("expected {label}"));
    }
    diag
}

/// Build the syntax tree from significant tokens (trivia removed).
pub fn build_jdl<'t, 'src>(
    tokens: &'t [PositionedToken<'src>],
) -> Result<types::Jdl<'src>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match jdl.parse_next(&mut token_slice) {
        Ok(jdl) => Ok(jdl),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, runtime::Runtime};

    fn significant(source: &str) -> Vec<PositionedToken<'_>> {
        let runtime = Runtime::build(None).unwrap();
        tokenize(source, &runtime)
            .expect("Failed to tokenize input")
            .into_iter()
            .filter(|token| !token.is_trivia())
            .collect()
    }

    #[test]
    fn test_name_accepts_keywords() {
        let tokens = significant("entity");
        let mut slice = TokenSlice::new(&tokens);
        let result = name.parse_next(&mut slice).unwrap();
        assert_eq!(*result.inner(), "entity");
    }

    #[test]
    fn test_literal_kinds() {
        let tokens = significant("42 mapstruct \"a b\"");
        let mut slice = TokenSlice::new(&tokens);
        assert_eq!(
            *literal.parse_next(&mut slice).unwrap().inner(),
            types::Literal::Number("42")
        );
        assert_eq!(
            *literal.parse_next(&mut slice).unwrap().inner(),
            types::Literal::Word("mapstruct")
        );
        assert_eq!(
            *literal.parse_next(&mut slice).unwrap().inner(),
            types::Literal::String("a b".to_string())
        );
    }

    #[test]
    fn test_doc_comments_keep_last() {
        let tokens = significant("/** first */ /** second */ entity");
        let mut slice = TokenSlice::new(&tokens);
        let doc = doc_comments.parse_next(&mut slice).unwrap();
        assert_eq!(doc, Some(" second "));
        assert_eq!(slice.eof_offset(), 1);
    }

    #[test]
    fn test_entity_list_wildcard_and_names() {
        let tokens = significant("*");
        let mut slice = TokenSlice::new(&tokens);
        assert_eq!(
            *entity_list.parse_next(&mut slice).unwrap().inner(),
            types::EntityList::All
        );

        let tokens = significant("A, B");
        let mut slice = TokenSlice::new(&tokens);
        let list = entity_list.parse_next(&mut slice).unwrap();
        let types::EntityList::Names(names) = list.inner() else {
            panic!("expected names");
        };
        let names: Vec<&str> = names.iter().map(|name| *name.inner()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(list.span(), Span::new(0..4));
    }

    #[test]
    fn test_annotation_with_value() {
        let tokens = significant("@ChangelogDate(\"20240101\")");
        let mut slice = TokenSlice::new(&tokens);
        let annotation = annotation.parse_next(&mut slice).unwrap();
        assert_eq!(*annotation.name.inner(), "ChangelogDate");
        assert_eq!(
            annotation.value.as_ref().map(|value| value.text().to_string()),
            Some("20240101".to_string())
        );
    }

    #[test]
    fn test_relationship_side_with_display_field() {
        let tokens = significant("Employee{manager(lastName) required}");
        let mut slice = TokenSlice::new(&tokens);
        let side = relationship_side.parse_next(&mut slice).unwrap();
        assert_eq!(*side.entity.inner(), "Employee");
        assert_eq!(side.injected_field.map(|f| *f.inner()), Some("manager"));
        assert_eq!(side.display_field.map(|f| *f.inner()), Some("lastName"));
        assert!(side.required);
    }

    #[test]
    fn test_relationship_side_required_only() {
        let tokens = significant("Employee{required}");
        let mut slice = TokenSlice::new(&tokens);
        let side = relationship_side.parse_next(&mut slice).unwrap();
        assert!(side.injected_field.is_none());
        assert!(side.required);
    }

    #[test]
    fn test_validation_with_constant() {
        let tokens = significant("maxlength(MAX)");
        let mut slice = TokenSlice::new(&tokens);
        let validation = validation.parse_next(&mut slice).unwrap();
        assert_eq!(*validation.kind.inner(), ValidationKind::MaxLength);
        assert_eq!(
            validation.argument.map(|arg| arg.into_inner()),
            Some(types::ValidationArg::Constant("MAX"))
        );
    }

    #[test]
    fn test_convert_error_points_at_token() {
        let tokens = significant("entity {");
        let err = build_jdl(&tokens).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert_eq!(
            err.message(),
            "found an invalid token '{' at line 1 and column 8"
        );
        assert_eq!(err.help(), Some("expected entity name"));
        assert_eq!(err.primary_span(), Some(Span::new(7..8)));
    }

    #[test]
    fn test_convert_error_at_end_of_input() {
        let tokens = significant("entity A {\n  name String");
        let err = build_jdl(&tokens).unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::E101));
        assert_eq!(err.message(), "unexpected end of input");
    }
}
