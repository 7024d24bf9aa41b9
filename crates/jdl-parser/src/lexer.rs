//! Lexical analyzer for JDL source text.
//!
//! The lexer converts source text into a stream of [`Token`]s. Words are
//! classified against the resolved [`Runtime`] vocabulary, so an extension
//! that adds an option name also changes how that word is tokenized.
//!
//! Lexing is fail-fast: the first illegal character aborts with a
//! [`ParseError`] naming the character and its line and column.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, one_of, take_until, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    runtime::Runtime,
    span::Span,
    tokens::{Keyword, PositionedToken, Token},
};

/// Diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Offset where the failing token started.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Maps byte offsets to 1-based line and column numbers.
pub(crate) struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Line and column of `offset`; columns count characters.
    pub(crate) fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line.saturating_sub(1)];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        (line, column + 1)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    let escaped: IResult<char> = one_of(['n', 'r', 't', '\\', '"', '/', '\''])
        .map(|c| match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            other => other,
        })
        .parse_next(input);

    match escaped {
        Ok(c) => Ok(c),
        Err(_) => Err(ErrMode::Cut(ContextError::new().add_context(
            input,
            &input.checkpoint(),
            LexerDiagnostic {
                code: ErrorCode::E005,
                message: "invalid escape sequence",
                help: Some("valid escapes: `\\n`, `\\r`, `\\t`, `\\\\`, `\\\"`, `\\/`, `\\'`"),
                start: escape_start,
            },
        ))),
    }
}

/// Parse a double-quoted string literal, resolving escapes.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    '"'.parse_next(input)?;

    let content = repeat(0.., alt((string_escape, none_of(['"', '\\', '\n']))))
        .fold(String::new, |mut acc, c| {
            acc.push(c);
            acc
        });

    cut_err(terminated(content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add a closing `\"` on the same line"),
            start,
        })
        .map(Token::StringLiteral)
        .parse_next(input)
}

/// Parse `//` comments up to the end of the line.
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse `/* ... */` comments; `/** ... */` is kept as documentation.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    "/*".parse_next(input)?;

    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(LexerDiagnostic {
            code: ErrorCode::E003,
            message: "unterminated comment",
            help: Some("close the comment with `*/`"),
            start,
        })
        .map(|body: &'a str| match body.strip_prefix('*') {
            Some(doc) => Token::DocComment(doc),
            None => Token::BlockComment(body),
        })
        .parse_next(input)
}

/// Parse a `/regex/` literal; escapes are kept verbatim.
fn pattern<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();

    '/'.parse_next(input)?;

    let body = repeat::<_, _, (), _, _>(
        0..,
        alt((
            ('\\', none_of(['\n'])).void(),
            none_of(['/', '\\', '\n']).void(),
        )),
    )
    .take();

    cut_err(terminated(body, '/'))
        .context(LexerDiagnostic {
            code: ErrorCode::E004,
            message: "unterminated pattern",
            help: Some("close the pattern with `/` on the same line"),
            start,
        })
        .map(Token::Pattern)
        .parse_next(input)
}

/// Parse integer and decimal literals, optionally negative.
fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    terminated(
        (opt('-'), digit1, opt(('.', digit1))).take(),
        // A number must not run into a word (`3rd`)
        peek(not(one_of(is_word_char))),
    )
    .map(Token::Number)
    .parse_next(input)
}

/// Parse a raw word: letters, digits, `_` and `-`, with dotted segments.
fn word<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_word_char),
        repeat::<_, _, (), _, _>(0.., ('.', take_while(1.., is_word_char))),
    )
        .take()
        .parse_next(input)
}

/// Classify a word against the structural keywords and the vocabulary.
fn classify<'a>(word: &'a str, runtime: &Runtime) -> Token<'a> {
    if let Some(keyword) = Keyword::from_word(word) {
        Token::Keyword(keyword)
    } else if let Some(kind) = runtime.relationship_kind(word) {
        Token::RelationshipKind(kind)
    } else if let Some(kind) = runtime.validation_kind(word) {
        Token::Validation(kind)
    } else if runtime.is_unary_option(word) {
        Token::UnaryOption(word)
    } else if runtime.is_binary_option(word) {
        Token::BinaryOption(word)
    } else {
        Token::Identifier(word)
    }
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ','.value(Token::Comma),
        '='.value(Token::Equals),
        '@'.value(Token::At),
        '*'.value(Token::Star),
    ))
    .parse_next(input)
}

fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token.
fn token<'a>(input: &mut Input<'a>, runtime: &Runtime) -> IResult<Token<'a>> {
    alt((
        line_comment,  // Must come before pattern
        block_comment, // Must come before pattern
        pattern,
        string_literal,
        number,
        word.map(|word| classify(word, runtime)),
        punctuation,
        newline, // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)
}

/// Convert a lexer error into a diagnostic positioned in `source`.
fn convert_error(
    err: ErrMode<ContextError<LexerDiagnostic>>,
    source: &str,
    lines: &LineIndex<'_>,
    token_start: usize,
    error_pos: usize,
) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(LexerDiagnostic {
        code,
        message,
        help,
        start,
    }) = context_error.context().next()
    {
        let (line, column) = lines.position(*start);
        let span = Span::new(*start..error_pos.max(*start + 1));

        let mut diag = Diagnostic::error(format!("{message} at line {line} and column {column}"))
            .with_code(*code)
            .with_label(span, code.description());
        if let Some(help) = help {
            diag = diag.with_help(*help);
        }
        return diag;
    }

    let character = source[token_start..].chars().next().unwrap_or(' ');
    let (line, column) = lines.position(token_start);
    let span = Span::new(token_start..token_start + character.len_utf8());
    Diagnostic::error(format!(
        "unexpected character '{character}' at line {line} and column {column}"
    ))
    .with_code(ErrorCode::E002)
    .with_label(span, ErrorCode::E002.description())
}

/// Tokenize `source` with the vocabulary of `runtime`.
///
/// # Returns
///
/// - `Ok(tokens)` - every token, trivia included, with spans and positions
/// - `Err(ParseError)` - the first lexical error
pub fn tokenize<'a>(
    source: &'a str,
    runtime: &Runtime,
) -> Result<Vec<PositionedToken<'a>>, ParseError> {
    let lines = LineIndex::new(source);
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();

    while !input.is_empty() {
        let start = input.current_token_start();
        match token(&mut input, runtime) {
            Ok(token) => {
                let end = input.current_token_start();
                let (line, column) = lines.position(start);
                tokens.push(PositionedToken::new(
                    token,
                    Span::new(start..end),
                    line,
                    column,
                ));
            }
            Err(err) => {
                let error_pos = input.current_token_start();
                return Err(convert_error(err, source, &lines, start, error_pos).into());
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use jdl_core::{entity::ValidationKind, relationship::RelationshipKind};

    use super::*;

    fn runtime() -> Runtime {
        Runtime::build(None).unwrap()
    }

    fn significant(source: &str) -> Vec<Token<'_>> {
        let runtime = runtime();
        tokenize(source, &runtime)
            .unwrap()
            .into_iter()
            .map(|token| token.token)
            .filter(|token| !token.is_trivia())
            .collect()
    }

    fn single(source: &str) -> Token<'_> {
        let tokens = significant(source);
        assert_eq!(tokens.len(), 1, "expected one token in {source:?}: {tokens:?}");
        tokens.into_iter().next().unwrap()
    }

    #[test]
    fn test_keywords_and_vocabulary() {
        assert_eq!(single("entity"), Token::Keyword(Keyword::Entity));
        assert_eq!(single("except"), Token::Keyword(Keyword::Except));
        assert_eq!(
            single("OneToMany"),
            Token::RelationshipKind(RelationshipKind::OneToMany)
        );
        assert_eq!(single("minlength"), Token::Validation(ValidationKind::MinLength));
        assert_eq!(single("skipClient"), Token::UnaryOption("skipClient"));
        assert_eq!(single("paginate"), Token::BinaryOption("paginate"));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(single("Employee"), Token::Identifier("Employee"));
        assert_eq!(single("_hidden"), Token::Identifier("_hidden"));
        assert_eq!(single("infinite-scroll"), Token::Identifier("infinite-scroll"));
        assert_eq!(
            single("com.mycompany.myapp"),
            Token::Identifier("com.mycompany.myapp")
        );
        // Keywords only match whole words
        assert_eq!(single("entityName"), Token::Identifier("entityName"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(single("42"), Token::Number("42"));
        assert_eq!(single("-3"), Token::Number("-3"));
        assert_eq!(single("2.5"), Token::Number("2.5"));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            single(r#""hello world""#),
            Token::StringLiteral("hello world".to_string())
        );
        assert_eq!(
            single(r#""say \"hi\"\n""#),
            Token::StringLiteral("say \"hi\"\n".to_string())
        );
        assert_eq!(single(r#""""#), Token::StringLiteral(String::new()));
    }

    #[test]
    fn test_patterns_keep_escapes() {
        assert_eq!(single(r"/^[a-z]+$/"), Token::Pattern("^[a-z]+$"));
        assert_eq!(single(r"/a\/b/"), Token::Pattern(r"a\/b"));
    }

    #[test]
    fn test_comments() {
        let runtime = runtime();
        let tokens = tokenize("// note\n/* block */ /** doc */ /**/", &runtime).unwrap();
        let tokens: Vec<Token<'_>> = tokens.into_iter().map(|token| token.token).collect();

        assert_eq!(
            tokens,
            vec![
                Token::LineComment(" note"),
                Token::Newline,
                Token::BlockComment(" block "),
                Token::Whitespace,
                Token::DocComment(" doc "),
                Token::Whitespace,
                Token::BlockComment(""),
            ]
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            significant("{ } ( ) [ ] , = @ *"),
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftParen,
                Token::RightParen,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Comma,
                Token::Equals,
                Token::At,
                Token::Star,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let runtime = runtime();
        let tokens = tokenize("entity A\n  entity B", &runtime).unwrap();
        let words: Vec<(usize, usize)> = tokens
            .iter()
            .filter(|token| !token.is_trivia())
            .map(|token| (token.line, token.column))
            .collect();

        assert_eq!(words, vec![(1, 1), (1, 8), (2, 3), (2, 10)]);
        assert_eq!(tokens[0].span, Span::new(0..6));
    }

    #[test]
    fn test_extension_changes_classification() {
        let definition = crate::runtime::JdlDefinition {
            unary_options: vec!["skipTests".to_string()],
            ..Default::default()
        };
        let runtime = Runtime::build(Some(&definition)).unwrap();
        let tokens = tokenize("skipTests", &runtime).unwrap();
        assert_eq!(tokens[0].token, Token::UnaryOption("skipTests"));

        assert_eq!(single("skipTests"), Token::Identifier("skipTests"));
    }

    #[test]
    fn test_unexpected_character() {
        let runtime = runtime();
        let err = tokenize("entity A {\n  name String ;\n}", &runtime).unwrap_err();

        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E002));
        assert_eq!(
            err.message(),
            "unexpected character ';' at line 2 and column 15"
        );
        assert_eq!(err.diagnostic().primary_span(), Some(Span::new(25..26)));
    }

    #[test]
    fn test_unterminated_constructs() {
        let runtime = runtime();

        let err = tokenize("entity A /** doc", &runtime).unwrap_err();
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E003));

        let err = tokenize("@Ann(\"open", &runtime).unwrap_err();
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E001));
        assert_eq!(
            err.message(),
            "unterminated string literal at line 1 and column 6"
        );

        let err = tokenize("name String pattern(/abc", &runtime).unwrap_err();
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E004));

        let err = tokenize(r#""bad \q escape""#, &runtime).unwrap_err();
        assert_eq!(err.diagnostic().code(), Some(ErrorCode::E005));
    }

    #[test]
    fn test_line_index_handles_multibyte_characters() {
        let lines = LineIndex::new("é = 1\nx");
        assert_eq!(lines.position(0), (1, 1));
        assert_eq!(lines.position(3), (1, 3));
        assert_eq!(lines.position(7), (2, 1));
    }
}
