use std::fmt;

use jdl_core::{entity::ValidationKind, relationship::RelationshipKind};
use winnow::stream::Location;

use crate::span::Span;

/// Structural keywords of the JDL grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Application,
    Config,
    Entities,
    Except,
    Entity,
    Enum,
    Relationship,
    Deployment,
    Use,
    For,
    To,
    With,
}

impl Keyword {
    pub const ALL: [Keyword; 12] = [
        Self::Application,
        Self::Config,
        Self::Entities,
        Self::Except,
        Self::Entity,
        Self::Enum,
        Self::Relationship,
        Self::Deployment,
        Self::Use,
        Self::For,
        Self::To,
        Self::With,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Config => "config",
            Self::Entities => "entities",
            Self::Except => "except",
            Self::Entity => "entity",
            Self::Enum => "enum",
            Self::Relationship => "relationship",
            Self::Deployment => "deployment",
            Self::Use => "use",
            Self::For => "for",
            Self::To => "to",
            Self::With => "with",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|keyword| keyword.as_str() == word)
    }
}

/// Token types for the JDL language
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    Keyword(Keyword),
    RelationshipKind(RelationshipKind),
    Validation(ValidationKind),
    /// A unary option name from the resolved vocabulary (`skipClient`).
    UnaryOption(&'src str),
    /// A binary option name from the resolved vocabulary (`dto`).
    BinaryOption(&'src str),

    // Literals
    Identifier(&'src str),
    /// Numeric literal, kept verbatim.
    Number(&'src str),
    StringLiteral(String),
    /// Regular expression between slashes, escapes untouched.
    Pattern(&'src str),

    // Punctuation
    LeftBrace,    // {
    RightBrace,   // }
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Equals,       // =
    At,           // @
    Star,         // *

    // Comments
    /// `/** ... */`, kept as documentation for the next declaration.
    DocComment(&'src str),
    LineComment(&'src str),
    BlockComment(&'src str),

    // Whitespace
    Whitespace,
    Newline,
}

impl<'src> Token<'src> {
    /// The word this token was lexed from, for tokens usable as names.
    ///
    /// Keywords and vocabulary tokens are valid entity, field and option
    /// names wherever the grammar expects a name.
    pub fn word(&self) -> Option<&'src str> {
        match self {
            Token::Keyword(keyword) => Some(keyword.as_str()),
            Token::RelationshipKind(kind) => Some(kind.as_jdl()),
            Token::Validation(kind) => Some(kind.as_str()),
            Token::UnaryOption(word) | Token::BinaryOption(word) | Token::Identifier(word) => {
                Some(word)
            }
            _ => None,
        }
    }

    /// Whitespace and non-documentation comments.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment(_) | Token::BlockComment(_)
        )
    }
}

/// A token with its byte span and 1-based line and column.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, line: usize, column: usize) -> Self {
        Self {
            token,
            span,
            line,
            column,
        }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl Location for PositionedToken<'_> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(keyword) => write!(f, "{}", keyword.as_str()),
            Token::RelationshipKind(kind) => write!(f, "{}", kind.as_jdl()),
            Token::Validation(kind) => write!(f, "{}", kind.as_str()),
            Token::UnaryOption(name) | Token::BinaryOption(name) | Token::Identifier(name) => {
                write!(f, "{name}")
            }
            Token::Number(raw) => write!(f, "{raw}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Pattern(pattern) => write!(f, "/{pattern}/"),

            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Comma => write!(f, ","),
            Token::Equals => write!(f, "="),
            Token::At => write!(f, "@"),
            Token::Star => write!(f, "*"),

            Token::DocComment(comment) => write!(f, "/**{comment}*/"),
            Token::LineComment(comment) => write!(f, "//{comment}"),
            Token::BlockComment(comment) => write!(f, "/*{comment}*/"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
