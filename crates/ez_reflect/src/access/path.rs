//! Provide the member-path mini-language.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use ez_utils::vec::FastVec;

// -----------------------------------------------------------------------------
// ParseError

/// An interface for representing path parsing error information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<'a> {
    /// Position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: &'a str,
    /// The underlying error.
    pub error: Cow<'a, str>,
}

impl fmt::Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError<'_> {}

// -----------------------------------------------------------------------------
// Path model

/// A literal argument of a method call segment.
///
/// Literals are converted to the parameter types of the method when the
/// accessor is built.
#[derive(Debug, Clone, PartialEq)]
pub enum PathArg {
    /// `42`, `-7`
    Int(i128),
    /// `1.5`, `-2e3`
    Float(f64),
    /// `true`, `false`
    Bool(bool),
    /// `'c'`
    Char(char),
    /// `"text"`, supporting `\"`, `\\`, `\n`, `\t` escapes.
    Str(String),
}

/// One `name` or `name(args)` segment of a [`MemberPath`].
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    /// Member or method name.
    pub name: &'a str,
    /// Position of `name` in the full path.
    pub offset: usize,
    /// `Some` for method calls, even without arguments.
    pub call: Option<Box<[PathArg]>>,
}

impl Segment<'_> {
    #[inline]
    pub const fn is_call(&self) -> bool {
        self.call.is_some()
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if let Some(args) = &self.call {
            f.write_str("(")?;
            for (index, arg) in args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                match arg {
                    PathArg::Int(v) => write!(f, "{v}")?,
                    PathArg::Float(v) => write!(f, "{v:?}")?,
                    PathArg::Bool(v) => write!(f, "{v}")?,
                    PathArg::Char(v) => write!(f, "{v:?}")?,
                    PathArg::Str(v) => write!(f, "{v:?}")?,
                }
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A parsed member path.
///
/// # Syntax
///
/// ```text
/// path    := [ "-t:" TypeName "-p:" ] segment ( "." segment )*
/// segment := ident [ "(" [ arg ( "," arg )* ] ")" ]
/// arg     := integer | float | "true" | "false" | 'c' | "string"
/// ```
///
/// `-t:` selects a static root type, looked up in the type registry by full
/// path or short name. Without it the path starts at an instance.
///
/// # Examples
///
/// ```
/// use ez_reflect::access::{MemberPath, PathArg};
///
/// let path = MemberPath::parse("stats.damage(2, \"fire\")").unwrap();
/// assert_eq!(path.root(), None);
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.segments()[0].name, "stats");
///
/// let args = path.segments()[1].call.as_deref().unwrap();
/// assert_eq!(args, [PathArg::Int(2), PathArg::Str("fire".into())]);
///
/// let path = MemberPath::parse("-t:Config -p:instance.name").unwrap();
/// assert_eq!(path.root(), Some("Config"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MemberPath<'a> {
    source: &'a str,
    root: Option<&'a str>,
    segments: Box<[Segment<'a>]>,
}

impl<'a> MemberPath<'a> {
    /// Parses `source`.
    pub fn parse(source: &'a str) -> Result<Self, ParseError<'a>> {
        let mut parser = Parser { source, pos: 0 };
        parser.skip_ws();

        let mut root = None;
        if parser.rest().starts_with("-t:") {
            parser.pos += 3;
            let start = parser.pos;
            let Some(end) = parser.rest().find("-p:") else {
                return Err(parser.error(start, "expected `-p:` after the static root type"));
            };
            let name = source[start..start + end].trim();
            if name.is_empty() {
                return Err(parser.error(start, "expected a type name after `-t:`"));
            }
            root = Some(name);
            parser.pos = start + end + 3;
            parser.skip_ws();
        }

        let mut vec: FastVec<Segment<'a>, 8> = FastVec::new();
        let data = vec.get();

        loop {
            data.push(parser.segment()?);
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some('.') => {
                    parser.pos += 1;
                    parser.skip_ws();
                }
                Some(c) => {
                    return Err(parser.error(parser.pos, format!("unexpected character `{c}`")));
                }
            }
        }

        Ok(Self {
            source,
            root,
            segments: vec.into_boxed_slice(),
        })
    }

    /// Returns the full source string.
    #[inline]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the static root type name given with `-t:`.
    #[inline]
    pub const fn root(&self) -> Option<&'a str> {
        self.root
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Returns the number of segments, never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns the last segment.
    pub fn terminal(&self) -> &Segment<'a> {
        // `parse` pushes at least one segment.
        &self.segments[self.segments.len() - 1]
    }
}

impl fmt::Display for MemberPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = self.root {
            write!(f, "-t:{root} -p:")?;
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Parser

struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    #[inline]
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, offset: usize, message: impl Into<Cow<'a, str>>) -> ParseError<'a> {
        ParseError {
            offset,
            path: self.source,
            error: message.into(),
        }
    }

    fn ident(&mut self) -> Result<&'a str, ParseError<'a>> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c == '_' || c.is_alphabetic() => {}
            Some(c) => return Err(self.error(start, format!("expected a member name, found `{c}`"))),
            None => return Err(self.error(start, "expected a member name")),
        }
        while self.peek().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
            self.bump();
        }
        Ok(&self.source[start..self.pos])
    }

    fn segment(&mut self) -> Result<Segment<'a>, ParseError<'a>> {
        let offset = self.pos;
        let name = self.ident()?;
        self.skip_ws();
        if self.peek() != Some('(') {
            return Ok(Segment { name, offset, call: None });
        }
        self.pos += 1;

        let mut args: FastVec<PathArg, 4> = FastVec::new();
        let data = args.get();

        self.skip_ws();
        if self.peek() == Some(')') {
            self.pos += 1;
        } else {
            loop {
                self.skip_ws();
                data.push(self.arg()?);
                self.skip_ws();
                match self.bump() {
                    Some(',') => continue,
                    Some(')') => break,
                    Some(c) => {
                        return Err(self.error(self.pos - c.len_utf8(), "expected `,` or `)`"));
                    }
                    None => return Err(self.error(self.pos, "unclosed argument list")),
                }
            }
        }

        Ok(Segment {
            name,
            offset,
            call: Some(args.into_boxed_slice()),
        })
    }

    fn arg(&mut self) -> Result<PathArg, ParseError<'a>> {
        let start = self.pos;
        match self.peek() {
            Some('"') => self.string().map(PathArg::Str),
            Some('\'') => self.char(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => match self.ident()? {
                "true" => Ok(PathArg::Bool(true)),
                "false" => Ok(PathArg::Bool(false)),
                other => Err(self.error(start, format!("unknown literal `{other}`"))),
            },
            Some(c) => Err(self.error(start, format!("expected a literal, found `{c}`"))),
            None => Err(self.error(start, "expected a literal")),
        }
    }

    fn escaped(&mut self) -> Result<char, ParseError<'a>> {
        let start = self.pos;
        match self.bump() {
            Some('\\') => match self.bump() {
                Some('n') => Ok('\n'),
                Some('t') => Ok('\t'),
                Some('r') => Ok('\r'),
                Some('0') => Ok('\0'),
                Some(c @ ('\\' | '"' | '\'')) => Ok(c),
                _ => Err(self.error(start, "invalid escape sequence")),
            },
            Some(c) => Ok(c),
            None => Err(self.error(start, "unterminated literal")),
        }
    }

    fn string(&mut self) -> Result<String, ParseError<'a>> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            if self.peek() == Some('"') {
                self.pos += 1;
                return Ok(out);
            }
            out.push(self.escaped()?);
        }
    }

    fn char(&mut self) -> Result<PathArg, ParseError<'a>> {
        let start = self.pos;
        self.pos += 1;
        if self.peek() == Some('\'') {
            return Err(self.error(start, "empty character literal"));
        }
        let c = self.escaped()?;
        if self.bump() != Some('\'') {
            return Err(self.error(start, "unterminated character literal"));
        }
        Ok(PathArg::Char(c))
    }

    fn number(&mut self) -> Result<PathArg, ParseError<'a>> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' | 'e' | 'E' => is_float = true,
                '+' | '-' if is_float => {}
                _ => break,
            }
            self.pos += 1;
        }

        let text: String = self.source[start..self.pos].chars().filter(|c| *c != '_').collect();
        let parsed = if is_float {
            text.parse::<f64>().ok().map(PathArg::Float)
        } else {
            text.parse::<i128>().ok().map(PathArg::Int)
        };
        parsed.ok_or_else(|| self.error(start, format!("invalid number `{text}`")))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{MemberPath, PathArg};

    #[test]
    fn plain_segments() {
        let path = MemberPath::parse("a.b_2 . c").unwrap();
        let names = path.segments().iter().map(|s| s.name).collect::<alloc::vec::Vec<_>>();
        assert_eq!(names, ["a", "b_2", "c"]);
        assert!(path.segments().iter().all(|s| !s.is_call()));
        assert_eq!(path.segments()[1].offset, 2);
    }

    #[test]
    fn call_arguments() {
        let path = MemberPath::parse(r#"go(-3, 2.5, true, 'x', "a\"b", 1e2)"#).unwrap();
        let args = path.terminal().call.as_deref().unwrap();
        assert_eq!(
            args,
            [
                PathArg::Int(-3),
                PathArg::Float(2.5),
                PathArg::Bool(true),
                PathArg::Char('x'),
                PathArg::Str("a\"b".into()),
                PathArg::Float(100.0),
            ]
        );

        let path = MemberPath::parse("reset()").unwrap();
        assert_eq!(path.terminal().call.as_deref(), Some(&[][..]));
    }

    #[test]
    fn static_root() {
        let path = MemberPath::parse("-t:game::Settings -p:Instance.Volume").unwrap();
        assert_eq!(path.root(), Some("game::Settings"));
        assert_eq!(path.len(), 2);
        assert_eq!(path.to_string(), "-t:game::Settings -p:Instance.Volume");
    }

    #[test]
    fn parse_errors() {
        let err = MemberPath::parse("a..b").unwrap_err();
        assert_eq!(err.offset, 2);

        let err = MemberPath::parse("a(1").unwrap_err();
        assert!(err.error.contains("unclosed"));

        let err = MemberPath::parse("-t:Foo a").unwrap_err();
        assert!(err.error.contains("-p:"));

        assert!(MemberPath::parse("").is_err());
        assert!(MemberPath::parse("1abc").is_err());
        assert!(MemberPath::parse("f(nope)").is_err());
        assert!(MemberPath::parse("f(\"open)").is_err());
    }
}
