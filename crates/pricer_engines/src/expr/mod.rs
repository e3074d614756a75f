//! Expression language for custom payoff formulas.
//!
//! User-supplied payoff formulas are parsed into a closed AST and
//! interpreted against the simulated price path. Nothing is ever handed to
//! the host language for execution; the capability set is exactly what the
//! grammar admits:
//!
//! - numeric literals, `+ - * /`, unary minus, parentheses
//! - the `path` variable (the simulated price series)
//! - indexing with Python-style negative offsets: `path[0]`, `path[-1]`
//! - series functions: `sum`, `len`, `mean`, and `max`/`min` over a series
//! - scalar functions: `max`/`min` over two or more arguments, `abs`,
//!   `sqrt`, `exp`, `ln`
//!
//! Example formulas:
//!
//! ```text
//! max(path[-1] - 100, 0)        vanilla call
//! max(mean(path) - 100, 0)      Asian-style average call
//! max(max(path) - 110, 0)       lookback-style call
//! ```

use std::fmt;

use thiserror::Error;

/// Errors from parsing or evaluating a formula.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExprError {
    /// A character the tokenizer does not recognise.
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter {
        /// Byte offset into the source
        position: usize,
        /// The offending character
        found: char,
    },

    /// A malformed numeric literal.
    #[error("Invalid number at position {position}")]
    InvalidNumber {
        /// Byte offset into the source
        position: usize,
    },

    /// The parser expected something else at this position.
    #[error("Expected {expected} at position {position}")]
    UnexpectedToken {
        /// Byte offset into the source
        position: usize,
        /// What the parser was looking for
        expected: &'static str,
    },

    /// The expression ended before the parse was complete.
    #[error("Unexpected end of formula")]
    UnexpectedEnd,

    /// An identifier that is neither `path` nor a known function.
    #[error("Unknown identifier '{name}'")]
    UnknownIdentifier {
        /// The unrecognised name
        name: String,
    },

    /// A function called with the wrong number of arguments.
    #[error("Function '{function}' expects {expected}, got {got} argument(s)")]
    WrongArity {
        /// Function name
        function: &'static str,
        /// Human-readable description of the expected arity
        expected: &'static str,
        /// Number of arguments supplied
        got: usize,
    },

    /// A scalar was used where a series was required, or vice versa.
    #[error("Type mismatch: {message}")]
    TypeMismatch {
        /// What went wrong
        message: String,
    },

    /// A path index outside the simulated series.
    #[error("Path index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The resolved index (before negative wrapping)
        index: i64,
        /// Length of the series
        len: usize,
    },

    /// A fractional value used as an index.
    #[error("Path index must be an integer, got {value}")]
    NonIntegerIndex {
        /// The offending index value
        value: f64,
    },
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Function {
    Max,
    Min,
    Sum,
    Len,
    Mean,
    Abs,
    Sqrt,
    Exp,
    Ln,
}

impl Function {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "max" => Some(Function::Max),
            "min" => Some(Function::Min),
            "sum" => Some(Function::Sum),
            "len" => Some(Function::Len),
            "mean" => Some(Function::Mean),
            "abs" => Some(Function::Abs),
            "sqrt" => Some(Function::Sqrt),
            "exp" => Some(Function::Exp),
            "ln" => Some(Function::Ln),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Function::Max => "max",
            Function::Min => "min",
            Function::Sum => "sum",
            Function::Len => "len",
            Function::Mean => "mean",
            Function::Abs => "abs",
            Function::Sqrt => "sqrt",
            Function::Exp => "exp",
            Function::Ln => "ln",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// AST node.
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Path,
    Neg(Box<Node>),
    Binary {
        op: BinaryOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Index {
        base: Box<Node>,
        index: Box<Node>,
    },
    Call {
        function: Function,
        args: Vec<Node>,
    },
}

/// An evaluated value: a scalar or the (borrowed) price series.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value<'a> {
    Scalar(f64),
    Series(&'a [f64]),
}

impl Value<'_> {
    fn as_scalar(&self, context: &str) -> Result<f64, ExprError> {
        match self {
            Value::Scalar(x) => Ok(*x),
            Value::Series(_) => Err(ExprError::TypeMismatch {
                message: format!("{} requires a scalar, got a series", context),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let mut tokens = Vec::new();
    let bytes = source.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                i += 1;
            }
            '+' => {
                tokens.push((Token::Plus, i));
                i += 1;
            }
            '-' => {
                tokens.push((Token::Minus, i));
                i += 1;
            }
            '*' => {
                tokens.push((Token::Star, i));
                i += 1;
            }
            '/' => {
                tokens.push((Token::Slash, i));
                i += 1;
            }
            '(' => {
                tokens.push((Token::LParen, i));
                i += 1;
            }
            ')' => {
                tokens.push((Token::RParen, i));
                i += 1;
            }
            '[' => {
                tokens.push((Token::LBracket, i));
                i += 1;
            }
            ']' => {
                tokens.push((Token::RBracket, i));
                i += 1;
            }
            ',' => {
                tokens.push((Token::Comma, i));
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i] as char, '0'..='9' | '.' | 'e' | 'E') {
                    // Permit a sign immediately after an exponent marker.
                    if matches!(bytes[i] as char, 'e' | 'E')
                        && i + 1 < bytes.len()
                        && matches!(bytes[i + 1] as char, '+' | '-')
                    {
                        i += 1;
                    }
                    i += 1;
                }
                let literal = &source[start..i];
                let value: f64 = literal
                    .parse()
                    .map_err(|_| ExprError::InvalidNumber { position: start })?;
                tokens.push((Token::Number(value), start));
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let start = i;
                while i < bytes.len()
                    && matches!(bytes[i] as char, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_')
                {
                    i += 1;
                }
                tokens.push((Token::Ident(source[start..i].to_string()), start));
            }
            other => {
                return Err(ExprError::UnexpectedCharacter {
                    position: i,
                    found: other,
                });
            }
        }
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser (recursive descent)
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(t, _)| t)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map(|(_, p)| *p)
            .unwrap_or(usize::MAX)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).map(|(t, _)| t.clone());
        self.cursor += 1;
        token
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), ExprError> {
        match self.peek() {
            Some(t) if *t == token => {
                self.cursor += 1;
                Ok(())
            }
            Some(_) => Err(ExprError::UnexpectedToken {
                position: self.position(),
                expected,
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    /// additive := multiplicative (('+' | '-') multiplicative)*
    fn parse_additive(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.cursor += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = Node::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    /// multiplicative := unary (('*' | '/') unary)*
    fn parse_multiplicative(&mut self) -> Result<Node, ExprError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.cursor += 1;
            let rhs = self.parse_unary()?;
            lhs = Node::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    /// unary := '-' unary | postfix
    fn parse_unary(&mut self) -> Result<Node, ExprError> {
        if matches!(self.peek(), Some(Token::Minus)) {
            self.cursor += 1;
            let inner = self.parse_unary()?;
            return Ok(Node::Neg(Box::new(inner)));
        }
        self.parse_postfix()
    }

    /// postfix := primary ('[' additive ']')*
    fn parse_postfix(&mut self) -> Result<Node, ExprError> {
        let mut node = self.parse_primary()?;
        while matches!(self.peek(), Some(Token::LBracket)) {
            self.cursor += 1;
            let index = self.parse_additive()?;
            self.expect(Token::RBracket, "']'")?;
            node = Node::Index {
                base: Box::new(node),
                index: Box::new(index),
            };
        }
        Ok(node)
    }

    /// primary := number | 'path' | function '(' args ')' | '(' additive ')'
    fn parse_primary(&mut self) -> Result<Node, ExprError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Number(value)) => Ok(Node::Number(value)),
            Some(Token::LParen) => {
                let inner = self.parse_additive()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if matches!(self.peek(), Some(Token::LParen)) {
                    let function = Function::from_name(&name)
                        .ok_or(ExprError::UnknownIdentifier { name: name.clone() })?;
                    self.cursor += 1;
                    let mut args = Vec::new();
                    if !matches!(self.peek(), Some(Token::RParen)) {
                        loop {
                            args.push(self.parse_additive()?);
                            match self.peek() {
                                Some(Token::Comma) => {
                                    self.cursor += 1;
                                }
                                _ => break,
                            }
                        }
                    }
                    self.expect(Token::RParen, "')'")?;
                    Ok(Node::Call { function, args })
                } else if name == "path" {
                    Ok(Node::Path)
                } else {
                    Err(ExprError::UnknownIdentifier { name })
                }
            }
            Some(_) => Err(ExprError::UnexpectedToken {
                position,
                expected: "a number, 'path', a function call or '('",
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl Node {
    fn eval<'a>(&self, path: &'a [f64]) -> Result<Value<'a>, ExprError> {
        match self {
            Node::Number(value) => Ok(Value::Scalar(*value)),
            Node::Path => Ok(Value::Series(path)),
            Node::Neg(inner) => {
                let x = inner.eval(path)?.as_scalar("unary minus")?;
                Ok(Value::Scalar(-x))
            }
            Node::Binary { op, lhs, rhs } => {
                let a = lhs.eval(path)?.as_scalar("arithmetic")?;
                let b = rhs.eval(path)?.as_scalar("arithmetic")?;
                let result = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::Div => a / b,
                };
                Ok(Value::Scalar(result))
            }
            Node::Index { base, index } => {
                let series = match base.eval(path)? {
                    Value::Series(s) => s,
                    Value::Scalar(_) => {
                        return Err(ExprError::TypeMismatch {
                            message: "indexing requires a series".to_string(),
                        })
                    }
                };
                let raw = index.eval(path)?.as_scalar("an index")?;
                if raw.fract() != 0.0 || !raw.is_finite() {
                    return Err(ExprError::NonIntegerIndex { value: raw });
                }
                let idx = raw as i64;
                let len = series.len() as i64;
                let resolved = if idx < 0 { len + idx } else { idx };
                if resolved < 0 || resolved >= len {
                    return Err(ExprError::IndexOutOfBounds {
                        index: idx,
                        len: series.len(),
                    });
                }
                Ok(Value::Scalar(series[resolved as usize]))
            }
            Node::Call { function, args } => eval_call(*function, args, path),
        }
    }
}

fn eval_call<'a>(
    function: Function,
    args: &[Node],
    path: &'a [f64],
) -> Result<Value<'a>, ExprError> {
    match function {
        Function::Max | Function::Min => {
            let is_max = function == Function::Max;
            if args.len() == 1 {
                // Single-argument form reduces over a series.
                match args[0].eval(path)? {
                    Value::Series(series) => {
                        let reduced = series
                            .iter()
                            .copied()
                            .reduce(|a, b| if is_max { a.max(b) } else { a.min(b) })
                            .ok_or_else(|| ExprError::TypeMismatch {
                                message: format!("{}() over an empty series", function.name()),
                            })?;
                        Ok(Value::Scalar(reduced))
                    }
                    Value::Scalar(_) => Err(ExprError::WrongArity {
                        function: function.name(),
                        expected: "a series or at least two scalars",
                        got: 1,
                    }),
                }
            } else if args.len() >= 2 {
                let mut acc = args[0].eval(path)?.as_scalar(function.name())?;
                for arg in &args[1..] {
                    let x = arg.eval(path)?.as_scalar(function.name())?;
                    acc = if is_max { acc.max(x) } else { acc.min(x) };
                }
                Ok(Value::Scalar(acc))
            } else {
                Err(ExprError::WrongArity {
                    function: function.name(),
                    expected: "a series or at least two scalars",
                    got: args.len(),
                })
            }
        }
        Function::Sum | Function::Len | Function::Mean => {
            if args.len() != 1 {
                return Err(ExprError::WrongArity {
                    function: function.name(),
                    expected: "exactly one series",
                    got: args.len(),
                });
            }
            let series = match args[0].eval(path)? {
                Value::Series(s) => s,
                Value::Scalar(_) => {
                    return Err(ExprError::TypeMismatch {
                        message: format!("{}() requires a series", function.name()),
                    })
                }
            };
            let result = match function {
                Function::Sum => series.iter().sum(),
                Function::Len => series.len() as f64,
                Function::Mean => {
                    if series.is_empty() {
                        return Err(ExprError::TypeMismatch {
                            message: "mean() over an empty series".to_string(),
                        });
                    }
                    series.iter().sum::<f64>() / series.len() as f64
                }
                _ => unreachable!(),
            };
            Ok(Value::Scalar(result))
        }
        Function::Abs | Function::Sqrt | Function::Exp | Function::Ln => {
            if args.len() != 1 {
                return Err(ExprError::WrongArity {
                    function: function.name(),
                    expected: "exactly one scalar",
                    got: args.len(),
                });
            }
            let x = args[0].eval(path)?.as_scalar(function.name())?;
            let result = match function {
                Function::Abs => x.abs(),
                Function::Sqrt => x.sqrt(),
                Function::Exp => x.exp(),
                Function::Ln => x.ln(),
                _ => unreachable!(),
            };
            Ok(Value::Scalar(result))
        }
    }
}

/// A parsed payoff formula.
///
/// Parsing happens once; evaluation borrows the price path and allocates
/// nothing. Evaluation is deterministic and side-effect free, so the same
/// path always yields the same value.
///
/// # Examples
///
/// ```
/// use pricer_engines::expr::Expr;
///
/// let expr = Expr::parse("max(mean(path) - 100, 0)").unwrap();
/// let path = [100.0, 105.0, 110.0];
/// assert_eq!(expr.evaluate(&path).unwrap(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    root: Node,
}

impl Expr {
    /// Parses a formula into an AST.
    ///
    /// # Errors
    ///
    /// Returns an `ExprError` describing the first syntax problem, with
    /// the byte offset into the source where applicable.
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExprError::UnexpectedEnd);
        }
        let mut parser = Parser { tokens, cursor: 0 };
        let root = parser.parse_additive()?;
        if parser.cursor != parser.tokens.len() {
            return Err(ExprError::UnexpectedToken {
                position: parser.position(),
                expected: "end of formula",
            });
        }
        Ok(Self { root })
    }

    /// Evaluates the formula against a price path, producing a scalar.
    ///
    /// # Errors
    ///
    /// Returns an `ExprError` for type mismatches, bad indices, wrong
    /// function arity, or a formula whose result is the series itself.
    pub fn evaluate(&self, path: &[f64]) -> Result<f64, ExprError> {
        self.root.eval(path)?.as_scalar("the formula result")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(value) => write!(f, "{}", value),
            Node::Path => write!(f, "path"),
            Node::Neg(inner) => write!(f, "-{}", inner),
            Node::Binary { op, lhs, rhs } => {
                let symbol = match op {
                    BinaryOp::Add => "+",
                    BinaryOp::Sub => "-",
                    BinaryOp::Mul => "*",
                    BinaryOp::Div => "/",
                };
                write!(f, "({} {} {})", lhs, symbol, rhs)
            }
            Node::Index { base, index } => write!(f, "{}[{}]", base, index),
            Node::Call { function, args } => {
                write!(f, "{}(", function.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
