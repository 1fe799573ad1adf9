//! Parsed-expression evaluator for the technical calculator
//!
//! A small recursive-descent parser over `+ - * / ( )`, numeric literals,
//! named variables and a whitelist of functions. Expressions never reach any
//! dynamic code path: unknown names are errors, and a failed formula is
//! reported as a result-less entry so other formulas keep evaluating.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expression evaluation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    UnexpectedCharacter(char),
    UnexpectedToken(String),
    UnexpectedEnd,
    UnknownVariable(String),
    UnknownFunction(String),
    WrongArity {
        function: String,
        expected: &'static str,
        found: usize,
    },
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::UnexpectedCharacter(c) => write!(f, "unexpected character '{c}'"),
            ExprError::UnexpectedToken(token) => write!(f, "unexpected token '{token}'"),
            ExprError::UnexpectedEnd => write!(f, "unexpected end of expression"),
            ExprError::UnknownVariable(name) => write!(f, "unknown variable '{name}'"),
            ExprError::UnknownFunction(name) => write!(f, "function '{name}' is not allowed"),
            ExprError::WrongArity {
                function,
                expected,
                found,
            } => write!(
                f,
                "function '{function}' expects {expected} argument(s), got {found}"
            ),
        }
    }
}

impl std::error::Error for ExprError {}

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
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

fn tokenize(expression: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| ExprError::UnexpectedToken(literal.clone()))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' {
                        name.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            other => return Err(ExprError::UnexpectedCharacter(other)),
        }
    }

    Ok(tokens)
}

#[derive(Debug, Clone)]
enum Expr {
    Number(f64),
    Variable(String),
    Negate(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Result<Token, ExprError> {
        let token = self.peek().cloned().ok_or(ExprError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        let token = self.advance()?;
        if token == *expected {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken(token.to_string()))
        }
    }

    /// expr := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.term()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Plus => {
                    self.position += 1;
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Token::Minus => {
                    self.position += 1;
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    /// term := unary (('*' | '/') unary)*
    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        while let Some(token) = self.peek() {
            match token {
                Token::Star => {
                    self.position += 1;
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Token::Slash => {
                    self.position += 1;
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    /// unary := '-' unary | primary
    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.peek() == Some(&Token::Minus) {
            self.position += 1;
            return Ok(Expr::Negate(Box::new(self.unary()?)));
        }
        self.primary()
    }

    /// primary := number | ident ('(' args ')')? | '(' expr ')'
    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.advance()? {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LParen) {
                    self.position += 1;
                    let mut args = Vec::new();
                    if self.peek() != Some(&Token::RParen) {
                        loop {
                            args.push(self.expression()?);
                            if self.peek() == Some(&Token::Comma) {
                                self.position += 1;
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(&Token::RParen)?;
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Token::LParen => {
                let inner = self.expression()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            token => Err(ExprError::UnexpectedToken(token.to_string())),
        }
    }
}

fn eval(expr: &Expr, variables: &FxHashMap<String, f64>) -> Result<f64, ExprError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Variable(name) => variables
            .get(name)
            .copied()
            .ok_or_else(|| ExprError::UnknownVariable(name.clone())),
        Expr::Negate(inner) => Ok(-eval(inner, variables)?),
        Expr::Add(lhs, rhs) => Ok(eval(lhs, variables)? + eval(rhs, variables)?),
        Expr::Sub(lhs, rhs) => Ok(eval(lhs, variables)? - eval(rhs, variables)?),
        Expr::Mul(lhs, rhs) => Ok(eval(lhs, variables)? * eval(rhs, variables)?),
        Expr::Div(lhs, rhs) => Ok(eval(lhs, variables)? / eval(rhs, variables)?),
        Expr::Call(name, args) => call(name, args, variables),
    }
}

fn call(
    name: &str,
    args: &[Expr],
    variables: &FxHashMap<String, f64>,
) -> Result<f64, ExprError> {
    let values: Vec<f64> = args
        .iter()
        .map(|arg| eval(arg, variables))
        .collect::<Result<_, _>>()?;

    let arity = |expected: &'static str| ExprError::WrongArity {
        function: name.to_string(),
        expected,
        found: values.len(),
    };

    match name {
        "abs" | "round" | "sqrt" | "floor" | "ceil" => {
            let [value] = values.as_slice() else {
                return Err(arity("1"));
            };
            Ok(match name {
                "abs" => value.abs(),
                "round" => value.round(),
                "sqrt" => value.sqrt(),
                "floor" => value.floor(),
                _ => value.ceil(),
            })
        }
        "pow" => {
            let [base, exponent] = values.as_slice() else {
                return Err(arity("2"));
            };
            Ok(base.powf(*exponent))
        }
        "min" | "max" => {
            if values.is_empty() {
                return Err(arity("at least 1"));
            }
            let folded = if name == "min" {
                values.iter().copied().fold(f64::INFINITY, f64::min)
            } else {
                values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            };
            Ok(folded)
        }
        _ => Err(ExprError::UnknownFunction(name.to_string())),
    }
}

/// Evaluate an expression against a variable dictionary
///
/// # Errors
/// Returns an [`ExprError`] on malformed input, unknown variables, or
/// disallowed functions.
pub fn evaluate(expression: &str, variables: &FxHashMap<String, f64>) -> Result<f64, ExprError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let ast = parser.expression()?;
    if let Some(extra) = parser.peek() {
        return Err(ExprError::UnexpectedToken(extra.to_string()));
    }
    eval(&ast, variables)
}

/// Display entry for one user-defined formula
///
/// A failed evaluation leaves `result` empty and explains itself in the
/// description; other formulas are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaResult {
    pub name: String,
    pub result: Option<f64>,
    pub description: String,
}

/// Evaluate a named formula into a display entry
pub fn evaluate_formula(
    name: &str,
    expression: &str,
    variables: &FxHashMap<String, f64>,
) -> FormulaResult {
    match evaluate(expression, variables) {
        Ok(value) => FormulaResult {
            name: name.to_string(),
            result: Some(value),
            description: format!("{name}: {expression} = {value:.2}"),
        },
        Err(error) => FormulaResult {
            name: name.to_string(),
            result: None,
            description: format!("{name}: evaluation failed ({error})"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, f64)]) -> FxHashMap<String, f64> {
        pairs
            .iter()
            .map(|&(name, value)| (name.to_string(), value))
            .collect()
    }

    #[test]
    fn test_precedence_and_parentheses() {
        let empty = FxHashMap::default();
        assert_eq!(evaluate("2 + 3 * 4", &empty).unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4", &empty).unwrap(), 20.0);
        assert_eq!(evaluate("10 / 4", &empty).unwrap(), 2.5);
    }

    #[test]
    fn test_unary_minus() {
        let empty = FxHashMap::default();
        assert_eq!(evaluate("-3 + 5", &empty).unwrap(), 2.0);
        assert_eq!(evaluate("2 * -4", &empty).unwrap(), -8.0);
        assert_eq!(evaluate("--2", &empty).unwrap(), 2.0);
    }

    #[test]
    fn test_variables() {
        let variables = vars(&[("flow", 27900.0), ("factor", 0.00275)]);
        let result = evaluate("flow * 365 * factor", &variables).unwrap();
        assert!((result - 28004.625).abs() < 1e-6);
    }

    #[test]
    fn test_whitelisted_functions() {
        let variables = vars(&[("a", -4.0), ("b", 9.0)]);
        assert_eq!(evaluate("abs(a)", &variables).unwrap(), 4.0);
        assert_eq!(evaluate("sqrt(b)", &variables).unwrap(), 3.0);
        assert_eq!(evaluate("pow(2, 10)", &variables).unwrap(), 1024.0);
        assert_eq!(evaluate("min(3, 1, 2)", &variables).unwrap(), 1.0);
        assert_eq!(evaluate("max(3, 1, 2)", &variables).unwrap(), 3.0);
        assert_eq!(evaluate("floor(2.9) + ceil(0.1)", &variables).unwrap(), 3.0);
        assert_eq!(evaluate("round(2.5)", &variables).unwrap(), 3.0);
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let empty = FxHashMap::default();
        assert!(matches!(
            evaluate("bogus + 1", &empty),
            Err(ExprError::UnknownVariable(_))
        ));
        assert!(matches!(
            evaluate("system(1)", &empty),
            Err(ExprError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_arity_errors() {
        let empty = FxHashMap::default();
        assert!(matches!(
            evaluate("sqrt(1, 2)", &empty),
            Err(ExprError::WrongArity { .. })
        ));
        assert!(matches!(
            evaluate("pow(2)", &empty),
            Err(ExprError::WrongArity { .. })
        ));
    }

    #[test]
    fn test_malformed_expressions() {
        let empty = FxHashMap::default();
        assert!(evaluate("2 +", &empty).is_err());
        assert!(evaluate("(1 + 2", &empty).is_err());
        assert!(evaluate("1 2", &empty).is_err());
        assert!(evaluate("#", &empty).is_err());
    }

    #[test]
    fn test_formula_errors_are_scoped() {
        let variables = vars(&[("x", 2.0)]);
        let good = evaluate_formula("double", "x * 2", &variables);
        assert_eq!(good.result, Some(4.0));
        assert!(good.description.contains("= 4.00"));

        let bad = evaluate_formula("broken", "y * 2", &variables);
        assert_eq!(bad.result, None);
        assert!(bad.description.contains("evaluation failed"));
    }
}
