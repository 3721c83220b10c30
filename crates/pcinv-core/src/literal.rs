//! Python literal values
//!
//! `group_variables` in `prism_central.ini` is written as a Python mapping,
//! e.g. `{'ansible_user': 'root', 'ansible_become': True}`. The grammar in
//! `literal.pest` covers the literal subset such files use; the result is a
//! JSON value.

use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest_derive::Parser;
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Parser)]
#[grammar = "literal.pest"]
struct LiteralGrammar;

/// A literal that could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at line {line}, column {column}")]
pub struct LiteralError {
    pub line: usize,
    pub column: usize,
    pub reason: String,
}

impl LiteralError {
    fn at(pair: &Pair<'_, Rule>, reason: impl Into<String>) -> Self {
        let (line, column) = pair.line_col();
        Self {
            line,
            column,
            reason: reason.into(),
        }
    }
}

/// Parse one Python literal into a JSON value
///
/// Dicts, lists, tuples, quoted strings, integers, floats and
/// `True`/`False`/`None` are understood. Tuples become arrays and dict keys
/// must be strings or numbers.
///
/// # Errors
/// Returns the position and reason of the first malformed or unsupported
/// token.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let mut pairs = LiteralGrammar::parse(Rule::literal, input).map_err(|e| {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(pos) | LineColLocation::Span(pos, _) => pos,
        };
        LiteralError {
            line,
            column,
            reason: e.variant.message().into_owned(),
        }
    })?;

    match pairs.next().and_then(|literal| literal.into_inner().next()) {
        Some(value) => to_value(value),
        None => Err(LiteralError {
            line: 1,
            column: 1,
            reason: "empty literal".to_string(),
        }),
    }
}

fn to_value(pair: Pair<'_, Rule>) -> Result<Value, LiteralError> {
    match pair.as_rule() {
        Rule::dict => dict(pair),
        Rule::list => pair
            .into_inner()
            .map(to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Rule::tuple => tuple(pair),
        Rule::string => string(&pair).map(Value::String),
        Rule::number => number(&pair),
        Rule::boolean => Ok(Value::Bool(matches!(pair.as_str(), "True" | "true"))),
        Rule::none => Ok(Value::Null),
        other => Err(LiteralError::at(&pair, format!("unexpected {other:?}"))),
    }
}

fn dict(pair: Pair<'_, Rule>) -> Result<Value, LiteralError> {
    let mut map = Map::new();
    for entry in pair.into_inner() {
        let mut parts = entry.clone().into_inner();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            return Err(LiteralError::at(&entry, "malformed mapping entry"));
        };
        let key = match to_value(key.clone())? {
            Value::String(key) => key,
            Value::Number(key) => key.to_string(),
            _ => {
                return Err(LiteralError::at(
                    &key,
                    "mapping keys must be strings or numbers",
                ));
            }
        };
        map.insert(key, to_value(value)?);
    }
    Ok(Value::Object(map))
}

fn tuple(pair: Pair<'_, Rule>) -> Result<Value, LiteralError> {
    let mut trailing_comma = false;
    let mut items = Vec::new();
    for item in pair.into_inner() {
        if item.as_rule() == Rule::trailing_comma {
            trailing_comma = true;
        } else {
            items.push(to_value(item)?);
        }
    }
    // `(x)` is a parenthesized value, `(x,)` a tuple
    if !trailing_comma
        && items.len() == 1
        && let Some(item) = items.pop()
    {
        return Ok(item);
    }
    Ok(Value::Array(items))
}

fn string(pair: &Pair<'_, Rule>) -> Result<String, LiteralError> {
    let raw = pair
        .clone()
        .into_inner()
        .next()
        .map_or("", |inner| inner.as_str());

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(quoted @ ('\\' | '\'' | '"')) => out.push(quoted),
            Some(escape @ ('x' | 'u' | 'U')) => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let hex: String = chars.by_ref().take(width).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == width)
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => out.push(decoded),
                    None => {
                        return Err(LiteralError::at(
                            pair,
                            format!("invalid escape '\\{escape}{hex}'"),
                        ));
                    }
                }
            }
            // unknown escapes are kept verbatim
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    Ok(out)
}

fn number(pair: &Pair<'_, Rule>) -> Result<Value, LiteralError> {
    let text: String = pair.as_str().chars().filter(|&c| c != '_').collect();
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::from(n));
    }
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Ok(Value::Number(n)),
        None => Err(LiteralError::at(
            pair,
            format!("number out of range '{text}'"),
        )),
    }
}
