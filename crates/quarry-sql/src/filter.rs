//! JSON-logic filter compilation.
//!
//! A filter document such as
//!
//! ```json
//! { "and": [ { ">=": [ { "field": "age" }, 18 ] },
//!            { "starts_with": [ { "field": "name" }, "B" ] } ] }
//! ```
//!
//! compiles to a boolean SQL clause. Literals become named bind parameters,
//! or inline SQL literals when compiling a fragment that is embedded directly
//! in another clause.

use crate::{Bindings, Dialect, Scope};

use quarry_core::{
    stmt::{DateFunc, Value},
    Error, Result,
};
use serde_json::Value as Json;

/// Character used to escape `%` and `_` in LIKE patterns.
const LIKE_ESCAPE: char = '!';

pub struct FilterCompiler<'a> {
    dialect: &'a Dialect,
    scope: &'a Scope,
    sink: Sink<'a>,
}

enum Sink<'a> {
    Bind(&'a mut Bindings),
    Inline,
}

/// A compiled operand before it is placed into a clause.
enum Operand {
    /// Column, function call or nested boolean expression
    Sql(String),
    Null,
    Literal(Value),
    List(Vec<Operand>),
}

impl<'a> FilterCompiler<'a> {
    /// Compiles with literals bound as parameters.
    pub fn new(dialect: &'a Dialect, scope: &'a Scope, bindings: &'a mut Bindings) -> Self {
        FilterCompiler {
            dialect,
            scope,
            sink: Sink::Bind(bindings),
        }
    }

    /// Compiles with literals rendered inline.
    pub fn inline(dialect: &'a Dialect, scope: &'a Scope) -> Self {
        FilterCompiler {
            dialect,
            scope,
            sink: Sink::Inline,
        }
    }

    /// Compiles a filter document to a boolean SQL clause.
    pub fn compile(&mut self, expr: &Json) -> Result<String> {
        match expr {
            Json::Null => Err(Error::expression_calculator("filter expression is null")),
            Json::Bool(true) => Ok("1 = 1".to_string()),
            Json::Bool(false) => Ok("1 = 0".to_string()),
            _ => self.boolean(expr),
        }
    }

    fn boolean(&mut self, expr: &Json) -> Result<String> {
        let (op, args) = operation(expr)?;

        match op {
            "==" | "===" => self.equality(op, args, "=", "IS NULL"),
            "!=" | "!==" => self.equality(op, args, "<>", "IS NOT NULL"),
            ">" | ">=" => {
                let [lhs, rhs] = self.fixed::<2>(op, args)?;
                self.comparison(op, lhs, rhs)
            }
            "<" | "<=" => match arguments(args).len() {
                3 => self.between(op, args),
                _ => {
                    let [lhs, rhs] = self.fixed::<2>(op, args)?;
                    self.comparison(op, lhs, rhs)
                }
            },
            "and" | "or" => {
                let args = arguments(args);
                if args.is_empty() {
                    return Err(Error::expression_calculator(format!(
                        "`{op}` needs at least one operand"
                    )));
                }
                let clauses = args
                    .into_iter()
                    .map(|arg| self.boolean(arg))
                    .collect::<Result<Vec<_>>>()?;
                let joiner = if op == "and" { " AND " } else { " OR " };
                Ok(format!("({})", clauses.join(joiner)))
            }
            "!" => {
                let [arg] = single(op, args)?;
                Ok(format!("NOT ({})", self.boolean(arg)?))
            }
            "!!" => {
                let [arg] = single(op, args)?;
                match self.operand(arg)? {
                    Operand::Sql(sql) if is_reference(arg) => Ok(format!("{sql} IS NOT NULL")),
                    Operand::Sql(sql) => Ok(sql),
                    _ => Err(unsupported(op)),
                }
            }
            "starts_with" | "ends_with" | "contains" => self.like(op, args),
            "in" => self.in_list(args),
            "var" | "field" | "table_field" => {
                let column = self.reference(op, args)?;
                let truth = self.dialect.literal(&Value::Bool(true));
                Ok(format!("{column} = {truth}"))
            }
            _ if DateFunc::from_name(op).is_some() => Err(Error::expression_calculator(format!(
                "`{op}` does not produce a boolean"
            ))),
            _ => Err(Error::expression_calculator(format!(
                "unknown operator `{op}`"
            ))),
        }
    }

    fn equality(&mut self, op: &str, args: &Json, sql_op: &str, null_test: &str) -> Result<String> {
        let [lhs, rhs] = self.fixed::<2>(op, args)?;
        match (lhs, rhs) {
            (Operand::List(_), _) | (_, Operand::List(_)) => Err(unsupported(op)),
            (Operand::Null, Operand::Null) => Err(unsupported(op)),
            (Operand::Null, other) | (other, Operand::Null) => {
                Ok(format!("{} {null_test}", self.render(other)?))
            }
            (lhs, rhs) => Ok(format!("{} {sql_op} {}", self.render(lhs)?, self.render(rhs)?)),
        }
    }

    fn comparison(&mut self, op: &str, lhs: Operand, rhs: Operand) -> Result<String> {
        if !comparable(&lhs) || !comparable(&rhs) {
            return Err(unsupported(op));
        }
        Ok(format!("{} {op} {}", self.render(lhs)?, self.render(rhs)?))
    }

    /// Three-argument `<` / `<=`: the middle operand lies between the others.
    fn between(&mut self, op: &str, args: &Json) -> Result<String> {
        let [low, value, high] = self.fixed::<3>(op, args)?;
        if !comparable(&low) || !comparable(&value) || !comparable(&high) {
            return Err(unsupported(op));
        }

        if op == "<=" {
            let value = self.render(value)?;
            let low = self.render(low)?;
            let high = self.render(high)?;
            return Ok(format!("{value} BETWEEN {low} AND {high}"));
        }

        // `value` appears twice; a literal gets two placeholders
        let value_sql = match value {
            Operand::Sql(sql) => sql,
            Operand::Literal(literal) => {
                let first = self.render(Operand::Literal(literal.clone()))?;
                let low = self.render(low)?;
                let second = self.render(Operand::Literal(literal))?;
                let high = self.render(high)?;
                return Ok(format!("({low} < {first} AND {second} < {high})"));
            }
            _ => return Err(unsupported(op)),
        };
        let low = self.render(low)?;
        let high = self.render(high)?;
        Ok(format!("({low} < {value_sql} AND {value_sql} < {high})"))
    }

    fn like(&mut self, op: &str, args: &Json) -> Result<String> {
        let [lhs, rhs] = self.fixed::<2>(op, args)?;

        let Operand::Literal(Value::String(needle)) = rhs else {
            return Err(Error::expression_calculator(format!(
                "`{op}` needs a string pattern as its second operand"
            )));
        };
        let Operand::Sql(column) = lhs else {
            return Err(unsupported(op));
        };

        let escaped = escape_like(&needle);
        let pattern = match op {
            "starts_with" => format!("{escaped}%"),
            "ends_with" => format!("%{escaped}"),
            _ => format!("%{escaped}%"),
        };
        let pattern = self.render(Operand::Literal(Value::String(pattern)))?;

        Ok(format!("{column} LIKE {pattern} ESCAPE '{LIKE_ESCAPE}'"))
    }

    fn in_list(&mut self, args: &Json) -> Result<String> {
        let [lhs, rhs] = self.fixed::<2>("in", args)?;

        let Operand::List(items) = rhs else {
            return Err(Error::expression_calculator(
                "`in` needs an array as its second operand",
            ));
        };
        if !comparable(&lhs) {
            return Err(unsupported("in"));
        }
        if items.is_empty() {
            return Ok("1 = 0".to_string());
        }

        let lhs = self.render(lhs)?;
        let items = items
            .into_iter()
            .map(|item| match item {
                Operand::List(_) => Err(unsupported("in")),
                item => self.render(item),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(format!("{lhs} IN ({})", items.join(", ")))
    }

    fn operand(&mut self, expr: &Json) -> Result<Operand> {
        Ok(match expr {
            Json::Null => Operand::Null,
            Json::Bool(_) | Json::Number(_) | Json::String(_) => {
                Operand::Literal(Value::from_json(expr)?)
            }
            Json::Array(items) => Operand::List(
                items
                    .iter()
                    .map(|item| self.operand(item))
                    .collect::<Result<_>>()?,
            ),
            Json::Object(_) => {
                let (op, args) = operation(expr)?;
                match op {
                    "var" | "field" | "table_field" => Operand::Sql(self.reference(op, args)?),
                    _ => match DateFunc::from_name(op) {
                        Some(func) => Operand::Sql(self.date_function(func, args)?),
                        None => Operand::Sql(format!("({})", self.boolean(expr)?)),
                    },
                }
            }
        })
    }

    fn render(&mut self, operand: Operand) -> Result<String> {
        match operand {
            Operand::Sql(sql) => Ok(sql),
            Operand::Null => Ok("NULL".to_string()),
            Operand::Literal(value) => Ok(match &mut self.sink {
                Sink::Bind(bindings) => bindings.push(value),
                Sink::Inline => self.dialect.literal(&value),
            }),
            Operand::List(_) => Err(Error::expression_calculator(
                "an array is only allowed as the second operand of `in`",
            )),
        }
    }

    /// `{"field": "age"}`, `{"var": ["age"]}`, `{"table_field": ["o", "total"]}`
    /// or `{"table_field": "o.total"}`.
    fn reference(&self, op: &str, args: &Json) -> Result<String> {
        let name = match (op, args) {
            (_, Json::String(name)) => name.clone(),
            ("table_field", Json::Array(parts)) => match parts.as_slice() {
                [Json::String(alias), Json::String(field)] => format!("{alias}.{field}"),
                _ => return Err(unsupported(op)),
            },
            (_, Json::Array(parts)) => match parts.first() {
                Some(Json::String(name)) => name.clone(),
                _ => return Err(unsupported(op)),
            },
            _ => return Err(unsupported(op)),
        };

        if name.is_empty() {
            return Err(Error::expression_calculator(format!(
                "`{op}` needs a field name"
            )));
        }

        self.scope.column(self.dialect, &name)
    }

    fn date_function(&mut self, func: DateFunc, args: &Json) -> Result<String> {
        let args = arguments(args);
        if args.len() != func.arity() {
            return Err(Error::expression_calculator(format!(
                "`{}` takes {} operand(s), {} given",
                func.name(),
                func.arity(),
                args.len()
            )));
        }

        let rendered = args
            .into_iter()
            .map(|arg| {
                let operand = self.operand(arg)?;
                self.render(operand)
            })
            .collect::<Result<Vec<_>>>()?;

        self.dialect.function_string(func.name(), &rendered)
    }

    fn fixed<const N: usize>(&mut self, op: &str, args: &Json) -> Result<[Operand; N]> {
        let args = arguments(args);
        if args.len() != N {
            return Err(Error::expression_calculator(format!(
                "`{op}` takes {N} operands, {} given",
                args.len()
            )));
        }

        let operands = args
            .into_iter()
            .map(|arg| self.operand(arg))
            .collect::<Result<Vec<_>>>()?;

        operands.try_into().map_err(|_| unsupported(op))
    }
}

/// Splits `{"op": args}` into its parts.
fn operation(expr: &Json) -> Result<(&str, &Json)> {
    match expr {
        Json::Object(map) if map.len() == 1 => {
            let (op, args) = map.iter().next().ok_or_else(|| unsupported("{}"))?;
            Ok((op.as_str(), args))
        }
        _ => Err(Error::expression_calculator(format!(
            "cannot parse filter expression `{expr}`"
        ))),
    }
}

/// JSON-logic accepts a bare operand in place of a one-element array.
fn arguments(args: &Json) -> Vec<&Json> {
    match args {
        Json::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn single<'j>(op: &str, args: &'j Json) -> Result<[&'j Json; 1]> {
    match arguments(args).as_slice() {
        [arg] => Ok([*arg]),
        _ => Err(Error::expression_calculator(format!(
            "`{op}` takes exactly one operand"
        ))),
    }
}

fn is_reference(expr: &Json) -> bool {
    matches!(operation(expr), Ok(("var" | "field" | "table_field", _)))
}

fn comparable(operand: &Operand) -> bool {
    matches!(operand, Operand::Sql(_) | Operand::Literal(_))
}

fn unsupported(op: &str) -> Error {
    Error::expression_calculator(format!("unsupported operands for `{op}`"))
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
