use quarry_core::{Error, Result};

use indexmap::IndexMap;
use std::borrow::Cow;

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

#[derive(Debug, Clone)]
enum Render {
    /// `name(a, b, ...)`
    Standard(Cow<'static, str>),
    /// Positional template using `?1`, `?2`, ...
    Template(Cow<'static, str>),
    /// Arguments joined by an infix operator, parenthesized
    Infix(&'static str),
}

#[derive(Debug, Clone)]
struct SqlFunction {
    arity: Arity,
    render: Render,
}

/// Dialect-specific rendering of logical functions, keyed by lower-cased
/// name.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, SqlFunction>,
}

impl FunctionRegistry {
    pub fn new() -> FunctionRegistry {
        FunctionRegistry::default()
    }

    /// Functions shared by every dialect: aggregates and case conversion.
    pub fn standard() -> FunctionRegistry {
        let mut functions = FunctionRegistry::new();
        functions
            .register_standard("count", Arity::Exact(1), "count")
            .register_template("count_distinct", Arity::Exact(1), "count(distinct ?1)")
            .register_standard("sum", Arity::Exact(1), "sum")
            .register_standard("avg", Arity::Exact(1), "avg")
            .register_standard("min", Arity::Exact(1), "min")
            .register_standard("max", Arity::Exact(1), "max")
            .register_standard("lower", Arity::Exact(1), "lower")
            .register_standard("upper", Arity::Exact(1), "upper")
            .register_standard("coalesce", Arity::Variadic, "coalesce")
            .register_standard("concat", Arity::Variadic, "concat");
        functions
    }

    /// Registers `name` rendered as a plain call to `sql_name`.
    pub fn register_standard(
        &mut self,
        name: &str,
        arity: Arity,
        sql_name: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        self.insert(name, arity, Render::Standard(sql_name.into()))
    }

    /// Registers `name` rendered from a positional template.
    pub fn register_template(
        &mut self,
        name: &str,
        arity: Arity,
        template: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        self.insert(name, arity, Render::Template(template.into()))
    }

    /// Registers `name` rendered as its arguments joined by `operator`.
    pub fn register_infix(&mut self, name: &str, operator: &'static str) -> &mut Self {
        self.insert(name, Arity::Variadic, Render::Infix(operator))
    }

    fn insert(&mut self, name: &str, arity: Arity, render: Render) -> &mut Self {
        self.functions
            .insert(name.to_ascii_lowercase(), SqlFunction { arity, render });
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_ascii_lowercase())
    }

    /// Renders a call of `name` over already-rendered arguments.
    pub fn function_string(&self, name: &str, args: &[String]) -> Result<String> {
        let Some(function) = self.functions.get(&name.to_ascii_lowercase()) else {
            return Err(Error::dialect(format!("unknown function `{name}`")));
        };

        if let Arity::Exact(arity) = function.arity {
            if args.len() != arity {
                return Err(Error::dialect(format!(
                    "function `{name}` takes {arity} argument(s), {} given",
                    args.len()
                )));
            }
        }

        Ok(match &function.render {
            Render::Standard(sql_name) => format!("{sql_name}({})", args.join(", ")),
            Render::Template(template) => substitute(template, args),
            Render::Infix(operator) => format!("({})", args.join(operator)),
        })
    }
}

/// Replaces each `?N` in one pass, so argument text is never rescanned.
fn substitute(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(at) = rest.find('?') {
        out.push_str(&rest[..at]);
        let after = &rest[at + 1..];
        let digits = after
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len());

        let arg = after[..digits]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| args.get(i));
        match arg {
            Some(arg) => out.push_str(arg),
            None => out.push_str(&rest[at..at + 1 + digits]),
        }
        rest = &after[digits..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let functions = FunctionRegistry::standard();
        assert_eq!(
            functions.function_string("SUM", &["x".into()]).unwrap(),
            "sum(x)"
        );
    }

    #[test]
    fn templates_substitute_positions() {
        let mut functions = FunctionRegistry::new();
        functions.register_template("date_format", Arity::Exact(2), "strftime(?2, ?1)");
        assert_eq!(
            functions
                .function_string("date_format", &["d".into(), "'%Y'".into()])
                .unwrap(),
            "strftime('%Y', d)"
        );
    }

    #[test]
    fn substituted_arguments_are_not_rescanned() {
        let mut functions = FunctionRegistry::new();
        functions.register_template("date_format", Arity::Exact(2), "strftime(?2, ?1)");
        assert_eq!(
            functions
                .function_string("date_format", &["d".into(), "'?1 %Y'".into()])
                .unwrap(),
            "strftime('?1 %Y', d)"
        );
        assert_eq!(substitute("f(?3, ?)", &["a".into()]), "f(?3, ?)");
    }

    #[test]
    fn arity_is_checked() {
        let functions = FunctionRegistry::standard();
        let err = functions
            .function_string("max", &["a".into(), "b".into()])
            .unwrap_err();
        assert!(err.is_dialect());
    }

    #[test]
    fn unknown_function_fails() {
        let err = FunctionRegistry::standard()
            .function_string("median", &["a".into()])
            .unwrap_err();
        assert!(err.is_dialect());
    }

    #[test]
    fn infix_joins_arguments() {
        let mut functions = FunctionRegistry::new();
        functions.register_infix("concat", " || ");
        assert_eq!(
            functions
                .function_string("concat", &["a".into(), "b".into(), "c".into()])
                .unwrap(),
            "(a || b || c)"
        );
    }
}
