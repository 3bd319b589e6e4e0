use super::Value;

/// One projected expression of a query.
///
/// Dialects render calls by name: aggregate and date functions are looked up
/// in the dialect's function table using [`AggFunc::name`] and
/// [`DateFunc::name`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryCall {
    /// A field of the primary entity, or `alias.field` for a joined entity.
    Field(String),

    /// A literal value.
    Value(Value),

    /// An aggregate over its arguments.
    Agg(AggFunc, Vec<QueryCall>),

    /// A fixed-arity date function.
    Date(DateFunc, Vec<QueryCall>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggFunc {
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFunc {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    DateFormat,
    DayOfWeek,
    DayOfMonth,
    DayOfYear,
}

impl QueryCall {
    pub fn field(name: impl Into<String>) -> QueryCall {
        QueryCall::Field(name.into())
    }

    pub fn value(value: impl Into<Value>) -> QueryCall {
        QueryCall::Value(value.into())
    }

    /// `COUNT(*)`
    pub fn count_all() -> QueryCall {
        QueryCall::Agg(AggFunc::Count, vec![])
    }

    pub fn count(field: impl Into<String>) -> QueryCall {
        QueryCall::Agg(AggFunc::Count, vec![QueryCall::field(field)])
    }

    pub fn sum(field: impl Into<String>) -> QueryCall {
        QueryCall::Agg(AggFunc::Sum, vec![QueryCall::field(field)])
    }

    pub fn avg(field: impl Into<String>) -> QueryCall {
        QueryCall::Agg(AggFunc::Avg, vec![QueryCall::field(field)])
    }

    pub fn min(field: impl Into<String>) -> QueryCall {
        QueryCall::Agg(AggFunc::Min, vec![QueryCall::field(field)])
    }

    pub fn max(field: impl Into<String>) -> QueryCall {
        QueryCall::Agg(AggFunc::Max, vec![QueryCall::field(field)])
    }

    pub fn date(func: DateFunc, field: impl Into<String>) -> QueryCall {
        QueryCall::Date(func, vec![QueryCall::field(field)])
    }

    /// `date_format(field, pattern)`. The pattern is handed to the dialect's
    /// native formatting function unchanged.
    pub fn date_format(field: impl Into<String>, pattern: impl Into<String>) -> QueryCall {
        QueryCall::Date(
            DateFunc::DateFormat,
            vec![QueryCall::field(field), QueryCall::value(pattern.into())],
        )
    }

    /// True if the call aggregates rows.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, QueryCall::Agg(..))
    }

    /// Every field referenced by this call, in order.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = vec![];
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            QueryCall::Field(name) => out.push(name),
            QueryCall::Value(_) => {}
            QueryCall::Agg(_, args) | QueryCall::Date(_, args) => {
                for arg in args {
                    arg.collect_fields(out);
                }
            }
        }
    }
}

impl AggFunc {
    /// Key in the dialect function table.
    pub fn name(self) -> &'static str {
        match self {
            AggFunc::Count => "count",
            AggFunc::CountDistinct => "count_distinct",
            AggFunc::Sum => "sum",
            AggFunc::Avg => "avg",
            AggFunc::Min => "min",
            AggFunc::Max => "max",
        }
    }
}

impl DateFunc {
    /// Key in the dialect function table.
    pub fn name(self) -> &'static str {
        match self {
            DateFunc::Year => "year",
            DateFunc::Month => "month",
            DateFunc::Day => "day",
            DateFunc::Hour => "hour",
            DateFunc::Minute => "minute",
            DateFunc::Second => "second",
            DateFunc::DateFormat => "date_format",
            DateFunc::DayOfWeek => "dayofweek",
            DateFunc::DayOfMonth => "dayofmonth",
            DateFunc::DayOfYear => "dayofyear",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            DateFunc::DateFormat => 2,
            _ => 1,
        }
    }

    pub fn from_name(name: &str) -> Option<DateFunc> {
        Some(match name {
            "year" => DateFunc::Year,
            "month" => DateFunc::Month,
            "day" => DateFunc::Day,
            "hour" => DateFunc::Hour,
            "minute" => DateFunc::Minute,
            "second" => DateFunc::Second,
            "date_format" => DateFunc::DateFormat,
            "dayofweek" => DateFunc::DayOfWeek,
            "dayofmonth" => DateFunc::DayOfMonth,
            "dayofyear" => DateFunc::DayOfYear,
            _ => return None,
        })
    }
}
