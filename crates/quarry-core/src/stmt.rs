//! Values, rows and the structured query model.
//!
//! A [`Query`] is built per call, is immutable once built, and is consumed by
//! the SQL compiler. Filters are JSON-logic documents kept as
//! [`serde_json::Value`]; the compiler in `quarry-sql` turns them into SQL.

mod call;
pub use call::{AggFunc, DateFunc, QueryCall};

mod direction;
pub use direction::Direction;

mod join;
pub use join::{Join, JoinType};

mod page;
pub use page::Page;

mod projection;
pub use projection::Projection;

mod query;
pub use query::Query;

mod row;
pub use row::Row;

mod sort;
pub use sort::{Sort, SortField};

mod value;
pub use value::Value;
