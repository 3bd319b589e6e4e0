#[macro_use]
mod serializer;

pub mod dialect;
pub use dialect::Dialect;

pub mod export;
pub use export::Exporter;

pub mod filter;
pub use filter::FilterCompiler;

mod params;
pub use params::Bindings;

pub mod query;
pub use query::{CompiledQuery, QueryCompiler};

mod scope;
pub use scope::{ResolvedField, Scope};

mod statement;
pub use statement::Statement;
