pub mod driver;
pub use driver::Executor;

mod error;
pub use error::{Error, IntoError};

pub mod handler;
pub use handler::{TypeHandler, TypeHandlerRegistry};

pub mod schema;

pub mod stmt;

/// A Result type alias that uses Quarry's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
