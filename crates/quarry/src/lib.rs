mod config;
pub use config::Config;

mod factory;
pub use factory::SessionFactory;

mod generate;

mod nested;
pub use nested::NestedRelationResolver;

mod session;
pub use session::{PageResult, Record, Session};

mod sync;
pub use sync::SchemaSynchronizer;

pub use quarry_core::{
    driver::{self, Executor},
    schema,
    stmt::{self, Join, Page, Projection, Query, QueryCall, Sort},
    Error, Result,
};
pub use quarry_sql::Dialect;
