pub mod app;
pub use app::EntityDefinition;

pub mod db;

mod registry;
pub use registry::ModelRegistry;
