use quarry_core::{schema::db::TypeCode, Error, Result};

use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Length substituted for `$l` when a column declares none.
pub const DEFAULT_LENGTH: u32 = 255;

/// Precision substituted for `$p` when a column declares none.
pub const DEFAULT_PRECISION: u32 = 19;

/// Scale substituted for `$s` when a column declares none.
pub const DEFAULT_SCALE: u32 = 2;

/// Native type names of one dialect, keyed by generic type code.
///
/// A code may carry an unsized default template and any number of templates
/// limited to a capacity. Templates use `$l`, `$p` and `$s` for length,
/// precision and scale.
#[derive(Debug, Clone, Default)]
pub struct TypeNameRegistry {
    defaults: IndexMap<TypeCode, String>,
    sized: IndexMap<TypeCode, BTreeMap<u32, String>>,
}

impl TypeNameRegistry {
    pub fn new() -> TypeNameRegistry {
        TypeNameRegistry::default()
    }

    /// Registers the template used when no capacity-limited template fits.
    pub fn register(&mut self, code: TypeCode, template: impl Into<String>) -> &mut Self {
        self.defaults.insert(code, template.into());
        self
    }

    /// Registers a template for lengths up to and including `capacity`.
    pub fn register_with_capacity(
        &mut self,
        code: TypeCode,
        capacity: u32,
        template: impl Into<String>,
    ) -> &mut Self {
        self.sized
            .entry(code)
            .or_default()
            .insert(capacity, template.into());
        self
    }

    /// True if any template is registered for `code`.
    pub fn contains(&self, code: TypeCode) -> bool {
        self.defaults.contains_key(&code) || self.sized.contains_key(&code)
    }

    /// Resolves the native type name for a column.
    ///
    /// The smallest capacity at least `length` wins; otherwise the unsized
    /// default is used.
    pub fn type_name(
        &self,
        code: TypeCode,
        length: Option<u32>,
        precision: Option<u32>,
        scale: Option<u32>,
    ) -> Result<String> {
        let sized = length.and_then(|length| {
            self.sized
                .get(&code)
                .and_then(|templates| templates.range(length..).next())
                .map(|(_, template)| template)
        });

        let Some(template) = sized.or_else(|| self.defaults.get(&code)) else {
            return Err(match length {
                Some(length) => Error::dialect(format!(
                    "no type mapping for {code} with length {length}"
                )),
                None => Error::dialect(format!("no type mapping for {code}")),
            });
        };

        Ok(template
            .replace("$l", &length.unwrap_or(DEFAULT_LENGTH).to_string())
            .replace("$p", &precision.unwrap_or(DEFAULT_PRECISION).to_string())
            .replace("$s", &scale.unwrap_or(DEFAULT_SCALE).to_string()))
    }
}
