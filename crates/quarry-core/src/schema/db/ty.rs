use std::fmt;

/// Generic column type code.
///
/// A dialect maps each code to a native type-name template through its type
/// name registry. Codes carry no length information; that lives on the
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeCode {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Double,
    Decimal,
    Char,
    VarChar,
    /// Unbounded text (TEXT/CLOB)
    LongVarChar,
    Date,
    Time,
    Timestamp,
    Blob,
    Json,
}

impl TypeCode {
    pub fn is_integer(self) -> bool {
        matches!(self, TypeCode::SmallInt | TypeCode::Integer | TypeCode::BigInt)
    }

    pub fn is_character(self) -> bool {
        matches!(
            self,
            TypeCode::Char | TypeCode::VarChar | TypeCode::LongVarChar
        )
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
