/// Syntax and feature flags of a SQL backend.
///
/// DDL and query generation branch on these flags instead of on the backend
/// name, so one generator serves every dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    /// How identifiers are quoted.
    pub quote: Quote,

    /// Case folding applied to identifiers before quoting.
    pub identifier_case: IdentifierCase,

    /// How an auto-incrementing column is declared.
    pub identity: Identity,

    /// How LIMIT/OFFSET is expressed.
    pub pagination: Pagination,

    /// The backend rejects OFFSET/FETCH without an ORDER BY clause.
    pub pagination_requires_order: bool,

    /// Where table and column comments go.
    pub comments: Comments,

    /// `DROP ... IF EXISTS` is accepted.
    pub drop_if_exists: bool,

    /// Suffix of `DROP TABLE` that also drops dependent constraints.
    pub cascade_drop: Option<&'static str>,

    /// Foreign keys accept `ON DELETE CASCADE`.
    pub cascade_delete: bool,

    /// Foreign keys can be added and dropped with `ALTER TABLE`.
    pub alter_foreign_keys: bool,

    /// Syntax of `ALTER TABLE` for changing a column definition.
    pub alter_column: AlterColumn,

    /// Default constraints must be looked up and dropped before their column.
    pub drop_column_default_first: bool,

    /// `DROP INDEX name ON table` rather than `DROP INDEX name`.
    pub drop_index_on_table: bool,

    /// Clause used by `ALTER TABLE` to drop a foreign key.
    pub drop_foreign_key: &'static str,

    /// Clause used by `ALTER TABLE` to drop a unique key.
    pub drop_unique_key: &'static str,

    /// Unique keys are created as unique indexes.
    pub unique_key_as_index: bool,

    /// The backend has a boolean type and `TRUE`/`FALSE` literals.
    pub native_boolean: bool,

    /// Backslash is an escape character inside string literals.
    pub backslash_escapes: bool,

    /// How sequences are provided.
    pub sequences: Sequences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// `"name"`
    Double,
    /// `` `name` ``
    Backtick,
    /// `[name]`
    Bracket,
    /// Identifiers are emitted bare.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierCase {
    Preserve,
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// A keyword appended to the column definition.
    Suffix(&'static str),

    /// `INTEGER PRIMARY KEY AUTOINCREMENT` on the column. The table-level
    /// primary key clause is omitted.
    InlinePrimaryKey,

    /// The column type is replaced by a serial type.
    SerialType(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetchNext,
    /// `OFFSET m ROWS FETCH FIRST n ROWS ONLY`
    OffsetFetchFirst,
    /// `SELECT SKIP m FIRST n ...`
    SkipFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comments {
    /// `COMMENT '...'` on the column, `COMMENT='...'` after the table body
    Inline,
    /// Separate `COMMENT ON TABLE|COLUMN ... IS '...'` statements
    CommentOn,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterColumn {
    /// `MODIFY COLUMN c <definition>`
    Modify,
    /// `MODIFY (c <type> [NOT] NULL)`
    ModifyParenthesized,
    /// `ALTER COLUMN c TYPE <type>` plus separate nullability and default clauses
    AlterType,
    /// `ALTER COLUMN c SET DATA TYPE <type>` plus separate nullability and default clauses
    SetDataType,
    /// `ALTER COLUMN c <type> [NOT] NULL`
    AlterColumn,
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequences {
    /// `SELECT NEXT VALUE FOR s`
    NextValueFor,
    /// `VALUES NEXT VALUE FOR s`
    ValuesNextValueFor,
    /// `SELECT nextval('s')`
    Nextval,
    /// `SELECT s.NEXTVAL FROM <dummy>`
    DotNextval(&'static str),
    /// A one-row table holding the next value.
    Emulated,
}

impl Capability {
    /// MySQL capabilities.
    pub const MYSQL: Self = Self {
        quote: Quote::Backtick,
        identifier_case: IdentifierCase::Preserve,
        identity: Identity::Suffix("AUTO_INCREMENT"),
        pagination: Pagination::LimitOffset,
        pagination_requires_order: false,
        comments: Comments::Inline,
        drop_if_exists: true,
        cascade_drop: None,
        cascade_delete: true,
        alter_foreign_keys: true,
        alter_column: AlterColumn::Modify,
        drop_column_default_first: false,
        drop_index_on_table: true,
        drop_foreign_key: "DROP FOREIGN KEY",
        drop_unique_key: "DROP INDEX",
        unique_key_as_index: false,
        native_boolean: true,
        backslash_escapes: true,
        sequences: Sequences::Emulated,
    };

    /// MariaDB has native sequences since 10.3.
    pub const MARIADB: Self = Self {
        sequences: Sequences::NextValueFor,
        ..Self::MYSQL
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        quote: Quote::Double,
        identifier_case: IdentifierCase::Lower,
        identity: Identity::Suffix("GENERATED BY DEFAULT AS IDENTITY"),
        pagination: Pagination::LimitOffset,
        pagination_requires_order: false,
        comments: Comments::CommentOn,
        drop_if_exists: true,
        cascade_drop: Some("CASCADE"),
        cascade_delete: true,
        alter_foreign_keys: true,
        alter_column: AlterColumn::AlterType,
        drop_column_default_first: false,
        drop_index_on_table: false,
        drop_foreign_key: "DROP CONSTRAINT",
        drop_unique_key: "DROP CONSTRAINT",
        unique_key_as_index: false,
        native_boolean: true,
        backslash_escapes: false,
        sequences: Sequences::Nextval,
    };

    /// H2 in its default mode
    pub const H2: Self = Self {
        identifier_case: IdentifierCase::Preserve,
        sequences: Sequences::NextValueFor,
        ..Self::POSTGRESQL
    };

    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        quote: Quote::Double,
        identifier_case: IdentifierCase::Preserve,
        identity: Identity::InlinePrimaryKey,
        pagination: Pagination::LimitOffset,
        pagination_requires_order: false,
        comments: Comments::Unsupported,
        drop_if_exists: true,
        cascade_drop: None,
        cascade_delete: true,
        alter_foreign_keys: false,
        alter_column: AlterColumn::Unsupported,
        drop_column_default_first: false,
        drop_index_on_table: false,
        drop_foreign_key: "DROP CONSTRAINT",
        drop_unique_key: "DROP CONSTRAINT",
        unique_key_as_index: true,
        native_boolean: false,
        backslash_escapes: false,
        sequences: Sequences::Emulated,
    };

    /// Oracle 12c and later
    pub const ORACLE: Self = Self {
        quote: Quote::Double,
        identifier_case: IdentifierCase::Upper,
        identity: Identity::Suffix("GENERATED BY DEFAULT AS IDENTITY"),
        pagination: Pagination::OffsetFetchNext,
        pagination_requires_order: false,
        comments: Comments::CommentOn,
        drop_if_exists: false,
        cascade_drop: Some("CASCADE CONSTRAINTS"),
        cascade_delete: true,
        alter_foreign_keys: true,
        alter_column: AlterColumn::ModifyParenthesized,
        drop_column_default_first: false,
        drop_index_on_table: false,
        drop_foreign_key: "DROP CONSTRAINT",
        drop_unique_key: "DROP CONSTRAINT",
        unique_key_as_index: false,
        native_boolean: false,
        backslash_escapes: false,
        sequences: Sequences::DotNextval("dual"),
    };

    /// SQL Server 2016 and later
    pub const SQLSERVER: Self = Self {
        quote: Quote::Bracket,
        identifier_case: IdentifierCase::Preserve,
        identity: Identity::Suffix("IDENTITY(1,1)"),
        pagination: Pagination::OffsetFetchNext,
        pagination_requires_order: true,
        comments: Comments::Unsupported,
        drop_if_exists: true,
        cascade_drop: None,
        cascade_delete: true,
        alter_foreign_keys: true,
        alter_column: AlterColumn::AlterColumn,
        drop_column_default_first: true,
        drop_index_on_table: true,
        drop_foreign_key: "DROP CONSTRAINT",
        drop_unique_key: "DROP CONSTRAINT",
        unique_key_as_index: false,
        native_boolean: false,
        backslash_escapes: false,
        sequences: Sequences::NextValueFor,
    };

    /// DB2 for LUW
    pub const DB2: Self = Self {
        quote: Quote::Double,
        identifier_case: IdentifierCase::Upper,
        identity: Identity::Suffix("GENERATED BY DEFAULT AS IDENTITY"),
        pagination: Pagination::OffsetFetchFirst,
        pagination_requires_order: false,
        comments: Comments::CommentOn,
        drop_if_exists: false,
        cascade_drop: None,
        cascade_delete: true,
        alter_foreign_keys: true,
        alter_column: AlterColumn::SetDataType,
        drop_column_default_first: false,
        drop_index_on_table: false,
        drop_foreign_key: "DROP CONSTRAINT",
        drop_unique_key: "DROP CONSTRAINT",
        unique_key_as_index: false,
        native_boolean: false,
        backslash_escapes: false,
        sequences: Sequences::ValuesNextValueFor,
    };

    /// Informix capabilities
    pub const INFORMIX: Self = Self {
        quote: Quote::None,
        identifier_case: IdentifierCase::Lower,
        identity: Identity::SerialType("SERIAL8"),
        pagination: Pagination::SkipFirst,
        pagination_requires_order: false,
        comments: Comments::Unsupported,
        drop_if_exists: false,
        cascade_drop: None,
        cascade_delete: true,
        alter_foreign_keys: true,
        alter_column: AlterColumn::ModifyParenthesized,
        drop_column_default_first: false,
        drop_index_on_table: false,
        drop_foreign_key: "DROP CONSTRAINT",
        drop_unique_key: "DROP CONSTRAINT",
        unique_key_as_index: false,
        native_boolean: false,
        backslash_escapes: false,
        sequences: Sequences::DotNextval("systables WHERE tabid = 1"),
    };
}
