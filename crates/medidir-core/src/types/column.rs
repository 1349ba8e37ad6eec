//! Column descriptors for every persisted entity.
//!
//! Each entity declares its columns once with [`define_columns!`]. The
//! resulting enum is the only way a column name reaches a SQL statement,
//! so statements never contain caller-supplied identifiers.

use std::fmt;

/// Storage type of a column. Drives value coercion and typed NULL binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// `BIGINT` / `BIGSERIAL`.
    BigInt,
    /// `INTEGER`.
    Integer,
    /// `DOUBLE PRECISION`.
    Double,
    /// `BOOLEAN`.
    Boolean,
    /// `TEXT` / `VARCHAR`.
    Text,
    /// `TIMESTAMPTZ`.
    Timestamp,
    /// `DATE`.
    Date,
    /// `TIME`.
    Time,
    /// `JSONB`.
    Json,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BigInt => "bigint",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::Boolean => "boolean",
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Time => "time",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}

/// Names of the columns the storage layer owns.
pub const SYSTEM_COLUMNS: [&str; 3] = ["id", "created_at", "updated_at"];

/// A column of one entity's table.
pub trait Column: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every column of the table, in declaration order.
    fn all() -> &'static [Self];

    /// The SQL column name.
    fn name(self) -> &'static str;

    /// The storage type.
    fn kind(self) -> ColumnKind;

    /// Whether the column accepts NULL.
    fn nullable(self) -> bool;

    /// Look a column up by its SQL name.
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    /// Whether callers may write this column. The primary key and both
    /// timestamps are assigned by storage.
    fn is_writable(self) -> bool {
        !SYSTEM_COLUMNS.contains(&self.name())
    }
}

/// Declare a column enumeration and implement [`Column`] for it.
///
/// ```ignore
/// define_columns! {
///     /// Columns of `cities`.
///     pub enum CityColumn {
///         Id => ("id", BigInt, false),
///         Name => ("name", Text, false),
///     }
/// }
/// ```
#[macro_export]
macro_rules! define_columns {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident => ($col:literal, $kind:ident, $nullable:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $variant ),+
        }

        impl $crate::types::column::Column for $name {
            fn all() -> &'static [Self] {
                &[$( Self::$variant ),+]
            }

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $col ),+
                }
            }

            fn kind(self) -> $crate::types::column::ColumnKind {
                match self {
                    $( Self::$variant => $crate::types::column::ColumnKind::$kind ),+
                }
            }

            fn nullable(self) -> bool {
                match self {
                    $( Self::$variant => $nullable ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::types::column::Column::name(*self))
            }
        }
    };
}
