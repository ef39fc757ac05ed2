// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

/// Typed reference to a record of a particular table.
///
/// Serialized transparently as the plain integer id.
macro_rules! record_id_newtype {
    ($type_name:ident) => {
        #[derive(
            Copy,
            Clone,
            Debug,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $type_name($crate::RecordId);

        impl $type_name {
            #[must_use]
            pub const fn new(inner: $crate::RecordId) -> Self {
                Self(inner)
            }

            #[must_use]
            pub const fn to_inner(self) -> $crate::RecordId {
                let Self(inner) = self;
                inner
            }
        }

        impl From<$crate::RecordId> for $type_name {
            fn from(from: $crate::RecordId) -> Self {
                Self::new(from)
            }
        }

        impl From<$type_name> for $crate::RecordId {
            fn from(from: $type_name) -> Self {
                from.to_inner()
            }
        }

        impl ::std::fmt::Display for $type_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.to_inner(), f)
            }
        }
    };
}

/// Conversions between an entity type and its [`crate::Record`] variant.
macro_rules! record_variant {
    ($variant:ident, $id_type:ident, $table:ident) => {
        impl $crate::record::RecordKind for $variant {
            type Id = $id_type;

            const TABLE: $crate::Table = $crate::Table::$table;
        }

        impl From<$variant> for $crate::Record {
            fn from(from: $variant) -> Self {
                Self::$variant(from)
            }
        }

        impl TryFrom<$crate::Record> for $variant {
            type Error = $crate::Record;

            fn try_from(from: $crate::Record) -> Result<Self, Self::Error> {
                match from {
                    $crate::Record::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}
