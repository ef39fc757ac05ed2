// SPDX-FileCopyrightText: Copyright (C) 2024-2026 The trackman authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Store-independent query description.
//!
//! Both the local and the remote store adapters interpret a [`QuerySpec`]
//! the same way by evaluating it over the record fields.

use std::cmp::Ordering;

use serde_json::Value;

use crate::{RecordFields, RecordId, Table};

/// The pseudo field that addresses the record or document id.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    Equals { field: String, value: Value },
    AnyOf { field: String, values: Vec<Value> },
}

impl FieldFilter {
    fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. } | Self::AnyOf { field, .. } => field,
        }
    }

    fn accepts(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Self::Equals { value: expected, .. } => expected == value,
            Self::AnyOf { values, .. } => values.contains(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    #[must_use]
    pub fn reverse(self) -> Self {
        let Self { field, direction } = self;
        Self {
            field,
            direction: direction.reversed(),
        }
    }
}

/// Keys of query results, i.e. local record ids or remote document ids.
pub trait QueryKey: Ord {
    fn to_value(&self) -> Value;
}

impl QueryKey for RecordId {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl QueryKey for String {
    fn to_value(&self) -> Value {
        Value::from(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub table: Table,
    pub filters: Vec<FieldFilter>,
    pub order: Option<SortOrder>,
    pub limit: Option<usize>,
}

impl QuerySpec {
    #[must_use]
    pub const fn all(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn filter_any_of<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filters.push(FieldFilter::AnyOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some(SortOrder {
            field: field.into(),
            direction,
        });
        self
    }

    /// Flip the sort direction.
    ///
    /// Unordered queries are ordered by id, descending.
    #[must_use]
    pub fn reverse(mut self) -> Self {
        let order = self.order.take().map_or_else(
            || SortOrder {
                field: ID_FIELD.to_owned(),
                direction: SortDirection::Descending,
            },
            SortOrder::reverse,
        );
        self.order = Some(order);
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn matches<K: QueryKey>(&self, key: &K, fields: &RecordFields) -> bool {
        self.filters.iter().all(|filter| {
            if filter.field() == ID_FIELD {
                filter.accepts(Some(&key.to_value()))
            } else {
                filter.accepts(fields.get(filter.field()))
            }
        })
    }

    /// Filter, sort, and limit the candidates.
    ///
    /// Ties are resolved by key, so results are deterministic.
    #[must_use]
    pub fn evaluate<K, I>(&self, candidates: I) -> Vec<(K, RecordFields)>
    where
        K: QueryKey,
        I: IntoIterator<Item = (K, RecordFields)>,
    {
        let mut results: Vec<_> = candidates
            .into_iter()
            .filter(|(key, fields)| self.matches(key, fields))
            .collect();
        results.sort_by(|(lhs_key, lhs_fields), (rhs_key, rhs_fields)| {
            let Some(SortOrder { field, direction }) = &self.order else {
                return lhs_key.cmp(rhs_key);
            };
            let ordering = if field == ID_FIELD {
                lhs_key.cmp(rhs_key)
            } else {
                compare_values(lhs_fields.get(field), rhs_fields.get(field))
                    .then_with(|| lhs_key.cmp(rhs_key))
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }
}

/// Total order over JSON values: missing/null < bool < number < string.
///
/// Arrays and objects are not comparable and sort last as equal.
fn compare_values(lhs: Option<&Value>, rhs: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_) | Value::Object(_)) => 4,
        }
    }
    match (lhs, rhs) {
        (Some(Value::Bool(lhs)), Some(Value::Bool(rhs))) => lhs.cmp(rhs),
        (Some(Value::Number(lhs)), Some(Value::Number(rhs))) => {
            match (lhs.as_i64(), rhs.as_i64()) {
                (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
                _ => lhs
                    .as_f64()
                    .partial_cmp(&rhs.as_f64())
                    .unwrap_or(Ordering::Equal),
            }
        }
        (Some(Value::String(lhs)), Some(Value::String(rhs))) => lhs.cmp(rhs),
        _ => rank(lhs).cmp(&rank(rhs)),
    }
}
