//! Typed partial-update builder.
//!
//! A [`FieldSet`] collects the columns a caller explicitly set, keyed by a
//! per-table [`Column`] enum. Column names only ever come from that enum and
//! every value is a bound parameter, so no caller-controlled text reaches the
//! SQL string. Every generated `UPDATE` also refreshes `updated_at`.
//!
//! ```ignore
//! let mut fields = FieldSet::new();
//! fields.text(EntityColumn::EntityName, input.entity_name.clone());
//! let mut query = fields.into_update("entities", id, COLUMNS);
//! let row = query.build_query_as::<Entity>().fetch_optional(&mut *tx).await?;
//! ```

use lawmox_core::patch::Patch;
use lawmox_core::types::{Date, DbId, Timestamp};
use sqlx::{Postgres, QueryBuilder};

/// An updatable column of one table.
pub trait Column: Copy + PartialEq + std::fmt::Debug {
    /// The column identifier as written in SQL.
    fn name(self) -> &'static str;
}

/// A value destined for a single column. `None` writes SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Date(Option<Date>),
    Id(Option<DbId>),
    Timestamp(Option<Timestamp>),
}

/// The explicitly supplied columns of a partial update, in insertion order.
#[derive(Debug, Clone)]
pub struct FieldSet<C: Column> {
    fields: Vec<(C, FieldValue)>,
}

impl<C: Column> Default for FieldSet<C> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<C: Column> FieldSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any earlier value for the same column.
    pub fn set(&mut self, column: C, value: FieldValue) {
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn text(&mut self, column: C, patch: Patch<String>) {
        if let Some(value) = patch.into_option() {
            self.set(column, FieldValue::Text(value));
        }
    }

    pub fn date(&mut self, column: C, patch: Patch<Date>) {
        if let Some(value) = patch.into_option() {
            self.set(column, FieldValue::Date(value));
        }
    }

    pub fn id(&mut self, column: C, patch: Patch<DbId>) {
        if let Some(value) = patch.into_option() {
            self.set(column, FieldValue::Id(value));
        }
    }

    pub fn timestamp(&mut self, column: C, patch: Patch<Timestamp>) {
        if let Some(value) = patch.into_option() {
            self.set(column, FieldValue::Timestamp(value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, column: C) -> bool {
        self.fields.iter().any(|(c, _)| *c == column)
    }

    pub fn get(&self, column: C) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    /// Build `UPDATE {table} SET col = $n, ..., updated_at = NOW()
    /// WHERE id = $m RETURNING {returning}`.
    ///
    /// An empty set still produces a valid statement that only refreshes
    /// `updated_at`; callers decide whether an empty update is an error.
    pub fn into_update(
        self,
        table: &'static str,
        id: DbId,
        returning: &'static str,
    ) -> QueryBuilder<'static, Postgres> {
        let mut query = QueryBuilder::new(format!("UPDATE {table} SET "));
        for (column, value) in self.fields {
            query.push(column.name()).push(" = ");
            match value {
                FieldValue::Text(v) => query.push_bind(v),
                FieldValue::Date(v) => query.push_bind(v),
                FieldValue::Id(v) => query.push_bind(v),
                FieldValue::Timestamp(v) => query.push_bind(v),
            };
            query.push(", ");
        }
        query.push("updated_at = NOW() WHERE id = ");
        query.push_bind(id);
        query.push(" RETURNING ");
        query.push(returning);
        query
    }
}
