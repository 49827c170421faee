//! Audit and soft-delete building blocks shared by record types.
//!
//! Records that need an audit trail embed [`AuditStamp`] (timestamps plus
//! nullable actor references) and [`SoftDeleteState`] (flag/timestamp pair)
//! with `#[sqlx(flatten)]` / `#[serde(flatten)]`, so the columns live on the
//! owning table while the behavior stays in one place.
//!
//! "Deleting" such a record flips the flag instead of removing the row.
//! List queries choose which rows are visible through [`RowScope`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Timestamps and actor references recording who touched a record and when.
///
/// `created_at`/`updated_at` are system-managed: set on insert, and
/// `updated_at` is bumped on every update. The actor references are nullable
/// so system-generated records stay representable, and they survive actor
/// deletion as NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuditStamp {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
}

/// Soft-delete flag pair.
///
/// Mutated only through [`mark_deleted`](Self::mark_deleted) and
/// [`restore`](Self::restore); the two fields always move together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SoftDeleteState {
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SoftDeleteState {
    /// Mark the record as deleted, capturing the deletion time.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(now);
    }

    /// Reverse a soft delete.
    pub fn restore(&mut self) {
        self.is_deleted = false;
        self.deleted_at = None;
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

/// Which rows a query sees, relative to the soft-delete flag.
///
/// The default for listings is [`Active`](Self::Active); callers opt into
/// the deleted-only view explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// Rows that have not been soft-deleted.
    Active,
    /// Only soft-deleted rows.
    Deleted,
    /// Every row regardless of the flag.
    All,
}

impl RowScope {
    /// Map an optional `deleted=` query flag to a scope.
    pub fn from_deleted_flag(deleted: Option<bool>) -> Self {
        match deleted {
            Some(true) => RowScope::Deleted,
            _ => RowScope::Active,
        }
    }

    /// SQL predicate selecting this scope's rows.
    pub fn sql_predicate(&self) -> &'static str {
        match self {
            RowScope::Active => "is_deleted = FALSE",
            RowScope::Deleted => "is_deleted = TRUE",
            RowScope::All => "TRUE",
        }
    }
}
