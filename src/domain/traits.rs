//! # Domain Traits
//!
//! Abstract interfaces for the chat gateway, the table store and the calendar.
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::errors::StoreError;
use crate::domain::types::{MemorizationRecord, NewRecord, WeekAssignment};

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a markdown message to the room, returning its event id
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Durable single-table store of memorization records.
///
/// Implementations must make `append` atomic: reading the current maximum week and
/// inserting the new row happen under one serialized write.
pub trait RecordStore: Send + Sync {
    /// Appends a record, assigning its week per `week`.
    fn append(
        &self,
        record: &NewRecord,
        week: WeekAssignment,
    ) -> Result<MemorizationRecord, StoreError>;

    /// Overwrites pages and total of an existing row. Returns `None` if the row does not exist.
    fn correct(
        &self,
        student_name: &str,
        period_label: &str,
        week_number: u32,
        pages_this_week: u32,
        cumulative_total: f64,
    ) -> Result<Option<MemorizationRecord>, StoreError>;

    /// All rows of a student in insertion order.
    fn by_student(&self, student_name: &str) -> Result<Vec<MemorizationRecord>, StoreError>;

    /// Rows of one period, optionally restricted to one student, in insertion order.
    fn by_period(
        &self,
        period_label: &str,
        student_name: Option<&str>,
    ) -> Result<Vec<MemorizationRecord>, StoreError>;

    /// Distinct student names, sorted.
    fn student_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Source of "today" for deriving the current period.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
