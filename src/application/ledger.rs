//! # Progress Ledger
//!
//! Applies classified commands to the record store and derives period state:
//! week numbering per student and month, the monthly rollup, and query ordering.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::config::QueryOrder;
use crate::domain::errors::LedgerError;
use crate::domain::traits::{Clock, RecordStore};
use crate::domain::types::{
    MONTH_COMPLETE_WEEK, MemorizationRecord, NewRecord, RollupRow, WeekAssignment,
};

/// Result of an add: the stored record and, when it completed the month, its rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct AddOutcome {
    pub record: MemorizationRecord,
    pub rollup: Option<RollupRow>,
}

/// Period label of a calendar date, e.g. `March 2025`.
pub fn period_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

pub struct Ledger {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    order: QueryOrder,
}

impl Ledger {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, order: QueryOrder) -> Self {
        Self {
            store,
            clock,
            order,
        }
    }

    pub fn current_period(&self) -> String {
        period_label(self.clock.today())
    }

    /// Appends the next week for `student_name` in `period_label` (or the current period).
    pub fn add(
        &self,
        student_name: &str,
        pages_this_week: u32,
        cumulative_total: f64,
        period_label: Option<&str>,
    ) -> Result<AddOutcome, LedgerError> {
        let period_label = period_label
            .map(str::to_string)
            .unwrap_or_else(|| self.current_period());
        let record = NewRecord {
            student_name: student_name.to_string(),
            period_label,
            pages_this_week,
            cumulative_total,
        };
        self.append(&record, WeekAssignment::Next)
    }

    /// Appends a caretaker-numbered week in the current period. The week must be the
    /// one the ledger would have assigned.
    pub fn add_explicit(
        &self,
        student_name: &str,
        pages_this_week: u32,
        week_number: u32,
        cumulative_total: u32,
    ) -> Result<AddOutcome, LedgerError> {
        let record = NewRecord {
            student_name: student_name.to_string(),
            period_label: self.current_period(),
            pages_this_week,
            cumulative_total: f64::from(cumulative_total),
        };
        self.append(&record, WeekAssignment::Exact(week_number))
    }

    fn append(
        &self,
        record: &NewRecord,
        week: WeekAssignment,
    ) -> Result<AddOutcome, LedgerError> {
        let record = self.store.append(record, week)?;
        tracing::info!(
            "Recorded week {} of {} for {}",
            record.week_number,
            record.period_label,
            record.student_name
        );

        let rollup = if record.week_number == MONTH_COMPLETE_WEEK {
            tracing::info!(
                "Month complete for {} in {}, building rollup",
                record.student_name,
                record.period_label
            );
            // The record is already committed; a failed read only drops the summary.
            match self.monthly_rollup(&record.period_label, Some(&record.student_name)) {
                Ok(rows) => rows.into_iter().next(),
                Err(e) => {
                    tracing::error!(
                        "Rollup for {} in {} failed: {}",
                        record.student_name,
                        record.period_label,
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(AddOutcome { record, rollup })
    }

    /// Corrects pages and total of an existing week in the current period.
    pub fn edit(
        &self,
        student_name: &str,
        week_number: u32,
        pages_this_week: u32,
        cumulative_total: f64,
    ) -> Result<MemorizationRecord, LedgerError> {
        let period = self.current_period();
        self.store
            .correct(student_name, &period, week_number, pages_this_week, cumulative_total)?
            .ok_or_else(|| LedgerError::NotFound(format!("{student_name} week {week_number} of {period}")))
    }

    /// Every record of a student, grouped by period in the configured order, weeks ascending.
    pub fn query_student(&self, student_name: &str) -> Result<Vec<MemorizationRecord>, LedgerError> {
        let rows = self.store.by_student(student_name)?;
        if rows.is_empty() {
            return Err(LedgerError::NotFound(student_name.to_string()));
        }

        // Periods in the order they first received a record.
        let mut groups: Vec<(String, Vec<MemorizationRecord>)> = Vec::new();
        for row in rows {
            match groups.iter_mut().find(|(period, _)| *period == row.period_label) {
                Some((_, group)) => group.push(row),
                None => groups.push((row.period_label.clone(), vec![row])),
            }
        }
        if self.order == QueryOrder::NewestFirst {
            groups.reverse();
        }

        Ok(groups
            .into_iter()
            .flat_map(|(_, mut group)| {
                group.sort_by_key(|r| r.week_number);
                group
            })
            .collect())
    }

    pub fn query_student_period(
        &self,
        student_name: &str,
        period_label: &str,
    ) -> Result<Vec<MemorizationRecord>, LedgerError> {
        let mut rows = self.store.by_period(period_label, Some(student_name))?;
        if rows.is_empty() {
            return Err(LedgerError::NotFound(format!("{student_name} in {period_label}")));
        }
        rows.sort_by_key(|r| r.week_number);
        Ok(rows)
    }

    pub fn list_students(&self) -> Result<Vec<String>, LedgerError> {
        Ok(self.store.student_names()?)
    }

    /// Records for export: one student or everyone (by name), each in query order.
    /// An unknown student yields an empty list.
    pub fn export(&self, student_name: Option<&str>) -> Result<Vec<MemorizationRecord>, LedgerError> {
        let names = match student_name {
            Some(name) => vec![name.to_string()],
            None => self.list_students()?,
        };

        let mut records = Vec::new();
        for name in &names {
            match self.query_student(name) {
                Ok(rows) => records.extend(rows),
                Err(LedgerError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }

    /// Sum of pages and highest reported total per student. Empty when nothing matches.
    pub fn monthly_rollup(
        &self,
        period_label: &str,
        student_name: Option<&str>,
    ) -> Result<Vec<RollupRow>, LedgerError> {
        let rows = self.store.by_period(period_label, student_name)?;

        let mut by_student: BTreeMap<String, RollupRow> = BTreeMap::new();
        for row in rows {
            by_student
                .entry(row.student_name.clone())
                .and_modify(|acc| {
                    acc.weeks += 1;
                    acc.pages_total += u64::from(row.pages_this_week);
                    acc.latest_total = acc.latest_total.max(row.cumulative_total);
                })
                .or_insert_with(|| RollupRow {
                    student_name: row.student_name.clone(),
                    period_label: row.period_label.clone(),
                    weeks: 1,
                    pages_total: u64::from(row.pages_this_week),
                    latest_total: row.cumulative_total,
                });
        }
        Ok(by_student.into_values().collect())
    }
}
