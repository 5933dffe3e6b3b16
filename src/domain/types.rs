//! # Domain Types
//!
//! Records, aggregates and classified commands shared across the application.

use serde::{Deserialize, Serialize};

/// Weekly count at which a period is considered complete and a rollup is sent.
pub const MONTH_COMPLETE_WEEK: u32 = 4;

/// One row per (student, period, week).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemorizationRecord {
    pub id: i64,
    pub student_name: String,
    pub period_label: String,
    pub week_number: u32,
    pub pages_this_week: u32,
    pub cumulative_total: f64,
    pub recorded_at: String,
}

/// A record before the store assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub student_name: String,
    pub period_label: String,
    pub pages_this_week: u32,
    pub cumulative_total: f64,
}

/// How the store picks the week number of an appended record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekAssignment {
    /// `max(week) + 1` for the student and period, or 1.
    Next,
    /// Caller supplied week; rejected unless it equals the next week.
    Exact(u32),
}

/// Monthly aggregate for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct RollupRow {
    pub student_name: String,
    pub period_label: String,
    pub weeks: u32,
    pub pages_total: u64,
    pub latest_total: f64,
}

/// Quick-reply menu entries. Labels are matched literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    AddMemorization,
    EditMemorization,
    ViewStudent,
    PickPeriod,
    ListStudents,
    AutoRollupInfo,
}

impl MenuItem {
    pub const ALL: [MenuItem; 6] = [
        MenuItem::AddMemorization,
        MenuItem::EditMemorization,
        MenuItem::ViewStudent,
        MenuItem::PickPeriod,
        MenuItem::ListStudents,
        MenuItem::AutoRollupInfo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::AddMemorization => "➕ Tambah Hafalan",
            MenuItem::EditMemorization => "✏️ Edit Hafalan",
            MenuItem::ViewStudent => "📊 Lihat Data Santri",
            MenuItem::PickPeriod => "📅 Pilih Bulan Hafalan",
            MenuItem::ListStudents => "📜 Daftar Santri",
            MenuItem::AutoRollupInfo => "🔄 Rekap Otomatis",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.label() == text)
    }
}

/// A classified chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    Cancel,
    Menu(MenuItem),
    AddMemorization {
        student_name: String,
        pages_this_week: u32,
        cumulative_total: f64,
        period_label: Option<String>,
    },
    AddMemorizationExplicit {
        student_name: String,
        pages_this_week: u32,
        week_number: u32,
        cumulative_total: u32,
    },
    EditMemorization {
        student_name: String,
        week_number: u32,
        pages_this_week: u32,
        cumulative_total: f64,
    },
    QueryByStudent {
        student_name: String,
    },
    QueryByStudentAndPeriod {
        student_name: String,
        period_label: String,
    },
    ListStudents,
    MonthlyRollup {
        period_label: String,
        student_name: Option<String>,
    },
}

impl Command {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Cancel => "cancel",
            Command::Menu(_) => "menu",
            Command::AddMemorization { .. } => "add",
            Command::AddMemorizationExplicit { .. } => "add_explicit",
            Command::EditMemorization { .. } => "edit",
            Command::QueryByStudent { .. } => "query_student",
            Command::QueryByStudentAndPeriod { .. } => "query_student_period",
            Command::ListStudents => "list_students",
            Command::MonthlyRollup { .. } => "rollup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_match_literally() {
        for item in MenuItem::ALL {
            assert_eq!(MenuItem::from_label(item.label()), Some(item));
        }
        assert_eq!(MenuItem::from_label("Tambah Hafalan"), None);
        assert_eq!(MenuItem::from_label("➕ tambah hafalan"), None);
    }
}
