//! # Response Formatter
//!
//! Pure rendering of ledger results into chat text. Every cumulative total goes
//! through `format_total`.

use crate::domain::types::{MemorizationRecord, RollupRow};
use crate::strings::messages;

/// Whole numbers without a decimal point, fractions as they are.
pub fn format_total(total: f64) -> String {
    if total.is_finite() && total.fract() == 0.0 && total.abs() < 1e15 {
        format!("{}", total as i64)
    } else {
        format!("{total}")
    }
}

/// Backslash-escapes characters that would change markdown rendering of free text.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '~' | '#' | '|' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn week_block(out: &mut String, record: &MemorizationRecord) {
    out.push_str(&format!(
        "📖 Hafalan Baru: {} Halaman\n📚 Total Hafalan: {} Juz\n",
        record.pages_this_week,
        format_total(record.cumulative_total)
    ));
}

pub fn added(record: &MemorizationRecord) -> String {
    format!(
        "✅ Data hafalan **{}** tersimpan sebagai pekan ke-{} ({}).\n📖 Hafalan Baru: {} Halaman\n📚 Total Hafalan: {} Juz",
        escape_markdown(&record.student_name),
        record.week_number,
        escape_markdown(&record.period_label),
        record.pages_this_week,
        format_total(record.cumulative_total)
    )
}

pub fn edited(record: &MemorizationRecord) -> String {
    format!(
        "✏️ Data hafalan **{}** pekan ke-{} ({}) diperbarui.\n📖 Hafalan Baru: {} Halaman\n📚 Total Hafalan: {} Juz",
        escape_markdown(&record.student_name),
        record.week_number,
        escape_markdown(&record.period_label),
        record.pages_this_week,
        format_total(record.cumulative_total)
    )
}

/// All records of one student, as returned by the ledger.
pub fn student_records(student_name: &str, records: &[MemorizationRecord]) -> String {
    if records.is_empty() {
        return messages::no_student_data(student_name);
    }
    let mut out = format!("📊 **Data hafalan {}:**\n", escape_markdown(student_name));
    for record in records {
        out.push_str(&format!(
            "\n📅 {} - Pekan {}\n",
            escape_markdown(&record.period_label),
            record.week_number
        ));
        week_block(&mut out, record);
    }
    out
}

/// Records of one student in one period.
pub fn period_records(student_name: &str, period_label: &str, records: &[MemorizationRecord]) -> String {
    if records.is_empty() {
        return messages::no_period_data(student_name, period_label);
    }
    let mut out = format!(
        "📅 **Data hafalan {} pada {}:**\n",
        escape_markdown(student_name),
        escape_markdown(period_label)
    );
    for record in records {
        out.push_str(&format!("\n📅 Pekan {}\n", record.week_number));
        week_block(&mut out, record);
    }
    out
}

pub fn student_list(names: &[String]) -> String {
    if names.is_empty() {
        return messages::NO_STUDENTS.to_string();
    }
    let list = names
        .iter()
        .map(|name| format!("👤 {}", escape_markdown(name)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("📜 **Daftar Santri yang Tersimpan:**\n\n{list}")
}

pub fn rollup(period_label: &str, rows: &[RollupRow]) -> String {
    if rows.is_empty() {
        return messages::no_rollup_data(period_label);
    }
    let mut out = format!("🔄 **Rekap Hafalan {}:**\n", escape_markdown(period_label));
    for row in rows {
        out.push_str(&format!(
            "\n👤 {} ({} pekan)\n📖 Total Hafalan Baru: {} Halaman\n📚 Total Hafalan Terakhir: {} Juz\n",
            escape_markdown(&row.student_name),
            row.weeks,
            row.pages_total,
            format_total(row.latest_total)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(week: u32, pages: u32, total: f64) -> MemorizationRecord {
        MemorizationRecord {
            id: i64::from(week),
            student_name: "Ahmad".to_string(),
            period_label: "March 2025".to_string(),
            week_number: week,
            pages_this_week: pages,
            cumulative_total: total,
            recorded_at: "2025-03-10T08:00:00+07:00".to_string(),
        }
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(3.0), "3");
        assert_eq!(format_total(3.5), "3.5");
        assert_eq!(format_total(2.25), "2.25");
        assert_eq!(format_total(0.0), "0");
        assert_eq!(format_total(30.0), "30");
    }

    #[test]
    fn test_student_records_render_totals() {
        let text = student_records("Ahmad", &[record(1, 5, 2.0), record(2, 4, 2.25)]);
        assert!(text.contains("Pekan 1"));
        assert!(text.contains("📚 Total Hafalan: 2 Juz"));
        assert!(text.contains("📚 Total Hafalan: 2.25 Juz"));
        assert!(text.find("Pekan 1").unwrap() < text.find("Pekan 2").unwrap());
        assert!(!text.contains("2.0 Juz"));
    }

    #[test]
    fn test_empty_results_are_informational() {
        assert_eq!(student_records("Ahmad", &[]), messages::no_student_data("Ahmad"));
        assert_eq!(
            period_records("Ahmad", "May 2025", &[]),
            messages::no_period_data("Ahmad", "May 2025")
        );
        assert_eq!(student_list(&[]), messages::NO_STUDENTS);
        assert_eq!(rollup("May 2025", &[]), messages::no_rollup_data("May 2025"));
    }

    #[test]
    fn test_student_list() {
        let text = student_list(&["Ahmad".to_string(), "Zaid".to_string()]);
        assert!(text.ends_with("👤 Ahmad\n👤 Zaid"));
    }

    #[test]
    fn test_rollup_rendering() {
        let rows = vec![RollupRow {
            student_name: "Fatimah".to_string(),
            period_label: "March 2025".to_string(),
            weeks: 4,
            pages_total: 18,
            latest_total: 3.0,
        }];
        let text = rollup("March 2025", &rows);
        assert!(text.contains("Rekap Hafalan March 2025"));
        assert!(text.contains("18 Halaman"));
        assert!(text.contains("3 Juz"));
    }

    #[test]
    fn test_names_are_escaped() {
        assert_eq!(escape_markdown("Ahmad"), "Ahmad");
        assert_eq!(escape_markdown("Abdul_Aziz *2*"), "Abdul\\_Aziz \\*2\\*");

        let mut rec = record(1, 5, 2.0);
        rec.student_name = "Abdul_Aziz*".to_string();
        assert!(added(&rec).contains("**Abdul\\_Aziz\\***"));
        assert!(student_records("Abdul_Aziz*", &[rec]).contains("**Data hafalan Abdul\\_Aziz\\*:**"));
        assert!(student_list(&["Zaid_1".to_string()]).ends_with("👤 Zaid\\_1"));
    }
}
