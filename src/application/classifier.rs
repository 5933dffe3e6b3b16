//! # Input Classifier
//!
//! Turns one line of chat text into a `Command`. Recognizes slash commands, quick-reply
//! menu labels and delimiter-separated keyword commands. Text matching none of these is
//! handled by the configured fallback policy.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::config::{ClassifierConfig, PeriodSource, UnknownTextPolicy};
use crate::domain::errors::ClassifyError;
use crate::domain::types::{Command, MenuItem};

// Non-negative number, `.` or `,` as decimal separator.
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:[.,]\d+)?$").expect("number pattern is valid"));

const NAME: &str = "Nama Santri";
const PAGES: &str = "Hafalan Baru (halaman)";
const TOTAL: &str = "Total Hafalan (juz)";
const WEEK: &str = "Pekan";
const PERIOD: &str = "Bulan Tahun (misal: Maret 2025)";

/// A keyword command and the fields it takes after the keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Add,
    AddExplicit,
    Edit,
    View,
    ViewPeriod,
    ListStudents,
    Rollup,
}

impl Shape {
    const ALL: [Shape; 7] = [
        Shape::Add,
        Shape::AddExplicit,
        Shape::Edit,
        Shape::View,
        Shape::ViewPeriod,
        Shape::ListStudents,
        Shape::Rollup,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Shape::Add => "TambahHafalan",
            Shape::AddExplicit => "TambahHafalanPekan",
            Shape::Edit => "EditHafalan",
            Shape::View => "LihatHafalan",
            Shape::ViewPeriod => "HafalanBulan",
            Shape::ListStudents => "DaftarSantri",
            Shape::Rollup => "Rekap",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.keyword().eq_ignore_ascii_case(word))
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    delimiter: char,
    unknown_text: UnknownTextPolicy,
    period_source: PeriodSource,
}

impl Classifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            unknown_text: config.unknown_text,
            period_source: config.period_source,
        }
    }

    pub fn unknown_text(&self) -> UnknownTextPolicy {
        self.unknown_text
    }

    /// Usage lines of every keyword command, for the help text.
    pub fn usages(&self) -> Vec<String> {
        Shape::ALL.into_iter().map(|shape| self.usage(shape)).collect()
    }

    /// Classifies `message`, applying the fallback policy to free text.
    pub fn classify(&self, message: &str) -> Result<Command, ClassifyError> {
        match self.recognize(message) {
            Some(result) => result,
            None => self.fallback(message),
        }
    }

    /// Classifies `message` only if it is a slash command, a menu label or a keyword
    /// command. Returns `None` for free text.
    pub fn recognize(&self, message: &str) -> Option<Result<Command, ClassifyError>> {
        let text = message.trim();
        if text.is_empty() {
            return None;
        }

        if let Some(item) = MenuItem::from_label(text) {
            return Some(Ok(Command::Menu(item)));
        }

        if text.starts_with('/') {
            let word = text.split_whitespace().next().unwrap_or(text);
            // Strip a `/cmd@botname` suffix.
            let word = word.split('@').next().unwrap_or(word).to_ascii_lowercase();
            return match word.as_str() {
                "/start" | "/menu" => Some(Ok(Command::Start)),
                "/bantuan" | "/help" => Some(Ok(Command::Help)),
                "/batal" | "/cancel" => Some(Ok(Command::Cancel)),
                _ => None,
            };
        }

        let mut fields = text.split(self.delimiter).map(str::trim);
        let head = fields.next()?;
        let shape = Shape::from_keyword(head)?;
        let args: Vec<&str> = fields.collect();
        Some(self.parse(shape, &args))
    }

    /// Handles free text according to `unknown_text`.
    pub fn fallback(&self, message: &str) -> Result<Command, ClassifyError> {
        let text = message.trim();
        match self.unknown_text {
            UnknownTextPolicy::QueryStudent if !text.is_empty() => Ok(Command::QueryByStudent {
                student_name: text.to_string(),
            }),
            _ => Err(ClassifyError::Unrecognized),
        }
    }

    /// The expected format of `shape` in the configured dialect.
    pub fn usage(&self, shape: Shape) -> String {
        let joiner = match self.delimiter {
            ';' => "; ".to_string(),
            d => format!(" {d} "),
        };
        let (required, optional) = self.fields(shape);

        let mut out = shape.keyword().to_string();
        for field in required {
            out.push_str(&joiner);
            out.push_str(field);
        }
        for field in optional {
            out.push('[');
            out.push_str(&joiner);
            out.push_str(field);
            out.push(']');
        }
        out
    }

    fn fields(&self, shape: Shape) -> (Vec<&'static str>, Vec<&'static str>) {
        match shape {
            Shape::Add => match self.period_source {
                PeriodSource::Clock => (vec![NAME, PAGES, TOTAL], vec![]),
                PeriodSource::Message => (vec![NAME, PAGES, TOTAL, PERIOD], vec![]),
            },
            Shape::AddExplicit => (vec![NAME, PAGES, WEEK, TOTAL], vec![]),
            Shape::Edit => (vec![NAME, WEEK, PAGES, TOTAL], vec![]),
            Shape::View => (vec![NAME], vec![PERIOD]),
            Shape::ViewPeriod => (vec![NAME, PERIOD], vec![]),
            Shape::ListStudents => (vec![], vec![]),
            Shape::Rollup => (vec![PERIOD], vec![NAME]),
        }
    }

    fn parse(&self, shape: Shape, args: &[&str]) -> Result<Command, ClassifyError> {
        let (required, optional) = self.fields(shape);
        let arity_ok = args.len() >= required.len() && args.len() <= required.len() + optional.len();
        if !arity_ok || args.iter().any(|a| a.is_empty()) {
            return Err(self.format_error(shape));
        }

        let command = match shape {
            Shape::Add => Command::AddMemorization {
                student_name: args[0].to_string(),
                pages_this_week: self.count(shape, args[1])?,
                cumulative_total: self.total(shape, args[2])?,
                period_label: args.get(3).map(|p| p.to_string()),
            },
            Shape::AddExplicit => Command::AddMemorizationExplicit {
                student_name: args[0].to_string(),
                pages_this_week: self.count(shape, args[1])?,
                week_number: self.week(shape, args[2])?,
                cumulative_total: self.count(shape, args[3])?,
            },
            Shape::Edit => Command::EditMemorization {
                student_name: args[0].to_string(),
                week_number: self.week(shape, args[1])?,
                pages_this_week: self.count(shape, args[2])?,
                cumulative_total: self.total(shape, args[3])?,
            },
            Shape::View => match args.get(1) {
                Some(period) => Command::QueryByStudentAndPeriod {
                    student_name: args[0].to_string(),
                    period_label: period.to_string(),
                },
                None => Command::QueryByStudent {
                    student_name: args[0].to_string(),
                },
            },
            Shape::ViewPeriod => Command::QueryByStudentAndPeriod {
                student_name: args[0].to_string(),
                period_label: args[1].to_string(),
            },
            Shape::ListStudents => Command::ListStudents,
            Shape::Rollup => Command::MonthlyRollup {
                period_label: args[0].to_string(),
                student_name: args.get(1).map(|n| n.to_string()),
            },
        };
        Ok(command)
    }

    fn format_error(&self, shape: Shape) -> ClassifyError {
        ClassifyError::Format {
            keyword: shape.keyword().to_string(),
            expected: self.usage(shape),
        }
    }

    fn count(&self, shape: Shape, field: &str) -> Result<u32, ClassifyError> {
        field.parse::<u32>().map_err(|_| self.format_error(shape))
    }

    fn week(&self, shape: Shape, field: &str) -> Result<u32, ClassifyError> {
        match self.count(shape, field)? {
            0 => Err(self.format_error(shape)),
            week => Ok(week),
        }
    }

    fn total(&self, shape: Shape, field: &str) -> Result<f64, ClassifyError> {
        if !NUMBER.is_match(field) {
            return Err(self.format_error(shape));
        }
        field
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.format_error(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&ClassifierConfig::default())
    }

    fn dash() -> Classifier {
        Classifier::new(&ClassifierConfig {
            delimiter: '-',
            ..ClassifierConfig::default()
        })
    }

    #[test]
    fn test_add_memorization() {
        let cmd = classifier().classify("TambahHafalan; Ahmad; 5; 2").unwrap();
        assert_eq!(
            cmd,
            Command::AddMemorization {
                student_name: "Ahmad".to_string(),
                pages_this_week: 5,
                cumulative_total: 2.0,
                period_label: None,
            }
        );
    }

    #[test]
    fn test_add_memorization_fractional_total() {
        let c = classifier();
        let dot = c.classify("tambahhafalan;Ahmad;4;2.25").unwrap();
        let comma = c.classify("TambahHafalan; Ahmad; 4; 2,25").unwrap();
        assert_eq!(dot, comma);
        assert!(matches!(dot, Command::AddMemorization { cumulative_total, .. } if cumulative_total == 2.25));
    }

    #[test]
    fn test_missing_fields_is_format_error() {
        let err = classifier().classify("TambahHafalan; Ahmad").unwrap_err();
        match err {
            ClassifyError::Format { keyword, expected } => {
                assert_eq!(keyword, "TambahHafalan");
                assert_eq!(
                    expected,
                    "TambahHafalan; Nama Santri; Hafalan Baru (halaman); Total Hafalan (juz)"
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_fields_are_format_errors() {
        let c = classifier();
        for input in [
            "TambahHafalan; Ahmad; lima; 2",
            "TambahHafalan; Ahmad; 5; dua",
            "TambahHafalan; Ahmad; -5; 2",
            "TambahHafalan; Ahmad; 5; -2",
            "TambahHafalan; Ahmad; 5; NaN",
            "TambahHafalan; ; 5; 2",
            "TambahHafalan; Ahmad; 5; 2; Maret 2025",
            "EditHafalan; Ahmad; 0; 5; 2",
            "TambahHafalanPekan; Ahmad; 5; 1; 2.5",
        ] {
            assert!(
                matches!(c.classify(input), Err(ClassifyError::Format { .. })),
                "{input} should be rejected"
            );
        }

        let overflow = format!("TambahHafalan; Ahmad; 3; {}", "9".repeat(400));
        assert!(matches!(c.classify(&overflow), Err(ClassifyError::Format { .. })));
    }

    #[test]
    fn test_period_from_message() {
        let c = Classifier::new(&ClassifierConfig {
            period_source: PeriodSource::Message,
            ..ClassifierConfig::default()
        });
        let cmd = c.classify("TambahHafalan; Ahmad; 5; 2; Maret 2025").unwrap();
        assert!(matches!(
            cmd,
            Command::AddMemorization { period_label: Some(ref p), .. } if p == "Maret 2025"
        ));
        assert!(matches!(
            c.classify("TambahHafalan; Ahmad; 5; 2"),
            Err(ClassifyError::Format { .. })
        ));
        assert!(c.usage(Shape::Add).ends_with("Bulan Tahun (misal: Maret 2025)"));
    }

    #[test]
    fn test_explicit_and_edit() {
        let c = classifier();
        assert_eq!(
            c.classify("TambahHafalanPekan; Ahmad; 5; 2; 3").unwrap(),
            Command::AddMemorizationExplicit {
                student_name: "Ahmad".to_string(),
                pages_this_week: 5,
                week_number: 2,
                cumulative_total: 3,
            }
        );
        assert_eq!(
            c.classify("EditHafalan; Ahmad; 1; 6; 2.5").unwrap(),
            Command::EditMemorization {
                student_name: "Ahmad".to_string(),
                week_number: 1,
                pages_this_week: 6,
                cumulative_total: 2.5,
            }
        );
    }

    #[test]
    fn test_queries_and_rollup() {
        let c = classifier();
        assert_eq!(
            c.classify("LihatHafalan; Ahmad").unwrap(),
            Command::QueryByStudent { student_name: "Ahmad".to_string() }
        );
        assert_eq!(
            c.classify("LihatHafalan; Ahmad; March 2025").unwrap(),
            Command::QueryByStudentAndPeriod {
                student_name: "Ahmad".to_string(),
                period_label: "March 2025".to_string(),
            }
        );
        assert_eq!(
            c.classify("HafalanBulan; Ahmad; March 2025").unwrap(),
            Command::QueryByStudentAndPeriod {
                student_name: "Ahmad".to_string(),
                period_label: "March 2025".to_string(),
            }
        );
        assert_eq!(c.classify("DaftarSantri").unwrap(), Command::ListStudents);
        assert_eq!(
            c.classify("Rekap; March 2025").unwrap(),
            Command::MonthlyRollup { period_label: "March 2025".to_string(), student_name: None }
        );
        assert_eq!(
            c.classify("Rekap; March 2025; Fatimah").unwrap(),
            Command::MonthlyRollup {
                period_label: "March 2025".to_string(),
                student_name: Some("Fatimah".to_string()),
            }
        );
        assert!(matches!(c.classify("DaftarSantri; x"), Err(ClassifyError::Format { .. })));
    }

    #[test]
    fn test_dash_dialect() {
        let c = dash();
        assert_eq!(
            c.classify("TambahHafalan - Ahmad - 5 - 2.5").unwrap(),
            Command::AddMemorization {
                student_name: "Ahmad".to_string(),
                pages_this_week: 5,
                cumulative_total: 2.5,
                period_label: None,
            }
        );
        assert_eq!(
            c.usage(Shape::Rollup),
            "Rekap - Bulan Tahun (misal: Maret 2025)[ - Nama Santri]"
        );
        // `;` is not a delimiter here, so the keyword never matches.
        assert_eq!(
            c.classify("TambahHafalan; Ahmad; 5; 2").unwrap(),
            Command::QueryByStudent { student_name: "TambahHafalan; Ahmad; 5; 2".to_string() }
        );
    }

    #[test]
    fn test_menu_and_slash_commands() {
        let c = classifier();
        assert_eq!(
            c.classify("📅 Pilih Bulan Hafalan").unwrap(),
            Command::Menu(MenuItem::PickPeriod)
        );
        assert_eq!(c.classify("/start").unwrap(), Command::Start);
        assert_eq!(c.classify("/start@hafalan_bot").unwrap(), Command::Start);
        assert_eq!(c.classify("/Batal").unwrap(), Command::Cancel);
        assert_eq!(c.classify("/bantuan").unwrap(), Command::Help);
    }

    #[test]
    fn test_fallback_policy() {
        let c = classifier();
        assert!(c.recognize("Siti Aisyah").is_none());
        assert_eq!(
            c.classify("  Siti Aisyah ").unwrap(),
            Command::QueryByStudent { student_name: "Siti Aisyah".to_string() }
        );
        assert_eq!(c.classify("   "), Err(ClassifyError::Unrecognized));

        let strict = Classifier::new(&ClassifierConfig {
            unknown_text: UnknownTextPolicy::Reject,
            ..ClassifierConfig::default()
        });
        assert_eq!(strict.classify("Siti Aisyah"), Err(ClassifyError::Unrecognized));
        assert_eq!(strict.classify("/unknown"), Err(ClassifyError::Unrecognized));
    }
}
