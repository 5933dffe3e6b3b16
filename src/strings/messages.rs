//! # Messages
//!
//! Constant strings and format functions for user-facing replies.
//! Record rendering lives in `application::formatter`.

pub const STORAGE_FAILURE: &str =
    "🙏 Maaf, terjadi kesalahan saat mengakses data. Silakan coba lagi nanti.";
pub const UNKNOWN_MESSAGE: &str = "❓ Pesan tidak dikenali. Ketik /menu atau /bantuan.";
pub const NO_STUDENTS: &str = "⚠️ Belum ada data santri yang tersimpan.";
pub const VIEW_STUDENT_PROMPT: &str = "Ketik nama santri untuk melihat data hafalannya.";
pub const ASK_STUDENT_NAME: &str = "Masukkan nama santri yang ingin dicek hafalannya:";
pub const DIALOGUE_CANCELLED: &str = "❌ Dialog dibatalkan.";
pub const NOTHING_TO_CANCEL: &str = "Tidak ada dialog yang sedang berjalan.";
pub const AUTO_ROLLUP_INFO: &str = "🔄 Setiap laporan baru akan disimpan otomatis sesuai pekan, dan pekan akan reset jika masuk bulan baru. Rekap bulanan dikirim otomatis saat pekan ke-4 tercatat.";

pub fn ask_period(example: &str) -> String {
    format!("Masukkan bulan dan tahun (misal: {example}):")
}

pub fn send_in_format(usage: &str) -> String {
    format!("Kirim data dengan format:\n`{usage}`")
}

pub fn format_error(usage: &str) -> String {
    format!("⚠️ **Format salah.** Kirim data dengan format:\n`{usage}`")
}

pub fn view_student_usage(usage: &str) -> String {
    format!("Lihat data hafalan dengan format:\n`{usage}`")
}

pub fn no_student_data(name: &str) -> String {
    format!("⚠️ Tidak ada data hafalan untuk {name}.")
}

pub fn no_period_data(name: &str, period: &str) -> String {
    format!("⚠️ Tidak ada data hafalan untuk {name} di {period}.")
}

pub fn no_rollup_data(period: &str) -> String {
    format!("⚠️ Tidak ada data hafalan di {period}.")
}

pub fn no_week_to_edit(name: &str, week: u32, period: &str) -> String {
    format!("⚠️ Data hafalan {name} pekan {week} di {period} tidak ditemukan.")
}

pub fn week_mismatch(name: &str, expected: u32, requested: u32) -> String {
    format!(
        "⚠️ Pekan {requested} tidak bisa dicatat untuk {name}. Pekan berikutnya adalah pekan {expected}."
    )
}
