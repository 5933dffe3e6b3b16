//! # Help Text
//!
//! Greeting, quick-reply menu and command reference.
//! Displayed via `/start`, `/menu` and `/bantuan`.

use crate::domain::types::MenuItem;

pub const GREETING: &str = "Halo! Selamat datang di bot **Hafalan Santri**.";

/// Menu rendered as a markdown list. Labels are sent back verbatim by the caretaker.
pub fn menu() -> String {
    let mut out = String::from("**Pilih menu:**\n");
    for item in MenuItem::ALL {
        out.push_str("* ");
        out.push_str(item.label());
        out.push('\n');
    }
    out
}

pub fn main(commands: &[String]) -> String {
    let mut out = String::from("**📖 Bantuan Hafalan Santri**\n\n**Perintah**\n");
    for command in commands {
        out.push_str(&format!("* `{command}`\n"));
    }
    out.push_str(concat!(
        "\n",
        "**⚡ Lainnya**\n",
        "* /menu: tampilkan menu\n",
        "* /batal: batalkan dialog\n",
        "* /bantuan: bantuan ini\n",
    ));
    out
}
