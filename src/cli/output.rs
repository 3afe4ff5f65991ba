//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command. Secret values themselves are
//! printed bare, without styling, so they can be piped.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::SecretItem;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of secret metadata (Name, Enabled, Content Type, Created, Updated).
pub fn print_secrets_table(secrets: &[SecretItem]) {
    if secrets.is_empty() {
        info("No secrets in this vault yet.");
        tip("Run `kvpoll set <NAME> <VALUE>` to add your first secret.");
        return;
    }

    println!("{}", secrets_table(secrets));
}

fn secrets_table(secrets: &[SecretItem]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Enabled", "Content Type", "Created", "Updated"]);

    for s in secrets {
        let enabled = match s.enabled {
            Some(true) => "yes",
            Some(false) => "no",
            None => "-",
        };
        table.add_row(vec![
            s.name.clone(),
            enabled.to_string(),
            s.content_type.clone().unwrap_or_else(|| "-".to_string()),
            format_time(s.created_at),
            format_time(s.updated_at),
        ]);
    }

    table
}

fn format_time(t: Option<chrono::DateTime<chrono::Utc>>) -> String {
    t.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}
