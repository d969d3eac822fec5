//! CLI command implementations.

pub mod init;
pub mod run;
pub mod sweep;
pub mod evolve;

use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;

/// Progress bar in the house style.
pub(crate) fn progress(len: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let template = format!("{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit}");
    if let Ok(style) = ProgressStyle::default_bar().template(&template) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// `run_` followed by the first eight hex digits of a fresh v4 uuid.
pub(crate) fn run_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("run_{}", &hex[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_short_and_distinct() {
        let a = run_id();
        assert_eq!(a.len(), "run_".len() + 8);
        assert!(a.starts_with("run_"));
        assert_ne!(a, run_id());
    }
}
