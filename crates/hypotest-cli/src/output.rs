//! Output formatting utilities

use colored::Colorize;
use hypotest::catalog::Decision;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print the decision with a colored tag
pub(crate) fn verdict(decision: Decision) {
    let tag = match decision {
        Decision::Reject => "[REJECT]".red().bold(),
        Decision::FailToReject => "[FAIL TO REJECT]".green().bold(),
    };
    println!("  {tag} {decision} the null hypothesis");
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Format a float for table cells
pub(crate) fn num(value: f64) -> String {
    if value == 0.0 || (1e-4..1e6).contains(&value.abs()) {
        format!("{value:.4}")
    } else {
        format!("{value:.4e}")
    }
}

/// Format an optional float; absent values render as `-`
pub(crate) fn opt_num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), num)
}

/// Print a left-aligned text table with a bold header row
pub(crate) fn table(header: &[String], rows: &[Vec<String>]) {
    let widths: Vec<usize> = (0..header.len())
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(String::len)
                .chain(std::iter::once(header[c].len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("  {}", line(header).bold());
    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    println!("  {}", "-".repeat(rule_width).dimmed());
    for row in rows {
        println!("  {}", line(row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_fixed_and_scientific() {
        assert_eq!(num(0.0), "0.0000");
        assert_eq!(num(24.142_857), "24.1429");
        assert_eq!(num(1.314e-5), "1.3140e-5");
        assert_eq!(num(-2.5), "-2.5000");
    }

    #[test]
    fn test_opt_num() {
        assert_eq!(opt_num(None), "-");
        assert_eq!(opt_num(Some(0.5)), "0.5000");
    }
}
