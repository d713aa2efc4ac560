//! Output formatting for CLI

use crate::quarto::OutcomeCounts;

const RULE_WIDTH: usize = 60;
const SUBRULE_WIDTH: usize = 40;

/// Print a section header between two `=` rules
pub fn print_section(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{rule}\n{title}\n{rule}");
}

/// Print a subsection header underlined with `-`
pub fn print_subsection(title: &str) {
    println!("\n{title}\n{}", "-".repeat(SUBRULE_WIDTH));
}

/// Format a count with comma thousands separators
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        rem => rem,
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    grouped.push_str(&digits[..lead]);
    for group in digits.as_bytes()[lead..].chunks(3) {
        grouped.push(',');
        grouped.extend(group.iter().map(|&b| char::from(b)));
    }
    grouped
}

/// Format a count together with its share of `total`
pub fn format_share(count: usize, total: usize) -> String {
    let pct = if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    };
    format!("{} ({pct:.1}%)", format_number(count))
}

/// Print an indented `key: value` row with aligned values
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<20} {value}", format!("{key}:"));
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, &str)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print win/tie/loss tallies
pub fn print_outcome_counts(counts: &OutcomeCounts) {
    let total = counts.total();
    print_stats_table(&[
        ("Episodes", &format_number(total)),
        ("Wins", &format_share(counts.wins, total)),
        ("Ties", &format_share(counts.ties, total)),
        ("Losses", &format_share(counts.losses, total)),
    ]);
}
