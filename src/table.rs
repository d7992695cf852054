//! Plain-text table rendering for CLI output.

use std::fmt::Write as _;

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    write_line(&mut output, headers.iter().map(|h| (*h).to_string()), &widths);
    write_line(&mut output, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in rows {
        write_line(&mut output, row.iter().cloned(), &widths);
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn write_line(output: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    let mut line = String::new();
    for (idx, cell) in cells.enumerate().take(widths.len()) {
        if idx > 0 {
            line.push_str("  ");
        }
        let padding = widths[idx].saturating_sub(cell.chars().count());
        line.push_str(&cell);
        if idx + 1 < widths.len() {
            line.push_str(&" ".repeat(padding));
        }
    }
    let _ = writeln!(output, "{}", line.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let rendered = render_table(
            &["outlet", "qty"],
            &[
                vec!["Main Street".to_string(), "12".to_string()],
                vec!["Depot".to_string(), "7".to_string()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "outlet       qty");
        assert_eq!(lines[1], "-----------  ---");
        assert_eq!(lines[2], "Main Street  12");
        assert_eq!(lines[3], "Depot        7");
    }
}
