/// Frame a multi-line message between two horizontal rules, indented by one
/// space and padded to the widest line.
pub fn render_message_box(message: &str) -> String {
    const INDENT: usize = 1;

    let lines: Vec<&str> = message.split('\n').collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = "═".repeat(width + INDENT * 2);
    let space = " ".repeat(INDENT);

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    for line in &lines {
        out.push_str(&format!("{space}{line:<width$}{space}\n"));
    }
    out.push_str(&border);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_pads_to_widest_line() {
        let rendered = render_message_box("feat: add\n\nlonger body");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "═".repeat(13));
        assert_eq!(lines[1], " feat: add   ");
        assert_eq!(lines[2], " ".repeat(13));
        assert_eq!(lines[3], " longer body ");
        assert_eq!(lines[4], "═".repeat(13));
    }

    #[test]
    fn test_box_counts_chars_not_bytes() {
        let rendered = render_message_box("한글");
        assert!(rendered.starts_with(&"═".repeat(4)));
    }
}
