//! Client filename sanitizing

const FALLBACK_NAME: &str = "document.pdf";

/// Reduce a client-supplied filename to a safe display name
///
/// Directory components are dropped, whitespace becomes `_`, and anything
/// outside `[A-Za-z0-9._-]` is removed. Leading/trailing dots and
/// underscores are trimmed so the result can never be a relative path.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            _ => None,
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize_filename("report-2024_v2.pdf"), "report-2024_v2.pdf");
    }

    #[test]
    fn test_directories_removed() {
        assert_eq!(sanitize_filename("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\me\\scan.pdf"), "scan.pdf");
    }

    #[test]
    fn test_spaces_and_symbols() {
        assert_eq!(sanitize_filename("my report (final).pdf"), "my_report_final.pdf");
        assert_eq!(sanitize_filename("relatório.pdf"), "relatrio.pdf");
    }

    #[test]
    fn test_fallback() {
        assert_eq!(sanitize_filename(""), "document.pdf");
        assert_eq!(sanitize_filename("..."), "document.pdf");
        assert_eq!(sanitize_filename("ééé"), "document.pdf");
    }
}
