use crate::core::patterns::SignatureKind;
use crate::core::scanner::ScanResult;

const BANNER_WIDTH: usize = 80;

/// Centers `name` in an 80-column rule of dashes.
pub fn banner(name: &str) -> String {
    let fill = BANNER_WIDTH.saturating_sub(name.chars().count());
    let left = fill.div_ceil(2);
    format!("{}{}{}", "-".repeat(left), name, "-".repeat(fill - left))
}

/// Renders the line-by-line marker report for one scanned file.
///
/// Only job boundaries and line-level errors are listed; line numbers are 1-based.
pub fn render(name: &str, scan_result: &ScanResult) -> String {
    let mut out = format!(
        "{}\n\tNumber of job start statements:\t\t{}\n\tNumber of termination statements:\t{}\n\n\tLine-by-line analysis:\n",
        banner(name),
        scan_result.count(SignatureKind::JobStart),
        scan_result.count(SignatureKind::Termination),
    );
    let rows = scan_result.markers.iter().filter(|m| {
        matches!(m.kind, SignatureKind::JobStart | SignatureKind::Termination)
            || m.kind.is_line_error()
    });
    for marker in rows {
        out.push_str(&format!("\t\t{:<32}{}\n", marker.kind.label(), marker.line + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::LogDocument;
    use crate::core::patterns::Program;
    use crate::core::scanner::scan;

    #[test]
    fn banner_is_centered_in_eighty_columns() {
        let line = banner("water.log");
        assert_eq!(line.len(), 80);
        assert!(line.starts_with(&"-".repeat(36)));
        assert!(line.ends_with(&format!("water.log{}", "-".repeat(35))));
    }

    #[test]
    fn long_names_are_not_padded() {
        let name = "x".repeat(90);
        assert_eq!(banner(&name), name);
    }

    #[test]
    fn report_lists_markers_with_one_based_lines() {
        let doc = LogDocument::new(
            " Entering Link 1\n Erroneous write. Write -1 instead of 12.\n Atomic number out of range for STO-3G\n Normal termination of Gaussian 16\n",
        );
        let result = scan(&doc, Program::Gaussian.catalog());
        let text = render("h2o.log", &result);
        let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("\t\t")).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("JOB START") && rows[0].ends_with('1'));
        assert!(rows[1].contains("ERRONEOUS WRITE") && rows[1].ends_with('2'));
        assert!(rows[2].contains("NORM TERM") && rows[2].ends_with('4'));
        assert!(text.contains("Number of termination statements:\t1"));
    }

    #[test]
    fn header_precedes_rows() {
        let doc = LogDocument::new(" Entering Link 1\n");
        let text = render("a.log", &scan(&doc, Program::Gaussian.catalog()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], banner("a.log"));
        assert_eq!(lines[1], "\tNumber of job start statements:\t\t1");
        assert_eq!(lines[2], "\tNumber of termination statements:\t0");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "\tLine-by-line analysis:");
        assert_eq!(lines[5], format!("\t\t{:<32}1", "JOB START"));
        assert_eq!(lines.len(), 6);
    }
}
