//! Single-line diagnostic formatting.
//!
//! All errors in this interpreter are fatal (see the run's failure
//! semantics): there is no recovery, so there is no need for the
//! multi-severity, span-carrying diagnostic machinery a batch compiler
//! would use. One function renders the two forms the spec allows.

/// Renders a fatal runtime error as the single line the driver writes to
/// the terminal before halting.
///
/// ```
/// use basic_util::format_diagnostic;
///
/// assert_eq!(format_diagnostic(Some(100), "Target line not found"), "Error at line 100: Target line not found\n");
/// assert_eq!(format_diagnostic(None, "Program capacity exceeded"), "Error: Program capacity exceeded\n");
/// ```
pub fn format_diagnostic(line_number: Option<u32>, message: &str) -> String {
    match line_number {
        Some(n) => format!("Error at line {}: {}\n", n, message),
        None => format!("Error: {}\n", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_line_number() {
        assert_eq!(format_diagnostic(Some(10), "Syntax error"), "Error at line 10: Syntax error\n");
    }

    #[test]
    fn without_line_number() {
        assert_eq!(format_diagnostic(None, "File not found"), "Error: File not found\n");
    }
}
