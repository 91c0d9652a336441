use basic_value::Value;

/// Renders a number the way `STR$` and numeric literals inside strings
/// do: plain, no leading space on non-negative numbers (see the open
/// question in the design notes — this implementation commits to the
/// no-leading-space policy).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NAN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "INF".to_string() } else { "-INF".to_string() }
    } else {
        format!("{}", n)
    }
}

/// Renders a `PRINT` item. Numbers get a trailing space (the source's
/// convention, per the `PRINT ;` open question — chosen so that
/// `FOR I=1 TO 3: PRINT I;: NEXT` prints `1 2 3 `); strings print as-is.
pub fn print_item_text(value: &Value) -> String {
    match value {
        Value::Number(n) => {
            let mut s = format_number(*n);
            s.push(' ');
            s
        }
        Value::String(s) => s.clone(),
    }
}
