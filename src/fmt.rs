/// Format a float as a euro amount with German separators: -1.234,56 €
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val.abs());
    let negative = val < 0.0 && cents != "0.00";
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{grouped},{dec_part} \u{20ac}")
    } else {
        format!("{grouped},{dec_part} \u{20ac}")
    }
}

/// Parse an amount as exported by German banks (`-1.234,56`), falling back
/// to plain decimal notation (`-1234.56`).
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim().replace('\u{20ac}', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.contains(',') {
        s.replace('.', "").replace(',', ".").parse().ok()
    } else {
        s.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "1.234,56 \u{20ac}");
        assert_eq!(money(-500.00), "-500,00 \u{20ac}");
        assert_eq!(money(0.0), "0,00 \u{20ac}");
        assert_eq!(money(-0.001), "0,00 \u{20ac}");
        assert_eq!(money(1000000.99), "1.000.000,99 \u{20ac}");
        assert_eq!(money(42.10), "42,10 \u{20ac}");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("-1.234,56"), Some(-1234.56));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount(" 1234.56 "), Some(1234.56));
        assert_eq!(parse_amount("-80,00 \u{20ac}"), Some(-80.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("n/a"), None);
    }
}
