//! Parsing of Kubernetes resource quantities.
//!
//! Only the forms the API server and metrics-server emit are handled: a
//! plain decimal number followed by an optional SI or binary suffix.

const KIB: f64 = 1024.0;

/// Kibibytes in one gibibyte.
pub const KIB_PER_GIB: f64 = 1_048_576.0;

fn split_suffix(value: &str) -> Option<(f64, &str)> {
    let value = value.trim();
    let idx = value
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (number, suffix) = value.split_at(idx);
    if number.is_empty() {
        return None;
    }
    let number: f64 = number.parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some((number, suffix))
}

/// CPU quantity in cores, e.g. `"250m"` → 0.25, `"123456789n"` → 0.123.
pub fn parse_cpu_cores(value: &str) -> Option<f64> {
    let (number, suffix) = split_suffix(value)?;
    let factor = match suffix {
        "n" => 1e-9,
        "u" => 1e-6,
        "m" => 1e-3,
        "" => 1.0,
        "k" => 1e3,
        "M" => 1e6,
        "G" => 1e9,
        _ => return None,
    };
    Some(number * factor)
}

/// Memory quantity in kibibytes, e.g. `"8043148Ki"` or `"16Gi"`.
pub fn parse_memory_kib(value: &str) -> Option<f64> {
    let (number, suffix) = split_suffix(value)?;
    let bytes_factor = match suffix {
        "" => 1.0,
        "Ki" => KIB,
        "Mi" => KIB.powi(2),
        "Gi" => KIB.powi(3),
        "Ti" => KIB.powi(4),
        "Pi" => KIB.powi(5),
        "Ei" => KIB.powi(6),
        "k" => 1e3,
        "M" => 1e6,
        "G" => 1e9,
        "T" => 1e12,
        "P" => 1e15,
        "E" => 1e18,
        _ => return None,
    };
    Some(number * bytes_factor / KIB)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cpu_units() {
        assert!(approx(parse_cpu_cores("4").unwrap(), 4.0));
        assert!(approx(parse_cpu_cores("3920m").unwrap(), 3.92));
        assert!(approx(parse_cpu_cores("123456789n").unwrap(), 0.123456789));
        assert!(approx(parse_cpu_cores("1500u").unwrap(), 0.0015));
        assert!(approx(parse_cpu_cores("0.5").unwrap(), 0.5));
    }

    #[test]
    fn test_memory_units() {
        assert!(approx(parse_memory_kib("8043148Ki").unwrap(), 8043148.0));
        assert!(approx(parse_memory_kib("16Gi").unwrap(), 16.0 * KIB_PER_GIB));
        assert!(approx(parse_memory_kib("2048").unwrap(), 2.0));
        assert!(approx(parse_memory_kib("1M").unwrap(), 1e6 / 1024.0));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(parse_cpu_cores(""), None);
        assert_eq!(parse_cpu_cores("m"), None);
        assert_eq!(parse_cpu_cores("-1"), None);
        assert_eq!(parse_cpu_cores("12x"), None);
        assert_eq!(parse_memory_kib("12Qi"), None);
        assert_eq!(parse_memory_kib("abc"), None);
    }
}
