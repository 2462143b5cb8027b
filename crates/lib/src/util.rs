//! Small numeric and text helpers shared by the analyzers.

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Capitalizes the first letter of every alphabetic run: `gas_station` becomes `Gas_Station`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(81.5, 1), 81.5);
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(12.0 / 7.0, 2), 1.71);
    }

    #[test]
    fn titles() {
        assert_eq!(title_case("gas_station"), "Gas_Station");
        assert_eq!(title_case("library"), "Library");
        assert_eq!(title_case("são paulo"), "São Paulo");
    }
}
