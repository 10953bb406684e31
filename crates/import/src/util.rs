/// Upper-cases the first character and lower-cases the rest, so a bank's type
/// tag reads like a word in the memo (`"VISA VARE"` → `"Visa vare"`).
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_case_tag() {
        assert_eq!(capitalize("VISA VARE"), "Visa vare");
        assert_eq!(capitalize("OVERFØRT"), "Overført");
    }

    #[test]
    fn mixed_case_tag() {
        assert_eq!(capitalize("eFaktura"), "Efaktura");
        assert_eq!(capitalize("AvtaleGiro"), "Avtalegiro");
    }

    #[test]
    fn empty_string() {
        assert_eq!(capitalize(""), "");
    }
}
