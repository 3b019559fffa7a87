//! CNPJ (company) and CPF (individual) taxpayer number validation and formatting.

/// Validate a CNPJ using its two mod-11 check digits.
///
/// CNPJ format: 14 digits, the last two are check digits.
/// Weights: 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2 (and 6 prepended for the second digit)
pub fn validate_cnpj(cnpj: &str) -> bool {
    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 14 {
        return false;
    }

    // Repeated digits pass the checksum but are never issued
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let first = check_digit(&digits[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&digits[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);

    first == digits[12] && second == digits[13]
}

/// Validate a CPF using its two mod-11 check digits.
///
/// CPF format: 11 digits, weights 10..2 for the first check digit and 11..2 for the second.
pub fn validate_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let first = check_digit(&digits[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let second = check_digit(&digits[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);

    first == digits[9] && second == digits[10]
}

/// Describe a checksum problem with a taxpayer id, picking CNPJ or CPF by digit count.
pub fn taxpayer_id_issue(id: &str) -> Option<String> {
    let (kind, valid) = match id.chars().filter(char::is_ascii_digit).count() {
        14 => ("CNPJ", validate_cnpj(id)),
        11 => ("CPF", validate_cpf(id)),
        n => return Some(format!("taxpayer id {id} has {n} digits, neither a CNPJ nor a CPF")),
    };

    (!valid).then(|| format!("taxpayer id {id} fails the {kind} checksum"))
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Format CNPJ with punctuation (XX.XXX.XXX/XXXX-XX).
pub fn format_cnpj(cnpj: &str) -> String {
    let digits: String = cnpj.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != 14 {
        return cnpj.to_string();
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cnpj_valid() {
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(validate_cnpj("11222333000181"));
        assert!(validate_cnpj("00.000.000/0001-91"));
    }

    #[test]
    fn test_validate_cnpj_invalid() {
        assert!(!validate_cnpj("11.222.333/0001-82")); // Bad second digit
        assert!(!validate_cnpj("11.222.333/0001-71")); // Bad first digit
        assert!(!validate_cnpj("11.111.111/1111-11")); // Repeated digits
        assert!(!validate_cnpj("1122233300018")); // Too short
    }

    #[test]
    fn test_validate_cpf() {
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("52998224725"));
        assert!(!validate_cpf("529.982.247-26"));
        assert!(!validate_cpf("111.111.111-11"));
        assert!(!validate_cpf("11.222.333/0001-81"));
    }

    #[test]
    fn test_taxpayer_id_issue() {
        assert_eq!(taxpayer_id_issue("11.222.333/0001-81"), None);
        assert_eq!(taxpayer_id_issue("529.982.247-25"), None);
        assert_eq!(
            taxpayer_id_issue("11.222.333/0001-82"),
            Some("taxpayer id 11.222.333/0001-82 fails the CNPJ checksum".to_string())
        );
        assert!(taxpayer_id_issue("529.982.247-26").unwrap().contains("CPF checksum"));
        assert!(taxpayer_id_issue("12345").unwrap().contains("neither"));
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_cnpj("11.222.333/0001-81"), "11.222.333/0001-81");
        assert_eq!(format_cnpj("123"), "123");
    }
}
