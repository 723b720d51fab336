/// Normalizes an Indonesian phone number into the digits-only international
/// form wa.me expects. "08123..." becomes "628123...", numbers already
/// starting with 62 pass through, anything else gets the country code
/// prefixed.
pub fn format_wa_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(rest) = digits.strip_prefix('0') {
        return format!("62{rest}");
    }
    if digits.starts_with("62") {
        return digits;
    }
    format!("62{digits}")
}
