//! Display formatting for phone numbers.

/// Minimum digit count for a number to be reformatted.
const LOCAL_DIGITS: usize = 7;

/// Format a phone number as `XXX-XXXX` from its last seven digits.
///
/// Inputs with fewer than seven digits are returned unchanged. No attempt is
/// made to validate country codes or overall length.
pub fn format_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < LOCAL_DIGITS {
        return phone.to_string();
    }

    let local = &digits[digits.len() - LOCAL_DIGITS..];
    let (exchange, line) = local.split_at(3);
    format!(
        "{}-{}",
        exchange.iter().collect::<String>(),
        line.iter().collect::<String>()
    )
}
