//! Input shape validation

use regex::Regex;
use std::sync::OnceLock;

/// Validate a PIN: 4 to 6 digits
pub fn validate_pin(pin: &str) -> Result<(), String> {
    if pin.is_empty() {
        return Err("PIN is required".to_string());
    }

    static PIN_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PIN_REGEX
        .get_or_init(|| Regex::new(r"^[0-9]{4,6}$").expect("Failed to compile PIN regex"));

    if !regex.is_match(pin) {
        return Err("PIN must be 4 to 6 digits".to_string());
    }

    Ok(())
}
