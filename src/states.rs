//! GST state and union territory codes.
//!
//! The first two digits of a GSTIN (and digits 3-4 of an ARN) name the
//! registering jurisdiction. Codes 01-37 are states and union territories,
//! 97 covers other territories and 99 is the centre jurisdiction.

const STATE_CODES: [(&str, &str); 39] = [
    ("01", "Jammu and Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman and Diu"),
    ("26", "Dadra and Nagar Haveli and Daman and Diu"),
    ("27", "Maharashtra"),
    ("28", "Andhra Pradesh (Before Division)"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman and Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh"),
    ("97", "Other Territory"),
    ("99", "Centre Jurisdiction"),
];

/// Name of the jurisdiction for a two-digit code, `None` when unknown.
pub fn state_name(code: &str) -> Option<&'static str> {
    STATE_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

pub fn is_valid_state_code(code: &str) -> bool {
    state_name(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(state_name("27"), Some("Maharashtra"));
        assert_eq!(state_name("01"), Some("Jammu and Kashmir"));
        assert_eq!(state_name("37"), Some("Andhra Pradesh"));
        assert_eq!(state_name("97"), Some("Other Territory"));
        assert_eq!(state_name("99"), Some("Centre Jurisdiction"));
    }

    #[test]
    fn test_unknown_codes() {
        assert!(!is_valid_state_code("00"));
        assert!(!is_valid_state_code("38"));
        assert!(!is_valid_state_code("98"));
        assert!(!is_valid_state_code("7"));
    }
}
