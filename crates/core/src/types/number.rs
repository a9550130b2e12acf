//! Free-text numeric input for money and quantity fields.

/// Errors that can occur when parsing numeric form input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    /// The input is empty or only whitespace.
    #[error("a number is required")]
    Empty,
    /// The input is not a finite decimal number.
    #[error("{0:?} is not a valid number")]
    Invalid(String),
}

/// Parse a decimal number typed by a person.
///
/// Accepts `.` or `,` as the decimal separator and ignores spaces used as
/// thousands separators (`"1 250,50"`). Anything that does not parse to a
/// finite number is rejected rather than coerced to zero.
///
/// ```
/// use booking_console_core::parse_decimal_input;
///
/// assert_eq!(parse_decimal_input("12,5"), Ok(12.5));
/// assert_eq!(parse_decimal_input("12.5"), Ok(12.5));
/// assert!(parse_decimal_input("abc").is_err());
/// ```
///
/// # Errors
///
/// Returns [`NumberError::Empty`] for blank input and [`NumberError::Invalid`]
/// for anything else that is not a plain finite decimal.
pub fn parse_decimal_input(input: &str) -> Result<f64, NumberError> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if compact.is_empty() {
        return Err(NumberError::Empty);
    }

    let digits = compact
        .strip_prefix('-')
        .or_else(|| compact.strip_prefix('+'))
        .unwrap_or(&compact);

    let separators = digits.chars().filter(|&c| c == '.').count();
    let plain = separators <= 1
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.');
    if !plain {
        return Err(NumberError::Invalid(input.to_owned()));
    }

    compact
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| NumberError::Invalid(input.to_owned()))
}
