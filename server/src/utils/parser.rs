use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parsea un precio en soles.
/// Ejemplos: "S/ 20.00", "S/1,250.50", "35", "PEN 12.5"
///
/// The currency symbol and every thousands separator are stripped before the
/// leading number is read, so trailing noise ("20.00 c/u") is ignored.
pub fn parse_soles_price(text: &str) -> Result<Decimal, String> {
    if text.trim().is_empty() {
        return Err("Texto vacío".to_string());
    }

    // Símbolo de moneda y separadores de miles
    let cleaned = text
        .replace("S/", "")
        .replace("PEN", "")
        .replace(',', "")
        .trim()
        .to_string();

    let re = Regex::new(r"^([0-9]+(?:\.[0-9]+)?|\.[0-9]+)").map_err(|e| e.to_string())?;

    if let Some(matched) = re.captures(&cleaned).and_then(|c| c.get(1)) {
        let number_str = matched.as_str();
        let number_str = if number_str.starts_with('.') {
            format!("0{}", number_str)
        } else {
            number_str.to_string()
        };
        return Decimal::from_str(&number_str).map_err(|e| format!("Error de número: {}", e));
    }

    Err(format!("Precio no reconocido: '{}'", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_soles_format() {
        assert_eq!(parse_soles_price("S/ 20.00").unwrap(), dec!(20.00));
        assert_eq!(parse_soles_price("S/1,250.50").unwrap(), dec!(1250.50));
        assert_eq!(parse_soles_price("S/ 1,234,567.89").unwrap(), dec!(1234567.89));
        assert_eq!(parse_soles_price("PEN 12.5").unwrap(), dec!(12.5));
    }

    #[test]
    fn test_parse_simple_format() {
        assert_eq!(parse_soles_price("35").unwrap(), dec!(35));
        assert_eq!(parse_soles_price("  48.90 ").unwrap(), dec!(48.90));
        assert_eq!(parse_soles_price(".5").unwrap(), dec!(0.5));
        assert_eq!(parse_soles_price("20.00 c/u").unwrap(), dec!(20.00));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_soles_price("").is_err());
        assert!(parse_soles_price("abc").is_err());
        assert!(parse_soles_price("S/ ").is_err());
        assert!(parse_soles_price("-5.00").is_err());
    }
}
