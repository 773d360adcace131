//! Title and barcode normalization

use std::fmt;

use super::Cell;

/// Width of a canonical barcode
pub const BARCODE_WIDTH: usize = 14;

/// Largest numeric barcode that fits in [`BARCODE_WIDTH`] digits
const MAX_NUMERIC_BARCODE: f64 = 99_999_999_999_999.0;

/// Reason a non-blank barcode value could not be canonicalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarcodeError {
    /// Negative number
    Negative,
    /// NaN or infinity
    NotFinite,
    /// Boolean cell
    Boolean,
    /// Text that is not a number
    NotNumeric,
    /// More significant digits than fit the canonical width
    TooLong(usize),
}

impl fmt::Display for BarcodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarcodeError::Negative => write!(f, "negative barcode"),
            BarcodeError::NotFinite => write!(f, "barcode is not a finite number"),
            BarcodeError::Boolean => write!(f, "boolean is not a barcode"),
            BarcodeError::NotNumeric => write!(f, "not a number"),
            BarcodeError::TooLong(n) => write!(
                f,
                "barcode has {} significant digits, at most {} allowed",
                n, BARCODE_WIDTH
            ),
        }
    }
}

impl std::error::Error for BarcodeError {}

/// Normalize an offer title
///
/// Trims the text and collapses every whitespace run (including tabs and
/// newlines) into a single space.
pub fn normalize_title(cell: &Cell) -> String {
    cell.to_text().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a barcode cell
///
/// Returns `Ok(None)` for missing or blank values, which are excluded from
/// aggregation. Plain digit text is taken verbatim so long codes keep every
/// digit; other numeric text (`12345.6`, `1.2345E+4`) is rounded like a
/// numeric cell.
pub fn canonical_barcode(cell: &Cell) -> Result<Option<String>, BarcodeError> {
    let digits = match cell {
        Cell::Empty => return Ok(None),
        Cell::Text(s) if s.trim().is_empty() => return Ok(None),
        Cell::Text(s) => text_digits(s.trim())?,
        Cell::Int(i) if *i < 0 => return Err(BarcodeError::Negative),
        Cell::Int(i) => i.to_string(),
        Cell::Float(f) => float_digits(*f)?,
        Cell::Bool(_) => return Err(BarcodeError::Boolean),
    };

    pad_digits(&digits).map(Some)
}

fn float_digits(f: f64) -> Result<String, BarcodeError> {
    if !f.is_finite() {
        return Err(BarcodeError::NotFinite);
    }

    let rounded = f.round_ties_even();
    // -0.3 rounds to -0.0, which compares equal to zero
    if rounded.is_sign_negative() {
        return Err(BarcodeError::Negative);
    }
    if rounded > MAX_NUMERIC_BARCODE {
        let digits = format!("{:.0}", rounded).len();
        return Err(BarcodeError::TooLong(digits));
    }

    Ok(format!("{:.0}", rounded))
}

/// `123`, `00123` and `123.000` are taken verbatim; other decimal or
/// exponent text goes through [`float_digits`]
fn text_digits(s: &str) -> Result<String, BarcodeError> {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (s, ""),
    };

    let is_digits = !int_part.is_empty() && int_part.bytes().all(|b| b.is_ascii_digit());
    let zero_fraction = frac_part.bytes().all(|b| b == b'0');

    if is_digits && zero_fraction {
        return Ok(int_part.to_string());
    }

    // Rust also parses "inf" and "NaN", which are not barcodes
    let numeric_chars = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    match s.parse::<f64>() {
        Ok(f) if numeric_chars => float_digits(f),
        _ => Err(BarcodeError::NotNumeric),
    }
}

fn pad_digits(digits: &str) -> Result<String, BarcodeError> {
    let significant = digits.trim_start_matches('0');
    if significant.len() > BARCODE_WIDTH {
        return Err(BarcodeError::TooLong(significant.len()));
    }

    Ok(format!("{:0>width$}", significant, width = BARCODE_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(cell: Cell) -> String {
        canonical_barcode(&cell).unwrap().unwrap()
    }

    #[test]
    fn test_title_whitespace_collapse() {
        assert_eq!(normalize_title(&Cell::from(" Sale  Now ")), "Sale Now");
        assert_eq!(normalize_title(&Cell::from("Buy\t2\nGet  1")), "Buy 2 Get 1");
        assert_eq!(normalize_title(&Cell::Empty), "");
        assert_eq!(normalize_title(&Cell::Float(2024.0)), "2024");
    }

    #[test]
    fn test_numeric_barcodes_pad_to_width() {
        assert_eq!(canonical(Cell::Int(12345)), "00000000012345");
        assert_eq!(canonical(Cell::Float(678.0)), "00000000000678");
        assert_eq!(canonical(Cell::Int(0)), "00000000000000");
    }

    #[test]
    fn test_float_rounds_to_integer() {
        assert_eq!(canonical(Cell::Float(41_234_567_890.4)), "00041234567890");
        assert_eq!(canonical(Cell::Float(2.5)), "00000000000002");
    }

    #[test]
    fn test_negative_zero_is_rejected() {
        assert_eq!(
            canonical_barcode(&Cell::Float(-0.0)),
            Err(BarcodeError::Negative)
        );
        assert_eq!(
            canonical_barcode(&Cell::Float(-0.3)),
            Err(BarcodeError::Negative)
        );
        assert_eq!(canonical(Cell::Float(0.3)), "00000000000000");
    }

    #[test]
    fn test_decimal_text_rounds_like_numeric_cells() {
        assert_eq!(
            canonical(Cell::from("12345.6")),
            canonical(Cell::Float(12345.6))
        );
        assert_eq!(canonical(Cell::from("12345.6")), "00000000012346");
        assert_eq!(canonical(Cell::from("1.2345E+4")), "00000000012345");
        assert_eq!(canonical(Cell::from("123.5")), "00000000000124");
    }

    #[test]
    fn test_text_barcodes_keep_leading_zeros() {
        assert_eq!(canonical(Cell::from("012345678905")), "00012345678905");
        assert_eq!(canonical(Cell::from(" 12345.0 ")), "00000000012345");
        assert_eq!(canonical(Cell::from("12345.")), "00000000012345");
    }

    #[test]
    fn test_text_barcode_keeps_full_precision() {
        // 14 digits beyond exact f64 rounding concerns still come through verbatim
        assert_eq!(canonical(Cell::from("98765432109876")), "98765432109876");
        assert_eq!(canonical(Cell::from("0098765432109876")), "98765432109876");
    }

    #[test]
    fn test_blank_barcodes_are_empty() {
        assert_eq!(canonical_barcode(&Cell::Empty), Ok(None));
        assert_eq!(canonical_barcode(&Cell::from("   ")), Ok(None));
    }

    #[test]
    fn test_rejected_barcodes() {
        assert_eq!(
            canonical_barcode(&Cell::from("ABC123")),
            Err(BarcodeError::NotNumeric)
        );
        assert_eq!(
            canonical_barcode(&Cell::from("inf")),
            Err(BarcodeError::NotNumeric)
        );
        assert_eq!(
            canonical_barcode(&Cell::from("12-34")),
            Err(BarcodeError::NotNumeric)
        );
        assert_eq!(canonical_barcode(&Cell::Int(-5)), Err(BarcodeError::Negative));
        assert_eq!(
            canonical_barcode(&Cell::from("-42")),
            Err(BarcodeError::Negative)
        );
        assert_eq!(
            canonical_barcode(&Cell::Float(f64::NAN)),
            Err(BarcodeError::NotFinite)
        );
        assert_eq!(canonical_barcode(&Cell::Bool(true)), Err(BarcodeError::Boolean));
        assert_eq!(
            canonical_barcode(&Cell::from("1234567890123456")),
            Err(BarcodeError::TooLong(16))
        );
        assert!(matches!(
            canonical_barcode(&Cell::Float(1e15)),
            Err(BarcodeError::TooLong(_))
        ));
    }

    #[test]
    fn test_canonical_barcodes_are_fixed_width_digits() {
        let cells = vec![
            Cell::Int(1),
            Cell::Int(99_999_999_999_999),
            Cell::Float(123.0),
            Cell::from("00000000000000000042"),
            Cell::from("4006381333931"),
            Cell::from("4.006381333931e12"),
            Cell::Float(0.4),
        ];

        for cell in cells {
            let code = canonical(cell);
            assert_eq!(code.len(), BARCODE_WIDTH);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
