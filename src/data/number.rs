//! Numeric coercion
//!
//! Rows arrive from loosely typed sources (JSON documents, CSV cells, user queries),
//! so numeric operators coerce both sides the way a browser `Number(x)` call does:
//!
//! ```text
//! "  42 "     → 42
//! ""          → 0
//! "1.5e3"     → 1500
//! "0x1F"      → 31
//! "-Infinity" → -∞
//! "12px"      → NaN
//! ```
//!
//! Coercion never fails; unparseable input becomes `NaN`, which every comparison
//! treats as "no match".

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{char, digit0, digit1, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Coerce a string to a number using script `Number(x)` rules
pub fn parse_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match all_consuming(numeric_literal)(trimmed) {
        Ok((_, n)) => n,
        Err(_) => f64::NAN,
    }
}

/// Format a number the way script `String(x)` does for the common cases
///
/// Integral values print without a fractional part and the non-finite values
/// print by name. Magnitudes from `1e21` up and below `1e-6` use exponent form
/// with an explicit exponent sign, e.g. `1e+21` and `1.5e-7`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    } else {
        format!("{}", n)
    }
}

fn numeric_literal(input: &str) -> IResult<&str, f64> {
    alt((radix_literal, signed_infinity, decimal_literal))(input)
}

/// Parse `0x..`, `0o..` and `0b..` literals (unsigned, as script `Number()` accepts them)
fn radix_literal(input: &str) -> IResult<&str, f64> {
    alt((
        preceded(tag_no_case("0x"), radix_digits(16)),
        preceded(tag_no_case("0o"), radix_digits(8)),
        preceded(tag_no_case("0b"), radix_digits(2)),
    ))(input)
}

fn radix_digits<'a>(radix: u32) -> impl FnMut(&'a str) -> IResult<&'a str, f64> {
    map(
        take_while1(move |c: char| c.is_digit(radix)),
        move |digits: &str| {
            digits.chars().fold(0.0, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            })
        },
    )
}

fn signed_infinity(input: &str) -> IResult<&str, f64> {
    let (input, sign) = opt(one_of("+-"))(input)?;
    let (input, _) = tag("Infinity")(input)?;

    let n = if sign == Some('-') {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    Ok((input, n))
}

/// Parse a decimal literal: sign, digits, optional fraction, optional exponent
fn decimal_literal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}
