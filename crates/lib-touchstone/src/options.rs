//! Option line (`#` line) parsing.
//!
//! The option line declares frequency unit, number format, parameter
//! kind, and the default reference resistance. Tokens appear in any
//! order; missing tokens fall back to the Touchstone defaults (GHz,
//! MA, S, 50 ohms). The chunker has already upper-cased the line.

use crate::error::ParseError;
use lib_types::{NumberFormat, ParameterKind};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, space0, space1},
    combinator::value,
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

/// Decoded option line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    /// Multiplier applied to every frequency token, in Hz.
    pub frequency_unit: f64,

    /// Numeric encoding of the value pairs.
    pub number_format: NumberFormat,

    /// Parameter family.
    pub parameter_kind: ParameterKind,

    /// Default reference resistance for all ports.
    pub reference_resistance: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            frequency_unit: 1e9, // GHz default
            number_format: NumberFormat::MA,
            parameter_kind: ParameterKind::S,
            reference_resistance: 50.0,
        }
    }
}

/// Parse a complete option line into [`Options`].
pub fn parse_option_line(line: &str) -> Result<Options, ParseError> {
    let (rest, tokens) = option_tokens(line).map_err(|_| ParseError::MalformedOptionLine {
        line: line.to_string(),
    })?;

    let rest = rest.trim();
    if !rest.is_empty() {
        let mut words = rest.split_whitespace();
        let first = words.next().unwrap_or(rest);
        if first == "R" {
            // "R" matched but its value did not parse as a number
            return Err(ParseError::InvalidNumber {
                token: words.next().unwrap_or("").to_string(),
            });
        }
        return Err(ParseError::UnknownOption {
            token: first.to_string(),
        });
    }

    let mut options = Options::default();
    for token in tokens {
        match token {
            OptionToken::FreqUnit(mult) => options.frequency_unit = mult,
            OptionToken::Kind(kind) => options.parameter_kind = kind,
            OptionToken::Format(format) => options.number_format = format,
            OptionToken::Reference(r) => options.reference_resistance = r,
        }
    }
    Ok(options)
}

#[derive(Clone, Copy, Debug)]
enum OptionToken {
    FreqUnit(f64),
    Kind(ParameterKind),
    Format(NumberFormat),
    Reference(f64),
}

fn option_tokens(input: &str) -> IResult<&str, Vec<OptionToken>> {
    let (input, _) = space0(input)?;
    let (input, _) = char('#').parse(input)?;
    many0(preceded(space0, option_token)).parse(input)
}

fn option_token(input: &str) -> IResult<&str, OptionToken> {
    alt((parse_freq_unit, parse_kind, parse_format, parse_reference)).parse(input)
}

fn parse_freq_unit(input: &str) -> IResult<&str, OptionToken> {
    alt((
        value(OptionToken::FreqUnit(1e3), tag_no_case("KHZ")),
        value(OptionToken::FreqUnit(1e6), tag_no_case("MHZ")),
        value(OptionToken::FreqUnit(1e9), tag_no_case("GHZ")),
        value(OptionToken::FreqUnit(1.0), tag_no_case("HZ")),
    ))
    .parse(input)
}

fn parse_kind(input: &str) -> IResult<&str, OptionToken> {
    alt((
        value(OptionToken::Kind(ParameterKind::S), tag_no_case("S")),
        value(OptionToken::Kind(ParameterKind::Y), tag_no_case("Y")),
        value(OptionToken::Kind(ParameterKind::Z), tag_no_case("Z")),
        value(OptionToken::Kind(ParameterKind::G), tag_no_case("G")),
        value(OptionToken::Kind(ParameterKind::H), tag_no_case("H")),
    ))
    .parse(input)
}

fn parse_format(input: &str) -> IResult<&str, OptionToken> {
    alt((
        value(OptionToken::Format(NumberFormat::DB), tag_no_case("DB")),
        value(OptionToken::Format(NumberFormat::MA), tag_no_case("MA")),
        value(OptionToken::Format(NumberFormat::RI), tag_no_case("RI")),
    ))
    .parse(input)
}

fn parse_reference(input: &str) -> IResult<&str, OptionToken> {
    let (input, _) = tag_no_case("R").parse(input)?;
    let (input, _) = space1(input)?;
    let (input, r) = double(input)?;
    Ok((input, OptionToken::Reference(r)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_option_line_defaults() {
        let options = parse_option_line("#").unwrap();
        assert_eq!(options, Options::default());
        assert!((options.frequency_unit - 1e9).abs() < 1.0);
    }

    #[test]
    fn test_full_option_line() {
        let options = parse_option_line("# MHZ S DB R 75").unwrap();
        assert!((options.frequency_unit - 1e6).abs() < 1.0);
        assert_eq!(options.parameter_kind, ParameterKind::S);
        assert_eq!(options.number_format, NumberFormat::DB);
        assert!((options.reference_resistance - 75.0).abs() < 1e-10);
    }

    #[test]
    fn test_tokens_in_any_order() {
        let options = parse_option_line("# R 25 RI Y HZ").unwrap();
        assert!((options.frequency_unit - 1.0).abs() < 1e-12);
        assert_eq!(options.parameter_kind, ParameterKind::Y);
        assert_eq!(options.number_format, NumberFormat::RI);
        assert!((options.reference_resistance - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_ghz_is_not_hybrid_g() {
        let options = parse_option_line("# GHZ").unwrap();
        assert!((options.frequency_unit - 1e9).abs() < 1.0);
        assert_eq!(options.parameter_kind, ParameterKind::S);
    }

    #[test]
    fn test_unknown_token_fails() {
        let err = parse_option_line("# GHZ S FOO").unwrap_err();
        assert!(matches!(err, ParseError::UnknownOption { token } if token == "FOO"));
    }

    #[test]
    fn test_malformed_reference_fails() {
        let err = parse_option_line("# GHZ S MA R OHMS").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { token } if token == "OHMS"));
    }
}
