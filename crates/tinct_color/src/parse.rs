use std::str::FromStr;

use thiserror::Error;

use crate::color::{Hsva, Rgba};

/// Failure to interpret a color string.
///
/// Widget-layer callers are expected to treat this as a no-op (keep the
/// previous valid color), never as a fault that reaches the UI.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("unrecognized color format: `{0}`")]
    UnknownFormat(String),
    #[error("invalid hex color: `{0}`")]
    InvalidHex(String),
    #[error("invalid component in `{0}`")]
    InvalidComponent(String),
}

/// Parse a color string in any supported form.
///
/// Accepted: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA` (hash optional),
/// `rgb(r, g, b)`, `rgba(r, g, b, a)`, `hsv(h, s%, v%)` and
/// `hsva(h, s%, v%, a)`. Out-of-range components are clamped, not rejected.
pub fn parse(input: &str) -> Result<Rgba, ParseColorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseColorError::UnknownFormat(input.to_string()));
    }

    if let Some(args) = function_args(trimmed, "rgba").or_else(|| function_args(trimmed, "rgb")) {
        return parse_rgb_args(trimmed, &args);
    }
    if let Some(args) = function_args(trimmed, "hsva").or_else(|| function_args(trimmed, "hsv")) {
        return parse_hsv_args(trimmed, &args);
    }

    parse_hex(trimmed)
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Split `name(a, b, c)` into its comma-separated arguments.
fn function_args<'a>(input: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let body = input
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    Some(body.split(',').map(str::trim).collect())
}

fn parse_rgb_args(input: &str, args: &[&str]) -> Result<Rgba, ParseColorError> {
    if args.len() != 3 && args.len() != 4 {
        return Err(ParseColorError::InvalidComponent(input.to_string()));
    }

    let invalid = || ParseColorError::InvalidComponent(input.to_string());
    let channel = |arg: &str| -> Result<u8, ParseColorError> {
        let value: f32 = arg.parse().map_err(|_| invalid())?;
        Ok(value.clamp(0.0, 255.0).round() as u8)
    };

    let r = channel(args[0])?;
    let g = channel(args[1])?;
    let b = channel(args[2])?;
    let a = match args.get(3) {
        Some(arg) => arg.parse::<f32>().map_err(|_| invalid())?.clamp(0.0, 1.0),
        None => 1.0,
    };

    Ok(Rgba::new(r, g, b, a))
}

fn parse_hsv_args(input: &str, args: &[&str]) -> Result<Rgba, ParseColorError> {
    if args.len() != 3 && args.len() != 4 {
        return Err(ParseColorError::InvalidComponent(input.to_string()));
    }

    let invalid = || ParseColorError::InvalidComponent(input.to_string());
    let number = |arg: &str| -> Result<f32, ParseColorError> {
        arg.trim_end_matches('%').parse().map_err(|_| invalid())
    };

    let h = number(args[0])?;
    let s = number(args[1])?;
    let v = number(args[2])?;
    let a = match args.get(3) {
        Some(arg) => number(arg)?,
        None => 1.0,
    };

    Ok(Hsva::new(h, s, v, a).clamped().to_rgba())
}

fn parse_hex(input: &str) -> Result<Rgba, ParseColorError> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ParseColorError::InvalidHex(input.to_string()));
    }

    let invalid = || ParseColorError::InvalidHex(input.to_string());
    let pair = |range: std::ops::Range<usize>| -> Result<u8, ParseColorError> {
        u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
    };
    // Shorthand digits expand by repetition: `f` -> `ff`.
    let single = |index: usize| -> Result<u8, ParseColorError> {
        let digit = u8::from_str_radix(&digits[index..index + 1], 16).map_err(|_| invalid())?;
        Ok(digit * 17)
    };

    match digits.len() {
        3 => Ok(Rgba::rgb(single(0)?, single(1)?, single(2)?)),
        4 => Ok(Rgba::new(
            single(0)?,
            single(1)?,
            single(2)?,
            single(3)? as f32 / 255.0,
        )),
        6 => Ok(Rgba::rgb(pair(0..2)?, pair(2..4)?, pair(4..6)?)),
        8 => Ok(Rgba::new(
            pair(0..2)?,
            pair(2..4)?,
            pair(4..6)?,
            pair(6..8)? as f32 / 255.0,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse("#ff0000").unwrap(), Rgba::RED);
        assert_eq!(parse("ff0000").unwrap(), Rgba::RED);
        assert_eq!(parse("#F00").unwrap(), Rgba::RED);
        assert_eq!(parse("#469be9").unwrap(), Rgba::rgb(70, 155, 233));

        let with_alpha = parse("#ff000080").unwrap();
        assert_eq!((with_alpha.r, with_alpha.g, with_alpha.b), (255, 0, 0));
        assert!((with_alpha.a - 128.0 / 255.0).abs() < 1e-6);

        let shorthand_alpha = parse("#f008").unwrap();
        assert_eq!((shorthand_alpha.r, shorthand_alpha.g), (255, 0));
        assert!((shorthand_alpha.a - 136.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(parse("rgb(255, 0, 0)").unwrap(), Rgba::RED);
        assert_eq!(parse("rgba(255, 0, 0, 1)").unwrap(), Rgba::RED);
        assert_eq!(
            parse("rgba(255, 0, 0, 0.5)").unwrap(),
            Rgba::new(255, 0, 0, 0.5)
        );
        assert_eq!(parse("hsv(0, 100%, 100%)").unwrap(), Rgba::RED);
        assert_eq!(parse("hsv(120, 100, 100)").unwrap(), Rgba::rgb(0, 255, 0));
        assert_eq!(
            parse("hsva(240, 100%, 100%, 0.25)").unwrap(),
            Rgba::new(0, 0, 255, 0.25)
        );
    }

    #[test]
    fn clamps_out_of_range_components() {
        assert_eq!(parse("rgb(300, -4, 0)").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(parse("rgba(0, 0, 0, 7)").unwrap(), Rgba::rgb(0, 0, 0));
        assert_eq!(parse("hsv(500, 120, 100)").unwrap(), Rgba::RED);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("not a color").is_err());
        assert!(parse("#ff000").is_err());
        assert!(parse("#ggg").is_err());
        assert!(parse("rgb(1, 2)").is_err());
        assert!(parse("rgb(a, b, c)").is_err());
        assert!(parse("hsv(0, 100%, 100%, 1, 2)").is_err());
        assert!("rgb(".parse::<Rgba>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for color in [
            Rgba::RED,
            Rgba::new(70, 155, 233, 0.5),
            Rgba::new(0, 0, 0, 0.0),
        ] {
            let reparsed = parse(&color.to_string()).unwrap();
            assert_eq!((reparsed.r, reparsed.g, reparsed.b), (color.r, color.g, color.b));
            assert!((reparsed.a - color.a).abs() < 0.01);
        }
    }
}
