//! Telemetry line parser.
//!
//! Grammar (case-sensitive, fixed token order, arbitrary whitespace between
//! fields, trailing content ignored):
//!
//! ```text
//! B: <digits> M: <non-whitespace token> O: <run of digits and commas>
//! ```
//!
//! A frame that does not match this shape is rejected wholesale: no field
//! is extracted and no notification fires. Within a structural match each
//! field is validated independently, so a single bad field never discards
//! otherwise-good telemetry from the same frame.

use super::Frame;
use crate::telemetry::{Mode, TelemetryUpdate};

/// Parse one frame against the telemetry grammar.
///
/// Returns `None` for a structural mismatch (including empty frames and the
/// human-readable status lines the device interleaves with telemetry).
/// Returns `Some(update)` for a structural match; fields inside the update
/// that failed their own validation are `None` and leave prior state
/// untouched when applied.
pub fn parse_telemetry(frame: &Frame) -> Option<TelemetryUpdate> {
    let rest = frame.as_str().strip_prefix("B:")?;

    let (brightness_tok, rest) = split_leading(rest.trim_start(), |c| c.is_ascii_digit());
    if brightness_tok.is_empty() {
        return None;
    }

    let rest = rest.trim_start().strip_prefix("M:")?;
    let (mode_tok, rest) = split_leading(rest.trim_start(), |c| !c.is_whitespace());
    if mode_tok.is_empty() {
        return None;
    }

    let rest = rest.trim_start().strip_prefix("O:")?;
    let (indicator_run, _trailing) =
        split_leading(rest.trim_start(), |c| c.is_ascii_digit() || c == ',');
    if indicator_run.is_empty() {
        return None;
    }

    Some(TelemetryUpdate {
        // The grammar already constrains this token to digits; the parse is
        // a second gate that only trips on overflow, in which case the prior
        // brightness is retained.
        brightness: brightness_tok.parse().ok(),
        mode: Mode::from_wire_token(mode_tok),
        indicators: parse_indicators(indicator_run),
    })
}

/// Split `s` into its longest prefix of chars matching `pred` and the rest.
fn split_leading(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = s.find(|c| !pred(c)).unwrap_or(s.len());
    s.split_at(end)
}

/// Decode the comma-separated indicator run.
///
/// Exactly three tokens, each a valid integer state, or the whole triple is
/// left unchanged.
fn parse_indicators(run: &str) -> Option<[u8; 3]> {
    let mut tokens = run.split(',');
    let red = tokens.next()?.parse().ok()?;
    let yellow = tokens.next()?.parse().ok()?;
    let green = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some([red, yellow, green])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<TelemetryUpdate> {
        parse_telemetry(&Frame::from(line))
    }

    #[test]
    fn test_full_valid_frame() {
        let update = parse("B: 160 M: PCINT2 O: 1,0,1").unwrap();
        assert_eq!(update.brightness, Some(160));
        assert_eq!(update.mode, Some(Mode::Mode2));
        assert_eq!(update.indicators, Some([1, 0, 1]));
    }

    #[test]
    fn test_mode_token_mapping() {
        assert_eq!(
            parse("B: 0 M: PCINT1 O: 0,0,0").unwrap().mode,
            Some(Mode::Mode1)
        );
        assert_eq!(
            parse("B: 0 M: PCINT3 O: 0,0,0").unwrap().mode,
            Some(Mode::Mode3)
        );
        assert_eq!(
            parse("B: 0 M: Default O: 0,0,0").unwrap().mode,
            Some(Mode::Default)
        );
    }

    #[test]
    fn test_unknown_mode_leaves_other_fields_intact() {
        let update = parse("B: 160 M: BOGUS O: 1,0,1").unwrap();
        assert_eq!(update.brightness, Some(160));
        assert_eq!(update.mode, None);
        assert_eq!(update.indicators, Some([1, 0, 1]));
    }

    #[test]
    fn test_mode_matching_is_case_sensitive() {
        let update = parse("B: 1 M: pcint1 O: 0,0,0").unwrap();
        assert_eq!(update.mode, None);
    }

    #[test]
    fn test_wrong_indicator_count_drops_triple_only() {
        let update = parse("B: 160 M: PCINT1 O: 1,0").unwrap();
        assert_eq!(update.brightness, Some(160));
        assert_eq!(update.mode, Some(Mode::Mode1));
        assert_eq!(update.indicators, None);

        let update = parse("B: 160 M: PCINT1 O: 1,0,1,0").unwrap();
        assert_eq!(update.indicators, None);
    }

    #[test]
    fn test_structural_mismatch_rejected_wholesale() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("M: PCINT1 O: 1,0,1"), None);
        assert_eq!(parse("B: M: PCINT1 O: 1,0,1"), None);
        assert_eq!(parse("B: 160 M: PCINT1"), None);
        assert_eq!(parse("B: 160 O: 1,0,1 M: PCINT1"), None);
        // Status lines the device prints alongside telemetry.
        assert_eq!(parse("Intervals updated to: 2000, 500, 2000"), None);
        assert_eq!(parse("Invalid input format. Use: 2000,500,2000"), None);
    }

    #[test]
    fn test_flexible_whitespace() {
        let update = parse("B:255 M:Default O:0,0,0").unwrap();
        assert_eq!(update.brightness, Some(255));
        assert_eq!(update.mode, Some(Mode::Default));
        assert_eq!(update.indicators, Some([0, 0, 0]));

        let update = parse("B:   7   M:   PCINT3   O:   0,1,0").unwrap();
        assert_eq!(update.brightness, Some(7));
        assert_eq!(update.mode, Some(Mode::Mode3));
        assert_eq!(update.indicators, Some([0, 1, 0]));
    }

    #[test]
    fn test_trailing_content_ignored() {
        let update = parse("B: 160 M: PCINT2 O: 1,0,1 and some noise").unwrap();
        assert_eq!(update.indicators, Some([1, 0, 1]));
    }

    #[test]
    fn test_brightness_unclamped() {
        // No 0-255 clamping is defined by the protocol.
        let update = parse("B: 1023 M: Default O: 0,0,0").unwrap();
        assert_eq!(update.brightness, Some(1023));
    }

    #[test]
    fn test_brightness_overflow_retains_prior_value() {
        let update = parse("B: 99999999999999999999 M: Default O: 0,0,0").unwrap();
        assert_eq!(update.brightness, None);
        assert_eq!(update.mode, Some(Mode::Default));
    }

    #[test]
    fn test_malformed_indicator_tokens() {
        // Empty token between commas.
        assert_eq!(parse("B: 1 M: Default O: 1,,1").unwrap().indicators, None);
        // Out-of-range state value.
        assert_eq!(
            parse("B: 1 M: Default O: 1,999,1").unwrap().indicators,
            None
        );
    }

    #[test]
    fn test_parse_is_pure() {
        // Parsing the same frame twice yields the same update.
        let frame = Frame::from("B: 42 M: PCINT1 O: 1,1,0");
        assert_eq!(parse_telemetry(&frame), parse_telemetry(&frame));
    }
}
