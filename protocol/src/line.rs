/// A single recognized line of the device protocol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line {
    /// `SOL V:<v> I:<ma>`: panel voltage in volts, current already
    /// converted from milliamps to amps.
    Solar { v_pv: f64, i_pv: f64 },
    /// `WND V:<v> I:<a>`: turbine voltage and current, both as printed.
    Wind { v_wind: f64, i_wind: f64 },
    /// `LUX:<lux> FAN:<pct>%`: light level and fan duty.
    LuxFan { lux: f64, fan_pwm: f64 },
    /// Any line containing a run of dashes; closes the current block.
    Terminator,
    /// Everything else, including otherwise-matching lines with garbled
    /// numbers. Ignored by the accumulator.
    Unrecognized,
}

/// Recognizes one line of input.
///
/// A line matches at most one pattern. Malformed numeric text inside an
/// otherwise-matching pattern makes the whole line [`Line::Unrecognized`];
/// no partial field is ever produced.
pub fn parse_line(text: &str) -> Line {
    let text = text.trim();

    // The separator check comes first: a garbled content line that still
    // carries dashes must close the block, not feed it.
    if text.contains("---") {
        return Line::Terminator;
    }

    let mut tokens = text.split_whitespace();
    match tokens.next() {
        Some("SOL") => {
            let v = tokens.next().and_then(|t| tagged_number(t, "V:"));
            let i_ma = tokens.next().and_then(|t| tagged_number(t, "I:"));
            match (v, i_ma) {
                (Some(v_pv), Some(i_ma)) => Line::Solar {
                    v_pv,
                    i_pv: i_ma / 1000.0,
                },
                _ => Line::Unrecognized,
            }
        }
        Some("WND") => {
            let v = tokens.next().and_then(|t| tagged_number(t, "V:"));
            let i = tokens.next().and_then(|t| tagged_number(t, "I:"));
            match (v, i) {
                (Some(v_wind), Some(i_wind)) => Line::Wind { v_wind, i_wind },
                _ => Line::Unrecognized,
            }
        }
        Some(first) if first.starts_with("LUX:") => {
            let lux = tagged_number(first, "LUX:");
            let fan = tokens
                .next()
                .and_then(|t| t.strip_suffix('%'))
                .and_then(|t| tagged_number(t, "FAN:"));
            match (lux, fan) {
                (Some(lux), Some(fan_pwm)) => Line::LuxFan { lux, fan_pwm },
                _ => Line::Unrecognized,
            }
        }
        _ => Line::Unrecognized,
    }
}

/// Strips `tag` and parses the rest as an unsigned decimal number.
///
/// The device only ever prints digits and a dot, so anything else (signs,
/// exponents, stray characters) is treated as line noise.
fn tagged_number(token: &str, tag: &str) -> Option<f64> {
    let digits = token.strip_prefix(tag)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    digits.parse().ok()
}
