use crate::line::{Line, parse_line};
use telemetry::RawReadings;

/// Content lines accepted per block before the accumulator gives up on ever
/// seeing a separator and discards what it has.
pub const MAX_BLOCK_LINES: usize = 10;

/// In-progress field values for the current block. Each write overwrites any
/// prior value for the same key; the whole set is dropped on block close.
#[derive(Debug, Default, Clone)]
struct RawFieldSet {
    v_pv: Option<f64>,
    i_pv: Option<f64>,
    v_wind: Option<f64>,
    i_wind: Option<f64>,
    lux: Option<f64>,
    fan_pwm: Option<f64>,
}

impl RawFieldSet {
    fn apply(&mut self, line: &Line) {
        match *line {
            Line::Solar { v_pv, i_pv } => {
                self.v_pv = Some(v_pv);
                self.i_pv = Some(i_pv);
            }
            Line::Wind { v_wind, i_wind } => {
                self.v_wind = Some(v_wind);
                self.i_wind = Some(i_wind);
            }
            Line::LuxFan { lux, fan_pwm } => {
                self.lux = Some(lux);
                self.fan_pwm = Some(fan_pwm);
            }
            Line::Terminator | Line::Unrecognized => {}
        }
    }

    fn complete(&self) -> Option<RawReadings> {
        Some(RawReadings {
            v_pv: self.v_pv?,
            i_pv: self.i_pv?,
            v_wind: self.v_wind?,
            i_wind: self.i_wind?,
            lux: self.lux?,
            fan_pwm: self.fan_pwm?,
        })
    }
}

/// Merges recognized lines into complete measurement blocks.
///
/// Always accumulating: a separator line either emits the finished block or,
/// when any required field is still missing, discards it. A partial block is
/// never emitted and never bleeds into the next one, so a single dropped
/// line costs that whole block.
#[derive(Debug, Default)]
pub struct BlockAccumulator {
    fields: RawFieldSet,
    lines_seen: usize,
}

impl BlockAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line of input. Returns a complete block exactly when this
    /// line was a separator and every required field had arrived.
    pub fn push_line(&mut self, text: &str) -> Option<RawReadings> {
        if text.trim().is_empty() {
            return None;
        }

        let line = parse_line(text);
        if line == Line::Terminator {
            let readings = self.fields.complete();
            self.reset();
            return readings;
        }

        self.fields.apply(&line);
        self.lines_seen += 1;
        if self.lines_seen >= MAX_BLOCK_LINES {
            // The device stopped sending separators; drop the stale fields
            // rather than letting them leak into a later block.
            self.reset();
        }
        None
    }

    fn reset(&mut self) {
        self.fields = RawFieldSet::default();
        self.lines_seen = 0;
    }
}

/// Iterator adapter: lines in, complete blocks out.
pub struct Blocks<I> {
    lines: I,
    accumulator: BlockAccumulator,
}

impl<I> Blocks<I>
where
    I: Iterator<Item = String>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            accumulator: BlockAccumulator::new(),
        }
    }
}

impl<I> Iterator for Blocks<I>
where
    I: Iterator<Item = String>,
{
    type Item = RawReadings;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            if let Some(readings) = self.accumulator.push_line(&line) {
                return Some(readings);
            }
        }
        None
    }
}
