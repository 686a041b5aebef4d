use protocol::{BlockAccumulator, Blocks, MAX_BLOCK_LINES};
use telemetry::RawReadings;

const BLOCK: [&str; 4] = [
    "SOL V:18.50 I:1200",
    "WND V:12.30 I:0.500",
    "LUX:45000 FAN:75%",
    "--------------------------",
];

fn feed(acc: &mut BlockAccumulator, lines: &[&str]) -> Vec<RawReadings> {
    lines.iter().filter_map(|l| acc.push_line(l)).collect()
}

#[test]
fn complete_block_is_emitted_on_terminator() {
    let mut acc = BlockAccumulator::new();
    let blocks = feed(&mut acc, &BLOCK);

    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0],
        RawReadings {
            v_pv: 18.5,
            i_pv: 1.2,
            v_wind: 12.3,
            i_wind: 0.5,
            lux: 45000.0,
            fan_pwm: 75.0,
        }
    );
}

#[test]
fn content_line_order_does_not_matter() {
    let mut forward = BlockAccumulator::new();
    let mut shuffled = BlockAccumulator::new();

    let a = feed(&mut forward, &BLOCK);
    let b = feed(
        &mut shuffled,
        &[
            "LUX:45000 FAN:75%",
            "SOL V:18.50 I:1200",
            "WND V:12.30 I:0.500",
            "---",
        ],
    );

    assert_eq!(a, b);
}

#[test]
fn duplicate_lines_overwrite_by_key() {
    let mut acc = BlockAccumulator::new();
    let blocks = feed(
        &mut acc,
        &[
            "SOL V:10.00 I:500",
            "SOL V:18.50 I:1200",
            "WND V:12.30 I:0.500",
            "LUX:45000 FAN:75%",
            "---",
        ],
    );

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].v_pv, 18.5);
    assert_eq!(blocks[0].i_pv, 1.2);
}

#[test]
fn incomplete_block_is_discarded_and_accumulator_recovers() {
    let mut acc = BlockAccumulator::new();

    // Missing the LUX/FAN line entirely.
    let first = feed(
        &mut acc,
        &["SOL V:18.50 I:1200", "WND V:12.30 I:0.500", "---"],
    );
    assert!(first.is_empty());

    // The next block must come through untouched by the aborted one.
    let second = feed(&mut acc, &BLOCK);
    assert_eq!(second.len(), 1);
}

#[test]
fn discarded_fields_do_not_bleed_into_the_next_block() {
    let mut acc = BlockAccumulator::new();

    // A solar reading from an aborted block...
    assert!(feed(&mut acc, &["SOL V:9.99 I:999", "---"]).is_empty());

    // ...must not complete a later block that is itself missing solar.
    let blocks = feed(
        &mut acc,
        &["WND V:12.30 I:0.500", "LUX:45000 FAN:75%", "---"],
    );
    assert!(blocks.is_empty());
}

#[test]
fn garbled_numbers_leave_no_partial_field() {
    let mut acc = BlockAccumulator::new();
    let blocks = feed(
        &mut acc,
        &[
            "SOL V:18.50 I:12x0",
            "WND V:12.30 I:0.500",
            "LUX:45000 FAN:75%",
            "---",
        ],
    );

    // The garbled solar line contributed nothing, so the block is short.
    assert!(blocks.is_empty());
}

#[test]
fn unknown_lines_are_skipped() {
    let mut acc = BlockAccumulator::new();
    let blocks = feed(
        &mut acc,
        &[
            "booting v2.1",
            "SOL V:18.50 I:1200",
            "SP:22.20 WP:6.15",
            "WND V:12.30 I:0.500",
            "LUX:45000 FAN:75%",
            "---",
        ],
    );

    assert_eq!(blocks.len(), 1);
}

#[test]
fn line_ceiling_forces_a_discard_without_terminator() {
    let mut acc = BlockAccumulator::new();

    assert!(acc.push_line("SOL V:18.50 I:1200").is_none());
    assert!(acc.push_line("WND V:12.30 I:0.500").is_none());
    assert!(acc.push_line("LUX:45000 FAN:75%").is_none());
    for _ in 0..MAX_BLOCK_LINES {
        assert!(acc.push_line("noise with no separator").is_none());
    }

    // Everything before the ceiling was dropped; a lone terminator now
    // closes an empty block.
    assert!(acc.push_line("---").is_none());

    // And a fresh block still works.
    let blocks = feed(&mut acc, &BLOCK);
    assert_eq!(blocks.len(), 1);
}

#[test]
fn empty_lines_do_not_count_toward_the_ceiling() {
    let mut acc = BlockAccumulator::new();

    for _ in 0..(MAX_BLOCK_LINES * 2) {
        assert!(acc.push_line("").is_none());
        assert!(acc.push_line("   ").is_none());
    }
    let blocks = feed(&mut acc, &BLOCK);

    assert_eq!(blocks.len(), 1);
}

#[test]
fn blocks_iterator_yields_one_reading_per_complete_block() {
    let mut lines: Vec<String> = Vec::new();
    lines.extend(BLOCK.iter().map(|s| s.to_string()));
    // An incomplete block in the middle.
    lines.push("SOL V:5.00 I:100".to_string());
    lines.push("---".to_string());
    lines.extend(BLOCK.iter().map(|s| s.to_string()));

    let readings: Vec<RawReadings> = Blocks::new(lines.into_iter()).collect();

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0], readings[1]);
}
