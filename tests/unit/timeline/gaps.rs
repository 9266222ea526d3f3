use super::*;
use crate::timeline::dsl::EventBuilder;

fn rate() -> FrameRate {
    FrameRate::new(24).unwrap()
}

fn events(ranges: &[(u64, u64)]) -> Vec<Event> {
    ranges
        .iter()
        .map(|&(a, b)| {
            EventBuilder::new("AX", Channel::Video, a..b)
                .build(rate(), 0)
                .unwrap()
        })
        .collect()
}

fn assert_exact_cover(filled: &[Event], extent: u64) {
    let mut cursor = 0;
    for e in filled {
        assert_eq!(e.rec_in.frames(), cursor, "hole or overlap at {cursor}");
        cursor = e.rec_out.frames();
    }
    assert_eq!(cursor, extent);
}

#[test]
fn gap_between_events_is_filled() {
    let gaps = resolve_gaps(Channel::Video, &events(&[(0, 48), (96, 120)]), 120, rate());
    assert_eq!(gaps.len(), 1);
    assert_eq!(gaps[0].rec_in.frames(), 48);
    assert_eq!(gaps[0].rec_out.frames(), 96);
    assert_eq!(gaps[0].src_in.frames(), 0);
    assert_eq!(gaps[0].src_out.frames(), 48);
    assert!(gaps[0].is_gap);
    assert!(gaps[0].validate(rate()).is_ok());
}

#[test]
fn leading_and_trailing_gaps_are_filled() {
    let filled = fill_gaps(Channel::Video, events(&[(10, 20), (30, 40)]), 50, rate());
    assert_eq!(filled.len(), 5);
    assert!(filled[0].is_gap && filled[2].is_gap && filled[4].is_gap);
    assert_exact_cover(&filled, 50);
}

#[test]
fn gap_coverage_is_exact_for_many_layouts() {
    // Every layout of up to three events over a short timeline.
    let slots = [(0, 4), (4, 8), (2, 6), (8, 12), (9, 10), (12, 16)];
    for mask in 0u32..(1 << slots.len()) {
        let mut chosen: Vec<(u64, u64)> = slots
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &s)| s)
            .collect();
        chosen.sort();
        if chosen.windows(2).any(|w| w[1].0 < w[0].1) {
            continue;
        }
        let extent = chosen.last().map(|s| s.1).unwrap_or(0).max(16);
        let filled = fill_gaps(Channel::Video, events(&chosen), extent, rate());
        assert_exact_cover(&filled, extent);
        assert_eq!(filled.iter().filter(|e| !e.is_gap).count(), chosen.len());
    }
}

#[test]
fn contiguous_events_need_no_gaps() {
    assert!(resolve_gaps(Channel::Video, &events(&[(0, 10), (10, 20)]), 20, rate()).is_empty());
}

#[test]
fn implicit_policy_is_a_noop() {
    let input = events(&[(10, 20)]);
    let out = GapPolicy::Implicit.apply(Channel::Video, input.clone(), 40, rate());
    assert_eq!(out, input);
    let out = GapPolicy::Explicit.apply(Channel::Video, input, 40, rate());
    assert_eq!(out.len(), 3);
}

#[test]
fn gap_reels_match_case_insensitively() {
    assert!(is_gap_reel("bl"));
    assert!(is_gap_reel("Black"));
    assert!(!is_gap_reel("AX"));
}
