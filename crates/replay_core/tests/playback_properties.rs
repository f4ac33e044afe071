//! Playback engine properties: decoder round trip, cursor reversibility,
//! auto-pause at both ends and the documented scenarios.

use proptest::prelude::*;
use replay_core::{
    AccumulationRenderer, EventLayout, EventStream, FrameLayout, FrameSelector, FrameStream,
    ImageBuffer, PlaybackClock, PlaybackState, SampleOrder, SensorGeometry, PAUSED_INDEX, RATES,
};

fn encode_all(layout: &EventLayout, events: &[(u16, u16, i8, i8, u32)]) -> Vec<u8> {
    events
        .iter()
        .flat_map(|&(x, y, p, v, us)| layout.encode(x, y, p, v, us))
        .collect()
}

fn sorted_stream(mut micros: Vec<u32>) -> EventStream {
    micros.sort_unstable();
    let layout = EventLayout::default();
    let events: Vec<_> = micros
        .iter()
        .enumerate()
        .map(|(i, &us)| ((i % 240) as u16, (i % 180) as u16, if i % 2 == 0 { 1 } else { -1 }, 1, us))
        .collect();
    EventStream::decode(&encode_all(&layout, &events), &layout).unwrap()
}

fn sign(flag: bool) -> i8 {
    if flag {
        1
    } else {
        -1
    }
}

proptest! {
    #[test]
    fn encode_decode_round_trip(
        raw in prop::collection::vec(
            (0u16..240, 0u16..180, any::<bool>(), any::<bool>(), any::<u32>()),
            1..200,
        )
    ) {
        let layout = EventLayout::default();
        let events: Vec<_> = raw
            .iter()
            .map(|&(x, y, p, v, us)| (x, y, sign(p), sign(v), us))
            .collect();
        let stream = EventStream::decode(&encode_all(&layout, &events), &layout).unwrap();

        prop_assert_eq!(stream.len(), events.len());
        for (i, &(x, y, p, v, us)) in events.iter().enumerate() {
            prop_assert_eq!(stream.x()[i], x);
            prop_assert_eq!(stream.y()[i], y);
            prop_assert_eq!(stream.polarity()[i], p);
            prop_assert_eq!(stream.validity()[i], v);
            prop_assert_eq!(stream.timestamps()[i], us as f64 / 1_000_000.0);
        }
    }

    #[test]
    fn monotonic_fixtures_decode_monotonic(micros in prop::collection::vec(any::<u32>(), 1..300)) {
        let stream = sorted_stream(micros);
        prop_assert!(stream.is_monotonic());
        prop_assert!(stream.timestamps().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn forward_then_backward_restores_cursor(
        micros in prop::collection::vec(0u32..4_000_000, 2..200),
        start in 1u32..2048,
        delta in 1u32..2048,
        decay in prop_oneof![Just(0.0), Just(0.01), Just(0.5)],
    ) {
        let events = sorted_stream(micros);
        // multiples of 1/1024 keep the virtual time arithmetic exact
        let start = start as f64 / 1024.0;
        let delta = delta as f64 / 1024.0;
        prop_assume!(start + delta < events.duration());

        let renderer = AccumulationRenderer::new(decay);
        let mut state = PlaybackState::new();
        let mut image = ImageBuffer::new(events.geometry());
        renderer.advance(&events, &mut state, &mut image, start);
        let cursor = state.cursor;
        prop_assert_eq!(cursor, events.count_until(0, events.len(), start));

        renderer.advance(&events, &mut state, &mut image, delta);
        renderer.advance(&events, &mut state, &mut image, -delta);

        prop_assert_eq!(state.cursor, cursor);
        prop_assert_eq!(state.virtual_time, start);
    }

    #[test]
    fn zero_ticks_change_nothing(
        micros in prop::collection::vec(0u32..1_000_000, 1..100),
        start in 0.0f64..1.0,
    ) {
        let events = sorted_stream(micros);
        let renderer = AccumulationRenderer::default();
        let mut state = PlaybackState::new();
        let mut image = ImageBuffer::new(events.geometry());
        renderer.advance(&events, &mut state, &mut image, start);

        let before = (state.clone(), image.clone());
        renderer.advance(&events, &mut state, &mut image, 0.0);
        renderer.advance(&events, &mut state, &mut image, 0.0);
        prop_assert_eq!((state, image), before);
    }

    #[test]
    fn cursor_matches_virtual_time(
        micros in prop::collection::vec(0u32..2_000_000, 1..150),
        steps in prop::collection::vec(-0.5f64..0.5, 1..40),
    ) {
        let events = sorted_stream(micros);
        let renderer = AccumulationRenderer::default();
        let mut state = PlaybackState::new();
        let mut image = ImageBuffer::new(events.geometry());

        for dt in steps {
            renderer.advance(&events, &mut state, &mut image, dt);
            prop_assert!(state.virtual_time >= 0.0);
            prop_assert!(state.virtual_time <= events.duration());
            prop_assert!(state.cursor <= events.len());
            if state.virtual_time > 0.0 {
                prop_assert_eq!(
                    state.cursor,
                    events.count_until(0, events.len(), state.virtual_time)
                );
            }
        }
    }

    #[test]
    fn increase_rate_saturates(decreases in 0usize..40) {
        let mut clock = PlaybackClock::new();
        for _ in 0..decreases {
            clock.decrease_rate();
        }
        for _ in 0..100 {
            clock.increase_rate();
            prop_assert!(clock.rate_index() < RATES.len());
        }
        prop_assert_eq!(clock.rate_index(), RATES.len() - 1);
        prop_assert_eq!(clock.rate_index(), PAUSED_INDEX + 8);
    }
}

#[test]
fn four_event_scenario() {
    let layout = EventLayout::default();
    let events = [
        (0, 0, 1, 1, 0),
        (1, 1, -1, 1, 100_000),
        (2, 2, 1, 1, 200_000),
        (3, 3, -1, 1, 300_000),
    ];
    let stream = EventStream::decode(&encode_all(&layout, &events), &layout).unwrap();
    let renderer = AccumulationRenderer::new(0.0);
    let mut state = PlaybackState::new();
    let mut image = ImageBuffer::new(stream.geometry());

    let window = renderer.advance(&stream, &mut state, &mut image, 0.25);

    assert_eq!(window, 0..3);
    assert_eq!(state.cursor, 3);
    assert_eq!(image.get(0, 0), Some(1.0));
    assert_eq!(image.get(1, 1), Some(-1.0));
    assert_eq!(image.get(2, 2), Some(1.0));
    assert_eq!(image.get(3, 3), Some(0.0));
}

#[test]
fn driving_past_either_end_pauses() {
    let stream = sorted_stream(vec![100_000, 200_000, 900_000]);
    let renderer = AccumulationRenderer::default();
    let mut state = PlaybackState::new();
    let mut image = ImageBuffer::new(stream.geometry());

    state.clock.increase_rate();
    renderer.advance(&stream, &mut state, &mut image, 3.0);
    assert_eq!(state.virtual_time, stream.duration());
    assert_eq!(state.clock.rate_index(), PAUSED_INDEX);

    state.clock.decrease_rate();
    renderer.advance(&stream, &mut state, &mut image, -3.0);
    assert_eq!(state.virtual_time, 0.0);
    assert_eq!(state.cursor, 0);
    assert_eq!(state.clock.rate_index(), PAUSED_INDEX);
}

#[test]
fn frame_scenario_clamps_to_last_frame() {
    let layout = FrameLayout {
        geometry: SensorGeometry::new(3, 2),
        sample_order: SampleOrder::BigEndian,
    };
    let mut bytes = layout.encode(0, &[1, 2, 3, 4, 5, 6]);
    bytes.extend(layout.encode(1_000_000, &[6, 5, 4, 3, 2, 1]));
    let frames = FrameStream::decode(&bytes, &layout).unwrap();
    let mut state = PlaybackState::new();
    for _ in 0..5 {
        state.clock.increase_rate();
    }
    let mut image = ImageBuffer::new(frames.geometry());

    let index = FrameSelector::new().advance(&frames, &mut state, &mut image, 1.5);

    assert_eq!(index, 1);
    assert_eq!(state.virtual_time, 1.0);
    assert_eq!(state.clock.rate_index(), PAUSED_INDEX);
    assert_eq!(image.get(0, 0), Some(1.0));
    assert_eq!(image.get(2, 1), Some(1.0 / 6.0));
}
