//! Drives `run` with a scripted display.

use replay_core::{
    run, Display, DisplayStatus, EventLayout, Marker, OverlaySource, Player, RateCommand,
    SourceConfig, SourceMode, Snapshot,
};
use std::convert::Infallible;

/// Records every status it is shown and replays a script of commands.
struct ScriptedDisplay {
    script: Vec<Vec<RateCommand>>,
    presented: Vec<(f64, f64, Option<Marker>)>,
}

impl Display for ScriptedDisplay {
    type Error = Infallible;

    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), Infallible> {
        self.presented.push((
            snapshot.status.rate,
            snapshot.status.virtual_time,
            snapshot.marker,
        ));
        Ok(())
    }

    fn pump(&mut self, commands: &mut Vec<RateCommand>) -> DisplayStatus {
        if self.script.is_empty() {
            return DisplayStatus::Closed;
        }
        commands.extend(self.script.remove(0));
        DisplayStatus::Continue
    }
}

struct Always(Marker);

impl OverlaySource for Always {
    fn marker_at(&mut self, _virtual_time: f64) -> Option<Marker> {
        Some(self.0)
    }
}

fn event_player() -> Player {
    let config = SourceConfig::default();
    let layout = EventLayout::default();
    let bytes: Vec<u8> = (0..10u32)
        .flat_map(|i| layout.encode(i as u16, i as u16, 1, 1, i * 100_000))
        .collect();
    Player::new(config.decode(&bytes).unwrap())
}

#[test]
fn commands_apply_before_the_next_tick() {
    let mut player = event_player();
    let mut display = ScriptedDisplay {
        script: vec![
            vec![RateCommand::Increase, RateCommand::Increase],
            vec![RateCommand::Pause],
            vec![RateCommand::Increase],
        ],
        presented: Vec::new(),
    };

    run(&mut player, &mut display).unwrap();

    let rates: Vec<f64> = display.presented.iter().map(|p| p.0).collect();
    assert_eq!(rates, vec![0.0, 0.01, 0.0, 0.001]);
    assert_eq!(display.presented[0].1, 0.0);
    assert!(player.state().virtual_time >= 0.0);
    assert!(player.state().virtual_time < player.source().duration());
}

#[test]
fn loop_stops_when_display_closes() {
    let mut player = event_player();
    let mut display = ScriptedDisplay {
        script: Vec::new(),
        presented: Vec::new(),
    };
    run(&mut player, &mut display).unwrap();
    assert_eq!(display.presented.len(), 1);
}

#[test]
fn overlay_reaches_the_display() {
    let marker = Marker::new(10.0, 20.0, 5.0);
    let mut player = event_player().with_overlay(Box::new(Always(marker)));
    let mut display = ScriptedDisplay {
        script: vec![Vec::new()],
        presented: Vec::new(),
    };
    run(&mut player, &mut display).unwrap();
    assert!(display.presented.iter().all(|p| p.2 == Some(marker)));
}

#[test]
fn frame_recordings_ignore_overlays() {
    let config = SourceConfig {
        mode: SourceMode::Frames,
        ..SourceConfig::default()
    };
    let samples = vec![1u16; config.frames.geometry.pixel_count()];
    let bytes = config.frames.encode(0, &samples);
    let mut player = Player::new(config.decode(&bytes).unwrap())
        .with_overlay(Box::new(Always(Marker::new(0.0, 0.0, 1.0))));

    let snapshot = player.step(0.1);
    assert_eq!(snapshot.marker, None);
    assert!(snapshot.image.values().iter().all(|&v| v == 1.0));
}
