//! Per-frame scene tick
//!
//! Order within a tick is fixed: input, snowfall, character, gifts, camera.
//! The host renders after `tick` returns.

use super::actor::InputEvent;
use super::state::{Scene, SceneEvent};
use super::{Advance, TickContext};
use crate::consts::MAX_FRAME_DT;

/// Input events collected since the previous frame, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// What a tick produced
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<SceneEvent>,
    /// Gifts picked up this tick
    pub collected: usize,
}

/// Advance the scene by one frame of `dt` seconds
pub fn tick(scene: &mut Scene, input: &TickInput, dt: f32) -> TickReport {
    // Hitches (tab switch, debugger) must not teleport the character
    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

    let mut events = Vec::new();
    for &event in &input.events {
        scene.actor.handle_input(event, &mut events);
    }

    scene.frame += 1;
    scene.elapsed += f64::from(dt);

    let mut ctx = TickContext {
        bounds: &scene.bounds,
        events: &mut events,
        elapsed: scene.elapsed,
    };

    Advance::advance(&mut scene.snow, dt, &mut ctx);
    scene.actor.advance(dt, &mut ctx);
    scene.gifts.advance(dt, &mut ctx);
    let collected = scene.gifts.collect(&scene.actor.bounds(), ctx.events);

    scene.camera.follow(scene.actor.position, scene.actor.facing);
    if collected > 0 {
        log::info!(
            "Frame {}: collected {} gift(s), {} left",
            scene.frame,
            collected,
            scene.gifts.len()
        );
    }

    TickReport { events, collected }
}
