//! Character movement and jump state machine
//!
//! Walking and jumping are kinematic: constant speeds, no gravity. Horizontal
//! moves are rejected outright when the destination box would touch an
//! obstacle; turning is never blocked.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::{BoundingBox, BoundsIndex};
use super::state::{AnimationClip, SceneEvent};
use super::{Advance, TickContext};
use crate::config::ActorConfig;
use crate::rotate_by_yaw;

/// Discrete keyboard-style input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    ForwardDown,
    ForwardUp,
    BackwardDown,
    BackwardUp,
    TurnLeft,
    TurnRight,
    JumpTrigger,
}

/// Movement keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub forward: bool,
    pub backward: bool,
}

impl HeldKeys {
    #[inline]
    pub fn any(&self) -> bool {
        self.forward || self.backward
    }

    /// Local-space walk direction; forward wins when both are held
    pub fn direction(&self) -> Option<Vec3> {
        if self.forward {
            Some(Vec3::Z)
        } else if self.backward {
            Some(Vec3::NEG_Z)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    Ascending,
    /// Peak reached, heading back down
    Descending,
}

/// Movement state. Held walk keys keep steering while `Jumping`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorState {
    Idle,
    Walking,
    Jumping { origin_y: f32, phase: JumpPhase },
}

impl ActorState {
    pub fn is_jumping(&self) -> bool {
        matches!(self, ActorState::Jumping { .. })
    }

    /// Animation clip that matches this state
    pub fn clip(&self) -> AnimationClip {
        match self {
            ActorState::Idle => AnimationClip::Idle,
            ActorState::Walking => AnimationClip::Walking,
            ActorState::Jumping { .. } => AnimationClip::Jump,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorController {
    pub position: Vec3,
    /// Rotation about +Y (radians)
    pub facing: f32,
    state: ActorState,
    held: HeldKeys,
    config: ActorConfig,
}

impl ActorController {
    pub fn new(config: &ActorConfig) -> Self {
        Self {
            position: config.spawn,
            facing: 0.0,
            state: ActorState::Idle,
            held: HeldKeys::default(),
            config: config.clone(),
        }
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    /// Box around the character at its current position
    pub fn bounds(&self) -> BoundingBox {
        self.bounds_at(self.position)
    }

    /// Footprint centered on `position`, rising `height` from the feet
    pub fn bounds_at(&self, position: Vec3) -> BoundingBox {
        let hw = self.config.half_width;
        BoundingBox::new(
            Vec3::new(position.x - hw, position.y, position.z - hw),
            Vec3::new(position.x + hw, position.y + self.config.height, position.z + hw),
        )
    }

    /// World-space walk direction for the held keys, if any
    pub fn walk_direction(&self) -> Option<Vec3> {
        self.held.direction().map(|d| rotate_by_yaw(d, self.facing))
    }

    /// Apply one input event, emitting animation cues on state changes
    pub fn handle_input(&mut self, event: InputEvent, events: &mut Vec<SceneEvent>) {
        match event {
            InputEvent::ForwardDown => self.held.forward = true,
            InputEvent::ForwardUp => self.held.forward = false,
            InputEvent::BackwardDown => self.held.backward = true,
            InputEvent::BackwardUp => self.held.backward = false,
            InputEvent::TurnLeft => {
                self.facing += self.config.turn_step;
                return;
            }
            InputEvent::TurnRight => {
                self.facing -= self.config.turn_step;
                return;
            }
            InputEvent::JumpTrigger => {
                if !self.state.is_jumping() {
                    let origin_y = self.position.y;
                    self.transition(
                        ActorState::Jumping {
                            origin_y,
                            phase: JumpPhase::Ascending,
                        },
                        events,
                    );
                }
                return;
            }
        }

        // Walk keys only change the grounded gait
        match (self.state, self.held.any()) {
            (ActorState::Idle, true) => self.transition(ActorState::Walking, events),
            (ActorState::Walking, false) => self.transition(ActorState::Idle, events),
            _ => {}
        }
    }

    /// Advance movement and jump by `delta` seconds
    pub fn step(&mut self, delta: f32, bounds: &BoundsIndex, events: &mut Vec<SceneEvent>) {
        if self.held.any() {
            self.try_walk(delta, bounds);
        }
        if let ActorState::Jumping { origin_y, phase } = self.state {
            self.update_jump(delta, origin_y, phase, bounds, events);
        }
    }

    /// Move along the facing direction unless the destination is blocked.
    /// Returns whether the move was applied.
    fn try_walk(&mut self, delta: f32, bounds: &BoundsIndex) -> bool {
        let Some(direction) = self.walk_direction() else {
            return false;
        };

        let candidate = self.position + direction * (self.config.move_speed * delta);
        let probe = self
            .bounds_at(candidate)
            .expand_by_scalar(-self.config.collision_shrink);
        if bounds.overlaps(&probe) {
            return false;
        }
        self.position = candidate;
        true
    }

    fn update_jump(
        &mut self,
        delta: f32,
        origin_y: f32,
        phase: JumpPhase,
        bounds: &BoundsIndex,
        events: &mut Vec<SceneEvent>,
    ) {
        let step = self.config.jump_speed * delta;

        match phase {
            JumpPhase::Ascending => {
                self.position.y += step;
                if self.position.y >= origin_y + self.config.jump_height {
                    self.state = ActorState::Jumping {
                        origin_y,
                        phase: JumpPhase::Descending,
                    };
                }
            }
            JumpPhase::Descending => {
                self.position.y -= step;

                let probe = Vec3::new(self.position.x, self.position.y - step, self.position.z);
                if let Some(obstacle) = bounds.contains_point(probe) {
                    self.position.y = obstacle.top();
                    log::debug!("Landed on obstacle {} at y={}", obstacle.id, obstacle.top());
                    self.land(events);
                } else if self.position.y <= origin_y {
                    self.position.y = origin_y;
                    self.land(events);
                }
            }
        }
    }

    fn land(&mut self, events: &mut Vec<SceneEvent>) {
        let next = if self.held.any() {
            ActorState::Walking
        } else {
            ActorState::Idle
        };
        self.transition(next, events);
    }

    fn transition(&mut self, next: ActorState, events: &mut Vec<SceneEvent>) {
        let clip = next.clip();
        if clip != self.state.clip() {
            events.push(SceneEvent::Animation {
                clip,
                fade: clip.fade_duration(),
            });
        }
        log::debug!("Actor {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl Advance for ActorController {
    fn advance(&mut self, delta: f32, ctx: &mut TickContext<'_>) {
        self.step(delta, ctx.bounds, ctx.events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bounds::Obstacle;

    fn actor() -> ActorController {
        ActorController::new(&ActorConfig::default())
    }

    fn press(actor: &mut ActorController, event: InputEvent) -> Vec<SceneEvent> {
        let mut events = Vec::new();
        actor.handle_input(event, &mut events);
        events
    }

    fn wall_ahead() -> BoundsIndex {
        let mut index = BoundsIndex::new();
        index.insert(Obstacle::from_bounds(
            1,
            BoundingBox::new(Vec3::new(-2.0, 0.0, 0.6), Vec3::new(2.0, 3.0, 2.0)),
        ));
        index
    }

    #[test]
    fn test_idle_walk_idle_transitions() {
        let mut a = actor();
        assert_eq!(a.state(), ActorState::Idle);

        let events = press(&mut a, InputEvent::ForwardDown);
        assert_eq!(a.state(), ActorState::Walking);
        assert_eq!(
            events,
            vec![SceneEvent::Animation {
                clip: AnimationClip::Walking,
                fade: 0.5
            }]
        );

        press(&mut a, InputEvent::BackwardDown);
        press(&mut a, InputEvent::ForwardUp);
        assert_eq!(a.state(), ActorState::Walking);

        let events = press(&mut a, InputEvent::BackwardUp);
        assert_eq!(a.state(), ActorState::Idle);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_walk_clear_path_moves_speed_times_delta() {
        let mut a = actor();
        let index = BoundsIndex::new();
        let mut events = Vec::new();
        press(&mut a, InputEvent::ForwardDown);

        a.step(0.1, &index, &mut events);
        assert!((a.position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-6);

        // Rotated facing moves along the rotated axis
        a.facing = std::f32::consts::FRAC_PI_2;
        let start = a.position;
        a.step(0.2, &index, &mut events);
        assert!((a.position - (start + Vec3::new(1.0, 0.0, 0.0))).length() < 1e-5);
    }

    #[test]
    fn test_backward_moves_along_negative_z() {
        let mut a = actor();
        let index = BoundsIndex::new();
        press(&mut a, InputEvent::BackwardDown);
        a.step(0.1, &index, &mut Vec::new());
        assert!((a.position - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-6);
    }

    #[test]
    fn test_walk_blocked_by_obstacle_ahead() {
        let mut a = actor();
        let index = wall_ahead();
        press(&mut a, InputEvent::ForwardDown);

        a.step(0.1, &index, &mut Vec::new());
        assert_eq!(a.position, Vec3::ZERO);
        assert_eq!(a.state(), ActorState::Walking);

        // Backing away is still allowed
        press(&mut a, InputEvent::ForwardUp);
        press(&mut a, InputEvent::BackwardDown);
        a.step(0.1, &index, &mut Vec::new());
        assert!(a.position.z < 0.0);
    }

    #[test]
    fn test_turning_is_unconditional() {
        let mut a = actor();
        press(&mut a, InputEvent::TurnLeft);
        press(&mut a, InputEvent::TurnLeft);
        assert!((a.facing - 0.2).abs() < 1e-6);
        press(&mut a, InputEvent::TurnRight);
        assert!((a.facing - 0.1).abs() < 1e-6);
        assert_eq!(a.state(), ActorState::Idle);
    }

    #[test]
    fn test_jump_round_trip_returns_to_origin() {
        let mut a = actor();
        a.position.y = 1.25;
        let index = BoundsIndex::new();
        let mut events = Vec::new();

        a.handle_input(InputEvent::JumpTrigger, &mut events);
        assert!(matches!(
            a.state(),
            ActorState::Jumping {
                phase: JumpPhase::Ascending,
                ..
            }
        ));

        let mut peak = a.position.y;
        let mut steps = 0;
        while a.state().is_jumping() {
            a.step(1.0 / 60.0, &index, &mut events);
            peak = peak.max(a.position.y);
            steps += 1;
            assert!(steps < 1000, "jump never landed");
        }

        assert!(peak >= 1.25 + 2.0);
        assert_eq!(a.position.y, 1.25);
        assert_eq!(a.state(), ActorState::Idle);
        assert_eq!(
            events.last(),
            Some(&SceneEvent::Animation {
                clip: AnimationClip::Idle,
                fade: 0.5
            })
        );
    }

    #[test]
    fn test_jump_cue_from_idle_and_walking() {
        let jump_cue = vec![SceneEvent::Animation {
            clip: AnimationClip::Jump,
            fade: 0.2,
        }];

        let mut a = actor();
        assert_eq!(press(&mut a, InputEvent::JumpTrigger), jump_cue);

        let mut b = actor();
        press(&mut b, InputEvent::ForwardDown);
        assert_eq!(b.state(), ActorState::Walking);
        assert_eq!(press(&mut b, InputEvent::JumpTrigger), jump_cue);
        assert!(b.state().is_jumping());
    }

    #[test]
    fn test_jump_trigger_ignored_midair() {
        let mut a = actor();
        let index = BoundsIndex::new();
        press(&mut a, InputEvent::JumpTrigger);
        a.step(0.1, &index, &mut Vec::new());
        let events = press(&mut a, InputEvent::JumpTrigger);
        assert!(events.is_empty());
        assert_eq!(
            a.state(),
            ActorState::Jumping {
                origin_y: 0.0,
                phase: JumpPhase::Ascending
            }
        );
    }

    #[test]
    fn test_lands_on_obstacle_top() {
        let mut index = BoundsIndex::new();
        index.insert(Obstacle::from_bounds(
            3,
            BoundingBox::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0)),
        ));

        let mut a = actor();
        // Start above the block so the ascent is unobstructed
        a.position.y = 1.0;
        let mut events = Vec::new();
        a.handle_input(InputEvent::JumpTrigger, &mut events);
        while a.state().is_jumping() {
            a.step(0.1, &index, &mut events);
        }
        assert_eq!(a.position.y, 1.0);

        // Descending from a ground-level jump straight over the block
        let mut a = actor();
        a.position = Vec3::new(0.0, 0.9, 0.0);
        a.state = ActorState::Jumping {
            origin_y: 0.0,
            phase: JumpPhase::Descending,
        };
        a.step(0.01, &index, &mut events);
        assert_eq!(a.position.y, 1.0);
        assert_eq!(a.state(), ActorState::Idle);
    }

    #[test]
    fn test_walk_while_jumping_keeps_moving() {
        let mut a = actor();
        let index = BoundsIndex::new();
        press(&mut a, InputEvent::ForwardDown);
        press(&mut a, InputEvent::JumpTrigger);
        assert!(a.state().is_jumping());

        a.step(0.1, &index, &mut Vec::new());
        assert!((a.position.z - 0.5).abs() < 1e-6);
        assert!((a.position.y - 0.5).abs() < 1e-6);

        // Releasing mid-air does not cancel the jump
        press(&mut a, InputEvent::ForwardUp);
        assert!(a.state().is_jumping());

        // Landing with the key held resumes walking
        press(&mut a, InputEvent::ForwardDown);
        let mut events = Vec::new();
        while a.state().is_jumping() {
            a.step(0.1, &index, &mut events);
        }
        assert_eq!(a.state(), ActorState::Walking);
        assert_eq!(
            events.last(),
            Some(&SceneEvent::Animation {
                clip: AnimationClip::Walking,
                fade: 0.5
            })
        );
    }
}
