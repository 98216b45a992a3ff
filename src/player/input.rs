use bevy::ecs::observer::On;
use bevy::prelude::{Component, EntityEvent, Query, Vec2};
use bevy_enhanced_input::prelude::*;

/// Move in a direction (WASD / arrows)
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct MoveAction;

/// Jump action
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct JumpAction;

/// Run action (hold)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct RunAction;

/// Crouch action (hold)
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct CrouchAction;

/// Raw device state, written by the input observers and read once per frame
/// by the resolver.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct RawInput {
    pub axis: Vec2,
    pub run: bool,
    pub crouch: bool,
    pub jump_held: bool,
    /// Rising edge of jump since the last resolve
    pub jump_pressed: bool,
    /// Falling edge of jump since the last resolve
    pub jump_released: bool,
}

impl RawInput {
    pub fn clear_edges(&mut self) {
        self.jump_pressed = false;
        self.jump_released = false;
    }
}

/// What the player wants to do, as seen by the locomotion step.
///
/// Directions, `run` and `crouch` mirror what is held this frame. `jump`,
/// `double_jump` and the two cancels stay latched until the fixed step uses them.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub crouch: bool,
    pub jump: bool,
    pub jump_cancel: bool,
    pub double_jump: bool,
    pub double_jump_cancel: bool,
}

impl InputIntent {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// System to handle move input via observer
pub fn handle_move_input(trigger: On<Fire<MoveAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.axis = trigger.value;
    }
}

/// Clear move input when all movement keys are released
pub fn handle_move_end(trigger: On<Complete<MoveAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.axis = Vec2::ZERO;
    }
}

/// Handle run start
pub fn handle_run_start(trigger: On<Start<RunAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.run = true;
    }
}

/// Handle run end
pub fn handle_run_end(trigger: On<Complete<RunAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.run = false;
    }
}

/// Handle crouch start
pub fn handle_crouch_start(trigger: On<Start<CrouchAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.crouch = true;
    }
}

/// Handle crouch end
pub fn handle_crouch_end(trigger: On<Complete<CrouchAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.crouch = false;
    }
}

/// Handle jump press
pub fn handle_jump_start(trigger: On<Start<JumpAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.jump_pressed = true;
        raw.jump_held = true;
    }
}

/// Handle jump release
pub fn handle_jump_end(trigger: On<Complete<JumpAction>>, mut query: Query<&mut RawInput>) {
    if let Ok(mut raw) = query.get_mut(trigger.event_target()) {
        raw.jump_held = false;
        raw.jump_released = true;
    }
}
