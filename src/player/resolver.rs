use bevy::prelude::*;

use super::input::{InputIntent, RawInput};
use super::life::Respawning;
use super::state::*;

/// A direction lock that expires after a fixed duration
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectionLock {
    pub active: bool,
    pub elapsed: f32,
}

impl DirectionLock {
    pub fn engage(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
    }

    fn tick(&mut self, duration: f32, dt: f32) {
        if !self.active {
            return;
        }
        if self.elapsed < duration {
            self.elapsed += dt;
        } else {
            self.active = false;
        }
    }
}

/// Contact facts the resolver needs from the last fixed step
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveContext {
    pub grounded: bool,
    pub wall_slide: bool,
    pub wall_on_right: bool,
    pub grabbing_ledge: bool,
}

impl ResolveContext {
    pub fn new(contact: &ContactState, grab: &LedgeGrab) -> Self {
        Self {
            grounded: contact.grounded,
            wall_slide: contact.wall_slide,
            wall_on_right: contact.wall_on_right,
            grabbing_ledge: grab.grabbing,
        }
    }
}

/// Timers and credits that turn raw input into [`InputIntent`]
#[derive(Component, Debug, Clone)]
pub struct InputResolver {
    /// Locks `left` after jumping off a wall on the left
    pub wall_jump_lock_left: DirectionLock,
    /// Locks `right` after jumping off a wall on the right
    pub wall_jump_lock_right: DirectionLock,
    /// Time spent pressing left while sliding on a right wall
    pub stick_to_right_wall: f32,
    /// Time spent pressing right while sliding on a left wall
    pub stick_to_left_wall: f32,
    pub can_double_jump: bool,
}

impl Default for InputResolver {
    fn default() -> Self {
        Self {
            wall_jump_lock_left: DirectionLock::default(),
            wall_jump_lock_right: DirectionLock::default(),
            stick_to_right_wall: 0.0,
            stick_to_left_wall: 0.0,
            can_double_jump: true,
        }
    }
}

impl InputResolver {
    /// Resolves one frame of raw input into `intent`.
    pub fn resolve(
        &mut self,
        raw: &RawInput,
        ctx: ResolveContext,
        config: &PlayerConfig,
        abilities: &Abilities,
        intent: &mut InputIntent,
        dt: f32,
    ) {
        self.resolve_directions(raw, ctx, config, intent, dt);

        intent.run = abilities.run() && raw.run;
        intent.crouch = config.uses_crouch && raw.crouch;

        self.resolve_jump(raw, ctx, config, abilities, intent);
    }

    fn resolve_directions(
        &mut self,
        raw: &RawInput,
        ctx: ResolveContext,
        config: &PlayerConfig,
        intent: &mut InputIntent,
        dt: f32,
    ) {
        self.wall_jump_lock_left.tick(config.wall_jump_lock_time, dt);
        self.wall_jump_lock_right.tick(config.wall_jump_lock_time, dt);

        intent.up = raw.axis.y > 0.0;
        intent.down = raw.axis.y < 0.0;
        intent.left = raw.axis.x < 0.0 && !self.wall_jump_lock_left.active;
        intent.right = raw.axis.x > 0.0 && !self.wall_jump_lock_right.active;

        if !config.sticks_to_walls {
            return;
        }

        if intent.left {
            let sticking = self.stick_to_right_wall < config.stick_to_wall_time;
            if ctx.wall_slide && ctx.wall_on_right && sticking {
                self.stick_to_right_wall += dt;
                intent.left = false;
            }
        } else {
            self.stick_to_right_wall = 0.0;
        }

        if intent.right {
            let sticking = self.stick_to_left_wall < config.stick_to_wall_time;
            if ctx.wall_slide && !ctx.wall_on_right && sticking {
                self.stick_to_left_wall += dt;
                intent.right = false;
            }
        } else {
            self.stick_to_left_wall = 0.0;
        }
    }

    fn resolve_jump(
        &mut self,
        raw: &RawInput,
        ctx: ResolveContext,
        config: &PlayerConfig,
        abilities: &Abilities,
        intent: &mut InputIntent,
    ) {
        let can_jump =
            ctx.grounded || ctx.grabbing_ledge || (config.jump_from_walls && ctx.wall_slide);

        if raw.jump_pressed && can_jump {
            intent.jump = true;

            if ctx.wall_slide && !ctx.grabbing_ledge {
                if ctx.wall_on_right {
                    self.wall_jump_lock_right.engage();
                } else {
                    self.wall_jump_lock_left.engage();
                }
            }

            if config.wall_resets_double_jump && ctx.wall_slide {
                self.can_double_jump = true;
            }
            if config.ledge_resets_double_jump && ctx.grabbing_ledge {
                self.can_double_jump = true;
            }
        }

        if raw.jump_released && !ctx.grounded {
            intent.jump_cancel = true;
        }

        if !abilities.double_jump() || intent.jump {
            return;
        }

        if ctx.grounded {
            self.can_double_jump = true;
        }
        if !config.wall_resets_double_jump && ctx.wall_slide {
            self.can_double_jump = false;
        }

        let airborne = !ctx.grounded && !ctx.wall_slide;
        if raw.jump_pressed && self.can_double_jump && airborne {
            intent.double_jump = true;
            self.can_double_jump = false;
        }
        if raw.jump_released && !self.can_double_jump && airborne {
            intent.double_jump_cancel = true;
        }
    }
}

/// Samples raw input into each player's intent once per frame. Blocked and
/// dead players get an empty intent.
pub fn resolve_input(
    mut query: Query<
        (
            &mut RawInput,
            &mut InputResolver,
            &mut InputIntent,
            &ContactState,
            &LedgeGrab,
            &PlayerConfig,
            &Abilities,
            Has<InputBlocked>,
            Has<Respawning>,
        ),
        With<Player>,
    >,
    time: Res<Time>,
) {
    let dt = time.delta_secs();

    for (mut raw, mut resolver, mut intent, contact, grab, config, abilities, blocked, dead) in
        &mut query
    {
        if blocked || dead {
            intent.clear();
        } else {
            let ctx = ResolveContext::new(contact, grab);
            resolver.resolve(&raw, ctx, config, abilities, &mut intent, dt);
        }
        raw.clear_edges();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn grounded() -> ResolveContext {
        ResolveContext {
            grounded: true,
            ..default()
        }
    }

    fn sliding_on_right_wall() -> ResolveContext {
        ResolveContext {
            wall_slide: true,
            wall_on_right: true,
            ..default()
        }
    }

    fn press_jump() -> RawInput {
        RawInput {
            jump_pressed: true,
            jump_held: true,
            ..default()
        }
    }

    #[test]
    fn jump_latches_on_press_when_grounded() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();

        resolver.resolve(
            &press_jump(),
            grounded(),
            &config,
            &Abilities::default(),
            &mut intent,
            DT,
        );
        assert!(intent.jump);
    }

    #[test]
    fn jump_ignored_in_the_air() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();

        resolver.resolve(
            &press_jump(),
            ResolveContext::default(),
            &config,
            &Abilities::default(),
            &mut intent,
            DT,
        );
        assert!(!intent.jump);
    }

    #[test]
    fn held_jump_does_not_relatch() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();
        let held = RawInput {
            jump_held: true,
            ..default()
        };

        resolver.resolve(&held, grounded(), &config, &Abilities::default(), &mut intent, DT);
        assert!(!intent.jump);
    }

    #[test]
    fn wall_jump_locks_wall_side_until_timer_expires() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();

        resolver.resolve(
            &press_jump(),
            sliding_on_right_wall(),
            &config,
            &Abilities::default(),
            &mut intent,
            DT,
        );
        assert!(intent.jump);
        assert!(resolver.wall_jump_lock_right.active);

        let push_right = RawInput {
            axis: Vec2::X,
            ..default()
        };
        resolver.resolve(
            &push_right,
            ResolveContext::default(),
            &config,
            &Abilities::default(),
            &mut intent,
            DT,
        );
        assert!(!intent.right, "right stays locked right after the wall jump");

        for _ in 0..30 {
            resolver.resolve(
                &push_right,
                ResolveContext::default(),
                &config,
                &Abilities::default(),
                &mut intent,
                DT,
            );
        }
        assert!(intent.right, "lock expires after wall_jump_lock_time");
    }

    #[test]
    fn pressing_away_from_wall_sticks_for_grace_period() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();
        let push_left = RawInput {
            axis: Vec2::NEG_X,
            ..default()
        };

        resolver.resolve(
            &push_left,
            sliding_on_right_wall(),
            &config,
            &Abilities::default(),
            &mut intent,
            DT,
        );
        assert!(!intent.left);

        // 0.25s of grace at 60 fps
        for _ in 0..16 {
            resolver.resolve(
                &push_left,
                sliding_on_right_wall(),
                &config,
                &Abilities::default(),
                &mut intent,
                DT,
            );
        }
        assert!(intent.left);
    }

    #[test]
    fn releasing_away_press_resets_stick_timer() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();
        let push_left = RawInput {
            axis: Vec2::NEG_X,
            ..default()
        };

        for _ in 0..10 {
            resolver.resolve(
                &push_left,
                sliding_on_right_wall(),
                &config,
                &Abilities::default(),
                &mut intent,
                DT,
            );
        }
        resolver.resolve(
            &RawInput::default(),
            sliding_on_right_wall(),
            &config,
            &Abilities::default(),
            &mut intent,
            DT,
        );
        assert_eq!(resolver.stick_to_right_wall, 0.0);
    }

    #[test]
    fn double_jump_spends_credit_once() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();
        let abilities = Abilities::new(false, true);

        resolver.resolve(
            &press_jump(),
            ResolveContext::default(),
            &config,
            &abilities,
            &mut intent,
            DT,
        );
        assert!(intent.double_jump);
        assert!(!resolver.can_double_jump);

        intent.double_jump = false;
        resolver.resolve(
            &press_jump(),
            ResolveContext::default(),
            &config,
            &abilities,
            &mut intent,
            DT,
        );
        assert!(!intent.double_jump);

        resolver.resolve(&RawInput::default(), grounded(), &config, &abilities, &mut intent, DT);
        assert!(resolver.can_double_jump, "landing restores the credit");
    }

    #[test]
    fn double_jump_requires_ability() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();

        resolver.resolve(
            &press_jump(),
            ResolveContext::default(),
            &config,
            &Abilities::default(),
            &mut intent,
            DT,
        );
        assert!(!intent.double_jump);
    }

    #[test]
    fn wall_slide_revokes_double_jump_unless_walls_reset_it() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let mut config = PlayerConfig::default();
        let abilities = Abilities::new(false, true);

        resolver.resolve(
            &RawInput::default(),
            sliding_on_right_wall(),
            &config,
            &abilities,
            &mut intent,
            DT,
        );
        assert!(!resolver.can_double_jump);

        config.wall_resets_double_jump = true;
        resolver.resolve(
            &press_jump(),
            sliding_on_right_wall(),
            &config,
            &abilities,
            &mut intent,
            DT,
        );
        assert!(resolver.can_double_jump);
    }

    #[test]
    fn release_in_air_latches_cancels() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();
        let abilities = Abilities::new(false, true);
        resolver.can_double_jump = false;

        let release = RawInput {
            jump_released: true,
            ..default()
        };
        resolver.resolve(&release, ResolveContext::default(), &config, &abilities, &mut intent, DT);
        assert!(intent.jump_cancel);
        assert!(intent.double_jump_cancel);
    }

    #[test]
    fn release_on_ground_does_not_cancel() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let config = PlayerConfig::default();
        let release = RawInput {
            jump_released: true,
            ..default()
        };

        resolver.resolve(&release, grounded(), &config, &Abilities::default(), &mut intent, DT);
        assert!(!intent.jump_cancel);
    }

    #[test]
    fn run_and_crouch_need_their_switches() {
        let mut resolver = InputResolver::default();
        let mut intent = InputIntent::default();
        let mut config = PlayerConfig::default();
        let raw = RawInput {
            run: true,
            crouch: true,
            ..default()
        };

        resolver.resolve(&raw, grounded(), &config, &Abilities::default(), &mut intent, DT);
        assert!(!intent.run);
        assert!(!intent.crouch);

        config.uses_crouch = true;
        resolver.resolve(&raw, grounded(), &config, &Abilities::new(true, false), &mut intent, DT);
        assert!(intent.run);
        assert!(intent.crouch);
    }
}
