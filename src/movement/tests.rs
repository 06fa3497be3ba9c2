//! Movement domain: tests for edge detection, the locomotion state machine
//! and the character controller.

use avian2d::prelude::LinearVelocity;
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::{Dir2, Vec2, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::systems::validate_characters;
use super::{
    CharacterController, ControllerError, DashEnd, EdgeState, Facing, InputChannels, InputMode,
    Locomotion, LocomotionTuning, PhysicsProbe, RawInput, sequencer_from_config,
};
use crate::content::ScriptConfig;
use crate::scripting::{CommandKind, ModuleLibrary, Sequencer};

/// Scripted physics world: a fixed number of ground contacts and a set of
/// directions in which a wall is within reach.
#[derive(Debug, Clone, Default)]
struct FakeProbe {
    ground: usize,
    walls: Vec<Dir2>,
}

impl FakeProbe {
    fn grounded() -> Self {
        Self {
            ground: 1,
            walls: Vec::new(),
        }
    }

    fn airborne() -> Self {
        Self::default()
    }

    fn with_wall(mut self, direction: Dir2) -> Self {
        self.walls.push(direction);
        self
    }
}

impl PhysicsProbe for FakeProbe {
    fn ground_contacts(&self) -> usize {
        self.ground
    }

    fn wall_hit(&self, direction: Dir2, _distance: f32) -> bool {
        self.walls.contains(&direction)
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn raw(jump: bool, dash: bool, crouch: bool, direction: Vec2) -> RawInput {
    RawInput {
        jump,
        dash,
        crouch,
        direction,
    }
}

fn walk(direction: Vec2) -> RawInput {
    raw(false, false, false, direction)
}

/// Sample `input` into the channels and run one locomotion step, feeding the
/// previous velocity back in the way the physics step would.
fn step(
    locomotion: &mut Locomotion,
    channels: &mut InputChannels,
    tuning: &LocomotionTuning,
    input: RawInput,
    probe: &FakeProbe,
) -> super::StepReport {
    channels.sample(&input);
    locomotion.sync_velocity(locomotion.velocity());
    locomotion.step(tuning, channels, probe)
}

// -----------------------------------------------------------------------------
// Edge detection tests
// -----------------------------------------------------------------------------

#[test]
fn test_edge_transitions() {
    use EdgeState::*;
    assert_eq!(Off.next(true), Down);
    assert_eq!(Off.next(false), Off);
    assert_eq!(Down.next(true), Held);
    assert_eq!(Down.next(false), Up);
    assert_eq!(Held.next(true), Held);
    assert_eq!(Held.next(false), Up);
    assert_eq!(Up.next(true), Down);
    assert_eq!(Up.next(false), Off);
}

#[test]
fn test_edge_activity() {
    assert!(EdgeState::Down.is_active());
    assert!(EdgeState::Held.is_active());
    assert!(!EdgeState::Up.is_active());
    assert!(!EdgeState::Off.is_active());
    assert!(EdgeState::Down.is_down());
    assert!(!EdgeState::Held.is_down());
}

#[test]
fn test_edge_random_levels_never_repeat_down() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let mut state = EdgeState::Off;

    for _ in 0..2000 {
        let level = rng.random_bool(0.5);
        let next = state.next(level);

        assert_eq!(next.is_active(), level);
        if next == EdgeState::Down {
            assert!(matches!(state, EdgeState::Off | EdgeState::Up));
        }
        if next == EdgeState::Up {
            assert!(matches!(state, EdgeState::Down | EdgeState::Held));
        }
        state = next;
    }
}

#[test]
fn test_channels_sample_all_inputs() {
    let mut channels = InputChannels::default();

    channels.sample(&raw(true, false, true, Vec2::new(-1.0, 0.5)));
    assert_eq!(channels.jump(), EdgeState::Down);
    assert_eq!(channels.dash(), EdgeState::Off);
    assert_eq!(channels.crouch(), EdgeState::Down);
    assert_eq!(channels.direction_x(), -1.0);
    assert_eq!(channels.direction_y(), 0.5);

    channels.sample(&raw(true, true, false, Vec2::ZERO));
    assert_eq!(channels.jump(), EdgeState::Held);
    assert_eq!(channels.dash(), EdgeState::Down);
    assert_eq!(channels.crouch(), EdgeState::Up);
    assert!(channels.is_jump_active());
    assert!(channels.is_dash_active());
    assert!(!channels.is_crouch_active());
    assert_eq!(channels.direction(), Vec2::ZERO);
}

// -----------------------------------------------------------------------------
// Tuning tests
// -----------------------------------------------------------------------------

#[test]
fn test_tuning_derived_values() {
    let tuning = LocomotionTuning::default();
    assert!(approx(tuning.jump_height(), 112.0));
    assert!(approx(tuning.time_to_apex(), 0.4));
    assert!(approx(tuning.air_control_step(), 28.0));
}

// -----------------------------------------------------------------------------
// Jump tests
// -----------------------------------------------------------------------------

#[test]
fn test_jump_from_idle() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(true, false, false, Vec2::X),
        &FakeProbe::grounded(),
    );

    assert!(report.jumped);
    assert!(report.grounded);
    assert_eq!(locomotion.velocity(), Vec2::new(280.0, 560.0));
}

#[test]
fn test_held_jump_does_not_repeat() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let ground = FakeProbe::grounded();
    let held = raw(true, false, false, Vec2::ZERO);

    assert!(step(&mut locomotion, &mut channels, &tuning, held, &ground).jumped);
    assert!(!step(&mut locomotion, &mut channels, &tuning, held, &ground).jumped);
}

#[test]
fn test_jump_rejected_while_airborne() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(true, false, false, Vec2::ZERO),
        &FakeProbe::airborne(),
    );

    assert!(!report.jumped);
    assert_eq!(locomotion.velocity().y, 0.0);
}

#[test]
fn test_jump_rejected_while_crouching() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let ground = FakeProbe::grounded();

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, false, true, Vec2::ZERO),
        &ground,
    );
    assert!(locomotion.is_crouching());

    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(true, false, true, Vec2::ZERO),
        &ground,
    );
    assert!(!report.jumped);
}

// -----------------------------------------------------------------------------
// Horizontal movement tests
// -----------------------------------------------------------------------------

#[test]
fn test_ground_speed_depends_on_crouch() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let ground = FakeProbe::grounded();

    step(&mut locomotion, &mut channels, &tuning, walk(Vec2::X), &ground);
    assert!(approx(locomotion.velocity().x, 280.0));

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, false, true, Vec2::X),
        &ground,
    );
    assert!(approx(locomotion.velocity().x, 140.0));

    step(&mut locomotion, &mut channels, &tuning, walk(Vec2::X), &ground);
    assert!(!locomotion.is_crouching());
    assert!(approx(locomotion.velocity().x, 280.0));
}

#[test]
fn test_air_control_is_rate_limited() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let air = FakeProbe::airborne();

    step(&mut locomotion, &mut channels, &tuning, walk(Vec2::X), &air);
    assert!(approx(locomotion.velocity().x, 28.0));

    for _ in 0..20 {
        step(&mut locomotion, &mut channels, &tuning, walk(Vec2::X), &air);
        assert!(locomotion.velocity().x <= tuning.walk_speed + 1e-3);
    }
    assert!(approx(locomotion.velocity().x, 280.0));
}

#[test]
fn test_air_momentum_kept_without_input() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    channels.sample(&RawInput::NEUTRAL);
    locomotion.sync_velocity(Vec2::new(150.0, 0.0));
    locomotion.step(&tuning, &channels, &FakeProbe::airborne());
    assert!(approx(locomotion.velocity().x, 150.0));
}

#[test]
fn test_fall_speed_is_clamped() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    channels.sample(&RawInput::NEUTRAL);
    locomotion.sync_velocity(Vec2::new(0.0, -1500.0));
    locomotion.step(&tuning, &channels, &FakeProbe::airborne());
    assert!(approx(locomotion.velocity().y, -600.0));
}

#[test]
fn test_crouch_requires_ground() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, false, true, Vec2::ZERO),
        &FakeProbe::airborne(),
    );
    assert!(!locomotion.is_crouching());
}

// -----------------------------------------------------------------------------
// Dash tests
// -----------------------------------------------------------------------------

#[test]
fn test_dash_direction_is_normalized() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::new(1.0, 1.0)),
        &FakeProbe::airborne(),
    );

    assert!(report.dash_started);
    assert!(locomotion.is_dashing());
    assert!(!locomotion.can_dash());
    assert_eq!(locomotion.gravity_scale(), 0.0);
    assert!(approx(locomotion.dash_direction().length(), 1.0));
    assert!(approx(locomotion.velocity().x, 480.0 * std::f32::consts::FRAC_1_SQRT_2));
    assert!(approx(locomotion.velocity().y, 480.0 * std::f32::consts::FRAC_1_SQRT_2));
    assert_eq!(locomotion.dash_ticks(), tuning.dash_ticks - 1);
}

#[test]
fn test_dash_without_direction_uses_facing() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let ground = FakeProbe::grounded();

    step(&mut locomotion, &mut channels, &tuning, walk(Vec2::NEG_X), &ground);
    assert_eq!(locomotion.facing(), Facing::Left);

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::ZERO),
        &ground,
    );
    assert_eq!(locomotion.dash_direction(), Vec2::NEG_X);
    assert!(approx(locomotion.velocity().x, -480.0));
}

#[test]
fn test_facing_frozen_while_dashing() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let air = FakeProbe::airborne();

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::X),
        &air,
    );
    step(&mut locomotion, &mut channels, &tuning, walk(Vec2::NEG_X), &air);
    assert!(locomotion.is_dashing());
    assert_eq!(locomotion.facing(), Facing::Right);
    assert!(approx(locomotion.velocity().x, 480.0));
}

#[test]
fn test_dash_times_out_after_configured_ticks() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let air = FakeProbe::airborne();
    let dash_held = raw(false, true, false, Vec2::X);

    let mut dash_steps = 0;
    let mut ended = None;
    for _ in 0..20 {
        let report = step(&mut locomotion, &mut channels, &tuning, dash_held, &air);
        if let Some(end) = report.dash_ended {
            ended = Some(end);
            break;
        }
        dash_steps += 1;
    }

    assert_eq!(ended, Some(DashEnd::Timeout));
    assert_eq!(dash_steps, tuning.dash_ticks);
    assert!(!locomotion.is_dashing());
    assert_eq!(locomotion.velocity().y, 0.0);
    assert_eq!(locomotion.gravity_scale(), tuning.nominal_gravity_scale);
    // Still airborne, so the dash is not back yet.
    assert!(!locomotion.can_dash());

    step(&mut locomotion, &mut channels, &tuning, RawInput::NEUTRAL, &air);
    let report = step(&mut locomotion, &mut channels, &tuning, dash_held, &air);
    assert!(!report.dash_started);
    assert!(!locomotion.is_dashing());
}

#[test]
fn test_dash_restored_on_ground() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let air = FakeProbe::airborne();

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::Y),
        &air,
    );
    for _ in 0..tuning.dash_ticks {
        step(&mut locomotion, &mut channels, &tuning, RawInput::NEUTRAL, &air);
    }
    assert!(!locomotion.is_dashing());
    assert!(!locomotion.can_dash());

    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        RawInput::NEUTRAL,
        &FakeProbe::grounded(),
    );
    assert!(report.landed);
    assert!(locomotion.can_dash());
}

#[test]
fn test_wall_stops_dash_same_step() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::X),
        &FakeProbe::airborne().with_wall(Dir2::X),
    );

    assert!(report.dash_started);
    assert_eq!(report.dash_ended, Some(DashEnd::Wall));
    assert!(!locomotion.is_dashing());
    assert_eq!(locomotion.gravity_scale(), tuning.nominal_gravity_scale);
    // Air control still applies after the dash ends.
    assert!(approx(locomotion.velocity().x, tuning.air_control_step()));
    assert_eq!(locomotion.velocity().y, 0.0);
}

#[test]
fn test_wall_only_checked_along_dash() {
    let tuning = LocomotionTuning::default();
    let mut channels = InputChannels::default();

    // Wall behind the dash.
    let mut locomotion = Locomotion::new(&tuning);
    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::X),
        &FakeProbe::airborne().with_wall(Dir2::NEG_X),
    );
    assert!(locomotion.is_dashing());

    // Side wall during a vertical dash.
    let mut channels = InputChannels::default();
    let mut locomotion = Locomotion::new(&tuning);
    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::Y),
        &FakeProbe::airborne().with_wall(Dir2::X),
    );
    assert!(locomotion.is_dashing());

    // Ceiling during a diagonal dash.
    let mut channels = InputChannels::default();
    let mut locomotion = Locomotion::new(&tuning);
    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::new(1.0, 1.0)),
        &FakeProbe::airborne().with_wall(Dir2::Y),
    );
    assert_eq!(report.dash_ended, Some(DashEnd::Wall));
}

#[test]
fn test_crouch_blocks_dash() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let ground = FakeProbe::grounded();

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, false, true, Vec2::ZERO),
        &ground,
    );
    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, true, Vec2::X),
        &ground,
    );

    assert!(!report.dash_started);
    assert!(!locomotion.is_dashing());
    assert!(locomotion.can_dash());
}

#[test]
fn test_landing_during_dash_is_not_reported() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        raw(false, true, false, Vec2::NEG_Y),
        &FakeProbe::airborne(),
    );
    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        RawInput::NEUTRAL,
        &FakeProbe::grounded(),
    );

    assert!(report.grounded);
    assert!(!report.landed);
    assert!(locomotion.is_dashing());
}

// -----------------------------------------------------------------------------
// Direct control tests
// -----------------------------------------------------------------------------

#[test]
fn test_trigger_dash_respects_guards() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);

    assert!(locomotion.trigger_dash(&tuning, Vec2::ZERO));
    assert!(locomotion.is_dashing());
    assert_eq!(locomotion.dash_direction(), Vec2::X);
    assert_eq!(locomotion.dash_ticks(), tuning.dash_ticks);
    assert!(!locomotion.trigger_dash(&tuning, Vec2::Y));

    let mut crouched = Locomotion::new(&tuning);
    crouched.set_crouching(true);
    assert!(!crouched.trigger_dash(&tuning, Vec2::X));
}

#[test]
fn test_set_crouching_ignored_while_dashing() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);

    locomotion.trigger_dash(&tuning, Vec2::X);
    locomotion.set_crouching(true);
    assert!(!locomotion.is_crouching());
}

#[test]
fn test_reset_to_idle() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    step(
        &mut locomotion,
        &mut channels,
        &tuning,
        RawInput::NEUTRAL,
        &FakeProbe::grounded(),
    );
    locomotion.trigger_dash(&tuning, Vec2::X);
    locomotion.reset_to_idle(&tuning);

    assert!(!locomotion.is_dashing());
    assert!(locomotion.can_dash());
    assert!(locomotion.is_walk_or_idle());
    assert_eq!(locomotion.gravity_scale(), tuning.nominal_gravity_scale);
}

#[test]
fn test_landing_resets_state() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();

    let first = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        RawInput::NEUTRAL,
        &FakeProbe::airborne(),
    );
    assert!(!first.landed);

    let report = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        RawInput::NEUTRAL,
        &FakeProbe::grounded(),
    );
    assert!(report.landed);
    assert!(locomotion.is_walk_or_idle());

    let again = step(
        &mut locomotion,
        &mut channels,
        &tuning,
        RawInput::NEUTRAL,
        &FakeProbe::grounded(),
    );
    assert!(!again.landed);
}

#[test]
fn test_random_input_keeps_state_consistent() {
    let tuning = LocomotionTuning::default();
    let mut locomotion = Locomotion::new(&tuning);
    let mut channels = InputChannels::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..5000 {
        let direction = Vec2::new(
            rng.random_range(-1..=1) as f32,
            rng.random_range(-1..=1) as f32,
        );
        let input = raw(
            rng.random_bool(0.2),
            rng.random_bool(0.1),
            rng.random_bool(0.1),
            direction,
        );
        let mut probe = FakeProbe {
            ground: rng.random_range(0..=2),
            walls: Vec::new(),
        };
        if rng.random_bool(0.05) {
            probe.walls.push(Dir2::X);
        }
        locomotion.sync_velocity(Vec2::new(
            locomotion.velocity().x,
            locomotion.velocity().y - rng.random_range(0.0f32..50.0),
        ));

        channels.sample(&input);
        let report = locomotion.step(&tuning, &channels, &probe);

        assert!(locomotion.velocity().y >= -tuning.max_fall_speed);
        assert!(!(locomotion.is_dashing() && locomotion.is_crouching()));
        assert!(locomotion.dash_ticks() <= tuning.dash_ticks);
        if report.jumped {
            assert!(report.grounded);
        }
        if report.landed {
            assert!(report.grounded);
            assert!(!locomotion.is_dashing());
        }
        if locomotion.is_dashing() {
            assert_eq!(locomotion.gravity_scale(), 0.0);
            assert!(approx(locomotion.dash_direction().length(), 1.0));
        } else {
            assert_eq!(locomotion.gravity_scale(), tuning.nominal_gravity_scale);
        }
    }
}

// -----------------------------------------------------------------------------
// CharacterController tests
// -----------------------------------------------------------------------------

#[test]
fn test_scripted_controller_requires_sequencer() {
    let tuning = LocomotionTuning::default();

    let result = CharacterController::new(&tuning, InputMode::Scripted, None);
    assert!(matches!(result, Err(ControllerError::MissingSequencer)));

    assert!(CharacterController::new(&tuning, InputMode::Scripted, Some(Sequencer::new())).is_ok());
    assert!(CharacterController::new(&tuning, InputMode::Live, None).is_ok());
}

#[test]
fn test_live_controller_follows_keyboard() {
    let tuning = LocomotionTuning::default();
    let mut controller = CharacterController::new(&tuning, InputMode::Live, None)
        .expect("live controller");

    let report = controller.step(
        0.02,
        &tuning,
        &raw(true, false, false, Vec2::ZERO),
        Vec2::ZERO,
        &FakeProbe::grounded(),
    );
    assert!(report.jumped);
    assert!(controller.is_jump_active());
    assert_eq!(controller.last_report(), report);
}

#[test]
fn test_running_sequence_overrides_live_input() {
    let tuning = LocomotionTuning::default();
    let mut sequencer = Sequencer::new();
    sequencer.add_walk(Vec2::NEG_X, 1.0);
    let mut controller = CharacterController::new(&tuning, InputMode::Live, Some(sequencer))
        .expect("live controller");

    controller.sample_input(&walk(Vec2::X));
    assert_eq!(controller.direction_x(), 1.0);

    if let Some(sequencer) = controller.sequencer_mut() {
        sequencer.start(0.0);
    }
    assert!(controller.uses_scripted_input());
    controller.sample_input(&walk(Vec2::X));
    assert_eq!(controller.direction_x(), -1.0);
}

#[test]
fn test_scripted_controller_ignores_keyboard() {
    let tuning = LocomotionTuning::default();
    let mut controller =
        CharacterController::new(&tuning, InputMode::Scripted, Some(Sequencer::new()))
            .expect("scripted controller");

    let report = controller.step(
        0.02,
        &tuning,
        &raw(true, true, false, Vec2::X),
        Vec2::ZERO,
        &FakeProbe::grounded(),
    );
    assert!(!report.jumped);
    assert!(!report.dash_started);
    assert_eq!(controller.direction_x(), 0.0);
}

#[test]
fn test_scripted_jump_advances_on_landing() {
    let tuning = LocomotionTuning::default();
    let mut sequencer = Sequencer::new();
    sequencer.push(crate::scripting::Command::new(CommandKind::Jump, Vec2::X, 2.0));
    sequencer.add_walk(Vec2::X, 1.0);
    sequencer.start(0.0);
    let mut controller = CharacterController::new(&tuning, InputMode::Scripted, Some(sequencer))
        .expect("scripted controller");

    let ground = FakeProbe::grounded();
    let air = FakeProbe::airborne();
    let live = RawInput::NEUTRAL;

    let takeoff = controller.step(0.02, &tuning, &live, Vec2::ZERO, &ground);
    assert!(takeoff.jumped);

    let velocity = controller.locomotion().velocity();
    controller.step(0.04, &tuning, &live, velocity, &air);
    let current = controller.sequencer().and_then(|s| s.current_command()).map(|c| c.kind);
    assert_eq!(current, Some(CommandKind::Jump));

    let landing = controller.step(0.06, &tuning, &live, Vec2::ZERO, &ground);
    assert!(landing.landed);
    let current = controller.sequencer().and_then(|s| s.current_command()).map(|c| c.kind);
    assert_eq!(current, Some(CommandKind::Walk));
}

#[test]
fn test_scripted_jump_after_landing_jumps_again() {
    let tuning = LocomotionTuning::default();
    let mut sequencer = Sequencer::new();
    sequencer.push(crate::scripting::Command::new(CommandKind::Jump, Vec2::ZERO, 2.0));
    sequencer.push(crate::scripting::Command::new(CommandKind::Jump, Vec2::X, 2.0));
    sequencer.start(0.0);
    let mut controller = CharacterController::new(&tuning, InputMode::Scripted, Some(sequencer))
        .expect("scripted controller");

    let ground = FakeProbe::grounded();
    let air = FakeProbe::airborne();
    let live = RawInput::NEUTRAL;

    assert!(controller.step(0.02, &tuning, &live, Vec2::ZERO, &ground).jumped);
    controller.step(0.04, &tuning, &live, Vec2::ZERO, &air);
    let landing = controller.step(0.06, &tuning, &live, Vec2::ZERO, &ground);
    assert!(landing.landed);
    assert_eq!(controller.sequencer().map(|s| s.current_index()), Some(1));

    // One step with the channel released, then a fresh press.
    let release = controller.step(0.08, &tuning, &live, Vec2::ZERO, &ground);
    assert!(!release.jumped);
    assert!(!controller.is_jump_active());

    let second = controller.step(0.10, &tuning, &live, Vec2::ZERO, &ground);
    assert!(second.jumped);
    assert!(approx(controller.locomotion().velocity().x, tuning.walk_speed));
}

#[test]
fn test_sequencer_from_config() {
    let library = ModuleLibrary::default();
    let config = ScriptConfig {
        looping: true,
        start_delay: 2.0,
        modules: vec!["jump_right".to_string(), "dash_right".to_string()],
        ..Default::default()
    };

    let sequencer = sequencer_from_config(&config, &library);
    let kinds: Vec<_> = sequencer.commands().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![CommandKind::Jump, CommandKind::Wait, CommandKind::Dash]
    );
    assert!(sequencer.is_looping());
    assert!(!sequencer.is_executing());
    assert!(approx(sequencer.start_delay(), 2.0));
}

// -----------------------------------------------------------------------------
// Validation tests
// -----------------------------------------------------------------------------

fn spawn_character(world: &mut World) -> bevy::prelude::Entity {
    let tuning = LocomotionTuning::default();
    let controller =
        CharacterController::new(&tuning, InputMode::Live, None).expect("live controller");
    world.spawn(controller).id()
}

fn missing_component(world: &mut World) -> Option<&'static str> {
    let result: Result<(), bevy::ecs::error::BevyError> = world
        .run_system_once(validate_characters)
        .expect("validation system runs");
    let err = result.err()?;
    match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::MissingPhysics { component, .. }) => Some(*component),
        other => panic!("unexpected validation error: {:?}", other),
    }
}

#[test]
fn test_validation_rejects_character_without_physics() {
    let mut world = World::new();
    spawn_character(&mut world);

    assert_eq!(missing_component(&mut world), Some("Collider"));
}

#[test]
fn test_validation_passes_with_no_new_characters() {
    let mut world = World::new();
    world.spawn(LinearVelocity::default());

    assert_eq!(missing_component(&mut world), None);
}

#[test]
fn test_missing_physics_error_message() {
    let mut world = World::new();
    let entity = spawn_character(&mut world);
    let err = ControllerError::MissingPhysics {
        entity,
        component: "GravityScale",
    };
    assert!(err.to_string().ends_with("has no GravityScale component"));
}
