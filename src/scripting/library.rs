//! Scripting domain: named action templates ("modules") and their expansion
//! into command lists.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::scripting::{Command, DEFAULT_COMMAND_DURATION, Sequencer};

pub const DEFAULT_JUMP_TO_DASH_DELAY: f32 = 0.3;

/// Stable identity of a built-in module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ModuleKey {
    StandJump,
    JumpLeft,
    JumpRight,
    DashLeft,
    DashRight,
    DashUp,
    DashDown,
    WalkLeft,
    WalkRight,
    Crouch,
}

impl ModuleKey {
    pub const ALL: [ModuleKey; 10] = [
        ModuleKey::StandJump,
        ModuleKey::JumpLeft,
        ModuleKey::JumpRight,
        ModuleKey::DashLeft,
        ModuleKey::DashRight,
        ModuleKey::DashUp,
        ModuleKey::DashDown,
        ModuleKey::WalkLeft,
        ModuleKey::WalkRight,
        ModuleKey::Crouch,
    ];

    /// Lookup name, used by scripts and `find_by_name`.
    pub fn name(self) -> &'static str {
        match self {
            ModuleKey::StandJump => "stand_jump",
            ModuleKey::JumpLeft => "jump_left",
            ModuleKey::JumpRight => "jump_right",
            ModuleKey::DashLeft => "dash_left",
            ModuleKey::DashRight => "dash_right",
            ModuleKey::DashUp => "dash_up",
            ModuleKey::DashDown => "dash_down",
            ModuleKey::WalkLeft => "walk_left",
            ModuleKey::WalkRight => "walk_right",
            ModuleKey::Crouch => "crouch",
        }
    }

    /// Display text.
    pub fn label(self) -> &'static str {
        match self {
            ModuleKey::StandJump => "Stand Jump",
            ModuleKey::JumpLeft => "Jump Left",
            ModuleKey::JumpRight => "Jump Right",
            ModuleKey::DashLeft => "Dash Left",
            ModuleKey::DashRight => "Dash Right",
            ModuleKey::DashUp => "Dash Up",
            ModuleKey::DashDown => "Dash Down",
            ModuleKey::WalkLeft => "Walk Left",
            ModuleKey::WalkRight => "Walk Right",
            ModuleKey::Crouch => "Crouch",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpVariant {
    Straight,
    Directional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCategory {
    Jump(JumpVariant),
    Dash,
    Walk,
    Crouch,
    Composite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub label: String,
    pub description: String,
    pub category: ModuleCategory,
    pub steps: Vec<Command>,
    pub total_duration: f32,
    pub loopable: bool,
}

impl Module {
    /// Template for a built-in module.
    pub fn builtin(key: ModuleKey) -> Self {
        use JumpVariant::*;
        use ModuleCategory as C;

        let (description, category, step, total_duration) = match key {
            ModuleKey::StandJump => (
                "Jump in place",
                C::Jump(Straight),
                Command::jump(Vec2::ZERO),
                0.1,
            ),
            ModuleKey::JumpLeft => (
                "Jump to the left",
                C::Jump(Directional),
                Command::jump(Vec2::NEG_X),
                0.1,
            ),
            ModuleKey::JumpRight => (
                "Jump to the right",
                C::Jump(Directional),
                Command::jump(Vec2::X),
                0.1,
            ),
            ModuleKey::DashLeft => ("Dash to the left", C::Dash, Command::dash(Vec2::NEG_X), 0.1),
            ModuleKey::DashRight => ("Dash to the right", C::Dash, Command::dash(Vec2::X), 0.1),
            ModuleKey::DashUp => ("Dash upwards", C::Dash, Command::dash(Vec2::Y), 0.1),
            ModuleKey::DashDown => ("Dash downwards", C::Dash, Command::dash(Vec2::NEG_Y), 0.1),
            ModuleKey::WalkLeft => (
                "Walk left until interrupted",
                C::Walk,
                Command::walk(Vec2::NEG_X, DEFAULT_COMMAND_DURATION),
                99.0,
            ),
            ModuleKey::WalkRight => (
                "Walk right until interrupted",
                C::Walk,
                Command::walk(Vec2::X, DEFAULT_COMMAND_DURATION),
                99.0,
            ),
            ModuleKey::Crouch => (
                "Crouch for one second",
                C::Crouch,
                Command::crouch(DEFAULT_COMMAND_DURATION),
                1.0,
            ),
        };

        Self {
            name: key.name().to_string(),
            label: key.label().to_string(),
            description: description.to_string(),
            category,
            steps: vec![step],
            total_duration,
            loopable: false,
        }
    }
}

/// Scales applied to the jump-to-dash wait, per jump variant. These are
/// tuning values for letting a jump approach its apex before the dash, not
/// derived from the jump arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpDashDelay {
    pub straight_scale: f32,
    pub directional_scale: f32,
}

impl Default for JumpDashDelay {
    fn default() -> Self {
        Self {
            straight_scale: 0.8,
            directional_scale: 1.2,
        }
    }
}

impl JumpDashDelay {
    pub fn scaled(&self, variant: JumpVariant, base: f32) -> f32 {
        match variant {
            JumpVariant::Straight => base * self.straight_scale,
            JumpVariant::Directional => base * self.directional_scale,
        }
    }
}

/// The built-in module table. Shared and read-only once built.
#[derive(Resource, Debug, Clone)]
pub struct ModuleLibrary {
    modules: Vec<Module>,
    delay: JumpDashDelay,
}

impl Default for ModuleLibrary {
    fn default() -> Self {
        Self::new(JumpDashDelay::default())
    }
}

impl ModuleLibrary {
    pub fn new(delay: JumpDashDelay) -> Self {
        let modules = ModuleKey::ALL.into_iter().map(Module::builtin).collect();
        Self { modules, delay }
    }

    pub fn delay(&self) -> JumpDashDelay {
        self.delay
    }

    pub fn list_modules(&self) -> &[Module] {
        &self.modules
    }

    /// Case-sensitive exact lookup by stable name.
    pub fn find_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn find(&self, key: ModuleKey) -> &Module {
        // Built in `ModuleKey::ALL` order.
        &self.modules[key as usize]
    }

    /// Replace the sequencer's commands with the module's steps and start.
    pub fn execute_module(&self, module: &Module, sequencer: &mut Sequencer, now: f32) {
        sequencer.clear();
        for step in &module.steps {
            sequencer.push(step.clone());
        }
        info!("Executing module '{}'", module.name);
        sequencer.start(now);
    }

    /// Resolve `names` into one command list. Unknown names are skipped; a
    /// jump directly followed by a dash gets a scaled wait in between.
    pub fn expand_sequence<S: AsRef<str>>(
        &self,
        names: &[S],
        jump_to_dash_delay: f32,
    ) -> Vec<Command> {
        let mut commands = Vec::new();

        for (i, name) in names.iter().enumerate() {
            let Some(module) = self.find_by_name(name.as_ref()) else {
                continue;
            };
            commands.extend(module.steps.iter().cloned());

            let ModuleCategory::Jump(variant) = module.category else {
                continue;
            };
            let next_is_dash = names
                .get(i + 1)
                .and_then(|next| self.find_by_name(next.as_ref()))
                .is_some_and(|next| next.category == ModuleCategory::Dash);
            if next_is_dash {
                commands.push(Command::wait(self.delay.scaled(variant, jump_to_dash_delay)));
            }
        }

        commands
    }

    /// Replace the sequencer's commands with the expansion of `names` and start.
    pub fn execute_sequence<S: AsRef<str>>(
        &self,
        names: &[S],
        jump_to_dash_delay: f32,
        sequencer: &mut Sequencer,
        now: f32,
    ) {
        let commands = self.expand_sequence(names, jump_to_dash_delay);
        sequencer.clear();
        for command in commands {
            sequencer.push(command);
        }
        info!(
            "Executing sequence: {} (jump-to-dash delay {}s)",
            join_names(names),
            jump_to_dash_delay
        );
        sequencer.start(now);
    }

    /// Concatenate the named modules into a new composite module.
    pub fn create_dynamic_module<S: AsRef<str>>(&self, name: &str, names: &[S]) -> Module {
        let mut steps = Vec::new();
        let mut total_duration = 0.0;

        for module in names.iter().filter_map(|n| self.find_by_name(n.as_ref())) {
            steps.extend(module.steps.iter().cloned());
            total_duration += module.total_duration;
        }

        Module {
            name: name.to_string(),
            label: name.to_string(),
            description: format!("Composite: {}", join_names(names)),
            category: ModuleCategory::Composite,
            steps,
            total_duration,
            loopable: false,
        }
    }
}

fn join_names<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| n.as_ref())
        .collect::<Vec<_>>()
        .join(" -> ")
}
