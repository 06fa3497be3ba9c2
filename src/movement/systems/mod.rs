//! Movement domain: system modules for locomotion updates.

pub(crate) mod input;
pub(crate) mod locomotion;
pub(crate) mod validation;

pub(crate) use input::read_input;
pub(crate) use locomotion::{apply_gravity_tuning, sample_input, step_locomotion};
pub(crate) use validation::validate_characters;
