use glam::{Quat, Vec3};
use std::collections::HashMap;

/// The object moved along the path. These calls are the only externally observable effects of
/// the runtime.
pub trait Subject {
    fn world_rotation(&self) -> Quat;

    fn set_world_position(&mut self, position: Vec3);

    fn set_world_rotation(&mut self, rotation: Quat);

    fn set_named_float_parameter(&mut self, name: &str, value: f32);
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubjectTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub parameters: HashMap<String, f32>,
}

impl Default for SubjectTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            parameters: HashMap::new(),
        }
    }
}

impl SubjectTransform {
    pub fn parameter(&self, name: &str) -> Option<f32> {
        self.parameters.get(name).copied()
    }

    /// Facing direction, using +Z as forward.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Subject for SubjectTransform {
    fn world_rotation(&self) -> Quat {
        self.rotation
    }

    fn set_world_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_world_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn set_named_float_parameter(&mut self, name: &str, value: f32) {
        if let Some(slot) = self.parameters.get_mut(name) {
            *slot = value;
        } else {
            self.parameters.insert(name.to_string(), value);
        }
    }
}
