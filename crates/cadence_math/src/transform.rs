//! Placement of a spawned instance.

use glam::{Quat, Vec3};

/// Where an instance sits and which way it faces. The pool overwrites
/// `position` and `rotation` on every spawn and never touches `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform3D {
    /// Unit scale, no rotation.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self::from_position_rotation(position, Quat::IDENTITY)
    }

    /// Unit scale.
    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn set_position_rotation(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }

    /// Facing direction: local `-Z` under the current rotation.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    #[must_use]
    pub fn translated(self, offset: Vec3) -> Self {
        Self {
            position: self.position + offset,
            ..self
        }
    }

    /// Apply `turn` on top of the current rotation.
    #[must_use]
    pub fn rotated(self, turn: Quat) -> Self {
        Self {
            rotation: (turn * self.rotation).normalize(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_use_unit_scale() {
        let t = Transform3D::from_position(Vec3::X);
        assert_eq!(t.position, Vec3::X);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_set_position_rotation_keeps_scale() {
        let mut t = Transform3D {
            scale: Vec3::splat(2.0),
            ..Transform3D::from_position(Vec3::ZERO)
        };
        let rot = Quat::from_rotation_y(1.0);
        t.set_position_rotation(Vec3::new(1.0, 2.0, 3.0), rot);
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, rot);
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_translated_moves_position_only() {
        let rot = Quat::from_rotation_x(0.3);
        let t = Transform3D::from_position_rotation(Vec3::ONE, rot).translated(Vec3::Y);
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(t.rotation, rot);
    }

    #[test]
    fn test_half_turn_faces_pos_z() {
        let t = Transform3D::from_position(Vec3::ZERO);
        assert_eq!(t.forward(), Vec3::NEG_Z);
        let turned = t.rotated(Quat::from_rotation_y(std::f32::consts::PI));
        assert!((turned.forward() - Vec3::Z).length() < 1e-5);
    }
}
