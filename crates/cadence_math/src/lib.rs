//! # cadence_math
//!
//! Spatial types shared by the pooling runtime and its hosts. Re-exports
//! [`glam`] for linear algebra and defines [`Transform3D`], the placement
//! every pooled instance carries.

pub mod transform;

pub use glam::{Quat, Vec3};

pub use transform::Transform3D;
