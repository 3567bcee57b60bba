//! Core geometry for focal-plane-to-sky projection.
//!
//! This crate holds the pure numeric layer shared by the footprint projector
//! and the visibility solver: 3D unit vectors, composed rotation matrices,
//! the attitude transformation between instrument (v2, v3) coordinates and
//! sky (RA, Dec) coordinates, in-plane affine repositioning, and angle
//! parsing/normalization utilities.
//!
//! Everything here is a pure function of its inputs. Angles are degrees at
//! public interfaces and radians inside trigonometric evaluation;
//! focal-plane offsets are arcseconds.

pub mod angle;
pub mod constants;
pub mod error;
pub mod matrix;
pub mod vector;

pub use angle::{angular_separation, position_angle, wrap_360};
pub use error::{CoreError, CoreResult};
pub use matrix::{attitude_matrix, pointing, Axis, InPlaneTransform, RotationMatrix3};
pub use vector::Vector3;
