#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

//! A `no_std` library for 2D differential-drive robot kinematics.
//!
//! This crate converts between body velocities and wheel velocities for a
//! two-wheel differential-drive robot, and integrates body velocity over a
//! time step into an updated pose using the closed-form circular-arc
//! solution for constant-velocity motion.

use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// A 2‑D pose `(x, y, θ)` in meters and radians (θ measured counter‑clockwise
/// from the x‑axis in the world frame).
///
/// The heading accumulates additively across updates and is never wrapped to
/// a bounded range, so callers can count full turns by inspecting `theta`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// World‑frame x position (m).
    pub x: f64,
    /// World‑frame y position (m).
    pub y: f64,
    /// Heading (rad), unbounded.
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: World-frame x position in meters.
    /// * `y`: World-frame y position in meters.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// Linear and angular velocity of the robot body, expressed in the robot's
/// own frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyVelocity {
    /// Linear velocity along the robot's forward axis (m/s).
    pub linear: f64,
    /// Angular velocity around the robot's vertical axis (rad/s),
    /// counter-clockwise positive.
    pub angular: f64,
}

impl BodyVelocity {
    /// Construct a new body velocity.
    ///
    /// # Arguments
    ///
    /// * `linear`: Linear velocity (m/s).
    /// * `angular`: Angular velocity (rad/s), counter-clockwise positive.
    pub const fn new(linear: f64, angular: f64) -> Self {
        BodyVelocity { linear, angular }
    }
}

impl fmt::Display for BodyVelocity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} m/s, ω: {:.2} rad/s)", self.linear, self.angular)
    }
}

/// Left and right wheel linear velocities at the contact points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelVelocities {
    /// Left wheel linear velocity (m/s), positive forward.
    pub left: f64,
    /// Right wheel linear velocity (m/s), positive forward.
    pub right: f64,
}

impl WheelVelocities {
    /// Construct wheel velocities.
    ///
    /// # Arguments
    ///
    /// * `left`: Left wheel linear velocity (m/s).
    /// * `right`: Right wheel linear velocity (m/s).
    pub const fn new(left: f64, right: f64) -> Self {
        WheelVelocities { left, right }
    }
}

impl fmt::Display for WheelVelocities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(vL: {:.2} m/s, vR: {:.2} m/s)", self.left, self.right)
    }
}

/// Source of an observed wheel velocity.
///
/// Motor drivers and simulators implement this so the kinematics can be fed
/// from whatever the surrounding system measures. A reading is treated as
/// constant for the duration of the integration step it feeds; the value is
/// read once per step and never validated here beyond being a real number.
pub trait VelocityFeedback {
    /// The currently observed wheel velocity (m/s), positive in the robot's
    /// forward direction.
    fn velocity(&self) -> f64;
}

/// Differential‑drive kinematics helper.
///
/// This struct encapsulates the physical geometry of a differential-drive
/// robot (track width and wheel radius) and provides the velocity transforms
/// and the pose integrator over it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Distance between the two wheel contact points (m).
    track_width: f64,
    /// Wheel radius (m).
    wheel_radius: f64,
}

impl DifferentialDrive {
    /// Construct a new differential‑drive kinematics helper.
    ///
    /// # Arguments
    ///
    /// * `track_width`: The distance between the two wheel contact points in meters.
    /// * `wheel_radius`: The radius of the robot's wheels in meters. Carried
    ///   for wheel angular-velocity conversions; the transforms below work on
    ///   wheel linear velocities and do not consume it.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidTrackWidth)` if `track_width` is not positive.
    /// Returns `Err(KinematicsError::InvalidWheelRadius)` if `wheel_radius` is not positive.
    pub const fn new(track_width: f64, wheel_radius: f64) -> Result<Self, KinematicsError> {
        if track_width <= 0.0 {
            return Err(KinematicsError::InvalidTrackWidth("must be positive"));
        }
        if wheel_radius <= 0.0 {
            return Err(KinematicsError::InvalidWheelRadius("must be positive"));
        }
        Ok(DifferentialDrive {
            track_width,
            wheel_radius,
        })
    }

    /// Returns the track width.
    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Calculates the body velocity (linear and angular) from the wheel
    /// velocities. This is the forward kinematics problem.
    ///
    /// Positive angular velocity is counter-clockwise, i.e. the right wheel
    /// running faster than the left. This is the inverse of
    /// [`inverse_kinematics`](Self::inverse_kinematics) for any valid geometry.
    ///
    /// # Arguments
    ///
    /// * `wheel_velocities`: The measured or commanded linear velocities of the
    ///   left and right wheels.
    ///
    /// # Returns
    ///
    /// The resulting linear and angular velocities of the robot body.
    pub fn forward_kinematics(&self, wheel_velocities: WheelVelocities) -> BodyVelocity {
        let linear = (wheel_velocities.left + wheel_velocities.right) / 2.0;
        let angular = (wheel_velocities.right - wheel_velocities.left) / self.track_width;

        BodyVelocity::new(linear, angular)
    }

    /// Calculates the wheel velocities required to achieve the given body
    /// velocity. This is the inverse kinematics problem.
    ///
    /// # Arguments
    ///
    /// * `body_velocity`: The desired linear and angular velocities of the robot body.
    ///
    /// # Returns
    ///
    /// The required linear velocities for the left and right wheels.
    pub fn inverse_kinematics(&self, body_velocity: BodyVelocity) -> WheelVelocities {
        let half_track = self.track_width / 2.0;
        let left = body_velocity.linear - body_velocity.angular * half_track;
        let right = body_velocity.linear + body_velocity.angular * half_track;

        WheelVelocities::new(left, right)
    }

    /// Updates the robot's pose given its current pose, body velocity, and
    /// time delta.
    ///
    /// The velocities are assumed constant over `dt`, which makes the true
    /// path a circular arc (or a straight segment when the angular velocity
    /// is zero). The update uses the closed-form arc displacement, exact for
    /// any rotation magnitude, rather than a first-order approximation. The
    /// heading is accumulated without wrapping.
    ///
    /// # Arguments
    ///
    /// * `current_pose`: The robot's current pose `(x, y, theta)`.
    /// * `body_velocity`: The robot's current linear and angular velocities.
    /// * `dt`: The time delta in seconds over which the velocities are applied.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    ///
    /// # Returns
    ///
    /// The robot's new estimated pose.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        body_velocity: BodyVelocity,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let dp = body_velocity.linear * dt;
        let dtheta = body_velocity.angular * dt;

        // Displacement in the frame the robot occupied at the start of the
        // step. Branching on dtheta keeps a dt = 0 tick exact for any
        // angular velocity; the straight branch is the dtheta -> 0 limit of
        // the arc formula.
        let (dx, dy) = if dtheta != 0.0 {
            let chord_scale = dp / dtheta;
            (chord_scale * sin(dtheta), chord_scale * (1.0 - cos(dtheta)))
        } else {
            (dp, 0.0)
        };

        // Rotate into the world frame by the pre-update heading.
        let (sin_theta, cos_theta) = (sin(current_pose.theta), cos(current_pose.theta));

        Ok(Pose {
            x: current_pose.x + dx * cos_theta - dy * sin_theta,
            y: current_pose.y + dx * sin_theta + dy * cos_theta,
            theta: current_pose.theta + dtheta,
        })
    }

    /// Convenience function to update pose directly from wheel velocities and dt.
    ///
    /// This method first calculates the body velocity using
    /// [`forward_kinematics`](Self::forward_kinematics) and then calls
    /// [`update_pose`](Self::update_pose).
    ///
    /// # Arguments
    ///
    /// * `current_pose`: The robot's current pose `(x, y, theta)`.
    /// * `wheel_velocities`: The measured or commanded linear velocities of the
    ///   left and right wheels.
    /// * `dt`: The time delta in seconds over which the velocities are applied.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative
    /// (propagated from `update_pose`).
    pub fn update_pose_from_wheel_velocities(
        &self,
        current_pose: Pose,
        wheel_velocities: WheelVelocities,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        let body_velocity = self.forward_kinematics(wheel_velocities);
        self.update_pose(current_pose, body_velocity, dt)
    }

    /// Convenience function to update pose from two wheel velocity sources.
    ///
    /// Each source is read exactly once and the readings are treated as
    /// constant over `dt`.
    ///
    /// # Arguments
    ///
    /// * `current_pose`: The robot's current pose `(x, y, theta)`.
    /// * `left`: Velocity source for the left wheel.
    /// * `right`: Velocity source for the right wheel.
    /// * `dt`: The time delta in seconds over which the readings are applied.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative.
    pub fn update_pose_from_feedback<L, R>(
        &self,
        current_pose: Pose,
        left: &L,
        right: &R,
        dt: f64,
    ) -> Result<Pose, KinematicsError>
    where
        L: VelocityFeedback + ?Sized,
        R: VelocityFeedback + ?Sized,
    {
        let wheel_velocities = WheelVelocities::new(left.velocity(), right.velocity());
        self.update_pose_from_wheel_velocities(current_pose, wheel_velocities, dt)
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DifferentialDrive (L: {:.2} m, r: {:.2} m)",
            self.track_width, self.wheel_radius
        )
    }
}
