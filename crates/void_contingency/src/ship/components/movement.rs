//! Movement component for ships
//!
//! Integrates the owning ship's velocity each tick according to a
//! [`MovementMode`]. The component owns a heading (`rotation`, degrees) which
//! it writes onto the ship at the end of every update, and an angular
//! velocity that only advances through [`MovementComponent::tick_angular`].

use super::{ComponentKind, ComponentType, ShipSystem};
use crate::ship::ShipBody;
use serde::{Deserialize, Serialize};
use void_engine::prelude::Vector2f;

/// Hard cap on angular speed, in degrees per second
pub const MAX_ANGULAR_SPEED: f32 = 360.0;

/// Hybrid mode applies thrust at this fraction of the frame time
const HYBRID_THRUST_SCALE: f32 = 0.5;

/// How the component integrates velocity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    /// Continuous thrust, then drag, then speed cap
    #[default]
    Thruster,
    /// No thrust integration; drag and speed cap only
    Impulse,
    /// Thrust at half strength, then drag, then speed cap
    Hybrid,
}

/// Mode-dependent velocity integrator
#[derive(Debug, Clone, PartialEq)]
pub struct MovementComponent {
    mode: MovementMode,
    thrust: Vector2f,
    rotation: f32,
    angular_velocity: f32,
    max_speed: f32,
    acceleration: f32,
    deceleration: f32,
    angular_acceleration: f32,
    angular_deceleration: f32,
}

impl Default for MovementComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementComponent {
    /// Default speed cap, units per second
    pub const DEFAULT_MAX_SPEED: f32 = 100.0;
    /// Default linear acceleration, units per second squared
    pub const DEFAULT_ACCELERATION: f32 = 50.0;
    /// Default linear drag, units per second squared
    pub const DEFAULT_DECELERATION: f32 = 30.0;
    /// Default angular acceleration, degrees per second squared
    pub const DEFAULT_ANGULAR_ACCELERATION: f32 = 180.0;
    /// Default angular drag, degrees per second squared
    pub const DEFAULT_ANGULAR_DECELERATION: f32 = 90.0;

    /// Thruster-mode component with default tuning and no thrust
    pub fn new() -> Self {
        Self {
            mode: MovementMode::Thruster,
            thrust: Vector2f::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            max_speed: Self::DEFAULT_MAX_SPEED,
            acceleration: Self::DEFAULT_ACCELERATION,
            deceleration: Self::DEFAULT_DECELERATION,
            angular_acceleration: Self::DEFAULT_ANGULAR_ACCELERATION,
            angular_deceleration: Self::DEFAULT_ANGULAR_DECELERATION,
        }
    }

    /// Builder form of [`Self::set_mode`]
    pub fn with_mode(mut self, mode: MovementMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder form of [`Self::set_max_speed`]
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.set_max_speed(max_speed);
        self
    }

    /// Set linear acceleration and drag together
    pub fn with_linear_tuning(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.acceleration = acceleration;
        self.deceleration = deceleration;
        self
    }

    /// Set angular acceleration and drag together
    pub fn with_angular_tuning(mut self, acceleration: f32, deceleration: f32) -> Self {
        self.angular_acceleration = acceleration;
        self.angular_deceleration = deceleration;
        self
    }

    /// Set the integration mode
    pub fn set_mode(&mut self, mode: MovementMode) {
        self.mode = mode;
    }

    /// Set the thrust direction. Only the direction matters; the magnitude
    /// comes from the acceleration.
    pub fn set_thrust(&mut self, thrust: Vector2f) {
        self.thrust = thrust;
    }

    /// Set the heading in degrees
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    /// Set the angular velocity in degrees per second, unclamped
    pub fn set_angular_velocity(&mut self, degrees_per_second: f32) {
        self.angular_velocity = degrees_per_second;
    }

    /// Set the speed cap; negative values clamp to zero
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(0.0);
    }

    /// Set linear acceleration
    pub fn set_acceleration(&mut self, acceleration: f32) {
        self.acceleration = acceleration;
    }

    /// Set linear drag
    pub fn set_deceleration(&mut self, deceleration: f32) {
        self.deceleration = deceleration;
    }

    /// Set angular acceleration
    pub fn set_angular_acceleration(&mut self, acceleration: f32) {
        self.angular_acceleration = acceleration;
    }

    /// Set angular drag
    pub fn set_angular_deceleration(&mut self, deceleration: f32) {
        self.angular_deceleration = deceleration;
    }

    /// Integration mode
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    /// Thrust direction
    pub fn thrust(&self) -> Vector2f {
        self.thrust
    }

    /// Heading in degrees
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Angular velocity in degrees per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Speed cap
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Linear acceleration
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Linear drag
    pub fn deceleration(&self) -> f32 {
        self.deceleration
    }

    /// Angular acceleration
    pub fn angular_acceleration(&self) -> f32 {
        self.angular_acceleration
    }

    /// Angular drag
    pub fn angular_deceleration(&self) -> f32 {
        self.angular_deceleration
    }

    /// Push velocity along the normalized thrust direction.
    ///
    /// Thrust whose squared length is zero, including subnormal thrust that
    /// underflows, leaves velocity untouched.
    pub fn apply_acceleration(&self, delta_time: f32, body: &mut ShipBody) {
        if self.thrust.length_squared() <= 0.0 {
            return;
        }
        body.velocity += self.thrust.normalized() * (self.acceleration * delta_time);
    }

    /// Shrink speed by `deceleration * dt` without reversing direction
    pub fn apply_deceleration(&self, delta_time: f32, body: &mut ShipBody) {
        let speed = body.velocity.length();
        if speed <= 0.0 {
            return;
        }
        let new_speed = (speed - self.deceleration * delta_time).max(0.0);
        body.velocity = body.velocity / speed * new_speed;
    }

    /// Rescale velocity to `max_speed` when it exceeds it
    pub fn clamp_velocity(&self, body: &mut ShipBody) {
        if body.velocity.length() > self.max_speed {
            body.velocity = body.velocity.normalized() * self.max_speed;
        }
    }

    /// Grow angular speed in its current direction of spin
    pub fn apply_angular_acceleration(&mut self, delta_time: f32) {
        if self.angular_velocity != 0.0 {
            self.angular_velocity += self.angular_velocity.signum() * self.angular_acceleration * delta_time;
        }
    }

    /// Shrink angular speed toward zero without changing its sign
    pub fn apply_angular_deceleration(&mut self, delta_time: f32) {
        let magnitude = self.angular_velocity.abs() - self.angular_deceleration * delta_time;
        self.angular_velocity = if magnitude > 0.0 {
            self.angular_velocity.signum() * magnitude
        } else {
            0.0
        };
    }

    /// Clamp angular velocity to [`MAX_ANGULAR_SPEED`]
    pub fn clamp_angular_velocity(&mut self) {
        self.angular_velocity = self.angular_velocity.clamp(-MAX_ANGULAR_SPEED, MAX_ANGULAR_SPEED);
    }

    /// Advance the heading by one tick of angular motion.
    ///
    /// Applies angular drag, clamps the angular speed, then integrates
    /// `rotation`. Ship updates do not call this; drivers that want spin
    /// call it before updating the ship.
    pub fn tick_angular(&mut self, delta_time: f32) {
        self.apply_angular_deceleration(delta_time);
        self.clamp_angular_velocity();
        self.rotation += self.angular_velocity * delta_time;
    }
}

impl ShipSystem for MovementComponent {
    const TYPE: ComponentType = ComponentType::Movement;

    fn initialize(&mut self) {
        log::debug!("Movement component online ({:?})", self.mode);
    }

    fn update(&mut self, delta_time: f32, body: &mut ShipBody) {
        match self.mode {
            MovementMode::Thruster => {
                self.apply_acceleration(delta_time, body);
                self.apply_deceleration(delta_time, body);
                self.clamp_velocity(body);
            }
            MovementMode::Impulse => {
                self.apply_deceleration(delta_time, body);
                self.clamp_velocity(body);
            }
            MovementMode::Hybrid => {
                self.apply_acceleration(delta_time * HYBRID_THRUST_SCALE, body);
                self.apply_deceleration(delta_time, body);
                self.clamp_velocity(body);
            }
        }

        body.transform.rotation = self.rotation;
    }

    fn from_kind(kind: &ComponentKind) -> Option<&Self> {
        match kind {
            ComponentKind::Movement(movement) => Some(movement),
            ComponentKind::Engine(_) => None,
        }
    }

    fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self> {
        match kind {
            ComponentKind::Movement(movement) => Some(movement),
            ComponentKind::Engine(_) => None,
        }
    }
}

impl From<MovementComponent> for ComponentKind {
    fn from(movement: MovementComponent) -> Self {
        Self::Movement(movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn body_with_velocity(x: f32, y: f32) -> ShipBody {
        ShipBody {
            velocity: Vector2f::new(x, y),
            ..ShipBody::default()
        }
    }

    #[test]
    fn test_defaults() {
        let movement = MovementComponent::new();
        assert_eq!(movement.mode(), MovementMode::Thruster);
        assert_eq!(movement.thrust(), Vector2f::ZERO);
        assert_eq!(movement.max_speed(), 100.0);
        assert_eq!(movement.acceleration(), 50.0);
        assert_eq!(movement.deceleration(), 30.0);
        assert_eq!(movement.angular_acceleration(), 180.0);
        assert_eq!(movement.angular_deceleration(), 90.0);
    }

    #[test]
    fn test_thruster_accelerates_then_drags() {
        let mut movement = MovementComponent::new();
        movement.set_thrust(Vector2f::new(1.0, 0.0));
        let mut body = ShipBody::default();

        movement.update(1.0, &mut body);

        // +50 from thrust, -30 from drag
        assert_relative_eq!(body.velocity.x, 20.0, epsilon = 1e-4);
        assert_relative_eq!(body.velocity.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_thrust_magnitude_is_ignored() {
        let mut movement = MovementComponent::new();
        movement.set_thrust(Vector2f::new(0.0, 40.0));
        let mut body = ShipBody::default();

        movement.apply_acceleration(0.5, &mut body);
        assert_relative_eq!(body.velocity.y, 25.0, epsilon = 1e-4);
    }

    #[test]
    fn test_subnormal_thrust_is_ignored() {
        let mut movement = MovementComponent::new();
        movement.set_thrust(Vector2f::new(1e-30, 0.0));
        let mut body = ShipBody::default();

        movement.apply_acceleration(1.0, &mut body);
        assert_eq!(body.velocity, Vector2f::ZERO);
    }

    #[test]
    fn test_impulse_ignores_thrust() {
        let mut movement = MovementComponent::new().with_mode(MovementMode::Impulse);
        movement.set_thrust(Vector2f::new(1.0, 0.0));
        let mut body = body_with_velocity(50.0, 0.0);

        movement.update(1.0, &mut body);
        assert_relative_eq!(body.velocity.x, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn test_hybrid_uses_half_thrust() {
        let mut movement = MovementComponent::new().with_mode(MovementMode::Hybrid);
        movement.set_thrust(Vector2f::new(1.0, 0.0));
        let mut body = body_with_velocity(10.0, 0.0);

        movement.update(1.0, &mut body);
        // 10 + 25 - 30
        assert_relative_eq!(body.velocity.x, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_deceleration_stops_at_zero() {
        let movement = MovementComponent::new();
        let mut body = body_with_velocity(-3.0, 4.0);

        movement.apply_deceleration(1.0, &mut body);
        assert_eq!(body.velocity, Vector2f::ZERO);

        // Already stationary stays stationary
        movement.apply_deceleration(1.0, &mut body);
        assert_eq!(body.velocity, Vector2f::ZERO);
    }

    #[test]
    fn test_deceleration_keeps_direction() {
        let movement = MovementComponent::new();
        let mut body = body_with_velocity(-30.0, 40.0);

        movement.apply_deceleration(0.5, &mut body);
        assert_relative_eq!(body.velocity.length(), 35.0, epsilon = 1e-4);
        assert_relative_eq!(body.velocity.x / body.velocity.y, -0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_clamp_velocity() {
        let movement = MovementComponent::new().with_max_speed(10.0);
        let mut body = body_with_velocity(30.0, 40.0);

        movement.clamp_velocity(&mut body);
        assert_relative_eq!(body.velocity.length(), 10.0, epsilon = 1e-4);
        assert_relative_eq!(body.velocity.x, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_negative_max_speed_clamps_to_zero() {
        let mut movement = MovementComponent::new();
        movement.set_max_speed(-5.0);
        assert_eq!(movement.max_speed(), 0.0);
    }

    #[test]
    fn test_update_writes_heading() {
        let mut movement = MovementComponent::new();
        movement.set_rotation(45.0);
        let mut body = ShipBody::default();

        movement.update(0.1, &mut body);
        assert_eq!(body.transform.rotation, 45.0);
    }

    #[test]
    fn test_angular_acceleration_follows_spin() {
        let mut movement = MovementComponent::new();
        movement.apply_angular_acceleration(1.0);
        assert_eq!(movement.angular_velocity(), 0.0);

        movement.set_angular_velocity(-10.0);
        movement.apply_angular_acceleration(0.5);
        assert_relative_eq!(movement.angular_velocity(), -100.0);
    }

    #[test]
    fn test_angular_deceleration_does_not_flip() {
        let mut movement = MovementComponent::new();
        movement.set_angular_velocity(-50.0);

        movement.apply_angular_deceleration(0.5);
        assert_relative_eq!(movement.angular_velocity(), -5.0);

        movement.apply_angular_deceleration(0.5);
        assert_eq!(movement.angular_velocity(), 0.0);
    }

    #[test]
    fn test_tick_angular_clamps_and_integrates() {
        let mut movement = MovementComponent::new();
        movement.set_angular_velocity(1000.0);

        movement.tick_angular(0.5);
        // 1000 - 45 = 955, clamped to 360
        assert_eq!(movement.angular_velocity(), MAX_ANGULAR_SPEED);
        assert_relative_eq!(movement.rotation(), 180.0);
    }
}
