//! Ship entity
//!
//! A ship owns its kinematic body, its hull integrity and an ordered list of
//! components. Every tick the ship first integrates its position from the
//! velocity it entered the tick with, then lends its body to each attached
//! component in insertion order.

pub mod blueprint;
pub mod components;

pub use blueprint::{BlueprintError, ComponentSpec, ShipBlueprint};

use components::{ComponentMask, ComponentType, ShipComponent, ShipSystem, TickOutcome, TickReport};
use std::fmt;
use thiserror::Error;
use void_engine::prelude::{Transform, Vector2f};

/// Hull points of a freshly built ship
pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

/// Kinematic state of a ship, lent to components while they update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipBody {
    /// Position, heading and scale
    pub transform: Transform,
    /// Linear velocity in units per second
    pub velocity: Vector2f,
}

/// Index of a component within its ship, in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentSlot(usize);

impl ComponentSlot {
    /// Insertion index
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Component management errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShipError {
    /// Slot does not name an installed component
    #[error("No component in slot {0}")]
    NoSuchComponent(ComponentSlot),

    /// Component is already attached
    #[error("{component_type:?} component in slot {slot} is already attached")]
    AlreadyAttached {
        /// Offending slot
        slot: ComponentSlot,
        /// Type of the component in that slot
        component_type: ComponentType,
    },

    /// Component is not attached
    #[error("{component_type:?} component in slot {slot} is not attached")]
    NotAttached {
        /// Offending slot
        slot: ComponentSlot,
        /// Type of the component in that slot
        component_type: ComponentType,
    },
}

/// A ship and its installed components
#[derive(Debug)]
pub struct Ship {
    name: String,
    health: f32,
    max_health: f32,
    body: ShipBody,
    components: Vec<ShipComponent>,
}

impl Ship {
    /// Create a ship at the origin with full default health and no components
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: DEFAULT_MAX_HEALTH,
            max_health: DEFAULT_MAX_HEALTH,
            body: ShipBody::default(),
            components: Vec::new(),
        }
    }

    /// Set the hull capacity and refill health to it
    pub fn with_max_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health.max(0.0);
        self.health = self.max_health;
        self
    }

    /// Place the ship at `position`
    pub fn with_position(mut self, position: Vector2f) -> Self {
        self.body.transform.position = position;
        self
    }

    /// Advance the ship by `delta_time` seconds.
    ///
    /// Position integrates from the velocity held before any component runs;
    /// velocity changes made by components show up in position next tick.
    pub fn update(&mut self, delta_time: f32) -> TickReport {
        self.body.transform.position += self.body.velocity * delta_time;

        let mut report = TickReport::with_capacity(self.components.len());
        for component in &mut self.components {
            let outcome = component.tick(delta_time, &mut self.body);
            if let TickOutcome::Skipped(reason) = outcome {
                log::debug!(
                    "{}: skipped {:?} component ({:?})",
                    self.name,
                    component.component_type(),
                    reason
                );
            }
            report.record(component.component_type(), outcome);
        }
        report
    }

    /// Reduce health by `amount`, keeping it within `[0, max_health]`
    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Restore health by `amount`, keeping it within `[0, max_health]`
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.max_health);
    }

    /// Whether the hull has no health left
    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    /// Ship name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current health
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Hull capacity
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Kinematic state
    pub fn body(&self) -> &ShipBody {
        &self.body
    }

    /// Position, heading and scale
    pub fn transform(&self) -> &Transform {
        &self.body.transform
    }

    /// Position in world units
    pub fn position(&self) -> Vector2f {
        self.body.transform.position
    }

    /// Move the ship without touching its velocity
    pub fn set_position(&mut self, position: Vector2f) {
        self.body.transform.position = position;
    }

    /// Heading in degrees
    pub fn rotation(&self) -> f32 {
        self.body.transform.rotation
    }

    /// Set the heading in degrees
    pub fn set_rotation(&mut self, degrees: f32) {
        self.body.transform.rotation = degrees;
    }

    /// Unit vector along the heading
    pub fn forward(&self) -> Vector2f {
        self.body.transform.forward()
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vector2f {
        self.body.velocity
    }

    /// Overwrite the linear velocity
    pub fn set_velocity(&mut self, velocity: Vector2f) {
        self.body.velocity = velocity;
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.body.velocity.length()
    }

    /// Take ownership of a component without attaching it
    pub fn add_component(&mut self, component: impl Into<ShipComponent>) -> ComponentSlot {
        self.components.push(component.into());
        ComponentSlot(self.components.len() - 1)
    }

    /// Add a component and attach it immediately.
    ///
    /// `initialize` runs even when `component` is a clone of one that was
    /// already attached elsewhere.
    pub fn install(&mut self, component: impl Into<ShipComponent>) -> ComponentSlot {
        let slot = ComponentSlot(self.components.len());
        let mut component = component.into();
        component.attach();
        self.components.push(component);
        slot
    }

    /// Attach the component in `slot` and run its `initialize` hook
    pub fn attach(&mut self, slot: ComponentSlot) -> Result<(), ShipError> {
        let component = self
            .components
            .get_mut(slot.0)
            .ok_or(ShipError::NoSuchComponent(slot))?;
        if component.is_attached() {
            return Err(ShipError::AlreadyAttached {
                slot,
                component_type: component.component_type(),
            });
        }
        component.attach();
        Ok(())
    }

    /// Run the `shutdown` hook of the component in `slot` and detach it
    pub fn detach(&mut self, slot: ComponentSlot) -> Result<(), ShipError> {
        let component = self
            .components
            .get_mut(slot.0)
            .ok_or(ShipError::NoSuchComponent(slot))?;
        if !component.is_attached() {
            return Err(ShipError::NotAttached {
                slot,
                component_type: component.component_type(),
            });
        }
        component.detach();
        Ok(())
    }

    /// Remove the component in `slot`, shutting it down if attached.
    ///
    /// Later components shift down by one slot.
    pub fn remove_component(&mut self, slot: ComponentSlot) -> Result<ShipComponent, ShipError> {
        if slot.0 >= self.components.len() {
            return Err(ShipError::NoSuchComponent(slot));
        }
        let mut component = self.components.remove(slot.0);
        if component.is_attached() {
            component.detach();
        }
        Ok(component)
    }

    /// First component of variant `T`, in insertion order
    pub fn get_component<T: ShipSystem>(&self) -> Option<&T> {
        self.components.iter().find_map(ShipComponent::downcast::<T>)
    }

    /// Mutable access to the first component of variant `T`
    pub fn get_component_mut<T: ShipSystem>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(ShipComponent::downcast_mut::<T>)
    }

    /// First component tagged `component_type`
    pub fn component_of_type(&self, component_type: ComponentType) -> Option<&ShipComponent> {
        self.components
            .iter()
            .find(|component| component.component_type() == component_type)
    }

    /// Component in `slot`
    pub fn component(&self, slot: ComponentSlot) -> Option<&ShipComponent> {
        self.components.get(slot.0)
    }

    /// All components in insertion order
    pub fn components(&self) -> impl Iterator<Item = &ShipComponent> + '_ {
        self.components.iter()
    }

    /// Number of installed components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Mask of installed component types
    pub fn capabilities(&self) -> ComponentMask {
        self.components
            .iter()
            .fold(ComponentMask::empty(), |mask, component| {
                mask | component.component_type().mask()
            })
    }

    /// Detach every attached component, running its `shutdown` hook.
    ///
    /// Components stay installed and can be attached again. Dropping a ship
    /// does the same. Returns how many components were shut down.
    pub fn shutdown(&mut self) -> usize {
        let mut count = 0;
        for component in self.components.iter_mut().filter(|c| c.is_attached()) {
            component.detach();
            count += 1;
        }
        if count > 0 {
            log::debug!("{}: shut down {count} component(s)", self.name);
        }
        count
    }

    /// Whether any component of `component_type` is installed
    pub fn has_component(&self, component_type: ComponentType) -> bool {
        self.capabilities().contains(component_type.mask())
    }
}

impl Drop for Ship {
    fn drop(&mut self) {
        self.shutdown();
    }
}
