//! Ship components
//!
//! A component is a self-contained behavior unit owned by a ship and updated
//! once per tick. Components never hold a pointer to their ship: while the
//! ship updates, it lends each attached component a `&mut ShipBody` for the
//! duration of that single call.

pub mod engine;
pub mod movement;

pub use engine::EngineComponent;
pub use movement::{MovementComponent, MovementMode, MAX_ANGULAR_SPEED};

use crate::ship::ShipBody;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Kind of ship component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    /// Forward thrust along the ship's facing
    Engine,
    /// Offensive systems
    Weapon,
    /// Damage absorption
    Shield,
    /// Power generation
    Power,
    /// Structural hull
    Hull,
    /// Detection systems
    Sensor,
    /// Mode-dependent velocity integration
    Movement,
}

impl ComponentType {
    /// Every component type, in declaration order
    pub const ALL: [Self; 7] = [
        Self::Engine,
        Self::Weapon,
        Self::Shield,
        Self::Power,
        Self::Hull,
        Self::Sensor,
        Self::Movement,
    ];

    /// Single-bit mask for this type
    pub const fn mask(self) -> ComponentMask {
        match self {
            Self::Engine => ComponentMask::ENGINE,
            Self::Weapon => ComponentMask::WEAPON,
            Self::Shield => ComponentMask::SHIELD,
            Self::Power => ComponentMask::POWER,
            Self::Hull => ComponentMask::HULL,
            Self::Sensor => ComponentMask::SENSOR,
            Self::Movement => ComponentMask::MOVEMENT,
        }
    }
}

bitflags! {
    /// Set of component types installed on a ship
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ComponentMask: u8 {
        /// Engine installed
        const ENGINE = 1 << 0;
        /// Weapon installed
        const WEAPON = 1 << 1;
        /// Shield installed
        const SHIELD = 1 << 2;
        /// Power plant installed
        const POWER = 1 << 3;
        /// Hull installed
        const HULL = 1 << 4;
        /// Sensor installed
        const SENSOR = 1 << 5;
        /// Movement controller installed
        const MOVEMENT = 1 << 6;
    }
}

/// Behavior shared by every concrete ship component
pub trait ShipSystem: Into<ComponentKind> + Sized {
    /// Type tag of this component
    const TYPE: ComponentType;

    /// Called when the component is attached to a ship
    fn initialize(&mut self) {}

    /// Called when the component is detached or its ship is dropped
    fn shutdown(&mut self) {}

    /// Advance one tick, reading and writing the owning ship's body
    fn update(&mut self, delta_time: f32, body: &mut ShipBody);

    /// Borrow this variant out of a kind, if it matches
    fn from_kind(kind: &ComponentKind) -> Option<&Self>;

    /// Mutably borrow this variant out of a kind, if it matches
    fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self>;
}

/// Implemented component variants
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentKind {
    /// Thrust along the ship's facing
    Engine(EngineComponent),
    /// Mode-dependent velocity integrator
    Movement(MovementComponent),
}

impl ComponentKind {
    /// Type tag of the wrapped component
    pub const fn component_type(&self) -> ComponentType {
        match self {
            Self::Engine(_) => EngineComponent::TYPE,
            Self::Movement(_) => MovementComponent::TYPE,
        }
    }

    fn initialize(&mut self) {
        match self {
            Self::Engine(engine) => engine.initialize(),
            Self::Movement(movement) => movement.initialize(),
        }
    }

    fn shutdown(&mut self) {
        match self {
            Self::Engine(engine) => engine.shutdown(),
            Self::Movement(movement) => movement.shutdown(),
        }
    }

    fn update(&mut self, delta_time: f32, body: &mut ShipBody) {
        match self {
            Self::Engine(engine) => engine.update(delta_time, body),
            Self::Movement(movement) => movement.update(delta_time, body),
        }
    }
}

/// Why a component did not run during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The component was added to the ship but never attached
    Unattached,
}

/// Result of ticking one component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The component ran and may have changed the ship body
    Updated,
    /// The component did not run; the ship body is untouched
    Skipped(SkipReason),
}

/// A component owned by a ship, plus its attachment state
#[derive(Debug, Clone, PartialEq)]
pub struct ShipComponent {
    kind: ComponentKind,
    attached: bool,
}

impl ShipComponent {
    /// Wrap a component; it starts detached
    pub fn new(kind: impl Into<ComponentKind>) -> Self {
        Self {
            kind: kind.into(),
            attached: false,
        }
    }

    /// Type tag of the wrapped component
    pub const fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    /// Whether the component takes part in ship updates
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Borrow the wrapped component
    pub const fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    /// Mutably borrow the wrapped component
    pub fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    /// Typed view of the wrapped component
    pub fn downcast<T: ShipSystem>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }

    /// Mutable typed view of the wrapped component
    pub fn downcast_mut<T: ShipSystem>(&mut self) -> Option<&mut T> {
        T::from_kind_mut(&mut self.kind)
    }

    /// Run one tick against `body`, or report why it was skipped
    pub fn tick(&mut self, delta_time: f32, body: &mut ShipBody) -> TickOutcome {
        if !self.attached {
            return TickOutcome::Skipped(SkipReason::Unattached);
        }
        self.kind.update(delta_time, body);
        TickOutcome::Updated
    }

    pub(crate) fn attach(&mut self) {
        self.attached = true;
        self.kind.initialize();
    }

    pub(crate) fn detach(&mut self) {
        self.kind.shutdown();
        self.attached = false;
    }
}

impl From<ComponentKind> for ShipComponent {
    fn from(kind: ComponentKind) -> Self {
        Self::new(kind)
    }
}

impl From<EngineComponent> for ShipComponent {
    fn from(engine: EngineComponent) -> Self {
        Self::new(engine)
    }
}

impl From<MovementComponent> for ShipComponent {
    fn from(movement: MovementComponent) -> Self {
        Self::new(movement)
    }
}

/// Per-component outcomes of one ship tick, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    outcomes: Vec<(ComponentType, TickOutcome)>,
}

impl TickReport {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(&mut self, component_type: ComponentType, outcome: TickOutcome) {
        self.outcomes.push((component_type, outcome));
    }

    /// Outcomes in component insertion order
    pub fn outcomes(&self) -> &[(ComponentType, TickOutcome)] {
        &self.outcomes
    }

    /// True when every component ran
    pub fn all_updated(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, outcome)| *outcome == TickOutcome::Updated)
    }

    /// Number of components that ran
    pub fn updated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == TickOutcome::Updated)
            .count()
    }

    /// Components that were skipped, with the reason
    pub fn skipped(&self) -> impl Iterator<Item = (ComponentType, SkipReason)> + '_ {
        self.outcomes.iter().filter_map(|(component_type, outcome)| match outcome {
            TickOutcome::Skipped(reason) => Some((*component_type, *reason)),
            TickOutcome::Updated => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_distinct() {
        let combined = ComponentType::ALL
            .iter()
            .fold(ComponentMask::empty(), |mask, ty| mask | ty.mask());
        assert_eq!(combined, ComponentMask::all());
        assert_eq!(combined.bits().count_ones(), 7);
    }

    #[test]
    fn test_new_component_is_detached() {
        let component = ShipComponent::from(EngineComponent::new());
        assert!(!component.is_attached());
        assert_eq!(component.component_type(), ComponentType::Engine);
    }

    #[test]
    fn test_unattached_tick_leaves_body_alone() {
        let mut component = ShipComponent::from(EngineComponent::new());
        component
            .downcast_mut::<EngineComponent>()
            .unwrap()
            .set_thrust(50.0);
        let mut body = ShipBody::default();

        let outcome = component.tick(1.0, &mut body);
        assert_eq!(outcome, TickOutcome::Skipped(SkipReason::Unattached));
        assert_eq!(body, ShipBody::default());

        component.attach();
        assert_eq!(component.tick(1.0, &mut body), TickOutcome::Updated);
        assert!(body.velocity.x > 0.0);
    }

    #[test]
    fn test_downcast_matches_variant() {
        let component = ShipComponent::from(MovementComponent::new());
        assert!(component.downcast::<MovementComponent>().is_some());
        assert!(component.downcast::<EngineComponent>().is_none());
    }

    #[test]
    fn test_report_helpers() {
        let mut report = TickReport::default();
        report.record(ComponentType::Engine, TickOutcome::Updated);
        report.record(ComponentType::Movement, TickOutcome::Skipped(SkipReason::Unattached));

        assert!(!report.all_updated());
        assert_eq!(report.updated_count(), 1);
        assert_eq!(
            report.skipped().collect::<Vec<_>>(),
            vec![(ComponentType::Movement, SkipReason::Unattached)]
        );
    }
}
