//! Target tracking state machine for homing missiles.
//!
//! A missile is `Idle` (no target, not looking), `Tracking` a target, or
//! `Reacquiring` after losing one. Transitions are driven by explicit
//! `TrackEvent`s; the retarget policy decides when the selector is consulted.

use hecs::Entity;

use salvo_core::enums::RetargetPolicy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackState {
    #[default]
    Idle,
    Tracking(Entity),
    Reacquiring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEvent {
    TargetFound(Entity),
    TargetLost,
}

/// Result of one tracking step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackUpdate {
    pub state: TrackState,
    /// Target that stopped being tracked this step.
    pub lost: Option<Entity>,
    /// Target that started being tracked this step.
    pub acquired: Option<Entity>,
}

impl TrackState {
    pub fn target(&self) -> Option<Entity> {
        match self {
            TrackState::Tracking(target) => Some(*target),
            TrackState::Idle | TrackState::Reacquiring => None,
        }
    }

    pub fn on_event(self, event: TrackEvent, policy: RetargetPolicy) -> TrackState {
        match event {
            TrackEvent::TargetFound(target) => TrackState::Tracking(target),
            TrackEvent::TargetLost => match policy {
                RetargetPolicy::Never => TrackState::Idle,
                RetargetPolicy::IfInvalid | RetargetPolicy::Always => TrackState::Reacquiring,
            },
        }
    }

    /// Whether the selector should be consulted from this state.
    pub fn wants_query(&self, policy: RetargetPolicy) -> bool {
        match policy {
            RetargetPolicy::Never => false,
            RetargetPolicy::IfInvalid => self.target().is_none(),
            RetargetPolicy::Always => true,
        }
    }
}

/// Advance the state machine by one tick.
///
/// `is_alive` is checked before the tracked target is trusted; `select` is
/// only called when the policy asks for a query.
pub fn step(
    state: TrackState,
    policy: RetargetPolicy,
    is_alive: impl Fn(Entity) -> bool,
    select: impl FnOnce() -> Option<Entity>,
) -> TrackUpdate {
    let mut state = state;
    let mut lost = None;
    let mut acquired = None;

    if let Some(target) = state.target() {
        if !is_alive(target) {
            lost = Some(target);
            state = state.on_event(TrackEvent::TargetLost, policy);
        }
    }

    if state.wants_query(policy) {
        let current = state.target();
        let candidate = select().filter(|c| is_alive(*c));
        if candidate != current {
            if let Some(previous) = current {
                lost = Some(previous);
                state = state.on_event(TrackEvent::TargetLost, policy);
            }
            if let Some(found) = candidate {
                acquired = Some(found);
                state = state.on_event(TrackEvent::TargetFound(found), policy);
            }
        }
    }

    TrackUpdate {
        state,
        lost,
        acquired,
    }
}
