//! The environment interface consumed by the rollout code.
//!
//! An environment is driven through `reset` and `step` only; episode
//! termination is signalled by `step` returning `None` as the next state.
//! Everything else (shape metadata, action decoding) is static information
//! the training setup reads once.

/// A sequential-decision environment.
///
/// The rollout loop owns the interaction protocol, not the environment:
/// `step` mutates internal simulator state and reports the transition.
pub trait Environment {
    /// Observation handed to the policy. Kept `Clone` because observations
    /// are recorded into trajectories while the episode keeps running.
    type State: Clone;
    /// Action accepted by the simulator.
    type Action;

    /// Reset the environment and return the initial observation.
    fn reset(&mut self) -> Self::State;

    /// Advance one step. Returns `(next_state, reward)`; a `None` state
    /// means the episode terminated on this transition.
    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f32);

    /// Dimensionality of the observation vector.
    fn observation_dim(&self) -> usize;

    /// Default episode-length cap suggested by the environment, if any.
    /// The rollout loop falls back to this when no explicit override is set.
    fn max_episode_steps(&self) -> Option<usize> {
        None
    }
}

/// Environments with a finite set of action categories.
pub trait DiscreteActionSpace: Environment {
    /// All actions, in category order.
    fn actions(&self) -> Vec<Self::Action>;
}

/// Environments with a real-valued action vector.
pub trait ContinuousActionSpace: Environment {
    /// Number of action dimensions.
    fn action_dim(&self) -> usize;

    /// Optional per-dimension `(low, high)` bounds.
    fn action_bounds(&self) -> Option<(Vec<f32>, Vec<f32>)> {
        None
    }
}

/// Decode an environment action from the policy's flat `f32` output.
///
/// Policies always emit a flat vector — a one-hot row for categorical
/// policies, the raw action vector for Gaussian ones. Discrete action types
/// decode by arg-max over that row; continuous action types take the values
/// as-is.
pub trait FlatAction: Sized {
    fn from_flat(flat: &[f32]) -> Self;
}

impl<const N: usize> FlatAction for [f32; N] {
    fn from_flat(flat: &[f32]) -> Self {
        let mut out = [0.0; N];
        out.copy_from_slice(&flat[..N]);
        out
    }
}

/// Index of the largest entry; ties resolve to the first maximum.
pub fn argmax(flat: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in flat.iter().enumerate() {
        if *v > flat[best] {
            best = i;
        }
    }
    best
}
