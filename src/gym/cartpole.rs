use rand::{thread_rng, Rng};
use strum::{FromRepr, VariantArray};

use crate::env::{argmax, DiscreteActionSpace, Environment, FlatAction};

const GRAVITY: f32 = 9.8;
const MASS_CART: f32 = 1.0;
const MASS_POLE: f32 = 0.1;
const TOTAL_MASS: f32 = MASS_CART + MASS_POLE;
const HALF_POLE_LENGTH: f32 = 0.5;
const POLE_MASS_LENGTH: f32 = MASS_POLE * HALF_POLE_LENGTH;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02;

const X_THRESHOLD: f32 = 2.4;
const THETA_THRESHOLD: f32 = 12.0 * std::f32::consts::PI / 180.0;

/// State representation: [x, x_dot, θ, θ_dot]
pub type CartPoleState = [f32; 4];

/// Actions for the [`CartPole`] environment
#[derive(FromRepr, VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartPoleAction {
    PushLeft = 0,
    PushRight = 1,
}

impl From<usize> for CartPoleAction {
    fn from(value: usize) -> Self {
        Self::from_repr(value).expect("CartPoleAction::from is only called with values [0, 1]")
    }
}

impl FlatAction for CartPoleAction {
    fn from_flat(flat: &[f32]) -> Self {
        Self::from(argmax(flat))
    }
}

/// Classic cart-pole balancing environment with two discrete actions
///
/// A pole is attached to a cart moving along a frictionless track. Each step
/// applies a fixed force to the left or right; the episode terminates when
/// the pole tips past ±12° or the cart leaves ±2.4 units.
///
/// # Physics
/// - Cart mass: 1.0 kg, pole mass: 0.1 kg
/// - Half pole length: 0.5 m
/// - Force magnitude: 10.0 N
/// - Time step: 0.02 s (Euler integration)
///
/// # Reward
/// +1 for every step survived.
#[derive(Debug, Clone)]
pub struct CartPole {
    x: f32,
    x_dot: f32,
    theta: f32,
    theta_dot: f32,
}

impl CartPole {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
        }
    }

    fn get_state(&self) -> CartPoleState {
        [self.x, self.x_dot, self.theta, self.theta_dot]
    }

    fn failed(&self) -> bool {
        self.x.abs() > X_THRESHOLD || self.theta.abs() > THETA_THRESHOLD
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for CartPole {
    type State = CartPoleState;
    type Action = CartPoleAction;

    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f32) {
        let force = match action {
            CartPoleAction::PushLeft => -FORCE_MAG,
            CartPoleAction::PushRight => FORCE_MAG,
        };

        let cos_theta = self.theta.cos();
        let sin_theta = self.theta.sin();

        let temp = (force + POLE_MASS_LENGTH * self.theta_dot.powi(2) * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (HALF_POLE_LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta.powi(2) / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.x += TAU * self.x_dot;
        self.x_dot += TAU * x_acc;
        self.theta += TAU * self.theta_dot;
        self.theta_dot += TAU * theta_acc;

        let next_state = if self.failed() {
            None
        } else {
            Some(self.get_state())
        };

        (next_state, 1.0)
    }

    fn reset(&mut self) -> Self::State {
        let mut rng = thread_rng();
        self.x = rng.gen_range(-0.05..0.05);
        self.x_dot = rng.gen_range(-0.05..0.05);
        self.theta = rng.gen_range(-0.05..0.05);
        self.theta_dot = rng.gen_range(-0.05..0.05);
        self.get_state()
    }

    fn observation_dim(&self) -> usize {
        4
    }

    fn max_episode_steps(&self) -> Option<usize> {
        Some(500)
    }
}

impl DiscreteActionSpace for CartPole {
    fn actions(&self) -> Vec<Self::Action> {
        CartPoleAction::VARIANTS.to_vec()
    }
}
