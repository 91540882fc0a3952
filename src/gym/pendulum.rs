use rand::{thread_rng, Rng};
use std::f32::consts::PI;

use crate::env::{ContinuousActionSpace, Environment};

const MAX_SPEED: f32 = 8.0;
const MAX_TORQUE: f32 = 2.0;
const DT: f32 = 0.05;
const G: f32 = 10.0;
const M: f32 = 1.0;
const L: f32 = 1.0;

/// State representation: [cos(θ), sin(θ), θ_dot]
pub type PendulumState = [f32; 3];

/// Action: continuous torque in [-MAX_TORQUE, MAX_TORQUE]
pub type PendulumAction = [f32; 1];

/// Classic Pendulum environment with continuous action space
///
/// The goal is to keep the pendulum upright by applying torque. The state is
/// represented as [cos(θ), sin(θ), angular_velocity] to avoid discontinuity
/// issues with angle wrapping. The pendulum never terminates on its own; the
/// rollout loop caps episodes at [`Environment::max_episode_steps`].
///
/// # Physics
/// - Mass: 1.0 kg, length: 1.0 m
/// - Gravity: 10.0 m/s²
/// - Time step: 0.05 s
/// - Max angular velocity: 8.0 rad/s, max torque: 2.0 N⋅m
///
/// # Reward
/// r = -θ² - 0.1⋅θ̇² - 0.001⋅u²
#[derive(Debug, Clone)]
pub struct Pendulum {
    theta: f32,
    theta_dot: f32,
}

impl Pendulum {
    pub fn new() -> Self {
        Self {
            theta: 0.0,
            theta_dot: 0.0,
        }
    }

    fn get_state(&self) -> PendulumState {
        [self.theta.cos(), self.theta.sin(), self.theta_dot]
    }

    fn angle_normalize(x: f32) -> f32 {
        ((x + PI) % (2.0 * PI)) - PI
    }
}

impl Default for Pendulum {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for Pendulum {
    type State = PendulumState;
    type Action = PendulumAction;

    fn step(&mut self, action: Self::Action) -> (Option<Self::State>, f32) {
        let torque = action[0].clamp(-MAX_TORQUE, MAX_TORQUE);

        // Physics: θ̈ = (3g/2L)sin(θ) + (3/mL²)u
        let theta_acc = (3.0 * G / (2.0 * L)) * self.theta.sin() + (3.0 / (M * L * L)) * torque;

        self.theta_dot += theta_acc * DT;
        self.theta_dot = self.theta_dot.clamp(-MAX_SPEED, MAX_SPEED);
        self.theta += self.theta_dot * DT;
        self.theta = Self::angle_normalize(self.theta);

        let reward =
            -(self.theta.powi(2) + 0.1 * self.theta_dot.powi(2) + 0.001 * torque.powi(2));

        (Some(self.get_state()), reward)
    }

    fn reset(&mut self) -> Self::State {
        let mut rng = thread_rng();
        self.theta = rng.gen_range(-PI..PI);
        self.theta_dot = rng.gen_range(-1.0..1.0);
        self.get_state()
    }

    fn observation_dim(&self) -> usize {
        3
    }

    fn max_episode_steps(&self) -> Option<usize> {
        Some(200)
    }
}

impl ContinuousActionSpace for Pendulum {
    fn action_dim(&self) -> usize {
        1
    }

    fn action_bounds(&self) -> Option<(Vec<f32>, Vec<f32>)> {
        Some((vec![-MAX_TORQUE], vec![MAX_TORQUE]))
    }
}
