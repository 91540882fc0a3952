pub mod cartpole;
pub mod pendulum;

pub use cartpole::{CartPole, CartPoleAction};
pub use pendulum::Pendulum;
