//! Policy-gradient training binary.
//!
//! Trains a categorical policy on CartPole or a Gaussian policy on Pendulum
//! and writes per-iteration metrics plus the best-policy checkpoint under
//! `data/<exp_name>_<env_name>/`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use reinforce::{
    algo::pg::{Baseline, PgAgent, PgConfig},
    checkpoint::{Checkpointer, BEST_POLICY},
    env::{ContinuousActionSpace, DiscreteActionSpace, Environment},
    gym::{CartPole, Pendulum},
    metrics::{ConsoleLogger, CsvLogger, MultiLogger},
    policy::{CategoricalPolicyConfig, GaussianPolicyConfig},
};

type B = Autodiff<NdArray>;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum EnvName {
    Cartpole,
    Pendulum,
}

#[derive(Parser, Debug)]
#[command(about = "Train a vanilla policy-gradient agent")]
struct Args {
    /// Environment to train on
    #[arg(value_enum)]
    env_name: EnvName,

    /// Experiment name, used for the data directory
    #[arg(long, default_value = "vpg")]
    exp_name: String,

    /// Number of training iterations
    #[arg(short, long, default_value_t = 100)]
    n_iter: usize,

    /// Discount factor
    #[arg(long, default_value_t = 1.0)]
    discount: f32,

    /// Minimum timesteps per batch
    #[arg(short, long, default_value_t = 1000)]
    batch_size: usize,

    /// Episode length cap; defaults to the environment's own limit
    #[arg(long)]
    ep_len: Option<usize>,

    /// Learning rate for policy and baseline
    #[arg(long, default_value_t = 5e-3)]
    learning_rate: f64,

    /// Use reward-to-go Q-values instead of whole-trajectory returns
    #[arg(long)]
    reward_to_go: bool,

    /// Skip advantage normalization
    #[arg(long)]
    dont_normalize_advantages: bool,

    /// Subtract a learned state-value baseline
    #[arg(long)]
    nn_baseline: bool,

    /// Random seed
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Hidden layers in policy and baseline networks
    #[arg(long, default_value_t = 2)]
    n_layers: usize,

    /// Width of each hidden layer
    #[arg(long, default_value_t = 64)]
    size: usize,
}

impl Args {
    fn pg_config(&self, env_ep_len: Option<usize>) -> Result<PgConfig> {
        let max_path_length = self
            .ep_len
            .or(env_ep_len)
            .context("--ep-len is required for environments without a step limit")?;
        Ok(PgConfig::new()
            .with_gamma(self.discount)
            .with_learning_rate(self.learning_rate)
            .with_min_timesteps_per_batch(self.batch_size)
            .with_max_path_length(max_path_length)
            .with_reward_to_go(self.reward_to_go)
            .with_normalize_advantages(!self.dont_normalize_advantages)
            .with_seed(self.seed))
    }

    fn hidden_layers(&self) -> Vec<usize> {
        vec![self.size; self.n_layers]
    }

    fn data_dir(&self) -> PathBuf {
        let env = match self.env_name {
            EnvName::Cartpole => "cartpole",
            EnvName::Pendulum => "pendulum",
        };
        PathBuf::from("data").join(format!("{}_{}", self.exp_name, env))
    }
}

fn run_setup(args: &Args) -> Result<(Checkpointer, MultiLogger)> {
    let data_dir = args.data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating {}", data_dir.display()))?;

    let checkpointer = Checkpointer::new(data_dir.join("checkpoints"))?;
    let csv = CsvLogger::create(data_dir.join("log.csv"))
        .with_context(|| format!("creating {}", data_dir.join("log.csv").display()))?;
    let logger = MultiLogger::new(vec![Box::new(ConsoleLogger::new()), Box::new(csv)]);

    tracing::info!(dir = %data_dir.display(), "experiment directory ready");
    Ok((checkpointer, logger))
}

fn train_cartpole(args: &Args) -> Result<()> {
    let device = NdArrayDevice::default();
    let mut env = CartPole::new();
    let config = args.pg_config(env.max_episode_steps())?;

    let (checkpointer, mut logger) = run_setup(args)?;

    let policy = CategoricalPolicyConfig::new(
        env.observation_dim(),
        args.hidden_layers(),
        env.actions().len(),
    )
    .init::<B>(&device);
    let (policy, restored) = checkpointer.restore(policy, BEST_POLICY, &device)?;
    if restored {
        tracing::info!("restored policy from previous best checkpoint");
    }

    let baseline = args
        .nn_baseline
        .then(|| Baseline::new(env.observation_dim(), args.hidden_layers(), &device));

    let mut agent = PgAgent::new(policy, baseline, config, device)?;
    agent.train(&mut env, args.n_iter, &mut logger, Some(&checkpointer))?;
    Ok(())
}

fn train_pendulum(args: &Args) -> Result<()> {
    let device = NdArrayDevice::default();
    let mut env = Pendulum::new();
    let config = args.pg_config(env.max_episode_steps())?;

    let (checkpointer, mut logger) = run_setup(args)?;

    let policy = GaussianPolicyConfig::new(
        env.observation_dim(),
        args.hidden_layers(),
        env.action_dim(),
    )
    .init::<B>(&device);
    let (policy, restored) = checkpointer.restore(policy, BEST_POLICY, &device)?;
    if restored {
        tracing::info!("restored policy from previous best checkpoint");
    }

    let baseline = args
        .nn_baseline
        .then(|| Baseline::new(env.observation_dim(), args.hidden_layers(), &device));

    let mut agent = PgAgent::new(policy, baseline, config, device)?;
    agent.train(&mut env, args.n_iter, &mut logger, Some(&checkpointer))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(?args, "starting training");

    match args.env_name {
        EnvName::Cartpole => train_cartpole(&args),
        EnvName::Pendulum => train_pendulum(&args),
    }
}
