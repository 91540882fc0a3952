//! Vanilla policy gradient (REINFORCE)
//!
//! On-policy gradient ascent on the objective
//! `Σ_t log π(a_t | o_t) · advantage_t`, with the Q-value of each timestep
//! estimated either as the discounted reward-to-go or as the whole
//! trajectory's discounted return. An optional learned baseline is subtracted
//! from the Q-values to reduce variance, and advantages can be normalized to
//! zero mean and unit standard deviation before the update.
//!
//! # Algorithm Overview
//!
//! One training iteration:
//! 1. Roll episodes until the batch holds more than the configured minimum
//!    number of timesteps.
//! 2. Convert each path's rewards into per-timestep Q-values.
//! 3. Subtract the (rescaled) baseline prediction and optionally normalize
//!    the result into advantages.
//! 4. Fit the baseline one step against the raw Q-values.
//! 5. Apply one Adam step on the policy, weighted by the advantages.
//! 6. Checkpoint on improvement and emit batch statistics.
//!
//! The whole loop is single-threaded; policy and baseline parameters are
//! mutated strictly sequentially, once per iteration each.
//!
//! Reference: "Policy Gradient Methods for Reinforcement Learning with
//! Function Approximation" (Sutton et al., 2000)

use std::time::Instant;

use burn::{
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    checkpoint::{Checkpointer, BEST_POLICY},
    env::{Environment, FlatAction},
    error::PgError,
    metrics::{IterationStats, MetricsLogger},
    nn::{MLPConfig, MLP},
    policy::PgPolicy,
    traits::ToTensor,
};

/// Stabilizer used both to avoid division by zero and as an additive floor
/// on the output scale of [`normalize`].
pub const EPS: f32 = 1e-8;

/// One complete episode: observations, flat actions and rewards, all of
/// equal length T ≥ 1. Immutable once the roller returns it; discarded after
/// one training iteration.
#[derive(Clone, Debug)]
pub struct Path<S> {
    pub observations: Vec<S>,
    pub actions: Vec<Vec<f32>>,
    pub rewards: Vec<f32>,
}

impl<S> Path<S> {
    /// Number of timesteps in the path.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Undiscounted sum of rewards, used for reporting and the checkpoint
    /// watermark.
    pub fn total_reward(&self) -> f32 {
        self.rewards.iter().sum()
    }
}

/// The paths gathered in one iteration plus their concatenated arrays,
/// aligned index-for-index with the Q-value and advantage vectors.
pub struct Batch<S> {
    pub paths: Vec<Path<S>>,
    pub observations: Vec<S>,
    pub actions: Vec<Vec<f32>>,
    pub total_timesteps: usize,
}

/// Discounted reward-to-go: `Q_t = r_t + γ·Q_{t+1}`, `Q_{T-1} = r_{T-1}`.
///
/// Exact backward recurrence, O(T) per path.
pub fn reward_to_go(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let n = rewards.len();
    let mut q = vec![0.0; n];
    if n == 0 {
        return q;
    }
    q[n - 1] = rewards[n - 1];
    for t in (0..n - 1).rev() {
        q[t] = rewards[t] + gamma * q[t + 1];
    }
    q
}

/// Whole-trajectory return `Σ_t γ^t·r_t` broadcast to every timestep of the
/// path. Discards temporal credit assignment within the path; kept as the
/// high-variance comparison estimator. The discount exponent starts at 0 for
/// each path independently.
pub fn trajectory_return(rewards: &[f32], gamma: f32) -> Vec<f32> {
    let mut ret = 0.0;
    let mut discount = 1.0;
    for r in rewards {
        ret += discount * r;
        discount *= gamma;
    }
    vec![ret; rewards.len()]
}

/// Rescale `data` to sample mean `mean` and sample standard deviation `std`.
///
/// `((x − mean(x)) / (std(x) + ε)) · (std + ε) + mean`, ε = [`EPS`]. A
/// constant input maps to the constant `mean`.
pub fn normalize(data: &[f32], mean: f32, std: f32) -> Vec<f32> {
    let data_mean = sample_mean(data);
    let data_std = sample_std(data);
    data.iter()
        .map(|x| ((x - data_mean) / (data_std + EPS)) * (std + EPS) + mean)
        .collect()
}

/// Arithmetic mean; 0 for an empty slice.
pub fn sample_mean(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f32>() / data.len() as f32
}

/// Population standard deviation (ddof = 0); 0 for an empty slice.
pub fn sample_std(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let m = sample_mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f32>() / data.len() as f32).sqrt()
}

fn ensure_finite(values: &[f32], what: &'static str, iteration: usize) -> Result<(), PgError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PgError::NonFinite { what, iteration })
    }
}

/// Configuration for the policy-gradient agent
#[derive(Config, Debug)]
pub struct PgConfig {
    /// Discount factor γ ∈ (0, 1]
    #[config(default = 1.0)]
    pub gamma: f32,
    /// Learning rate for both the policy and the baseline (default: 5e-3)
    #[config(default = 0.005)]
    pub learning_rate: f64,
    /// Collect paths until the batch holds strictly more timesteps than this
    #[config(default = 1000)]
    pub min_timesteps_per_batch: usize,
    /// Episode-length cap; a path may reach `max_path_length + 1` timesteps
    /// because the cap is checked after the step
    #[config(default = 1000)]
    pub max_path_length: usize,
    /// Use reward-to-go Q-values instead of the whole-trajectory return
    #[config(default = true)]
    pub reward_to_go: bool,
    /// Normalize advantages to zero mean, unit standard deviation
    #[config(default = true)]
    pub normalize_advantages: bool,
    /// Random seed for the backend RNG and action sampling
    #[config(default = 0)]
    pub seed: u64,
}

impl PgConfig {
    /// Reject invalid configurations before any rollout begins.
    pub fn validate(&self) -> Result<(), PgError> {
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(PgError::Config(format!(
                "gamma must be in (0, 1], got {}",
                self.gamma
            )));
        }
        if self.learning_rate <= 0.0 {
            return Err(PgError::Config(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.min_timesteps_per_batch == 0 {
            return Err(PgError::Config(
                "min_timesteps_per_batch must be at least 1".into(),
            ));
        }
        if self.max_path_length == 0 {
            return Err(PgError::Config("max_path_length must be at least 1".into()));
        }
        Ok(())
    }
}

/// Learned baseline: an MLP regressor predicting expected return from the
/// observation, trained one supervised step per iteration against the raw
/// Q-values.
pub struct Baseline<B: AutodiffBackend> {
    // Option for ownership during optimization
    net: Option<MLP<B>>,
    optimizer: OptimizerAdaptor<Adam, MLP<B>, B>,
}

impl<B: AutodiffBackend> Baseline<B> {
    pub fn new(obs_dim: usize, hidden_layers: Vec<usize>, device: &B::Device) -> Self {
        Self {
            net: Some(MLPConfig::new(obs_dim, hidden_layers, 1).init(device)),
            optimizer: AdamConfig::new().init(),
        }
    }

    /// Predicted return for each observation row.
    pub fn predict(&self, obs: Tensor<B, 2>) -> Vec<f32> {
        let out: Tensor<B, 1> = self
            .net
            .as_ref()
            .unwrap()
            .forward(obs)
            .squeeze_dims(&[1])
            .detach();
        out.to_data().as_slice::<f32>().unwrap().to_vec()
    }

    /// One mean-squared-error optimizer step against `targets`. Returns the
    /// loss value before the step.
    fn fit(&mut self, obs: Tensor<B, 2>, targets: &[f32], lr: f64, device: &B::Device) -> f32 {
        let net = self.net.take().unwrap();

        let target_t = Tensor::<B, 1>::from_data(
            TensorData::from(targets).convert::<B::FloatElem>(),
            device,
        );
        let pred: Tensor<B, 1> = net.forward(obs).squeeze_dims(&[1]);
        let loss = (pred - target_t).powf_scalar(2.0).mean();
        let loss_val = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &net);
        self.net = Some(self.optimizer.step(lr, net, grads));

        loss_val
    }
}

/// Vanilla policy-gradient agent
///
/// Generic over:
/// - `B`: autodiff backend (e.g., NdArray, Wgpu)
/// - `P`: policy head implementing [`PgPolicy`]
///
/// The agent owns the policy and baseline parameters for the whole run; all
/// reads and writes happen sequentially within the training loop.
pub struct PgAgent<B, P>
where
    B: AutodiffBackend,
    P: PgPolicy<B>,
{
    // Networks (Option for ownership during optimization)
    policy: Option<P>,
    baseline: Option<Baseline<B>>,

    optimizer: OptimizerAdaptor<Adam, P, B>,
    config: PgConfig,
    rng: StdRng,
    device: B::Device,

    // Cross-iteration state
    total_timesteps: usize,
    best_return: f32,
}

impl<B, P> PgAgent<B, P>
where
    B: AutodiffBackend,
    P: PgPolicy<B>,
{
    /// Create a new agent. Fails on an invalid configuration, before any
    /// rollout begins.
    pub fn new(
        policy: P,
        baseline: Option<Baseline<B>>,
        config: PgConfig,
        device: B::Device,
    ) -> Result<Self, PgError> {
        config.validate()?;
        B::seed(config.seed);
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            policy: Some(policy),
            baseline,
            optimizer: AdamConfig::new().init(),
            config,
            rng,
            device,
            total_timesteps: 0,
            best_return: f32::NEG_INFINITY,
        })
    }

    pub fn config(&self) -> &PgConfig {
        &self.config
    }

    /// The current policy parameters.
    pub fn policy(&self) -> &P {
        self.policy.as_ref().unwrap()
    }

    /// Best mean return seen so far (checkpoint watermark).
    pub fn best_return(&self) -> f32 {
        self.best_return
    }

    /// Cumulative environment timesteps across all iterations.
    pub fn total_timesteps(&self) -> usize {
        self.total_timesteps
    }

    /// Run one episode to termination or the length cap.
    ///
    /// The cap is checked after the step, so a path may legally reach
    /// `max_path_length + 1` timesteps.
    pub fn sample_trajectory<E>(&mut self, env: &mut E) -> Path<E::State>
    where
        E: Environment,
        E::Action: FlatAction,
        Vec<E::State>: ToTensor<B, 2, Float>,
    {
        let policy = self.policy.as_ref().unwrap();

        let mut ob = env.reset();
        let mut observations = Vec::new();
        let mut actions = Vec::new();
        let mut rewards = Vec::new();
        let mut steps = 0usize;

        loop {
            observations.push(ob.clone());

            let obs_t: Tensor<B, 2> = vec![ob.clone()].to_tensor(&self.device);
            let flat = policy.sample(obs_t, &mut self.rng);
            let action = E::Action::from_flat(&flat);

            let (next, reward) = env.step(action);
            actions.push(flat);
            rewards.push(reward);
            steps += 1;

            match next {
                Some(state) if steps <= self.config.max_path_length => ob = state,
                _ => break,
            }
        }

        Path {
            observations,
            actions,
            rewards,
        }
    }

    /// Roll episodes until the batch holds strictly more than
    /// `min_timesteps_per_batch` timesteps. The quota is checked only at
    /// path boundaries, so a single oversized trailing path may overshoot it;
    /// at least one complete path is always collected.
    pub fn collect_batch<E>(&mut self, env: &mut E) -> Batch<E::State>
    where
        E: Environment,
        E::Action: FlatAction,
        Vec<E::State>: ToTensor<B, 2, Float>,
    {
        let mut paths = Vec::new();
        let mut total_timesteps = 0;

        loop {
            let path = self.sample_trajectory(env);
            total_timesteps += path.len();
            paths.push(path);
            if total_timesteps > self.config.min_timesteps_per_batch {
                break;
            }
        }

        let mut observations = Vec::with_capacity(total_timesteps);
        let mut actions = Vec::with_capacity(total_timesteps);
        for path in &paths {
            observations.extend(path.observations.iter().cloned());
            actions.extend(path.actions.iter().cloned());
        }

        Batch {
            paths,
            observations,
            actions,
            total_timesteps,
        }
    }

    /// Per-timestep Q-values for the whole batch, concatenated in path
    /// order and aligned with the batch's flat arrays.
    pub fn estimate_returns<S>(&self, batch: &Batch<S>) -> Vec<f32> {
        let mut q = Vec::with_capacity(batch.total_timesteps);
        for path in &batch.paths {
            let q_path = if self.config.reward_to_go {
                reward_to_go(&path.rewards, self.config.gamma)
            } else {
                trajectory_return(&path.rewards, self.config.gamma)
            };
            q.extend(q_path);
        }
        q
    }

    /// Combine Q-values and baseline predictions into advantages.
    ///
    /// The baseline's raw output scale drifts from the evolving Q-value scale
    /// across iterations, so the prediction is rescaled to the current
    /// batch's Q statistics before subtraction. Normalization, when enabled,
    /// runs after the subtraction; the order is not interchangeable.
    pub fn compute_advantages(&self, obs: Tensor<B, 2>, q: &[f32]) -> Vec<f32> {
        let mut adv = match &self.baseline {
            Some(baseline) => {
                let b = baseline.predict(obs);
                let b_rescaled = normalize(&b, sample_mean(q), sample_std(q));
                q.iter()
                    .zip(b_rescaled)
                    .map(|(q_t, b_t)| q_t - b_t)
                    .collect()
            }
            None => q.to_vec(),
        };

        if self.config.normalize_advantages {
            adv = normalize(&adv, 0.0, 1.0);
        }
        adv
    }

    /// One gradient-ascent step on `Σ_t log π(a_t|o_t) · advantage_t`,
    /// implemented as descent on the negated objective. A non-finite loss is
    /// fatal to the iteration; retrying with corrupted statistics risks
    /// diverging the policy irrecoverably.
    fn update_policy(
        &mut self,
        obs: Tensor<B, 2>,
        actions: Tensor<B, 2>,
        advantages: &[f32],
        iteration: usize,
    ) -> Result<f32, PgError> {
        let policy = self.policy.take().unwrap();

        let adv_t = Tensor::<B, 1>::from_data(
            TensorData::from(advantages).convert::<B::FloatElem>(),
            &self.device,
        );

        let neg_log_prob = policy.neg_log_prob(obs, actions);
        let loss = (neg_log_prob * adv_t).sum();
        let loss_val = loss.clone().into_scalar().elem::<f32>();

        if !loss_val.is_finite() {
            self.policy = Some(policy);
            return Err(PgError::NonFinite {
                what: "policy loss",
                iteration,
            });
        }

        let grads = GradientsParams::from_grads(loss.backward(), &policy);
        self.policy = Some(self.optimizer.step(self.config.learning_rate, policy, grads));

        Ok(loss_val)
    }

    /// One full iteration: collect → returns → advantages → baseline fit →
    /// policy update. Returns the batch statistics for reporting;
    /// `elapsed_secs` is filled in by the caller.
    pub fn train_iteration<E>(
        &mut self,
        env: &mut E,
        iteration: usize,
    ) -> Result<IterationStats, PgError>
    where
        E: Environment,
        E::Action: FlatAction,
        Vec<E::State>: ToTensor<B, 2, Float>,
        Vec<Vec<f32>>: ToTensor<B, 2, Float>,
    {
        let batch = self.collect_batch(env);

        let q = self.estimate_returns(&batch);
        ensure_finite(&q, "q-values", iteration)?;

        let obs: Tensor<B, 2> = batch.observations.clone().to_tensor(&self.device);

        let advantages = self.compute_advantages(obs.clone(), &q);
        ensure_finite(&advantages, "advantages", iteration)?;

        // The baseline regresses on the raw (unnormalized) Q-values; the
        // rescaling above only affects the prediction side.
        if let Some(baseline) = self.baseline.as_mut() {
            let loss = baseline.fit(obs.clone(), &q, self.config.learning_rate, &self.device);
            if !loss.is_finite() {
                return Err(PgError::NonFinite {
                    what: "baseline loss",
                    iteration,
                });
            }
            tracing::debug!(iteration, baseline_loss = loss, "baseline fit");
        }

        let actions: Tensor<B, 2> = batch.actions.clone().to_tensor(&self.device);
        let policy_loss = self.update_policy(obs, actions, &advantages, iteration)?;
        tracing::debug!(iteration, policy_loss, "policy update");

        self.total_timesteps += batch.total_timesteps;

        let returns: Vec<f32> = batch.paths.iter().map(Path::total_reward).collect();
        let lengths: Vec<f32> = batch.paths.iter().map(|p| p.len() as f32).collect();

        Ok(IterationStats {
            iteration,
            elapsed_secs: 0.0,
            mean_return: sample_mean(&returns),
            std_return: sample_std(&returns),
            max_return: returns.iter().cloned().fold(f32::NEG_INFINITY, f32::max),
            min_return: returns.iter().cloned().fold(f32::INFINITY, f32::min),
            mean_ep_len: sample_mean(&lengths),
            std_ep_len: sample_std(&lengths),
            timesteps_this_batch: batch.total_timesteps,
            timesteps_so_far: self.total_timesteps,
        })
    }

    /// Run `n_iter` training iterations against one environment.
    ///
    /// The best-return watermark is initialized from one pre-training
    /// evaluation rollout; whenever a batch's mean return improves on it, the
    /// policy is persisted through `checkpointer`. A failed checkpoint save
    /// is logged and training continues.
    pub fn train<E>(
        &mut self,
        env: &mut E,
        n_iter: usize,
        logger: &mut dyn MetricsLogger,
        checkpointer: Option<&Checkpointer>,
    ) -> Result<(), PgError>
    where
        E: Environment,
        E::Action: FlatAction,
        Vec<E::State>: ToTensor<B, 2, Float>,
        Vec<Vec<f32>>: ToTensor<B, 2, Float>,
    {
        let start = Instant::now();

        let eval = self.sample_trajectory(env);
        self.best_return = eval.total_reward();
        tracing::info!(
            best_return = self.best_return,
            steps = eval.len(),
            "pre-training evaluation rollout"
        );

        for iteration in 0..n_iter {
            let mut stats = self.train_iteration(env, iteration)?;
            stats.elapsed_secs = start.elapsed().as_secs_f64();

            // Compared against the current batch's statistics, before the
            // updated policy has produced any data.
            if stats.mean_return > self.best_return {
                self.best_return = stats.mean_return;
                if let Some(cp) = checkpointer {
                    match cp.save::<B, P>(self.policy.as_ref().unwrap(), BEST_POLICY) {
                        Ok(path) => {
                            tracing::info!(
                                mean_return = stats.mean_return,
                                path = %path.display(),
                                "saved best policy"
                            )
                        }
                        Err(e) => tracing::warn!(
                            error = %e,
                            "checkpoint save failed, continuing without persisting"
                        ),
                    }
                }
            }

            logger.log(&stats);
        }

        logger.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gym::CartPoleAction;
    use crate::policy::CategoricalPolicyConfig;
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

    type TB = Autodiff<NdArray>;

    /// Deterministic environment with fixed-length episodes and reward 1.
    struct FixedEpisodeEnv {
        episode_len: usize,
        steps: usize,
    }

    impl FixedEpisodeEnv {
        fn new(episode_len: usize) -> Self {
            Self {
                episode_len,
                steps: 0,
            }
        }
    }

    impl Environment for FixedEpisodeEnv {
        type State = [f32; 2];
        type Action = CartPoleAction;

        fn reset(&mut self) -> Self::State {
            self.steps = 0;
            [0.0, 0.0]
        }

        fn step(&mut self, _action: Self::Action) -> (Option<Self::State>, f32) {
            self.steps += 1;
            if self.steps >= self.episode_len {
                (None, 1.0)
            } else {
                (Some([0.0, 0.0]), 1.0)
            }
        }

        fn observation_dim(&self) -> usize {
            2
        }
    }

    /// Environment that never signals termination.
    struct EndlessEnv;

    impl Environment for EndlessEnv {
        type State = [f32; 2];
        type Action = CartPoleAction;

        fn reset(&mut self) -> Self::State {
            [0.0, 0.0]
        }

        fn step(&mut self, _action: Self::Action) -> (Option<Self::State>, f32) {
            (Some([0.0, 0.0]), 0.5)
        }

        fn observation_dim(&self) -> usize {
            2
        }
    }

    fn test_agent(config: PgConfig) -> PgAgent<TB, crate::policy::CategoricalPolicy<TB>> {
        let device = NdArrayDevice::default();
        let policy = CategoricalPolicyConfig::new(2, vec![8], 2).init::<TB>(&device);
        PgAgent::new(policy, None, config, device).unwrap()
    }

    #[test]
    fn reward_to_go_recurrence() {
        let q = reward_to_go(&[1.0, 2.0, 3.0], 0.9);
        assert!((q[2] - 3.0).abs() < 1e-6);
        assert!((q[1] - (2.0 + 0.9 * 3.0)).abs() < 1e-6);
        assert!((q[0] - (1.0 + 0.9 * q[1])).abs() < 1e-6);
    }

    #[test]
    fn reward_to_go_undiscounted_ones() {
        // γ = 1, all rewards 1 ⇒ Q_t = T − t.
        let q = reward_to_go(&[1.0; 5], 1.0);
        assert_eq!(q, vec![5.0, 4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn trajectory_return_broadcasts_constant() {
        let q = trajectory_return(&[1.0, 1.0, 1.0], 0.5);
        assert_eq!(q.len(), 3);
        for v in q {
            assert!((v - 1.75).abs() < 1e-6);
        }
    }

    #[test]
    fn normalize_hits_target_statistics() {
        let out = normalize(&[1.0, 2.0, 3.0, 4.0], 2.0, 3.0);
        assert!((sample_mean(&out) - 2.0).abs() < 1e-4);
        assert!((sample_std(&out) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn normalize_is_idempotent_up_to_eps() {
        let once = normalize(&[5.0, -3.0, 2.0, 0.0], 0.0, 1.0);
        let twice = normalize(&once, 0.0, 1.0);
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn normalize_constant_vector_maps_to_target_mean() {
        // std of a constant vector is 0, handled by the ε stabilizer.
        let out = normalize(&[5.0, 5.0, 5.0], 7.0, 1.0);
        for v in out {
            assert!(v.is_finite());
            assert!((v - 7.0).abs() < 1e-4);
        }
    }

    #[test]
    fn constant_baseline_yields_near_zero_advantage() {
        // Trajectory-return mode on identical paths gives a constant Q; a
        // baseline predicting its mean leaves nothing to ascend.
        let q = vec![5.0; 6];
        let b = vec![5.0; 6];
        let b_rescaled = normalize(&b, sample_mean(&q), sample_std(&q));
        for (q_t, b_t) in q.iter().zip(&b_rescaled) {
            assert!((q_t - b_t).abs() < 1e-4);
        }
    }

    #[test]
    fn config_rejects_bad_gamma_and_lr() {
        assert!(PgConfig::new().with_gamma(0.0).validate().is_err());
        assert!(PgConfig::new().with_gamma(1.5).validate().is_err());
        assert!(PgConfig::new().with_learning_rate(0.0).validate().is_err());
        assert!(PgConfig::new().validate().is_ok());
    }

    #[test]
    fn batch_quota_is_strictly_greater_than() {
        let mut agent = test_agent(
            PgConfig::new()
                .with_min_timesteps_per_batch(12)
                .with_max_path_length(100),
        );
        let mut env = FixedEpisodeEnv::new(5);

        let batch = agent.collect_batch(&mut env);

        // 5 + 5 = 10 ≤ 12, so a third path is needed.
        assert_eq!(batch.paths.len(), 3);
        assert_eq!(batch.total_timesteps, 15);
        assert!(batch.total_timesteps > 12);
        assert_eq!(batch.observations.len(), 15);
        assert_eq!(batch.actions.len(), 15);
    }

    #[test]
    fn single_oversized_path_satisfies_quota() {
        let mut agent = test_agent(
            PgConfig::new()
                .with_min_timesteps_per_batch(3)
                .with_max_path_length(100),
        );
        let mut env = FixedEpisodeEnv::new(10);

        let batch = agent.collect_batch(&mut env);
        assert_eq!(batch.paths.len(), 1);
        assert_eq!(batch.total_timesteps, 10);
    }

    #[test]
    fn step_cap_allows_one_extra_timestep() {
        let mut agent = test_agent(PgConfig::new().with_max_path_length(10));
        let mut env = EndlessEnv;

        let path = agent.sample_trajectory(&mut env);
        assert_eq!(path.len(), 11);
        assert_eq!(path.observations.len(), 11);
        assert_eq!(path.actions.len(), 11);
    }

    #[test]
    fn advantage_equals_q_without_baseline_or_normalization() {
        let agent = test_agent(
            PgConfig::new()
                .with_normalize_advantages(false)
                .with_max_path_length(100),
        );
        let device = NdArrayDevice::default();

        let q = vec![5.0, 4.0, 3.0, 2.0, 1.0];
        let obs: Tensor<TB, 2> = vec![[0.0_f32, 0.0]; 5].to_tensor(&device);
        let adv = agent.compute_advantages(obs, &q);
        assert_eq!(adv, q);
    }

    #[test]
    fn estimate_returns_concatenates_in_path_order() {
        let mut agent = test_agent(
            PgConfig::new()
                .with_gamma(1.0)
                .with_min_timesteps_per_batch(7)
                .with_max_path_length(100),
        );
        let mut env = FixedEpisodeEnv::new(4);

        let batch = agent.collect_batch(&mut env);
        assert_eq!(batch.paths.len(), 2);

        let q = agent.estimate_returns(&batch);
        assert_eq!(q, vec![4.0, 3.0, 2.0, 1.0, 4.0, 3.0, 2.0, 1.0]);
    }
}
