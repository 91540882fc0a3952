//! Stochastic policy heads for the two supported action-space kinds.
//!
//! Both variants expose the same two operations the policy-gradient update
//! needs: drawing one action for a single observation during rollout, and
//! computing the per-timestep *negative* log-probability term for a batch of
//! recorded actions. The sign convention follows the training objective: the
//! updater descends `Σ_t neg_log_prob_t · advantage_t`, which ascends the
//! log-probability weighted by advantage.
//!
//! Policies always emit actions as flat `f32` rows — a one-hot row for
//! [`CategoricalPolicy`], the raw action vector for [`GaussianPolicy`] — so
//! the batch can store both kinds in a `[timesteps, action_dim]` array.

use burn::{
    module::{AutodiffModule, Param},
    prelude::*,
    tensor::{
        activation::{log_softmax, softmax},
        backend::AutodiffBackend,
        Distribution,
    },
};
use rand::{distributions::Distribution as RandDistribution, distributions::WeightedIndex, rngs::StdRng};

use crate::nn::{MLPConfig, MLP};

/// A parametric policy usable by the policy-gradient updater.
pub trait PgPolicy<B: AutodiffBackend>: AutodiffModule<B> {
    /// Sample one action for a single observation row `[1, obs_dim]`.
    ///
    /// Returns the flat action representation stored in the batch.
    fn sample(&self, obs: Tensor<B, 2>, rng: &mut StdRng) -> Vec<f32>;

    /// Negative log-probability term for a batch of recorded actions.
    ///
    /// `obs` is `[n, obs_dim]`, `actions` is `[n, action_dim]`; the result is
    /// one scalar per timestep, `[n]`.
    fn neg_log_prob(&self, obs: Tensor<B, 2>, actions: Tensor<B, 2>) -> Tensor<B, 1>;
}

/// Configuration for a categorical (discrete-action) policy.
#[derive(Config, Debug)]
pub struct CategoricalPolicyConfig {
    /// Observation dimensionality.
    pub obs_dim: usize,
    /// Hidden layer widths of the logit network.
    pub hidden_layers: Vec<usize>,
    /// Number of action categories.
    pub n_actions: usize,
}

impl CategoricalPolicyConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CategoricalPolicy<B> {
        CategoricalPolicy {
            net: MLPConfig::new(self.obs_dim, self.hidden_layers.clone(), self.n_actions)
                .init(device),
        }
    }
}

/// Policy over a finite action set: one logit per category.
#[derive(Module, Debug)]
pub struct CategoricalPolicy<B: Backend> {
    net: MLP<B>,
}

impl<B: Backend> CategoricalPolicy<B> {
    /// Action logits for a batch of observations.
    pub fn logits(&self, obs: Tensor<B, 2>) -> Tensor<B, 2> {
        self.net.forward(obs)
    }
}

impl<B: AutodiffBackend> PgPolicy<B> for CategoricalPolicy<B> {
    fn sample(&self, obs: Tensor<B, 2>, rng: &mut StdRng) -> Vec<f32> {
        let logits = self.logits(obs);
        let n_actions = logits.dims()[1];
        let probs = softmax(logits, 1);

        let probs_data = probs.to_data();
        let probs_slice = probs_data.as_slice::<f32>().unwrap();

        let dist = WeightedIndex::new(probs_slice).unwrap();
        let action_idx = dist.sample(rng);

        // One-hot row; the environment decodes it by arg-max.
        let mut one_hot = vec![0.0; n_actions];
        one_hot[action_idx] = 1.0;
        one_hot
    }

    fn neg_log_prob(&self, obs: Tensor<B, 2>, actions: Tensor<B, 2>) -> Tensor<B, 1> {
        // Cross-entropy between the stored one-hot row and the softmax of the
        // logits: -Σ_k onehot_k · log_softmax(logits)_k.
        let log_probs = log_softmax(self.logits(obs), 1);
        (actions * log_probs).sum_dim(1).neg().squeeze_dims(&[1])
    }
}

/// Configuration for a diagonal-Gaussian (continuous-action) policy.
#[derive(Config, Debug)]
pub struct GaussianPolicyConfig {
    /// Observation dimensionality.
    pub obs_dim: usize,
    /// Hidden layer widths of the mean network.
    pub hidden_layers: Vec<usize>,
    /// Number of action dimensions.
    pub action_dim: usize,
}

impl GaussianPolicyConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> GaussianPolicy<B> {
        GaussianPolicy {
            net: MLPConfig::new(self.obs_dim, self.hidden_layers.clone(), self.action_dim)
                .init(device),
            log_std: Param::from_tensor(Tensor::zeros([self.action_dim], device)),
        }
    }
}

/// Policy over a continuous action space.
///
/// The network outputs the mean; the diagonal log-standard-deviation is a
/// learned parameter independent of the observation, initialized to zero
/// (unit standard deviation).
#[derive(Module, Debug)]
pub struct GaussianPolicy<B: Backend> {
    net: MLP<B>,
    log_std: Param<Tensor<B, 1>>,
}

impl<B: Backend> GaussianPolicy<B> {
    /// Mean of the action distribution for a batch of observations.
    pub fn mean(&self, obs: Tensor<B, 2>) -> Tensor<B, 2> {
        self.net.forward(obs)
    }

    /// Standard deviation broadcast to `[1, action_dim]`.
    fn std(&self) -> Tensor<B, 2> {
        self.log_std.val().exp().unsqueeze_dim(0)
    }
}

impl<B: AutodiffBackend> PgPolicy<B> for GaussianPolicy<B> {
    fn sample(&self, obs: Tensor<B, 2>, _rng: &mut StdRng) -> Vec<f32> {
        let mean = self.mean(obs);
        let device = mean.device();
        let dims = mean.dims();

        // Reparameterization: mean + std ⊙ z, z ~ N(0, I).
        let noise: Tensor<B, 2> = Tensor::random(dims, Distribution::Normal(0.0, 1.0), &device);
        let sample = mean + self.std() * noise;

        sample.to_data().as_slice::<f32>().unwrap().to_vec()
    }

    fn neg_log_prob(&self, obs: Tensor<B, 2>, actions: Tensor<B, 2>) -> Tensor<B, 1> {
        // Squared Mahalanobis term 0.5 · Σ_i ((a_i − μ_i)/σ_i)², the negative
        // log-density up to an additive constant. The constant does not change
        // the gradient, so it is dropped from the objective.
        let z = (actions - self.mean(obs)) / self.std();
        z.powf_scalar(2.0)
            .sum_dim(1)
            .mul_scalar(0.5)
            .squeeze_dims(&[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
    use rand::SeedableRng;

    type TB = Autodiff<NdArray>;

    #[test]
    fn categorical_sample_is_one_hot() {
        let device = NdArrayDevice::default();
        let policy = CategoricalPolicyConfig::new(3, vec![16], 4).init::<TB>(&device);
        let mut rng = StdRng::seed_from_u64(7);

        let obs = Tensor::<TB, 2>::zeros([1, 3], &device);
        let flat = policy.sample(obs, &mut rng);

        assert_eq!(flat.len(), 4);
        assert_eq!(flat.iter().filter(|v| **v == 1.0).count(), 1);
        assert_eq!(flat.iter().filter(|v| **v == 0.0).count(), 3);
    }

    #[test]
    fn categorical_neg_log_probs_are_consistent() {
        let device = NdArrayDevice::default();
        let policy = CategoricalPolicyConfig::new(2, vec![8], 2).init::<TB>(&device);

        let obs = Tensor::<TB, 2>::from_floats([[0.3, -0.1]], &device);
        let a0 = Tensor::<TB, 2>::from_floats([[1.0, 0.0]], &device);
        let a1 = Tensor::<TB, 2>::from_floats([[0.0, 1.0]], &device);

        let nlp0 = policy
            .neg_log_prob(obs.clone(), a0)
            .into_scalar()
            .elem::<f32>();
        let nlp1 = policy.neg_log_prob(obs, a1).into_scalar().elem::<f32>();

        // Cross-entropy of a one-hot label is -log p, so probabilities of the
        // two categories must sum to one.
        assert!(nlp0 > 0.0 && nlp1 > 0.0);
        let total = (-nlp0).exp() + (-nlp1).exp();
        assert!((total - 1.0).abs() < 1e-5, "probs sum to {}", total);
    }

    #[test]
    fn gaussian_neg_log_prob_zero_at_mean() {
        let device = NdArrayDevice::default();
        let policy = GaussianPolicyConfig::new(3, vec![8], 2).init::<TB>(&device);

        let obs = Tensor::<TB, 2>::from_floats([[0.5, -0.5, 1.0]], &device);
        let mean = policy.mean(obs.clone());

        let nlp = policy.neg_log_prob(obs, mean).into_scalar().elem::<f32>();
        assert!(nlp.abs() < 1e-6, "mahalanobis term at the mean is {}", nlp);
    }

    #[test]
    fn gaussian_sample_has_action_dim_width() {
        let device = NdArrayDevice::default();
        let policy = GaussianPolicyConfig::new(3, vec![8], 2).init::<TB>(&device);
        let mut rng = StdRng::seed_from_u64(0);

        let obs = Tensor::<TB, 2>::zeros([1, 3], &device);
        let flat = policy.sample(obs, &mut rng);

        assert_eq!(flat.len(), 2);
        assert!(flat.iter().all(|v| v.is_finite()));
    }
}
