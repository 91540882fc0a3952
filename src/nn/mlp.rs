/// Multi-Layer Perceptron (MLP) - Generic feedforward neural network
///
/// Used for both the policy head (logits or Gaussian mean) and the optional
/// baseline regressor.
use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::{activation::relu, backend::Backend},
};

/// Configuration for Multi-Layer Perceptron
#[derive(Config, Debug)]
pub struct MLPConfig {
    /// Input dimension
    pub input_dim: usize,
    /// Hidden layer dimensions (e.g., [64, 64] for two hidden layers of 64 units each)
    pub hidden_layers: Vec<usize>,
    /// Output dimension
    pub output_dim: usize,
}

/// Multi-Layer Perceptron implementation
///
/// Hidden layers use ReLU activation, the output layer is linear.
#[derive(Module, Debug)]
pub struct MLP<B: Backend> {
    layers: Vec<Linear<B>>,
}

impl MLPConfig {
    /// Initialize the MLP with the given configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> MLP<B> {
        let mut layers = Vec::new();

        if self.hidden_layers.is_empty() {
            // Direct input → output connection (no hidden layers)
            layers.push(LinearConfig::new(self.input_dim, self.output_dim).init(device));
        } else {
            layers.push(LinearConfig::new(self.input_dim, self.hidden_layers[0]).init(device));

            for i in 0..self.hidden_layers.len() - 1 {
                layers.push(
                    LinearConfig::new(self.hidden_layers[i], self.hidden_layers[i + 1])
                        .init(device),
                );
            }

            let last_hidden = *self.hidden_layers.last().unwrap();
            layers.push(LinearConfig::new(last_hidden, self.output_dim).init(device));
        }

        MLP { layers }
    }
}

impl<B: Backend> MLP<B> {
    /// Generic forward pass - works with any tensor dimension
    ///
    /// Applies ReLU activation to all hidden layers, no activation on output
    /// layer. The last dimension is always treated as the feature dimension.
    pub fn forward<const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        let mut x: Tensor<B, D> = input;

        for layer in &self.layers[..self.layers.len() - 1] {
            x = layer.forward(x);
            x = relu(x);
        }

        x = self.layers.last().unwrap().forward(x);

        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    #[test]
    fn mlp_forward_2d() {
        let device = NdArrayDevice::default();

        // 4 → [64, 64] → 2
        let config = MLPConfig::new(4, vec![64, 64], 2);
        let mlp = config.init::<NdArray>(&device);

        // Batch of 8 states: [batch, features]
        let input = Tensor::<NdArray, 2>::random(
            [8, 4],
            burn::tensor::Distribution::Uniform(-1.0, 1.0),
            &device,
        );

        let output: Tensor<NdArray, 2> = mlp.forward(input);
        assert_eq!(output.shape().dims, [8, 2]);
    }

    #[test]
    fn mlp_no_hidden_layers() {
        let device = NdArrayDevice::default();

        // Direct connection: 4 → 2
        let config = MLPConfig::new(4, vec![], 2);
        let mlp = config.init::<NdArray>(&device);

        let input =
            Tensor::<NdArray, 2>::random([1, 4], burn::tensor::Distribution::Default, &device);
        let output = mlp.forward(input);

        assert_eq!(output.shape().dims, [1, 2]);
    }

    #[test]
    fn mlp_single_output_regressor() {
        let device = NdArrayDevice::default();

        // Baseline shape: 3 → [32] → 1
        let config = MLPConfig::new(3, vec![32], 1);
        let mlp = config.init::<NdArray>(&device);

        let input =
            Tensor::<NdArray, 2>::random([5, 3], burn::tensor::Distribution::Default, &device);
        let output = mlp.forward(input);

        assert_eq!(output.shape().dims, [5, 1]);
    }
}
