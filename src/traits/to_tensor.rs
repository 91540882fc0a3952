use burn::{
    prelude::*,
    tensor::{backend::Backend, BasicOps, Element, TensorData},
};

/// A trait for converting items to tensors.
///
/// Implemented for `Vec<T>` to convert batches of `T` to a tensor of
/// dimension `D`. Trajectory observations (`Vec<[f32; N]>`) and flat action
/// rows (`Vec<Vec<f32>>`) rely on the 2D implementations below.
pub trait ToTensor<B: Backend, const D: usize, K: BasicOps<B>> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D, K>;
}

impl<B, E, K> ToTensor<B, 1, K> for Vec<E>
where
    B: Backend,
    E: Element,
    K: BasicOps<B, Elem = E>,
{
    #[inline]
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 1, K> {
        let len = self.len();
        Tensor::from_data(TensorData::new(self, [len]), device)
    }
}

impl<B, E, K, const A: usize> ToTensor<B, 2, K> for Vec<[E; A]>
where
    B: Backend,
    E: Element,
    K: BasicOps<B, Elem = E>,
{
    #[inline]
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2, K> {
        let batch_size = self.len();
        let mut flat = Vec::with_capacity(batch_size * A);
        for array in self.iter() {
            flat.extend_from_slice(array);
        }
        let data = TensorData::new(flat, [batch_size, A]);
        Tensor::<B, 2, K>::from_data(data, device)
    }
}

/// Rows of equal width. Panics if the rows are ragged, since a ragged action
/// batch would break index alignment with the observation batch.
impl<B, E, K> ToTensor<B, 2, K> for Vec<Vec<E>>
where
    B: Backend,
    E: Element,
    K: BasicOps<B, Elem = E>,
{
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 2, K> {
        let batch_size = self.len();
        let width = self.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(batch_size * width);
        for row in self.iter() {
            assert_eq!(row.len(), width, "ragged rows in batch");
            flat.extend_from_slice(row);
        }
        let data = TensorData::new(flat, [batch_size, width]);
        Tensor::<B, 2, K>::from_data(data, device)
    }
}
