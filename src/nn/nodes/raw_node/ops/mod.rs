mod activation;
mod add;
mod affine_transform;
mod cmult;
mod concatenate;
mod pick_range;
mod sum;

pub(in crate::nn) use activation::{Logistic, Rectify, Tanh};
pub(in crate::nn) use add::Add;
pub(in crate::nn) use affine_transform::AffineTransform;
pub(in crate::nn) use cmult::CMult;
pub(in crate::nn) use concatenate::Concatenate;
pub(in crate::nn) use pick_range::PickRange;
pub(in crate::nn) use sum::Sum;
