mod pick_neg_log_softmax;

pub(in crate::nn) use pick_neg_log_softmax::PickNegLogSoftmax;
