use crate::assert_err;
use crate::nn::{GraphError, ParameterCollection};
use crate::tensor::Tensor;

fn build_small_model(seed: u64) -> ParameterCollection {
    let mut model = ParameterCollection::with_seed(seed);
    model.add_parameters("enc_W", &[3, 4]).unwrap();
    model.add_lookup_parameters("words", 5, 2).unwrap();
    model.add_parameters("enc_b", &[3, 1]).unwrap();
    model
}

fn all_values(model: &ParameterCollection) -> Vec<f32> {
    let mut values = Vec::new();
    for id in model.parameter_ids() {
        values.extend(model.parameter(id).unwrap().to_vec());
    }
    for id in model.lookup_ids() {
        for row in 0..model.lookup_size(id).unwrap() {
            values.extend(model.lookup_row(id, row).unwrap().to_vec());
        }
    }
    values
}

#[test]
fn test_add_parameters_glorot_init() {
    let mut model = ParameterCollection::new();
    let w = model.add_parameters("w", &[3, 5]).unwrap();
    let scale = (6.0_f32 / 8.0).sqrt();
    let value = model.parameter(w).unwrap();
    assert_eq!(value.shape(), &[3, 5]);
    assert!(value.data_as_slice().iter().all(|v| v.abs() <= scale));
    assert_eq!(model.parameter_name(w).unwrap(), "w");

    let table = model.add_lookup_parameters("table", 4, 6).unwrap();
    let scale = 1.0_f32; // √(6 / 6)
    for row in 0..4 {
        let value = model.lookup_row(table, row).unwrap();
        assert_eq!(value.shape(), &[6, 1]);
        assert!(value.data_as_slice().iter().all(|v| v.abs() <= scale));
    }
    assert_eq!(model.lookup_size(table).unwrap(), 4);
    assert_eq!(model.lookup_dim(table).unwrap(), 6);
}

#[test]
fn test_same_seed_gives_same_init() {
    assert_eq!(all_values(&build_small_model(7)), all_values(&build_small_model(7)));
    assert_ne!(all_values(&build_small_model(7)), all_values(&build_small_model(8)));
}

#[test]
fn test_parameter_counts() {
    let model = build_small_model(1);
    assert_eq!(model.tensor_count(), 3);
    assert_eq!(model.parameter_count(), 12 + 10 + 3);
}

#[test]
fn test_invalid_allocations() {
    let mut model = ParameterCollection::new();
    model.add_parameters("w", &[2, 2]).unwrap();

    assert_err!(model.add_parameters("w", &[2, 2]), GraphError::DuplicateName(name) if name == "w");
    assert_err!(model.add_lookup_parameters("w", 2, 2), GraphError::DuplicateName(_));
    assert_err!(model.add_parameters("v", &[2]), GraphError::InvalidOperation(_));
    assert_err!(model.add_parameters("v", &[0, 2]), GraphError::InvalidOperation(_));
    assert_err!(model.add_lookup_parameters("t", 0, 2), GraphError::InvalidOperation(_));
}

#[test]
fn test_set_parameter_checks_shape() {
    let mut model = ParameterCollection::new();
    let b = model.add_parameters("b", &[2, 1]).unwrap();
    model.set_parameter(b, Tensor::ones(&[2, 1])).unwrap();
    assert_eq!(model.parameter(b).unwrap(), &Tensor::ones(&[2, 1]));
    assert_err!(
        model.set_parameter(b, Tensor::ones(&[1, 2])),
        GraphError::ShapeMismatch { .. }
    );
}

#[test]
fn test_save_and_load_params_round_trip() {
    let saved = build_small_model(42);
    let mut bytes = Vec::new();
    saved.save_params(&mut bytes).unwrap();
    assert_eq!(&bytes[..4], b"PGPR");

    // 用不同的种子分配同样的结构，读入后须与保存时逐位一致
    let mut loaded = build_small_model(43);
    assert_ne!(all_values(&saved), all_values(&loaded));
    loaded.load_params(&mut bytes.as_slice()).unwrap();
    assert_eq!(all_values(&saved), all_values(&loaded));
}

#[test]
fn test_load_params_rejects_mismatched_structure() {
    let saved = build_small_model(42);
    let mut bytes = Vec::new();
    saved.save_params(&mut bytes).unwrap();

    // 1. 形状不同
    {
        let mut model = ParameterCollection::new();
        model.add_parameters("enc_W", &[3, 5]).unwrap();
        model.add_lookup_parameters("words", 5, 2).unwrap();
        model.add_parameters("enc_b", &[3, 1]).unwrap();
        let before = all_values(&model);
        assert_err!(
            model.load_params(&mut bytes.as_slice()),
            GraphError::ShapeMismatch { expected, got, .. } if expected == &[3, 5] && got == &[3, 4]
        );
        assert_eq!(all_values(&model), before);
    }

    // 2. 名称不同
    {
        let mut model = ParameterCollection::new();
        model.add_parameters("dec_W", &[3, 4]).unwrap();
        model.add_lookup_parameters("words", 5, 2).unwrap();
        model.add_parameters("enc_b", &[3, 1]).unwrap();
        assert_err!(
            model.load_params(&mut bytes.as_slice()),
            GraphError::ParameterNotFound(msg) if msg.starts_with("enc_W")
        );
    }

    // 3. 个数不同
    {
        let mut model = ParameterCollection::new();
        model.add_parameters("enc_W", &[3, 4]).unwrap();
        assert_err!(
            model.load_params(&mut bytes.as_slice()),
            GraphError::InvalidOperation(_)
        );
    }

    // 4. 名称长度被篡改：不应按流中的长度分配内存
    {
        let mut corrupted = bytes.clone();
        corrupted[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
        let mut model = build_small_model(1);
        let before = all_values(&model);
        assert_err!(
            model.load_params(&mut corrupted.as_slice()),
            GraphError::ParameterNotFound(msg) if msg.contains("enc_W")
        );
        assert_eq!(all_values(&model), before);
    }

    // 5. 魔数不对 / 数据截断
    {
        let mut model = build_small_model(1);
        assert_err!(
            model.load_params(&mut b"XXXX".as_slice()),
            GraphError::ComputationError(_)
        );
        let truncated = &bytes[..bytes.len() - 3];
        assert_err!(
            model.load_params(&mut &truncated[..]),
            GraphError::ComputationError(_)
        );
    }
}
