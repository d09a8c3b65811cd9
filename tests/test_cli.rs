use std::fs;
use std::process::Command;

const CORPUS: &str = "床 前 明 月 光\t疑 是 地 上 霜\t举 头 望 明 月\t低 头 思 故 乡\n";

#[test]
fn test_cli_train_then_generate() {
    let dir = std::env::temp_dir().join(format!("poem_gen_cli_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let data = dir.join("poems.txt");
    let model = dir.join("tiny.model");
    fs::write(&data, CORPUS).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_poem_gen"))
        .args([
            "train",
            "--training-data",
            data.to_str().unwrap(),
            "--model",
            model.to_str().unwrap(),
            "--max-epoch",
            "1",
            "--word-embedding-dim",
            "4",
            "--enc-stacked-layer-num",
            "1",
            "--enc-h-dim",
            "4",
            "--dec-stacked-layer-num",
            "1",
            "--dec-h-dim",
            "4",
        ])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(model.exists());

    let output = Command::new(env!("CARGO_BIN_EXE_poem_gen"))
        .args([
            "generate",
            "--first-seq",
            "床前明月光",
            "--model",
            model.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "床前明月光");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_cli_generate_with_missing_model_fails() {
    let status = Command::new(env!("CARGO_BIN_EXE_poem_gen"))
        .args(["generate", "--first-seq", "床", "--model", "/nonexistent/x.model"])
        .status()
        .unwrap();
    assert!(!status.success());
}
