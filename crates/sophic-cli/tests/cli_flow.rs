use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const PASSPHRASE: &str = "test-passphrase-secure-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sophic"))
}

/// A throwaway home with a config that keeps key derivation cheap.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let config = "[security]\nkdf_memory_kib = 256\nkdf_iterations = 1\nkdf_parallelism = 1\n";
        fs::write(dir.path().join("config.toml"), config).expect("write config");
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    fn command(&self, passphrase: &str) -> Command {
        let mut cmd = Command::new(bin());
        cmd.arg("--config")
            .arg(self.path().join("config.toml"))
            .arg("--data-dir")
            .arg(self.data_dir())
            .env("SOPHIC_PASSPHRASE", passphrase)
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg-config"))
            .env("XDG_DATA_HOME", self.path().join("xdg-data"))
            .env_remove("SOPHIC_CONFIG")
            .env_remove("SOPHIC_DATA_DIR")
            .env_remove("SOPHIC_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(PASSPHRASE)
            .args(args)
            .output()
            .expect("run sophic")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_settings_show_defaults() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["settings", "show", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(value["text_size"], 14);
    assert_eq!(value["auto_save_interval"], 30);
    assert_eq!(value["backup_frequency"], 24);
    assert_eq!(value["theme"], "Light");
    assert_eq!(value["default_category"], "General");
}

#[test]
fn test_settings_set_persists_encrypted() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["settings", "set", "text-size", "16"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("text_size = 16"));

    let output = sandbox.run(&["settings", "set", "theme", "DARK"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = sandbox.run(&["settings", "show"]);
    let shown = stdout(&output);
    assert!(shown.contains("16"));
    assert!(shown.contains("Dark"));

    let blob = fs::read(sandbox.data_dir().join("settings.dat")).expect("settings blob");
    let haystack = String::from_utf8_lossy(&blob);
    assert!(!haystack.contains("Dark"));
    assert!(!haystack.contains("text_size"));
}

#[test]
fn test_settings_set_rejects_out_of_range() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["settings", "set", "text-size", "99"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Rejected text_size"));

    let output = sandbox.run(&["settings", "set", "backup-frequency", "-3"]);
    assert_eq!(output.status.code(), Some(1));

    let output = sandbox.run(&["settings", "set", "auto-save-interval", "soon"]);
    assert_eq!(output.status.code(), Some(4));

    assert!(!sandbox.data_dir().join("settings.dat").exists());
}

#[test]
fn test_settings_reset() {
    let sandbox = Sandbox::new();
    assert!(sandbox
        .run(&["settings", "set", "backup-frequency", "72"])
        .status
        .success());

    let output = sandbox.run(&["settings", "reset"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = sandbox.run(&["settings", "show", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(value["backup_frequency"], 24);
}

#[test]
fn test_wrong_passphrase_falls_back_to_defaults() {
    let sandbox = Sandbox::new();
    assert!(sandbox
        .run(&["settings", "set", "text-size", "40"])
        .status
        .success());

    let output = sandbox
        .command("another-passphrase-456")
        .args(["settings", "show", "--json"])
        .output()
        .expect("run sophic");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(value["text_size"], 14);
}

#[test]
fn test_wrong_passphrase_cannot_overwrite_settings() {
    let sandbox = Sandbox::new();
    assert!(sandbox
        .run(&["settings", "set", "text-size", "40"])
        .status
        .success());
    let blob_path = sandbox.data_dir().join("settings.dat");
    let before = fs::read(&blob_path).expect("settings blob");

    let output = sandbox
        .command("another-passphrase-456")
        .args(["settings", "set", "theme", "Dark"])
        .output()
        .expect("run sophic");
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("settings reset"));
    assert_eq!(fs::read(&blob_path).expect("settings blob"), before);

    let output = sandbox.run(&["settings", "show", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(value["text_size"], 40);
}

#[test]
fn test_weak_passphrase_rejected() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command("short")
        .args(["settings", "show"])
        .output()
        .expect("run sophic");
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_category_add_and_list() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["category", "add", "Valid Category"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = sandbox.run(&["category", "add", "<script>alert(1)</script>"]);
    assert_eq!(output.status.code(), Some(1));

    let output = sandbox.run(&["category", "add", "{{7*7}}"]);
    assert_eq!(output.status.code(), Some(1));

    let output = sandbox.run(&["category", "add", "valid category"]);
    assert!(output.status.success());

    let output = sandbox.run(&["category", "list", "--json"]);
    let names: Vec<String> = serde_json::from_str(&stdout(&output)).expect("json output");
    assert_eq!(names, vec!["Valid Category".to_string()]);
}

#[test]
fn test_sanitize_command() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["sanitize", "--field", "title", "<b>Hello</b>; world"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "Hello world");
}

#[test]
fn test_encrypt_decrypt_round_trip() {
    let sandbox = Sandbox::new();
    let plain = sandbox.path().join("note.txt");
    let sealed = sandbox.path().join("note.bin");
    let opened = sandbox.path().join("note.out");
    fs::write(&plain, "Dear diary: MARKER_42").expect("write plaintext");

    let output = sandbox.run(&[
        "encrypt",
        "--input",
        plain.to_str().unwrap(),
        "--output",
        sealed.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let envelope = fs::read(&sealed).expect("read envelope");
    assert!(!String::from_utf8_lossy(&envelope).contains("MARKER_42"));

    let output = sandbox.run(&[
        "decrypt",
        "--input",
        sealed.to_str().unwrap(),
        "--output",
        opened.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(&opened).expect("read output"),
        "Dear diary: MARKER_42"
    );
}

#[test]
fn test_decrypt_tampered_file_fails() {
    let sandbox = Sandbox::new();
    let plain = sandbox.path().join("note.txt");
    let sealed = sandbox.path().join("note.bin");
    let opened = sandbox.path().join("note.out");
    fs::write(&plain, "secret").expect("write plaintext");

    assert!(sandbox
        .run(&[
            "encrypt",
            "--input",
            plain.to_str().unwrap(),
            "--output",
            sealed.to_str().unwrap(),
        ])
        .status
        .success());

    let mut envelope = fs::read(&sealed).expect("read envelope");
    let last = envelope.len() - 1;
    envelope[last] ^= 0x01;
    fs::write(&sealed, &envelope).expect("write envelope");

    let output = sandbox.run(&[
        "decrypt",
        "--input",
        sealed.to_str().unwrap(),
        "--output",
        opened.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("Could not decrypt"));
    assert!(!opened.exists());
}
