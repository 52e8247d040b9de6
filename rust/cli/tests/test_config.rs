use brag_cli::run;
use serial_test::serial;
use std::io::Write;

const VARS: &[&str] = &[
    "BRAG_CONFIG",
    "BRAG_SEED",
    "BRAG_CARDS",
    "BRAG_TURN_SECS",
    "BRAG_TRUMP",
];

struct TempEnvVar {
    key: &'static str,
    previous: Option<String>,
}

impl TempEnvVar {
    fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        unsafe { std::env::set_var(key, value) };
        Self { key, previous }
    }
}

impl Drop for TempEnvVar {
    fn drop(&mut self) {
        match &self.previous {
            Some(prev) => unsafe { std::env::set_var(self.key, prev) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}

fn clear_env() -> Vec<TempEnvVar> {
    VARS.iter()
        .map(|&key| {
            let guard = TempEnvVar {
                key,
                previous: std::env::var(key).ok(),
            };
            unsafe { std::env::remove_var(key) };
            guard
        })
        .collect()
}

fn cfg_json() -> serde_json::Value {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["brag", "cfg"], &mut out, &mut err);
    assert_eq!(code, 0, "stderr: {}", String::from_utf8_lossy(&err));
    serde_json::from_slice(&out).expect("cfg output should be valid JSON")
}

#[test]
#[serial]
fn cfg_shows_default_settings() {
    let _env = clear_env();
    let v = cfg_json();
    assert_eq!(v["cards"]["value"], 3);
    assert_eq!(v["cards"]["source"], "default");
    assert_eq!(v["turn_secs"]["value"], 30);
    assert_eq!(v["trump"]["value"], "none");
    assert_eq!(v["seed"]["value"], serde_json::Value::Null);
    assert_eq!(v["boot_amount"]["value"], 10);
}

#[test]
#[serial]
fn env_overrides_are_reported_as_env() {
    let _env = clear_env();
    let _cards = TempEnvVar::set("BRAG_CARDS", "4");
    let _seed = TempEnvVar::set("BRAG_SEED", "77");
    let _trump = TempEnvVar::set("BRAG_TRUMP", "q");
    let v = cfg_json();
    assert_eq!(v["cards"]["value"], 4);
    assert_eq!(v["cards"]["source"], "env");
    assert_eq!(v["seed"]["value"], 77);
    assert_eq!(v["trump"]["value"], "Q");
    assert_eq!(v["trump"]["source"], "env");
    assert_eq!(v["turn_secs"]["source"], "default");
}

#[test]
#[serial]
fn file_values_apply_and_env_wins_over_file() {
    let _env = clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "cards = 5\nturn_secs = 12\ntrump = \"7\"\ninitial_coins = 500\npot_limit = 300"
    )
    .unwrap();
    let _path = TempEnvVar::set("BRAG_CONFIG", file.path().to_str().unwrap());
    let _secs = TempEnvVar::set("BRAG_TURN_SECS", "8");

    let v = cfg_json();
    assert_eq!(v["cards"]["value"], 5);
    assert_eq!(v["cards"]["source"], "file");
    assert_eq!(v["trump"]["value"], "7");
    assert_eq!(v["initial_coins"]["value"], 500);
    assert_eq!(v["pot_limit"]["value"], 300);
    assert_eq!(v["pot_limit"]["source"], "file");
    assert_eq!(v["turn_secs"]["value"], 8);
    assert_eq!(v["turn_secs"]["source"], "env");
}

#[test]
#[serial]
fn invalid_env_values_fail_with_exit_code_2() {
    let _env = clear_env();
    let _seed = TempEnvVar::set("BRAG_SEED", "not-a-number");
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(["brag", "cfg"], &mut out, &mut err), 2);
    assert!(String::from_utf8_lossy(&err).contains("Invalid seed"));
}

#[test]
#[serial]
fn out_of_range_card_count_is_rejected() {
    let _env = clear_env();
    let _cards = TempEnvVar::set("BRAG_CARDS", "10");
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(["brag", "deal", "--seed", "1"], &mut out, &mut err), 2);
    assert!(String::from_utf8_lossy(&err).contains("Invalid configuration"));
}

#[test]
#[serial]
fn missing_config_file_is_an_error() {
    let _env = clear_env();
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let _path = TempEnvVar::set("BRAG_CONFIG", missing.to_str().unwrap());
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(["brag", "cfg"], &mut out, &mut err), 2);
    assert!(String::from_utf8_lossy(&err).contains("cannot read config file"));
}

#[test]
#[serial]
fn configured_card_count_reaches_the_deal() {
    let _env = clear_env();
    let _cards = TempEnvVar::set("BRAG_CARDS", "5");
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(["brag", "deal", "--seed", "3"], &mut out, &mut err), 0);
    let text = String::from_utf8_lossy(&out);
    let p0 = text.lines().find(|l| l.starts_with("P0:")).unwrap();
    // "P0: c1 c2 c3 c4 c5  description"
    let hand = p0["P0: ".len()..].split("  ").next().unwrap();
    assert_eq!(hand.split(' ').count(), 5);
}
