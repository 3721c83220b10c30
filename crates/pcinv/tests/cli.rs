use assert_cmd::Command;
use predicates::prelude::*;

/// Binary isolated from the caller's environment and configuration files
fn pcinv(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("pcinv").unwrap();
    cmd.current_dir(dir)
        .env_remove("PC_IP_ADDR")
        .env_remove("PC_USERNAME")
        .env_remove("PC_PASSWORD")
        .env_remove("PCINV_CONFIG")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir);
    cmd
}

#[test]
fn test_env_prints_credentials() {
    let temp_dir = tempfile::tempdir().unwrap();

    pcinv(temp_dir.path())
        .args(["--env", "-i", "10.0.0.10", "-u", "admin", "-p", "secret"])
        .assert()
        .success()
        .stdout("PC_IP_ADDR=10.0.0.10\nPC_USERNAME=admin\nPC_PASSWORD=secret\n");
}

#[test]
fn test_env_vars_and_flags_layer() {
    let temp_dir = tempfile::tempdir().unwrap();

    pcinv(temp_dir.path())
        .env("PC_IP_ADDR", "10.0.0.20")
        .env("PC_USERNAME", "env-user")
        .env("PC_PASSWORD", "env-pass")
        .args(["--env", "--username", "cli-user"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PC_IP_ADDR=10.0.0.20"))
        .stdout(predicate::str::contains("PC_USERNAME=cli-user"))
        .stdout(predicate::str::contains("PC_PASSWORD=env-pass"));
}

#[test]
fn test_ini_file_is_lowest_layer() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("prism_central.ini"),
        "[prism_central]\nip_addr = 10.0.0.30\nusername = ini-user\npassword = ini-pass\n",
    )
    .unwrap();

    pcinv(temp_dir.path())
        .env("PC_PASSWORD", "env-pass")
        .arg("--env")
        .assert()
        .success()
        .stdout("PC_IP_ADDR=10.0.0.30\nPC_USERNAME=ini-user\nPC_PASSWORD=env-pass\n");
}

#[test]
fn test_ini_with_python_group_variables() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("prism_central.ini"),
        "[prism_central]\nip_addr = 10.0.0.30\nusername = u\npassword = p\n\
         cache_max_age = -1\n\
         group_variables = {'ansible_user': 'root', 'ansible_become': True}\n",
    )
    .unwrap();

    pcinv(temp_dir.path())
        .arg("--env")
        .assert()
        .success()
        .stdout("PC_IP_ADDR=10.0.0.30\nPC_USERNAME=u\nPC_PASSWORD=p\n");
}

#[test]
fn test_missing_address_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    pcinv(temp_dir.path())
        .args(["-u", "admin", "-p", "secret"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ip_addr"))
        .stderr(predicate::str::contains("PC_IP_ADDR"));
}

#[test]
fn test_missing_password_fails_before_env() {
    let temp_dir = tempfile::tempdir().unwrap();

    pcinv(temp_dir.path())
        .args(["--env", "-i", "10.0.0.10", "-u", "admin"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("password"));
}

#[test]
fn test_force_cache_without_cache_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    pcinv(temp_dir.path())
        .args(["--force-cache", "-i", "10.0.0.10", "-u", "admin", "-p", "secret"])
        .arg("--cache-path")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--force-cache"));

    assert!(!temp_dir.path().join("ansible-prism_central.cache").exists());
}

#[test]
fn test_force_cache_serves_cached_clusters() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("ansible-prism_central.cache"),
        r#"{"data": {"clusters": {"entities": [{"name": "c1"}]}}, "inventory": {}}"#,
    )
    .unwrap();

    pcinv(temp_dir.path())
        .args(["--clusters", "--force-cache", "-i", "10.0.0.10", "-u", "a", "-p", "b"])
        .assert()
        .success()
        .stdout("{\"clusters\":{\"entities\":[{\"name\":\"c1\"}]}}\n");
}

#[test]
fn test_force_cache_pretty_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("ansible-prism_central.cache"),
        r#"{"data": {"nodes": {"entities": []}}, "inventory": {}}"#,
    )
    .unwrap();

    pcinv(temp_dir.path())
        .args(["--nodes", "--force-cache", "--pretty", "-i", "x", "-u", "a", "-p", "b"])
        .assert()
        .success()
        .stdout("{\n  \"nodes\": {\n    \"entities\": []\n  }\n}\n");
}

#[test]
fn test_conflicting_commands_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();

    pcinv(temp_dir.path())
        .args(["--vms", "--all"])
        .assert()
        .failure();
}

#[test]
fn test_explicit_missing_config_file_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    pcinv(temp_dir.path())
        .args(["--config", "absent.ini", "--env"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.ini"));
}
