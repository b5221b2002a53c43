use super::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_list_builtin_catalog() {
    TestContext::default()
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("/ping"))
        .stdout(predicate::str::contains("/announce"))
        .stdout(predicate::str::contains("restricted [MODERATE]"));
}

#[test]
fn test_list_plugin_directory() {
    let ctx = TestContext::default();
    let dir = ctx
        .plugin_dir(&[
            ("ping.toml", "factory = \"ping\""),
            ("announce.toml", "factory = \"announce\"\nenabled = false"),
        ])
        .unwrap();

    ctx.cmd()
        .args(["list", "--plugin-dir"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("/ping"))
        .stdout(predicate::str::contains("/announce").not());
}

#[test]
fn test_list_uses_configured_directory() {
    let ctx = TestContext::default();
    let dir = ctx
        .plugin_dir(&[("announce.toml", "factory = \"announce\"\n[settings]\npermissions = [\"ADMIN\"]")])
        .unwrap();
    ctx.write_config(&format!("[plugins]\ndirectory = {:?}\n", dir.display().to_string()))
        .unwrap();

    ctx.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("restricted [ADMIN]"))
        .stdout(predicate::str::contains("/ping").not());
}

#[test]
fn test_list_unknown_factory_fails() {
    let ctx = TestContext::default();
    let dir = ctx.plugin_dir(&[("weather.toml", "factory = \"weather\"")]).unwrap();

    ctx.cmd()
        .args(["list", "--plugin-dir"])
        .arg(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown plugin factory"));
}

#[test]
fn test_list_duplicate_command_fails() {
    let ctx = TestContext::default();
    let dir = ctx
        .plugin_dir(&[
            ("a.toml", "factory = \"ping\""),
            ("b.toml", "factory = \"ping\""),
        ])
        .unwrap();

    ctx.cmd()
        .args(["list", "--plugin-dir"])
        .arg(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate command name 'ping'"));
}

#[test]
fn test_malformed_config_fails() {
    let ctx = TestContext::default();
    ctx.write_config("[bot\ntoken = ").unwrap();

    ctx.cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_named_config_must_exist() {
    let ctx = TestContext::default();
    // a default file is present but must not be used in place of the named one
    ctx.write_config("[bot]\nguilds = [\"7\"]\n").unwrap();

    ctx.cmd()
        .args(["--config", "typo.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("typo.toml"));
}

#[test]
fn test_named_config_is_used() {
    let ctx = TestContext::default();
    let dir = ctx.plugin_dir(&[("ping.toml", "factory = \"ping\"")]).unwrap();
    let path = ctx.temp_path().join("bot.toml");
    std::fs::write(
        &path,
        format!("[plugins]\ndirectory = {:?}\n", dir.display().to_string()),
    )
    .unwrap();

    ctx.cmd()
        .arg("--config")
        .arg(&path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("/ping"))
        .stdout(predicate::str::contains("/announce").not());
}
