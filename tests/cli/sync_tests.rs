use super::common::TestContext;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, guilds: &[&str]) -> String {
    format!(
        "[bot]\ntoken = \"secret\"\napplication_id = \"42\"\napi_base_url = \"{}\"\nguilds = {:?}\n\n[permissions]\nMODERATE = [\"R1\"]\n",
        server.uri(),
        guilds
    )
}

async fn mount_guild(server: &MockServer, guild: &str) {
    let commands = json!([
        {"id": "900", "application_id": "42", "name": "announce", "guild_id": guild},
        {"id": "901", "application_id": "42", "name": "ping", "guild_id": guild},
    ]);
    let base = format!("/applications/42/guilds/{}/commands", guild);

    Mock::given(method("PUT"))
        .and(path(base.as_str()))
        .and(header("Authorization", "Bot secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(commands.clone()))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(base.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(commands))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("{}/permissions", base).as_str()))
        .and(body_json(json!([
            {"id": "900", "permissions": [{"id": "R1", "type": 1, "permission": true}]}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(server)
        .await;
}

/// Run the binary off the async runtime so the mock server keeps serving
async fn run(mut cmd: assert_cmd::Command) -> assert_cmd::assert::Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .expect("command thread panicked")
        .expect("failed to run slashdeck");
    output.assert()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_registers_configured_guilds() {
    let server = MockServer::start().await;
    mount_guild(&server, "7").await;
    mount_guild(&server, "8").await;

    let ctx = TestContext::default();
    ctx.write_config(&config_for(&server, &["7", "8"])).unwrap();

    let mut cmd = ctx.cmd();
    cmd.arg("sync");
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Registering 2 commands with 2 guild(s)"))
        .stdout(predicate::str::contains("guild 7: 2 commands registered, 1 permission grants"))
        .stdout(predicate::str::contains("guild 8:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_guild_flag_overrides_config() {
    let server = MockServer::start().await;
    mount_guild(&server, "8").await;

    let ctx = TestContext::default();
    ctx.write_config(&config_for(&server, &["7"])).unwrap();

    let mut cmd = ctx.cmd();
    cmd.args(["sync", "--guild", "8"]);
    run(cmd).await.success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_reports_failed_guild() {
    let server = MockServer::start().await;
    mount_guild(&server, "7").await;
    Mock::given(method("PUT"))
        .and(path("/applications/42/guilds/9/commands"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "Missing Access", "code": 50001})),
        )
        .mount(&server)
        .await;

    let ctx = TestContext::default();
    ctx.write_config(&config_for(&server, &["7", "9"])).unwrap();

    let mut cmd = ctx.cmd();
    cmd.arg("sync");
    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("Missing Access"))
        .stderr(predicate::str::contains("1 of 2 guild registrations failed"));
}

#[test]
fn test_sync_without_guilds_fails() {
    let ctx = TestContext::default();
    ctx.write_config("[bot]\ntoken = \"secret\"\napplication_id = \"42\"\n")
        .unwrap();

    ctx.cmd()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no guilds given"));
}

#[test]
fn test_sync_without_token_fails() {
    let ctx = TestContext::default();
    ctx.write_config("[bot]\napplication_id = \"42\"\nguilds = [\"7\"]\n")
        .unwrap();

    ctx.cmd()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bot token is not set"));
}
