//! End-to-end tests for the `merge` and `defaults` commands.

mod common;

use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_merge_replaces_existing_value() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["merge", "pre -Dx.y=5 post", "x.y", "7"])
        .assert()
        .success()
        .stdout("pre -Dx.y=7 post\n");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_merge_appends_to_empty_string() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["merge", "", "x.y", "10"])
        .assert()
        .success()
        .stdout("-Dx.y=10\n");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_merge_check_fails_when_string_changes() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["merge", "--check", "-Xmx1g", "x.y", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would change"));

    fixture
        .command()
        .args(["merge", "--check", "-Xmx1g -Dx.y=10", "x.y", "10"])
        .assert()
        .success();
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_merge_non_numeric_value_needs_token_syntax() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .args(["merge", "-Dmode=slow", "mode", "fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--value-syntax token"));

    fixture
        .command()
        .args(["merge", "--value-syntax", "token", "-Dmode=slow", "mode", "fast"])
        .assert()
        .success()
        .stdout("-Dmode=fast\n");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_defaults_prints_builtin_tuning() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("defaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("maxConnections"))
        .stdout(predicate::str::contains("com.ibm.mq.cfg.TCP.Connect_Timeout"))
        .stdout(predicate::str::contains("Built In WebSphere MQ Resource Adapter"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_defaults_output_is_a_valid_tuning_file() {
    let fixture = TestFixture::new().with_topology(topologies::CELL);

    fixture
        .command()
        .args(["defaults", "--output"])
        .arg(fixture.tuning_path())
        .assert()
        .success();

    fixture
        .command()
        .args(["apply", "--dry-run", "--topology"])
        .arg(fixture.topology_path())
        .arg("--tuning")
        .arg(fixture.tuning_path())
        .assert()
        .success();
}
