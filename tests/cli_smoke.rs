mod support;

use predicates::str::contains;

#[test]
fn taskflow_help_works() {
    support::taskflow_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Task management"))
        .stdout(contains("calendar"))
        .stdout(contains("analytics"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["task", "time", "attach", "analytics", "calendar"];

    for cmd in subcommands {
        support::taskflow_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn version_flag_names_the_binary() {
    support::taskflow_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("taskflow"));
}
