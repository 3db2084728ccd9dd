#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for command dispatch through [`Runner`].

mod common;

use common::{RecordingLauncher, vars};
use drone_plugin_helper::Error;
use drone_plugin_helper::names::Initialisms;
use drone_plugin_helper::runner::{Command, Completion, Runner, Settings};
use drone_plugin_helper::{command_set, record};

record! {
    #[derive(Debug, Default)]
    struct Global {
        command: Command,
        verbose: bool,
        kube_context: String,
    }
}

record! {
    #[derive(Debug, Default)]
    struct Deploy {
        global: Global,
        replicas: Option<u16>,
        wait: bool = "--wait,no",
        release: String = ",positional",
    }
}

record! {
    #[derive(Debug, Default)]
    struct ReleaseOnly {
        global: Global,
        release: String = ",positional",
    }
}

command_set! {
    #[derive(Debug)]
    enum Tool {
        "deploy" => Deploy(Deploy),
        "release show" => Show(ReleaseOnly),
        "release delete" => Delete(ReleaseOnly),
    }
}

fn initialisms() -> &'static Initialisms {
    Initialisms::common().unwrap()
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn single_word_command_is_dispatched() {
    let launcher = RecordingLauncher::exiting_with(0);
    let runner = Runner::new(Settings::default(), initialisms(), &launcher);

    let outcome = runner
        .exec_command::<Tool>(
            "tool",
            &vars(&[
                ("Command", "deploy"),
                ("Replicas", "0"),
                ("Release", "web"),
                ("KubeContext", "prod"),
            ]),
        )
        .unwrap();

    assert_eq!(outcome.completion, Completion::Exited(0));
    let seen = launcher.invocations();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].program, "tool");
    assert_eq!(
        seen[0].args,
        [
            "deploy",
            "--kube-context",
            "prod",
            "--replicas",
            "0",
            "--no-wait",
            "web"
        ]
    );
}

#[test]
fn subcommand_selects_its_own_record() {
    let launcher = RecordingLauncher::exiting_with(0);
    let runner = Runner::new(Settings::default(), initialisms(), &launcher);

    runner
        .exec_command::<Tool>(
            "tool",
            &vars(&[
                ("Command", "release"),
                ("Subcommand", "delete"),
                ("Release", "web"),
                ("Verbose", "on"),
            ]),
        )
        .unwrap();

    assert_eq!(
        launcher.invocations()[0].args,
        ["release", "delete", "--verbose", "web"]
    );
}

#[test]
fn missing_subcommand_is_unknown() {
    let launcher = RecordingLauncher::exiting_with(0);
    let runner = Runner::new(Settings::default(), initialisms(), &launcher);

    let err = runner
        .exec_command::<Tool>("tool", &vars(&[("Command", "release")]))
        .unwrap_err();

    assert!(matches!(err, Error::UnknownCommand(ref key) if key == "release"));
    assert!(launcher.invocations().is_empty());
}

// ---------------------------------------------------------------------------
// Exit codes and strictness
// ---------------------------------------------------------------------------

#[test]
fn child_exit_code_is_relayed() {
    let launcher = RecordingLauncher::exiting_with(4);
    let runner = Runner::new(Settings::default(), initialisms(), &launcher);

    let outcome = runner
        .exec_command::<Tool>(
            "tool",
            &vars(&[("Command", "release"), ("Subcommand", "show")]),
        )
        .unwrap();

    assert_eq!(outcome.completion, Completion::Exited(4));
    assert!(!outcome.success());
}

#[test]
fn strict_mode_lists_every_unused_parameter() {
    let launcher = RecordingLauncher::exiting_with(0);
    let settings = Settings {
        strict: true,
        ..Settings::default()
    };
    let runner = Runner::new(settings, initialisms(), &launcher);

    let err = runner
        .exec_command::<Tool>(
            "tool",
            &vars(&[
                ("Command", "deploy"),
                ("Values", "a.yaml"),
                ("Atomic", "true"),
            ]),
        )
        .unwrap_err();

    assert!(matches!(err, Error::Unused(ref keys) if keys == &["Atomic", "Values"]));
    assert!(err.to_string().contains("Atomic, Values"));
    assert!(launcher.invocations().is_empty());
}

#[test]
fn dry_run_records_nothing() {
    let launcher = RecordingLauncher::exiting_with(0);
    let settings = Settings {
        dry_run: true,
        ..Settings::default()
    };
    let runner = Runner::new(settings, initialisms(), &launcher);

    let outcome = runner
        .exec_command::<Tool>("tool", &vars(&[("Command", "deploy"), ("Wait", "yes")]))
        .unwrap();

    assert_eq!(outcome.completion, Completion::DryRun);
    assert_eq!(outcome.invocation.args, ["deploy", "--wait"]);
    assert!(launcher.invocations().is_empty());
}
