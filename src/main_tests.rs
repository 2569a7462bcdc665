// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - argument parsing

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::super::{Cli, Command};

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "gcdns",
            "--project",
            "my-project",
            "apply",
            "--config",
            "record.yaml",
            "--state",
            "state.yaml",
        ])
        .unwrap();

        assert_eq!(cli.project.as_deref(), Some("my-project"));
        assert!(!cli.print_metrics);
        match cli.command {
            Command::Apply { config, state } => {
                assert_eq!(config.to_str(), Some("record.yaml"));
                assert_eq!(state.to_str(), Some("state.yaml"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_sweep_prefix_defaults_to_test_prefix() {
        let cli = Cli::try_parse_from(["gcdns", "sweep", "--zone", "prod-zone"]).unwrap();
        match cli.command {
            Command::Sweep { zone, prefix } => {
                assert_eq!(zone, "prod-zone");
                assert_eq!(prefix, "tf-test");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_import_requires_state() {
        assert!(Cli::try_parse_from(["gcdns", "import", "zone/www.example.com./A"]).is_err());
    }

    #[test]
    fn test_clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
