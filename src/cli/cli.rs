use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Browse a path list as a collapsible file tree")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Directory holding `pathtree.yaml` and the saved session
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// File listing one path per line. Defaults to `<root>/paths.txt`
    #[clap(long, short)]
    pub paths: Option<PathBuf>,

    /// Merge chains of single-child directories into one node
    #[clap(long, short)]
    pub flatten: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the visible tree
    Show,
    /// Print the expanded paths
    Expanded,
    /// Print the selected paths
    Selected,
    /// Expand directories, opening their ancestors too
    Expand {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Collapse directories
    Collapse {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Toggle selection of paths
    Select {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Replace the expanded paths
    SetExpanded { paths: Vec<String> },
}

impl Command {
    /// True for commands that change the saved session.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Show | Command::Expanded | Command::Selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn parses_global_options() {
        let cli = Cli::try_parse_from([
            "pathtree", "--root", "/tmp/project", "--flatten", "-l", "debug", "show",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.root, PathBuf::from("/tmp/project"));
        assert!(cli.flatten);
        assert!(cli.paths.is_none());
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.command, Command::Show);
    }

    #[test]
    fn parses_paths_of_mutations() {
        let cli = Cli::try_parse_from(["pathtree", "expand", "src", "a/b/c"])
            .expect("arguments should parse");

        assert_eq!(
            cli.command,
            Command::Expand {
                paths: vec!["src".to_string(), "a/b/c".to_string()]
            }
        );
        assert!(matches!(cli.log_level, LogLevel::Warn));
    }

    #[test]
    fn set_expanded_accepts_no_paths() {
        let cli = Cli::try_parse_from(["pathtree", "set-expanded"]).expect("arguments should parse");
        assert_eq!(cli.command, Command::SetExpanded { paths: vec![] });
    }

    #[test]
    fn expand_requires_a_path() {
        assert!(Cli::try_parse_from(["pathtree", "expand"]).is_err());
    }

    #[rstest]
    #[case(Command::Show, false)]
    #[case(Command::Selected, false)]
    #[case(Command::Collapse { paths: vec!["src".to_string()] }, true)]
    #[case(Command::SetExpanded { paths: vec![] }, true)]
    fn classifies_mutations(#[case] command: Command, #[case] expected: bool) {
        assert_eq!(command.is_mutation(), expected);
    }
}
