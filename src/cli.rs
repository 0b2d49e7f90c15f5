// CLI module for argument parsing and configuration

use crate::config::{default_folder_name, default_sources, UserConfig};
use crate::engine::{Mode, RunConfig, SourceSpec};
use crate::taxonomy::{all_categories, find_category, group_categories, GROUPS};
use chrono::Local;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Fsort - sort files into folders by type
///
/// Scans source folders, moves matching files into one folder per
/// category and parks leftover subfolders in a `Folders` bucket.
#[derive(Parser, Debug, Clone)]
#[command(name = "fsort")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source folders, as PATH or LABEL=PATH
    ///
    /// Defaults to the Desktop, Downloads and Documents folders.
    pub sources: Vec<String>,

    /// Category to organize (repeatable)
    #[arg(short = 'c', long = "category")]
    pub categories: Vec<String>,

    /// Select every category of a group (repeatable)
    ///
    /// Example: --group images --group videos
    #[arg(short = 'g', long = "group")]
    pub groups: Vec<String>,

    /// Select every category
    #[arg(long = "all", action = ArgAction::SetTrue)]
    pub all: bool,

    /// Layout of the organized folder
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<ModeArg>,

    /// Directory the organized folder is created in
    #[arg(short = 'd', long = "dest")]
    pub destination: Option<PathBuf>,

    /// Name of the organized folder
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Descend into subfolders when collecting files
    #[arg(short = 'r', long = "recurse", action = ArgAction::SetTrue)]
    pub recurse: bool,

    /// Only collect direct children, overriding a saved default
    #[arg(long = "no-recurse", action = ArgAction::SetTrue, conflicts_with = "recurse")]
    pub no_recurse: bool,

    /// Number of concurrent workers
    #[arg(short = 'w', long = "workers")]
    pub workers: Option<usize>,

    /// Dry run mode - print the plan without moving anything
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// List categories and groups, then exit
    #[arg(long = "list", action = ArgAction::SetTrue)]
    pub list: bool,

    /// Store the effective options as defaults for later runs
    #[arg(long = "save-defaults", action = ArgAction::SetTrue)]
    pub save_defaults: bool,

    /// Verbose diagnostics on stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,
}

/// Layout options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Merge every source into one tree
    Simple,
    /// Keep a subtree per source, named by its label
    ByOrigin,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Simple => Mode::Simple,
            ModeArg::ByOrigin => Mode::ByOrigin,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Parses `LABEL=PATH` or a bare `PATH`, labelled by its folder name
    pub fn parse_source(raw: &str) -> SourceSpec {
        if let Some((label, path)) = raw.split_once('=') {
            let label = label.trim();
            let nested = label.contains(|c: char| c == '/' || c == '\\');
            if !label.is_empty() && !nested && !path.is_empty() {
                return SourceSpec::new(label, path);
            }
        }

        let path = PathBuf::from(raw);
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| raw.to_string());
        SourceSpec::new(label, path)
    }

    /// Explicitly selected categories, in order and without duplicates
    pub fn selected_categories(&self) -> Vec<String> {
        if self.all {
            return all_categories().iter().map(|c| c.name.to_string()).collect();
        }

        let mut selected: Vec<String> = Vec::new();
        let from_groups = self
            .groups
            .iter()
            .flat_map(|g| group_categories(g))
            .map(|c| c.name.to_string());
        for name in self.categories.iter().cloned().chain(from_groups) {
            if !selected.contains(&name) {
                selected.push(name);
            }
        }
        selected
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        for name in &self.categories {
            if find_category(name).is_none() {
                return Err(format!(
                    "Unknown category: '{}'. Use --list to see the available categories",
                    name
                ));
            }
        }

        for group in &self.groups {
            if !GROUPS.iter().any(|g| g.eq_ignore_ascii_case(group)) {
                return Err(format!(
                    "Unknown group: '{}'. Use --list to see the available groups",
                    group
                ));
            }
        }

        if self.workers == Some(0) {
            return Err("workers must be at least 1".to_string());
        }

        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err("Folder name cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments over the user config
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sources: Vec<SourceSpec>,
    pub categories: Vec<String>,
    pub mode: Mode,
    pub destination_base: PathBuf,
    pub destination_name: String,
    pub recurse: bool,
    pub workers: usize,
    pub dry_run: bool,
    pub list: bool,
    pub save_defaults: bool,
    pub verbose: bool,
}

impl AppConfig {
    pub fn from_args(args: Args, user_config: &UserConfig) -> Self {
        let sources = if args.sources.is_empty() {
            default_sources()
        } else {
            args.sources.iter().map(|s| Args::parse_source(s)).collect()
        };

        let categories = match args.selected_categories() {
            selected if selected.is_empty() => user_config.categories.clone(),
            selected => selected,
        };

        AppConfig {
            sources,
            categories,
            mode: args.mode.map(Mode::from).unwrap_or(user_config.mode),
            destination_base: args
                .destination
                .clone()
                .unwrap_or_else(|| user_config.destination_base_or_default()),
            destination_name: args
                .name
                .clone()
                .or_else(|| user_config.folder_name.clone())
                .unwrap_or_else(|| default_folder_name(Local::now())),
            recurse: !args.no_recurse && (args.recurse || user_config.recurse),
            workers: args.workers.unwrap_or(user_config.workers).max(1),
            dry_run: args.dry_run,
            list: args.list,
            save_defaults: args.save_defaults,
            verbose: args.verbose,
        }
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            destination_base: self.destination_base.clone(),
            destination_name: self.destination_name.clone(),
            mode: self.mode,
            recurse: self.recurse,
            categories: self.categories.clone(),
        }
    }

    /// User config carrying these options as defaults
    ///
    /// The folder name is not stored; each run gets a fresh timestamped
    /// one unless `--name` is given.
    pub fn to_user_config(&self, current: &UserConfig) -> UserConfig {
        UserConfig {
            destination_base: Some(self.destination_base.clone()),
            folder_name: current.folder_name.clone(),
            mode: self.mode,
            workers: self.workers,
            recurse: self.recurse,
            categories: self.categories.clone(),
        }
    }

    pub fn destination_root(&self) -> PathBuf {
        Path::new(&self.destination_base).join(&self.destination_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            sources: vec![],
            categories: vec![],
            groups: vec![],
            all: false,
            mode: None,
            destination: None,
            name: None,
            recurse: false,
            no_recurse: false,
            workers: None,
            dry_run: false,
            list: false,
            save_defaults: false,
            verbose: false,
        }
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_parse_source_with_label() {
            let source = Args::parse_source("Desktop=/home/me/Desktop");
            assert_eq!(source.label, "Desktop");
            assert_eq!(source.path, PathBuf::from("/home/me/Desktop"));
        }

        #[test]
        fn test_parse_source_bare_path_uses_folder_name() {
            let source = Args::parse_source("/home/me/Downloads");
            assert_eq!(source.label, "Downloads");
            assert_eq!(source.path, PathBuf::from("/home/me/Downloads"));
        }

        #[test]
        fn test_parse_source_equals_inside_path() {
            let source = Args::parse_source("/data/a=b");
            assert_eq!(source.path, PathBuf::from("/data/a=b"));
            assert_eq!(source.label, "a=b");
        }

        #[test]
        fn test_selected_categories_merges_groups_without_duplicates() {
            let args = Args {
                categories: vec!["PDF".to_string()],
                groups: vec!["documents".to_string()],
                ..args()
            };
            assert_eq!(
                args.selected_categories(),
                vec!["PDF", "Word", "Text", "Email"]
            );
        }

        #[test]
        fn test_selected_categories_all() {
            let args = Args { all: true, ..args() };
            assert_eq!(args.selected_categories().len(), all_categories().len());
        }

        #[test]
        fn test_validate_unknown_category() {
            let args = Args {
                categories: vec!["Nope".to_string()],
                ..args()
            };
            let result = args.validate();
            assert!(result.unwrap_err().contains("Unknown category"));
        }

        #[test]
        fn test_validate_unknown_group() {
            let args = Args {
                groups: vec!["Nope".to_string()],
                ..args()
            };
            assert!(args.validate().unwrap_err().contains("Unknown group"));
        }

        #[test]
        fn test_validate_zero_workers() {
            let args = Args {
                workers: Some(0),
                ..args()
            };
            assert!(args.validate().is_err());
        }

        #[test]
        fn test_validate_success() {
            let args = Args {
                categories: vec!["PDF".to_string(), "JPEG".to_string()],
                groups: vec!["Images".to_string()],
                workers: Some(2),
                ..args()
            };
            assert!(args.validate().is_ok());
        }

        #[test]
        fn test_mode_arg_conversion() {
            assert_eq!(Mode::from(ModeArg::Simple), Mode::Simple);
            assert_eq!(Mode::from(ModeArg::ByOrigin), Mode::ByOrigin);
        }

        #[test]
        fn test_clap_parses_flags() {
            let args = Args::try_parse_from([
                "fsort",
                "Desk=/tmp/desk",
                "-c",
                "PDF",
                "-m",
                "by-origin",
                "-d",
                "/tmp/out",
                "-n",
                "Sorted",
                "-r",
                "-w",
                "2",
            ])
            .unwrap();

            assert_eq!(args.sources, vec!["Desk=/tmp/desk"]);
            assert_eq!(args.mode, Some(ModeArg::ByOrigin));
            assert_eq!(args.workers, Some(2));
            assert!(args.recurse);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_app_config_cli_overrides_user_config() {
            let user = UserConfig {
                destination_base: Some(PathBuf::from("/saved")),
                folder_name: Some("Saved".to_string()),
                mode: Mode::Simple,
                workers: 8,
                recurse: false,
                categories: vec!["MP3".to_string()],
            };
            let args = Args {
                sources: vec!["Src=/tmp/src".to_string()],
                categories: vec!["PDF".to_string()],
                mode: Some(ModeArg::ByOrigin),
                destination: Some(PathBuf::from("/out")),
                name: Some("Sorted".to_string()),
                workers: Some(2),
                ..args()
            };

            let config = AppConfig::from_args(args, &user);

            assert_eq!(config.sources, vec![SourceSpec::new("Src", "/tmp/src")]);
            assert_eq!(config.categories, vec!["PDF"]);
            assert_eq!(config.mode, Mode::ByOrigin);
            assert_eq!(config.destination_root(), PathBuf::from("/out/Sorted"));
            assert_eq!(config.workers, 2);
        }

        #[test]
        fn test_app_config_falls_back_to_user_config() {
            let user = UserConfig {
                destination_base: Some(PathBuf::from("/saved")),
                folder_name: Some("Saved".to_string()),
                mode: Mode::ByOrigin,
                workers: 8,
                recurse: true,
                categories: vec!["MP3".to_string()],
            };
            let args = Args {
                sources: vec!["/tmp/src".to_string()],
                ..args()
            };

            let config = AppConfig::from_args(args, &user);
            let run = config.run_config();

            assert_eq!(run.categories, vec!["MP3"]);
            assert_eq!(run.mode, Mode::ByOrigin);
            assert!(run.recurse);
            assert_eq!(run.destination_root(), PathBuf::from("/saved/Saved"));
            assert_eq!(config.workers, 8);
        }

        #[test]
        fn test_no_recurse_overrides_saved_default() {
            let user = UserConfig {
                recurse: true,
                ..UserConfig::default()
            };
            let args = Args::try_parse_from(["fsort", "/tmp/src", "--no-recurse"]).unwrap();

            let config = AppConfig::from_args(args, &user);

            assert!(!config.recurse);
            assert!(Args::try_parse_from(["fsort", "-r", "--no-recurse"]).is_err());
        }

        #[test]
        fn test_app_config_timestamped_name_by_default() {
            let config = AppConfig::from_args(
                Args {
                    sources: vec!["/tmp/src".to_string()],
                    ..args()
                },
                &UserConfig::default(),
            );
            assert!(config.destination_name.starts_with("Organized_"));
        }

        #[test]
        fn test_to_user_config_keeps_folder_name_unset() {
            let config = AppConfig::from_args(
                Args {
                    sources: vec!["/tmp/src".to_string()],
                    categories: vec!["PDF".to_string()],
                    recurse: true,
                    ..args()
                },
                &UserConfig::default(),
            );

            let saved = config.to_user_config(&UserConfig::default());

            assert!(saved.folder_name.is_none());
            assert_eq!(saved.categories, vec!["PDF"]);
            assert!(saved.recurse);
        }
    }
}
