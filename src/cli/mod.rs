use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A mood diary with one file per entry
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Print verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, global = true, default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Writes a new entry
    Add {
        /// Mood marker, usually an emoji
        #[arg(short = 'm', long)]
        mood: String,

        /// Entry title
        #[arg(short = 't', long)]
        title: String,

        /// Entry text
        #[arg(short = 'c', long)]
        content: String,

        /// Photo to attach; repeat for several
        #[arg(short = 'i', long = "image")]
        images: Vec<PathBuf>,

        /// Accent color as #RRGGBB or #RRGGBBAA
        #[arg(long)]
        color: Option<String>,

        /// Accent opacity between 0 and 1
        #[arg(long)]
        opacity: Option<f64>,
    },

    /// Lists entries, newest first
    List,

    /// Shows one entry with its comments
    Show {
        /// Entry id
        id: String,
    },

    /// Appends a comment to an entry
    Comment {
        /// Entry id
        id: String,

        /// Comment text
        text: String,
    },

    /// Deletes an entry
    Delete {
        /// Entry id
        id: String,
    },

    /// Writes a compressed archive of every entry record
    Backup {
        /// Where to write the archive
        output: PathBuf,
    },

    /// Restores entry records from an archive and reloads
    Restore {
        /// Archive created by `backup`
        archive: PathBuf,
    },
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        <CliArgs as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_defaults() {
        let args = CliArgs::parse_from(["moodiary", "list"]);
        assert_eq!(args.command, Command::List);
        assert!(!args.verbose);
        assert_eq!(args.log_format, LOG_FORMAT_TEXT);
    }

    #[test]
    fn test_add_with_all_options() {
        let args = CliArgs::parse_from([
            "moodiary", "add", "-m", "😊", "-t", "Day One", "-c", "Sunny", "-i", "a.jpg", "--image",
            "b.png", "--color", "#FFD60A", "--opacity", "0.5",
        ]);

        match args.command {
            Command::Add {
                mood,
                title,
                content,
                images,
                color,
                opacity,
            } => {
                assert_eq!(mood, "😊");
                assert_eq!(title, "Day One");
                assert_eq!(content, "Sunny");
                assert_eq!(images, [PathBuf::from("a.jpg"), PathBuf::from("b.png")]);
                assert_eq!(color.as_deref(), Some("#FFD60A"));
                assert_eq!(opacity, Some(0.5));
            }
            other => panic!("Expected Add, got {:?}", other),
        }
    }

    #[test]
    fn test_add_requires_title() {
        let result = CliArgs::try_parse_from(["moodiary", "add", "-m", "😊", "-c", "text"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["moodiary", "list", "--verbose", "--log-format", "json"]);
        assert!(args.verbose);
        assert_eq!(args.log_format, LOG_FORMAT_JSON);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result = CliArgs::try_parse_from(["moodiary", "--log-format", "xml", "list"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_comment_positional_arguments() {
        let args = CliArgs::parse_from(["moodiary", "comment", "abc", "nice day"]);
        assert_eq!(
            args.command,
            Command::Comment {
                id: "abc".to_string(),
                text: "nice day".to_string(),
            }
        );
    }
}
