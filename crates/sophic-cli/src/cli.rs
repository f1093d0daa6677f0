use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sophic_core::sanitize::FieldKind;
use sophic_core::VERSION;

/// Sophic - encrypted settings and input hygiene for the Sophic journal
#[derive(Parser)]
#[command(name = "sophic")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "SOPHIC_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the encrypted settings and category list
    #[arg(long, global = true, env = "SOPHIC_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or change application settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Manage journal categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Print the sanitized form of TEXT for a field
    Sanitize(SanitizeArgs),

    /// Encrypt a file with the configured passphrase
    Encrypt(CryptArgs),

    /// Decrypt a file produced by `sophic encrypt`
    Decrypt(CryptArgs),
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a single setting
    Set {
        #[arg(value_enum)]
        field: SettingField,

        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },

    /// Restore default settings
    Reset,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Add a category after validation
    Add {
        #[arg(value_name = "NAME", allow_hyphen_values = true)]
        name: String,
    },

    /// List stored categories
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for the `sanitize` command
#[derive(Args)]
pub struct SanitizeArgs {
    /// Field whose rules apply
    #[arg(long, value_enum, default_value_t = FieldArg::Title)]
    pub field: FieldArg,

    #[arg(value_name = "TEXT", allow_hyphen_values = true)]
    pub text: String,
}

/// Arguments for the `encrypt` and `decrypt` commands
#[derive(Args)]
pub struct CryptArgs {
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SettingField {
    TextSize,
    AutoSaveInterval,
    BackupFrequency,
    Theme,
    DefaultCategory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Title,
    Content,
    Tags,
    Category,
    Mood,
    Theme,
}

impl From<FieldArg> for FieldKind {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => FieldKind::Title,
            FieldArg::Content => FieldKind::Content,
            FieldArg::Tags => FieldKind::Tags,
            FieldArg::Category => FieldKind::Category,
            FieldArg::Mood => FieldKind::Mood,
            FieldArg::Theme => FieldKind::Theme,
        }
    }
}
