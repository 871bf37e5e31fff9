//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Chained project templates with safe re-expansion",
    long_about = "Stencil expands ordered chains of project templates into a \
                  project directory. Pre-existing files are detected in a dry \
                  run first, and are only overwritten after you agree.",
    after_help = "EXAMPLES:\n\
        \x20 stencil -p ~/work/my-lib create --package\n\
        \x20 stencil -p ~/work/my-lib add solver --cpp\n\
        \x20 stencil -p ~/work/my-lib add tool --app --backup\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project skeleton.
    #[command(
        visible_alias = "new",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 stencil -p my-module create\n\
            \x20 stencil -p my-lib create --package -d \"Fast solvers\" -l BSD\n\
            \x20 stencil -p my-lib create -T package-base -T ./my-template"
    )]
    Create(CreateArgs),

    /// Add an application or module to an existing package project.
    #[command(
        about = "Add an app or module to the project",
        after_help = "EXAMPLES:\n\
            \x20 stencil add mycli --app\n\
            \x20 stencil add mycli --group\n\
            \x20 stencil add tools --py --package\n\
            \x20 stencil add solver --cpp --overwrite"
    )]
    Add(AddArgs),

    /// Convert a module project into a package project.
    #[command(
        about = "Convert a module project to a package project",
        after_help = "EXAMPLES:\n\
            \x20 stencil convert\n\
            \x20 stencil convert --backup"
    )]
    Convert(ConvertArgs),

    /// List the named templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 stencil list\n\
            \x20 stencil list --format names"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Stencil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get templates.dir\n\
            \x20 stencil config list\n\
            \x20 stencil config init"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Flags that decide what happens to files that already exist.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct OverwriteArgs {
    /// Overwrite pre-existing files without asking and without backup.
    #[arg(long = "overwrite", help = "Overwrite pre-existing files (no backup)")]
    pub overwrite: bool,

    /// Keep `.bak` copies of pre-existing files before overwriting them.
    #[arg(
        long = "backup",
        help = "Make .bak backups of pre-existing files before overwriting"
    )]
    pub backup: bool,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for `stencil create`.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Create a package project (`<package>/__init__.py`) instead of a
    /// module project (`<package>.py`).
    #[arg(long = "package", help = "Create a package project instead of a module project")]
    pub package: bool,

    /// Ordered template chain, overriding the default one.
    #[arg(
        short = 'T',
        long = "template",
        value_name = "TEMPLATE",
        help = "Template to expand (repeat to build a chain)"
    )]
    pub templates: Vec<String>,

    /// One-line project description.
    #[arg(
        short = 'd',
        long = "description",
        value_name = "TEXT",
        default_value = "<Enter a one-sentence description of this project here.>",
        help = "Short description of the project"
    )]
    pub description: String,

    /// License, matched by prefix against the known licenses.
    #[arg(
        short = 'l',
        long = "license",
        value_name = "LICENSE",
        default_value = "MIT",
        help = "License (prefix of MIT, BSD, ISC, Apache, GNU, Not open source)"
    )]
    pub license: String,

    /// Allow creating a project inside another project.
    #[arg(short = 'n', long = "allow-nesting", help = "Allow nesting projects")]
    pub allow_nesting: bool,
}

// ── add ───────────────────────────────────────────────────────────────────────

/// Arguments for `stencil add`.
#[derive(Debug, Args)]
#[command(group(
    clap::ArgGroup::new("kind")
        .required(true)
        .multiple(false)
        .args(["app", "group", "py", "package", "f2py", "cpp"])
))]
pub struct AddArgs {
    /// Name of the application or module.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Add a command line application.
    #[arg(long = "app", help = "Add a CLI application")]
    pub app: bool,

    /// Add a command line application with sub-commands.
    #[arg(long = "group", help = "Add a CLI application with sub-commands")]
    pub group: bool,

    /// Add a Python module (`<name>.py`).
    #[arg(long = "py", help = "Add a Python module")]
    pub py: bool,

    /// Add a Python module with package structure (`<name>/__init__.py`).
    #[arg(long = "package", help = "Add a Python module as a package")]
    pub package: bool,

    /// Add a Fortran binary extension module.
    #[arg(long = "f2py", help = "Add an f2py (Fortran) module")]
    pub f2py: bool,

    /// Add a C++ binary extension module.
    #[arg(long = "cpp", help = "Add a C++ module")]
    pub cpp: bool,

    /// Ordered template chain, overriding the default one.
    #[arg(
        short = 'T',
        long = "template",
        value_name = "TEMPLATE",
        help = "Template to expand (repeat to build a chain)"
    )]
    pub templates: Vec<String>,

    #[command(flatten)]
    pub overwrite: OverwriteArgs,
}

/// What `stencil add` adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddKind {
    App,
    AppGroup,
    Module,
    ModulePackage,
    F2py,
    Cpp,
}

impl AddArgs {
    /// The kind selected by the mutually exclusive flags.
    pub fn kind(&self) -> AddKind {
        if self.group {
            AddKind::AppGroup
        } else if self.app {
            AddKind::App
        } else if self.package {
            AddKind::ModulePackage
        } else if self.py {
            AddKind::Module
        } else if self.f2py {
            AddKind::F2py
        } else {
            AddKind::Cpp
        }
    }
}

// ── convert ───────────────────────────────────────────────────────────────────

/// Arguments for `stencil convert`.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub overwrite: OverwriteArgs,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `stencil list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Templates with their declared parameters.
    Table,
    /// One template name per line.
    Names,
    /// JSON object keyed by template name.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `templates.dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
    /// Write a configuration file with the built-in defaults.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────
