//! Command line argument parsing and validation.

use crate::bundler::{DEFAULT_IDENTIFIER_PREFIX, PackagingMode, TargetOs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build-support tools for the Toucan toolchain
#[derive(Parser, Debug)]
#[command(
    name = "toucan-build-tools",
    version,
    about = "Build-support tools for the Toucan toolchain",
    long_about = "Build-support tools for the Toucan toolchain.

Usage:
  toucan-build-tools make-app --target-name demo --target-os mac --out-dir out/Debug
  toucan-build-tools cp gen/shaders out/Debug/shaders
  toucan-build-tools mesh-literals --input stanford-dragon.json > dragon.t"
)]
pub struct Args {
    /// Command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Show debug output for every file operation
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Assemble a macOS/iOS application bundle from build artifacts
    MakeApp {
        /// Name of the executable; the bundle is named `<target-name>.app`
        #[arg(long)]
        target_name: String,

        /// Target operating system: mac, ios, or any other identifier for a flat bundle
        #[arg(long, value_parser = parse_target_os)]
        target_os: TargetOs,

        /// Directory holding the build artifacts; the bundle is created here
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Provisioning profile embedded into ios bundles
        #[arg(long, value_name = "PATH")]
        mobile_provision: Option<PathBuf>,

        /// Developer team identifier used in the signing entitlements
        #[arg(long, env = "APPLE_TEAM_ID", requires = "codesign_identity")]
        team_identifier: Option<String>,

        /// Code-signing identity; enables signing of ios bundles
        #[arg(long, env = "APPLE_SIGNING_IDENTITY", requires = "team_identifier")]
        codesign_identity: Option<String>,

        /// Code-signing executable
        #[arg(long, value_name = "PATH", default_value = "codesign")]
        codesign_tool: PathBuf,

        /// How shared libraries are placed into the bundle
        #[arg(long, value_enum, default_value_t = PackagingMode::Copy)]
        packaging_mode: PackagingMode,

        /// Reverse-domain prefix of the bundle identifier
        #[arg(long, default_value = DEFAULT_IDENTIFIER_PREFIX)]
        identifier_prefix: String,
    },

    /// Replace DST with a copy of SRC (file or directory)
    Cp {
        /// File or directory to copy
        src: PathBuf,

        /// Destination; removed first if it exists
        dst: PathBuf,
    },

    /// Convert mesh JSON into triangle and vertex array literals
    MeshLiterals {
        /// Mesh JSON file
        #[arg(long, default_value = crate::mesh::DEFAULT_INPUT)]
        input: PathBuf,

        /// Prefix of the generated variable names
        #[arg(long, default_value = crate::mesh::DEFAULT_NAME)]
        name: String,

        /// Write the literals here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_target_os(value: &str) -> Result<TargetOs, String> {
    value.parse().map_err(|e: crate::bundler::Error| e.to_string())
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::MakeApp { target_name, .. } if target_name.is_empty() => {
                Err("--target-name must not be empty".to_string())
            }
            Command::MeshLiterals { name, .. } if name.is_empty() => {
                Err("--name must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl Command {
    /// Name of the command as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Command::MakeApp { .. } => "make-app",
            Command::Cp { .. } => "cp",
            Command::MeshLiterals { .. } => "mesh-literals",
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Same settings with all messages sent to stderr, leaving stdout for
    /// command output
    pub fn on_stderr(&self) -> Self {
        Self {
            output: self.output.on_stderr(),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message (only shown with --verbose)
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(args.verbose, args.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_make_app_defaults() {
        let args = Args::try_parse_from([
            "toucan-build-tools",
            "make-app",
            "--target-name",
            "demo",
            "--target-os",
            "mac",
        ])
        .unwrap();
        let Command::MakeApp {
            target_os,
            out_dir,
            packaging_mode,
            codesign_tool,
            identifier_prefix,
            ..
        } = &args.command
        else {
            panic!("expected make-app");
        };
        assert_eq!(*target_os, TargetOs::Mac);
        assert!(out_dir.is_none());
        assert_eq!(*packaging_mode, PackagingMode::Copy);
        assert_eq!(codesign_tool, &PathBuf::from("codesign"));
        assert_eq!(identifier_prefix, DEFAULT_IDENTIFIER_PREFIX);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn empty_target_name_fails_validation() {
        let args = Args::try_parse_from([
            "toucan-build-tools",
            "make-app",
            "--target-name",
            "",
            "--target-os",
            "ios",
        ])
        .unwrap();
        assert!(args.validate().unwrap_err().contains("--target-name"));
    }

    #[test]
    fn missing_target_name_is_a_usage_error() {
        assert!(
            Args::try_parse_from(["toucan-build-tools", "make-app", "--target-os", "mac"]).is_err()
        );
    }

    #[test]
    fn parses_symlink_mode() {
        let args = Args::try_parse_from([
            "toucan-build-tools",
            "make-app",
            "--target-name",
            "demo",
            "--target-os",
            "mac",
            "--packaging-mode",
            "symlink",
        ])
        .unwrap();
        assert!(matches!(
            args.command,
            Command::MakeApp {
                packaging_mode: PackagingMode::Symlink,
                ..
            }
        ));
    }

    #[test]
    fn command_names_match_subcommands() {
        let args = Args::try_parse_from(["toucan-build-tools", "cp", "a", "b"]).unwrap();
        assert_eq!(args.command.name(), "cp");
    }
}
