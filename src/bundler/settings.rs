//! Configuration structures for bundle assembly.
//!
//! [`SettingsBuilder`] collects the raw inputs (usually straight from the
//! command line), validates them, and produces an immutable
//! [`BundleSettings`]. Validation happens entirely in
//! [`SettingsBuilder::build`], so a rejected configuration never touches the
//! filesystem.

use crate::bundler::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Reverse-domain prefix used for bundle identifiers unless overridden.
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "org.toucanlang.sample";

/// File name the provisioning profile is stored under at the bundle root.
pub const EMBEDDED_PROFILE_NAME: &str = "embedded.mobileprovision";

/// Shared libraries every macOS bundle ships next to its executable.
pub const MAC_SHARED_LIBRARIES: [&str; 4] = [
    "libdawn_native.dylib",
    "libdawn_platform.dylib",
    "libdawn_proc.dylib",
    "libwebgpu_dawn.dylib",
];

/// Operating system the bundle is assembled for.
///
/// Only `mac` and `ios` get Apple bundle nesting; any other identifier
/// produces a flat bundle.
///
/// ```
/// use toucan_build_tools::bundler::TargetOs;
///
/// let os: TargetOs = "mac".parse().unwrap();
/// assert_eq!(os, TargetOs::Mac);
/// assert_eq!("linux".parse::<TargetOs>().unwrap(), TargetOs::Other("linux".into()));
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetOs {
    /// macOS: `<name>.app/Contents/MacOS/`.
    Mac,
    /// iOS: `<name>.app/Contents/`, plus provisioning profile and optional signing.
    Ios,
    /// Any other target; contents and executable live at the bundle root.
    Other(String),
}

impl TargetOs {
    /// Identifier as accepted on the command line.
    pub fn as_str(&self) -> &str {
        match self {
            TargetOs::Mac => "mac",
            TargetOs::Ios => "ios",
            TargetOs::Other(name) => name,
        }
    }
}

impl FromStr for TargetOs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Err(Error::InvalidSettings("target OS must not be empty".into())),
            "mac" => Ok(TargetOs::Mac),
            "ios" => Ok(TargetOs::Ios),
            other => Ok(TargetOs::Other(other.to_string())),
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How shared libraries are placed into the bundle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum PackagingMode {
    /// Copy each library, preserving permissions.
    #[default]
    Copy,
    /// Symlink each library to its absolute source path.
    Symlink,
}

impl fmt::Display for PackagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackagingMode::Copy => f.write_str("copy"),
            PackagingMode::Symlink => f.write_str("symlink"),
        }
    }
}

/// Code-signing configuration for iOS bundles.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigningSettings {
    /// Signing identity passed to `codesign -s`.
    pub identity: String,
    /// Apple developer team identifier, used in the entitlements.
    pub team_identifier: String,
    /// Signing executable; a bare name is looked up on `PATH`.
    pub codesign_tool: PathBuf,
}

/// iOS-only inputs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IosSettings {
    /// Provisioning profile copied into the bundle as `embedded.mobileprovision`.
    pub mobile_provision: PathBuf,
    /// Present when the bundle should be signed after assembly.
    pub signing: Option<SigningSettings>,
}

/// Immutable description of one bundle to assemble.
#[derive(Clone, Debug)]
pub struct BundleSettings {
    executable_name: String,
    target_os: TargetOs,
    out_dir: PathBuf,
    packaging_mode: PackagingMode,
    identifier_prefix: String,
    shared_libraries: Vec<String>,
    ios: Option<IosSettings>,
}

impl BundleSettings {
    /// Name of the main executable, also used as the bundle name.
    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    /// Target operating system.
    pub fn target_os(&self) -> &TargetOs {
        &self.target_os
    }

    /// Directory holding the build artifacts and receiving the bundle.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Copy-vs-symlink policy for shared libraries.
    pub fn packaging_mode(&self) -> PackagingMode {
        self.packaging_mode
    }

    /// Shared libraries to place next to the executable (empty unless `mac`).
    pub fn shared_libraries(&self) -> &[String] {
        &self.shared_libraries
    }

    /// iOS settings, present exactly when the target is `ios`.
    pub fn ios(&self) -> Option<&IosSettings> {
        self.ios.as_ref()
    }

    /// Reverse-domain bundle identifier, `<prefix>.<executable>`.
    pub fn bundle_identifier(&self) -> String {
        format!("{}.{}", self.identifier_prefix, self.executable_name)
    }

    /// Location of the main executable in the output directory.
    pub fn executable_source(&self) -> PathBuf {
        self.out_dir.join(&self.executable_name)
    }
}

/// Builder for [`BundleSettings`].
///
/// ```
/// use toucan_build_tools::bundler::{SettingsBuilder, TargetOs};
///
/// let settings = SettingsBuilder::new()
///     .executable_name("demo")
///     .target_os(TargetOs::Mac)
///     .out_dir("/build")
///     .build()
///     .unwrap();
/// assert_eq!(settings.bundle_identifier(), "org.toucanlang.sample.demo");
/// assert_eq!(settings.shared_libraries().len(), 4);
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    executable_name: Option<String>,
    target_os: Option<TargetOs>,
    out_dir: Option<PathBuf>,
    packaging_mode: PackagingMode,
    identifier_prefix: Option<String>,
    mobile_provision: Option<PathBuf>,
    codesign_identity: Option<String>,
    team_identifier: Option<String>,
    codesign_tool: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the executable (and bundle) name.
    pub fn executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = Some(name.into());
        self
    }

    /// Sets the target operating system.
    pub fn target_os(mut self, os: TargetOs) -> Self {
        self.target_os = Some(os);
        self
    }

    /// Sets the output directory. Defaults to the current directory.
    pub fn out_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets how shared libraries are placed.
    pub fn packaging_mode(mut self, mode: PackagingMode) -> Self {
        self.packaging_mode = mode;
        self
    }

    /// Overrides the reverse-domain identifier prefix.
    pub fn identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.identifier_prefix = Some(prefix.into());
        self
    }

    /// Sets the provisioning profile (required for `ios`).
    pub fn mobile_provision<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.mobile_provision = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the signing identity. Requires a team identifier as well.
    pub fn codesign_identity(mut self, identity: impl Into<String>) -> Self {
        self.codesign_identity = Some(identity.into());
        self
    }

    /// Sets the developer team identifier. Requires a signing identity as well.
    pub fn team_identifier(mut self, team: impl Into<String>) -> Self {
        self.team_identifier = Some(team.into());
        self
    }

    /// Overrides the signing executable (default `codesign`).
    pub fn codesign_tool<P: AsRef<Path>>(mut self, tool: P) -> Self {
        self.codesign_tool = Some(tool.as_ref().to_path_buf());
        self
    }

    /// Validates the inputs and builds the settings.
    pub fn build(self) -> Result<BundleSettings> {
        let executable_name = self
            .executable_name
            .ok_or_else(|| Error::InvalidSettings("target name is required".into()))?;
        validate_executable_name(&executable_name)?;

        let target_os = self
            .target_os
            .ok_or_else(|| Error::InvalidSettings("target OS is required".into()))?;

        let identifier_prefix = self
            .identifier_prefix
            .unwrap_or_else(|| DEFAULT_IDENTIFIER_PREFIX.to_string());
        if identifier_prefix.is_empty() || identifier_prefix.ends_with('.') {
            return Err(Error::InvalidSettings(format!(
                "identifier prefix '{identifier_prefix}' is not a reverse-domain name"
            )));
        }

        let signing = match (self.codesign_identity, self.team_identifier) {
            (Some(identity), Some(team_identifier)) => Some(SigningSettings {
                identity,
                team_identifier,
                codesign_tool: self
                    .codesign_tool
                    .unwrap_or_else(|| PathBuf::from("codesign")),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(Error::InvalidSettings(
                    "a code-signing identity requires a team identifier".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(Error::InvalidSettings(
                    "a team identifier requires a code-signing identity".into(),
                ));
            }
        };

        let ios = match target_os {
            TargetOs::Ios => {
                let mobile_provision = self.mobile_provision.ok_or_else(|| {
                    Error::InvalidSettings("ios bundles require a provisioning profile".into())
                })?;
                Some(IosSettings {
                    mobile_provision,
                    signing,
                })
            }
            _ => {
                if signing.is_some() {
                    log::warn!("signing is only performed for ios bundles; ignoring identity");
                }
                None
            }
        };

        let shared_libraries = match target_os {
            TargetOs::Mac => MAC_SHARED_LIBRARIES.iter().map(|s| s.to_string()).collect(),
            _ => Vec::new(),
        };

        Ok(BundleSettings {
            executable_name,
            target_os,
            out_dir: self.out_dir.unwrap_or_else(|| PathBuf::from(".")),
            packaging_mode: self.packaging_mode,
            identifier_prefix,
            shared_libraries,
            ios,
        })
    }
}

fn validate_executable_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSettings("target name must not be empty".into()));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(Error::InvalidSettings(format!(
            "target name '{name}' must be a plain file name"
        )));
    }
    Ok(())
}
