/*!
 * Pack version derivation and rendering.
 *
 * Each packaging run stamps the output artifact's name with a
 * semantic-version-like suffix that increases monotonically for a given
 * pack identity. The next version is derived from whatever already exists:
 * previously produced artifact names and the `pack_version` state file the
 * controller leaves behind.
 */

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::file_utils::FileManager;

/// Name of the state file recording the last produced version
pub const VERSION_STATE_FILE: &str = "pack_version";

static VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").unwrap());

/// Three-component pack version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PackVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PackVersion {
    /// First version ever produced for a pack
    pub const INITIAL: PackVersion = PackVersion {
        major: 1,
        minor: 0,
        patch: 0,
    };

    /// Create a version from its components
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The automatic per-run increment
    pub fn next_patch(self) -> Self {
        Self {
            patch: self.patch + 1,
            ..self
        }
    }

    /// Manual minor bump, resetting patch
    pub fn bump_minor(self) -> Self {
        Self {
            minor: self.minor + 1,
            patch: 0,
            ..self
        }
    }

    /// Manual major bump, resetting minor and patch
    pub fn bump_major(self) -> Self {
        Self {
            major: self.major + 1,
            minor: 0,
            patch: 0,
        }
    }
}

impl fmt::Display for PackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for PackVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = VERSION_RE
            .captures(s.trim())
            .ok_or_else(|| anyhow!("Invalid pack version: {:?}", s))?;
        Ok(Self {
            major: caps[1].parse()?,
            minor: caps[2].parse()?,
            patch: caps[3].parse()?,
        })
    }
}

/// Highest version already produced for `base_name`, from artifact names in
/// `dir` (e.g. `MyPack_1.0.3.zip`) and the version state file. `None` when
/// the pack has never been versioned.
pub fn latest_version<P: AsRef<Path>>(dir: P, base_name: &str) -> Result<Option<PackVersion>> {
    let dir = dir.as_ref();
    let mut latest: Option<PackVersion> = None;

    let artifact_re = Regex::new(&format!(
        r"^{}[-_ ]v?(\d+\.\d+\.\d+)",
        regex::escape(base_name)
    ))?;

    if dir.is_dir() {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(caps) = artifact_re.captures(&name) {
                if let Ok(version) = caps[1].parse::<PackVersion>() {
                    latest = Some(latest.map_or(version, |cur| cur.max(version)));
                }
            }
        }
    }

    let state_path = dir.join(VERSION_STATE_FILE);
    if FileManager::file_exists(&state_path) {
        let recorded = FileManager::read_to_string(&state_path)?;
        if let Ok(version) = recorded.parse::<PackVersion>() {
            latest = Some(latest.map_or(version, |cur| cur.max(version)));
        }
    }

    Ok(latest)
}

/// The version the current packaging run should use: one patch past the
/// latest, or `1.0.0` for a brand-new pack.
pub fn next_version(previous: Option<PackVersion>) -> PackVersion {
    match previous {
        Some(version) => version.next_patch(),
        None => PackVersion::INITIAL,
    }
}

/// Artifact name with the version suffix appended; the external packager
/// adds its own extension.
pub fn versioned_name(base_name: &str, version: PackVersion) -> String {
    format!("{}_{}", base_name, version)
}

/// Record the produced version so the next run stays monotonic even when
/// the external packager renames or moves the artifacts.
pub fn record_version<P: AsRef<Path>>(dir: P, version: PackVersion) -> Result<()> {
    FileManager::write_to_file(dir.as_ref().join(VERSION_STATE_FILE), &version.to_string())
}
