//! Process-wide run options
//!
//! These mirror the environment switches of the bundle pipeline: build mode,
//! network zone and packaging option.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Build mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Incremental: only components named in the manifest are collected
    #[default]
    Incr,
    /// Full: auxiliary and unlisted components are collected as well
    Full,
}

impl Mode {
    pub fn is_full(self) -> bool {
        matches!(self, Mode::Full)
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCR" => Ok(Mode::Incr),
            "FULL" => Ok(Mode::Full),
            _ => Err(CoreError::InvalidOption {
                kind: "mode",
                value: s.to_string(),
                expected: "INCR, FULL",
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Incr => write!(f, "INCR"),
            Mode::Full => write!(f, "FULL"),
        }
    }
}

/// Network zone, selects where upstream descriptors are fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    #[default]
    Default,
    /// Restricted zone served through a mirror
    Cn,
}

impl FromStr for Zone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEFAULT" => Ok(Zone::Default),
            "CN" => Ok(Zone::Cn),
            _ => Err(CoreError::InvalidOption {
                kind: "zone",
                value: s.to_string(),
                expected: "DEFAULT, CN",
            }),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Default => write!(f, "DEFAULT"),
            Zone::Cn => write!(f, "CN"),
        }
    }
}

/// What the packager should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageOption {
    /// Files, images and the import scripts
    #[default]
    All,
    CreateFiles,
    CreateImages,
}

impl PackageOption {
    pub fn includes_files(self) -> bool {
        matches!(self, PackageOption::All | PackageOption::CreateFiles)
    }

    pub fn includes_images(self) -> bool {
        matches!(self, PackageOption::All | PackageOption::CreateImages)
    }
}

impl FromStr for PackageOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PackageOption::All),
            "create_files" => Ok(PackageOption::CreateFiles),
            "create_images" => Ok(PackageOption::CreateImages),
            _ => Err(CoreError::InvalidOption {
                kind: "option",
                value: s.to_string(),
                expected: "all, create_files, create_images",
            }),
        }
    }
}

impl fmt::Display for PackageOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageOption::All => write!(f, "all"),
            PackageOption::CreateFiles => write!(f, "create_files"),
            PackageOption::CreateImages => write!(f, "create_images"),
        }
    }
}
