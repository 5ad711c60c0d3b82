//! Platform detection and bundle asset naming

/// Operating system a bundle is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Linux
    Linux,
    /// macOS
    Macos,
    /// Windows
    Windows,
    /// Anything else; served by the generic bundle
    Other,
}

impl Os {
    /// Get the current operating system
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::Macos
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Other
        }
    }

    /// The release asset name of the bundle for this operating system.
    #[must_use]
    pub fn bundle_asset_name(self) -> &'static str {
        match self {
            Self::Linux => "codeql-bundle-linux64.tar.gz",
            Self::Macos => "codeql-bundle-osx64.tar.gz",
            Self::Windows => "codeql-bundle-win64.tar.gz",
            Self::Other => "codeql-bundle.tar.gz",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Macos => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_asset_names() {
        assert_eq!(Os::Linux.bundle_asset_name(), "codeql-bundle-linux64.tar.gz");
        assert_eq!(Os::Macos.bundle_asset_name(), "codeql-bundle-osx64.tar.gz");
        assert_eq!(Os::Windows.bundle_asset_name(), "codeql-bundle-win64.tar.gz");
        assert_eq!(Os::Other.bundle_asset_name(), "codeql-bundle.tar.gz");
    }

    #[test]
    fn test_current_is_deterministic() {
        assert_eq!(Os::current(), Os::current());
    }
}
