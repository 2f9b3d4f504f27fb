use std::fmt;

/// Build metadata printed by `--version`.
pub struct VersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub commit_hash: Option<&'static str>,
    pub build_time: &'static str,
    pub target: &'static str,
    /// Number of named endpoints compiled in.
    pub endpoints: usize,
}

impl VersionInfo {
    /// First 8 characters of the commit hash, or `unknown`.
    pub fn short_commit(&self) -> &'static str {
        match self.commit_hash {
            Some(hash) => hash.get(..8).unwrap_or(hash),
            None => "unknown",
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} ({} {})", self.name, self.version, self.short_commit(), self.build_time)?;
        writeln!(f, "    Target:    {}", self.target)?;
        write!(f, "    Endpoints: {}", self.endpoints)
    }
}
