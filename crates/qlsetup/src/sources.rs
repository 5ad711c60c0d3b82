//! Candidate sources a bundle release may be downloaded from.

use qlsetup_core::{SetupConfig, PUBLIC_API_URL};

use crate::defaults::CANONICAL_REPOSITORY;

/// One place to look for a bundle release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSource {
    /// API endpoint to query
    pub api_url: String,
    /// `owner/repo` expected to hold the release
    pub repository: String,
}

impl CandidateSource {
    /// Whether this is the universal fallback, the canonical repository on
    /// the public host.
    #[must_use]
    pub fn is_public_canonical(&self) -> bool {
        self.api_url == PUBLIC_API_URL && self.repository == CANONICAL_REPOSITORY
    }
}

/// Enumerate the places a bundle release may live, in priority order:
///
/// 1. The executing action's own repository on the current host, so forks
///    carrying their own releases win over the canonical ones.
/// 2. The canonical repository on the current host.
/// 3. The canonical repository on the public host, which resolves without
///    authentication.
///
/// Duplicates of an earlier pair are dropped; on the public host running
/// the canonical action all three collapse into one.
#[must_use]
pub fn candidate_sources(config: &SetupConfig) -> Vec<CandidateSource> {
    let action_repository = config
        .action_repository
        .clone()
        .unwrap_or_else(|| CANONICAL_REPOSITORY.to_string());
    let ordered = [
        CandidateSource {
            api_url: config.api.api_url.clone(),
            repository: action_repository,
        },
        CandidateSource {
            api_url: config.api.api_url.clone(),
            repository: CANONICAL_REPOSITORY.to_string(),
        },
        CandidateSource {
            api_url: PUBLIC_API_URL.to_string(),
            repository: CANONICAL_REPOSITORY.to_string(),
        },
    ];

    let mut unique: Vec<CandidateSource> = Vec::with_capacity(ordered.len());
    for candidate in ordered {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}
