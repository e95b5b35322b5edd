//! Navigation classifier.
//!
//! Combines the configured allow-list with the fixed [`RuleSet`] to decide
//! whether a URL renders inside the app surface or is handed off to the
//! system browser.
//!
//! ## Precedence
//!
//! ```text
//! external app rule   → ExternalHandoff   (wins even over the allow-list)
//! allow-list (exact)  → Allow(Configured)
//! platform family     → Allow(PlatformTrusted)
//! payment provider    → Allow(Payment)
//! anything else       → UnknownHostPolicy
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::host::host_of;
use crate::rules::RuleSet;

// ─────────────────────────────────────────────────────────────────────────────
// Verdict types
// ─────────────────────────────────────────────────────────────────────────────

/// Why a URL was allowed to load inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowOrigin {
    /// Host is on the configured allow-list.
    Configured,
    /// Host belongs to the ordering platform's domain family.
    PlatformTrusted,
    /// Host is a known payment provider.
    Payment,
    /// Host matched nothing and the policy is permissive.
    UnknownPermitted,
}

/// Why a URL leaves the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandoffReason {
    ExternalApp,
    /// Host matched nothing (or had no host) and the policy is conservative.
    UnknownHost,
}

/// Outcome of [`Classifier::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyVerdict {
    Allow(AllowOrigin),
    ExternalHandoff(HandoffReason),
}

impl PolicyVerdict {
    pub fn is_allow(self) -> bool {
        matches!(self, PolicyVerdict::Allow(_))
    }

    pub fn is_handoff(self) -> bool {
        matches!(self, PolicyVerdict::ExternalHandoff(_))
    }
}

impl fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyVerdict::Allow(AllowOrigin::Configured) => "allow (configured)",
            PolicyVerdict::Allow(AllowOrigin::PlatformTrusted) => "allow (platform)",
            PolicyVerdict::Allow(AllowOrigin::Payment) => "allow (payment)",
            PolicyVerdict::Allow(AllowOrigin::UnknownPermitted) => "allow (unknown host)",
            PolicyVerdict::ExternalHandoff(HandoffReason::ExternalApp) => "external (app)",
            PolicyVerdict::ExternalHandoff(HandoffReason::UnknownHost) => {
                "external (unknown host)"
            }
        };
        f.pad(s)
    }
}

/// What to do with a host that no rule recognises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownHostPolicy {
    /// Hand the URL off to the system browser.
    #[default]
    Conservative,
    /// Load it inside the surface anyway.
    Permissive,
}

// ─────────────────────────────────────────────────────────────────────────────
// Allow-list
// ─────────────────────────────────────────────────────────────────────────────

/// Exact hostnames permitted inside the surface. Lower-cased and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    pub fn contains(&self, host: &str) -> bool {
        !host.is_empty() && self.0.contains(host)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|h| Into::<String>::into(h).trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classifier
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Classifier {
    allow_list: AllowList,
    rules: RuleSet,
    unknown_hosts: UnknownHostPolicy,
}

impl Classifier {
    pub fn new(allow_list: AllowList, rules: RuleSet, unknown_hosts: UnknownHostPolicy) -> Self {
        Self {
            allow_list,
            rules,
            unknown_hosts,
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn unknown_host_policy(&self) -> UnknownHostPolicy {
        self.unknown_hosts
    }

    /// Classifies `url`. Never fails: an unparseable URL has an empty host,
    /// matches no rule and gets the unknown-host default.
    pub fn classify(&self, url: &str) -> PolicyVerdict {
        let host = host_of(url);
        let verdict = self.classify_host(&host);
        debug!(url, host = %host, verdict = %verdict, "Navigation classified");
        verdict
    }

    fn classify_host(&self, host: &str) -> PolicyVerdict {
        // App-store and social links must never be trapped in the surface,
        // even when an allow-list entry overlaps.
        if self.rules.is_external_app(host) {
            return PolicyVerdict::ExternalHandoff(HandoffReason::ExternalApp);
        }
        if self.allow_list.contains(host) {
            return PolicyVerdict::Allow(AllowOrigin::Configured);
        }
        if self.rules.is_platform(host) {
            return PolicyVerdict::Allow(AllowOrigin::PlatformTrusted);
        }
        if self.rules.is_payment(host) {
            return PolicyVerdict::Allow(AllowOrigin::Payment);
        }
        match self.unknown_hosts {
            UnknownHostPolicy::Conservative => {
                PolicyVerdict::ExternalHandoff(HandoffReason::UnknownHost)
            }
            UnknownHostPolicy::Permissive => {
                info!(host, "Unknown host loaded inside the app (permissive policy)");
                PolicyVerdict::Allow(AllowOrigin::UnknownPermitted)
            }
        }
    }
}
