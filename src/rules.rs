//! Fixed domain rule sets shared by every deployment.
//!
//! These lists are not read from configuration. They widen the configured
//! allow-list silently: any host containing the platform domain, or one of
//! the payment provider domains, loads inside the app even if the deployment
//! never listed it. [`RuleSet::builtin`] returns the process-wide constants;
//! [`RuleSet::new`] exists so each list can be exercised in isolation.

use crate::host::matches_suffix;

/// Ordering platform domain family. Restaurant sites link to support pages,
/// legal pages and legacy redirects on these.
pub const PLATFORM_DOMAINS: &[&str] = &["kuriersoft.ch", "kurier.ch"];

/// Payment providers used during checkout. Matched loosely, so
/// `www.sandbox.paypal.com` is covered by `paypal.com`.
pub const PAYMENT_DOMAINS: &[&str] = &[
    "secure.worldpay.com",
    "payments.worldpay.com",
    "checkout.stripe.com",
    "js.stripe.com",
    "api.stripe.com",
    "paypal.com",
    "www.paypal.com",
    "checkout.paypal.com",
    "www.sandbox.paypal.com",
    "twint.ch",
    "pay.twint.ch",
    "postfinance.ch",
    "e-payment.postfinance.ch",
    "datatrans.com",
    "pay.datatrans.com",
    "saferpay.com",
    "www.saferpay.com",
];

/// App stores, social networks and video platforms. Always opened outside.
pub const EXTERNAL_APP_DOMAINS: &[&str] = &[
    "play.google.com",
    "apps.apple.com",
    "itunes.apple.com",
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "youtube.com",
];

/// The three rule families consulted after the configured allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    platform: Vec<String>,
    payment: Vec<String>,
    external_apps: Vec<String>,
}

impl RuleSet {
    pub fn new<P, Y, X>(platform: P, payment: Y, external_apps: X) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        Y: IntoIterator,
        Y::Item: Into<String>,
        X: IntoIterator,
        X::Item: Into<String>,
    {
        Self {
            platform: normalize(platform),
            payment: normalize(payment),
            external_apps: normalize(external_apps),
        }
    }

    /// Built-in rule set compiled into the binary.
    pub fn builtin() -> Self {
        Self::new(
            PLATFORM_DOMAINS.iter().copied(),
            PAYMENT_DOMAINS.iter().copied(),
            EXTERNAL_APP_DOMAINS.iter().copied(),
        )
    }

    /// Rule set with no entries; only the allow-list and the unknown-host
    /// policy apply.
    pub fn empty() -> Self {
        Self::new(
            std::iter::empty::<String>(),
            std::iter::empty::<String>(),
            std::iter::empty::<String>(),
        )
    }

    pub fn is_platform(&self, host: &str) -> bool {
        any_match(&self.platform, host)
    }

    pub fn is_payment(&self, host: &str) -> bool {
        any_match(&self.payment, host)
    }

    pub fn is_external_app(&self, host: &str) -> bool {
        any_match(&self.external_apps, host)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items
        .into_iter()
        .map(|s| Into::<String>::into(s).trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn any_match(rules: &[String], host: &str) -> bool {
    rules.iter().any(|needle| matches_suffix(host, needle))
}
