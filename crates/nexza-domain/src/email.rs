//! Email normalisation and the administrator allow-list.

use std::collections::BTreeSet;

/// Trim and lower-case an address. Codes and allow-list lookups are keyed by
/// this form so `A@X.com ` and `a@x.com` refer to the same subject.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Cheap shape check done before any network call; the identity provider
/// remains the authority on deliverability.
pub fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Fixed set of administrator addresses, stored normalised.
///
/// Admin status is always derived from this list at session resolution time;
/// the `isAdmin` flag persisted on a profile is only a cache of the last result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: BTreeSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| normalize_email(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated list as found in the `ADMIN_EMAILS` env var.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize_email(email))
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
