//! # Principals
//!
//! Identities that can hold a grant: a user, a group, an entire email domain,
//! or the "anyone" marker.

use serde::{Deserialize, Serialize};

/// An identity that can hold a role grant.
///
/// Email addresses and domains are stored lowercase so that comparisons are
/// case-insensitive.
///
/// # String Form
///
/// ```text
/// alice@example.com        - User
/// group:team@example.com   - Group
/// domain:example.com       - Domain
/// anyone                   - Anyone
/// ```
///
/// # Example
///
/// ```
/// use drive_acl::Principal;
///
/// let user = Principal::parse("Alice@Example.com").unwrap();
/// assert_eq!(user, Principal::user("alice@example.com"));
/// assert_eq!(user.to_string(), "alice@example.com");
///
/// let domain = Principal::parse("domain:example.com").unwrap();
/// assert!(domain.covers(&user));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "value", rename_all = "snake_case", from = "StoredPrincipal")]
pub enum Principal {
    /// A single user, by email address
    User(String),

    /// A group, by group email address
    Group(String),

    /// Every user whose email belongs to this domain
    Domain(String),

    /// Everyone, signed in or not
    Anyone,
}

impl Principal {
    /// Create a user principal.
    pub fn user(email: impl AsRef<str>) -> Self {
        Self::User(email.as_ref().trim().to_lowercase())
    }

    /// Create a group principal.
    pub fn group(email: impl AsRef<str>) -> Self {
        Self::Group(email.as_ref().trim().to_lowercase())
    }

    /// Create a domain principal.
    pub fn domain(domain: impl AsRef<str>) -> Self {
        Self::Domain(domain.as_ref().trim().trim_start_matches('@').to_lowercase())
    }

    /// Parse a principal from its string form.
    ///
    /// # Arguments
    ///
    /// * `s` - `anyone`, `domain:<domain>`, `group:<email>`, or a user email
    ///
    /// # Returns
    ///
    /// `Some(Principal)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("anyone") {
            return Some(Self::Anyone);
        }
        if let Some(rest) = strip_prefix_ignore_case(s, "domain:") {
            return (!rest.is_empty() && !rest.contains('@')).then(|| Self::domain(rest));
        }
        if let Some(rest) = strip_prefix_ignore_case(s, "group:") {
            return is_email(rest).then(|| Self::group(rest));
        }
        is_email(s).then(|| Self::user(s))
    }

    /// The same principal with its email or domain in canonical form.
    ///
    /// Variants built directly (rather than through [`Principal::user`] and
    /// friends) may carry mixed case; comparisons go through this.
    pub fn normalized(&self) -> Self {
        match self {
            Self::User(email) => Self::user(email),
            Self::Group(email) => Self::group(email),
            Self::Domain(domain) => Self::domain(domain),
            Self::Anyone => Self::Anyone,
        }
    }

    /// The principal kind as used on the wire (`user`, `group`, `domain`, `anyone`).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Group(_) => "group",
            Self::Domain(_) => "domain",
            Self::Anyone => "anyone",
        }
    }

    /// The email address for users and groups.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::User(email) | Self::Group(email) => Some(email),
            _ => None,
        }
    }

    /// Check if a grant held by `self` applies to `other`.
    ///
    /// A principal covers itself; `Anyone` covers everyone; a domain covers
    /// users and groups whose email belongs to it. Group membership is not
    /// resolved here, so a group only covers itself.
    pub fn covers(&self, other: &Principal) -> bool {
        match self {
            Self::Anyone => true,
            Self::Domain(domain) => match other {
                Self::Domain(d) => d == domain,
                _ => other.email_domain() == Some(domain.as_str()),
            },
            _ => self == other,
        }
    }

    fn email_domain(&self) -> Option<&str> {
        self.email().and_then(|e| e.rsplit_once('@')).map(|(_, d)| d)
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(email) => write!(f, "{}", email),
            Self::Group(email) => write!(f, "group:{}", email),
            Self::Domain(domain) => write!(f, "domain:{}", domain),
            Self::Anyone => write!(f, "anyone"),
        }
    }
}

/// Wire form of [`Principal`], normalized on the way in.
#[derive(Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
enum StoredPrincipal {
    User(String),
    Group(String),
    Domain(String),
    Anyone,
}

impl From<StoredPrincipal> for Principal {
    fn from(stored: StoredPrincipal) -> Self {
        match stored {
            StoredPrincipal::User(email) => Principal::user(email),
            StoredPrincipal::Group(email) => Principal::group(email),
            StoredPrincipal::Domain(domain) => Principal::domain(domain),
            StoredPrincipal::Anyone => Principal::Anyone,
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s.is_char_boundary(prefix.len()) && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_parsing() {
        assert_eq!(Principal::parse("anyone"), Some(Principal::Anyone));
        assert_eq!(Principal::parse("ANYONE"), Some(Principal::Anyone));
        assert_eq!(
            Principal::parse("domain:X.com"),
            Some(Principal::Domain("x.com".to_string()))
        );
        assert_eq!(
            Principal::parse("group:Team@x.com"),
            Some(Principal::Group("team@x.com".to_string()))
        );
        assert_eq!(
            Principal::parse(" bob@x.com "),
            Some(Principal::User("bob@x.com".to_string()))
        );

        assert_eq!(Principal::parse("bob"), None);
        assert_eq!(Principal::parse("@x.com"), None);
        assert_eq!(Principal::parse("domain:"), None);
        assert_eq!(Principal::parse("group:team"), None);
    }

    #[test]
    fn test_display_round_trips() {
        for s in ["anyone", "domain:x.com", "group:team@x.com", "bob@x.com"] {
            let p = Principal::parse(s).unwrap();
            assert_eq!(Principal::parse(&p.to_string()), Some(p));
        }
    }

    #[test]
    fn test_covers() {
        let bob = Principal::user("bob@x.com");
        let carol = Principal::user("carol@y.com");
        let team = Principal::group("team@x.com");

        assert!(Principal::Anyone.covers(&bob));
        assert!(Principal::domain("x.com").covers(&bob));
        assert!(Principal::domain("x.com").covers(&team));
        assert!(!Principal::domain("x.com").covers(&carol));
        assert!(bob.covers(&bob));
        assert!(!bob.covers(&carol));
        assert!(!team.covers(&bob));
        assert!(!bob.covers(&Principal::Anyone));
    }

    #[test]
    fn test_deserialize_normalizes_case() {
        let json = serde_json::json!({"type": "user", "value": " Bob@X.com"});
        let principal: Principal = serde_json::from_value(json).unwrap();
        assert_eq!(principal, Principal::user("bob@x.com"));

        let json = serde_json::json!({"type": "domain", "value": "X.COM"});
        let principal: Principal = serde_json::from_value(json).unwrap();
        assert_eq!(principal, Principal::domain("x.com"));

        let anyone: Principal = serde_json::from_value(serde_json::json!({"type": "anyone"})).unwrap();
        assert_eq!(anyone, Principal::Anyone);
    }

    #[test]
    fn test_normalized() {
        let raw = Principal::User("Bob@X.com".to_string());
        assert_ne!(raw, Principal::user("bob@x.com"));
        assert_eq!(raw.normalized(), Principal::user("bob@x.com"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Principal::user("a@b.c").kind(), "user");
        assert_eq!(Principal::Anyone.kind(), "anyone");
    }
}
