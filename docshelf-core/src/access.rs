//! Authorization decisions.
//!
//! A pure decision layer: given a method, a collection's access list and
//! the presented `Authorization` header value, decide. Denials are boolean
//! results; turning them into protocol responses is the caller's job.

use crate::meta::{AccessRule, Method};

/// Extracts the token from an `Authorization: Bearer <token>` header value.
/// Missing or malformed headers yield `None`.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization?.strip_prefix("Bearer ")
}

/// The authorization decision component.
///
/// Holds the single process-wide super-user secret, injected once at
/// startup (see [`Config`](crate::config::Config)) and never derived from
/// tenant or collection data. An unset secret disables super-user access
/// entirely.
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    super_user_key: Option<String>,
}

impl AccessControl {
    pub fn new(super_user_key: Option<String>) -> Self {
        Self { super_user_key }
    }

    /// True iff the presented bearer token exactly matches the configured
    /// secret. Always false when no secret is configured.
    pub fn is_super_user(&self, authorization: Option<&str>) -> bool {
        let Some(secret) = self.super_user_key.as_deref() else {
            return false;
        };
        bearer_token(authorization).is_some_and(|token| token == secret)
    }

    /// Whether `method` is granted by `access` for the presented
    /// credentials.
    ///
    /// A super-user bypasses all rule checks. Otherwise a rule matches when
    /// its key is `"public"` or equals the bearer token, and permissions
    /// are additive across matching rules: any one with the method's flag
    /// set grants access. No matching rule, an unset flag, or an unknown
    /// method all deny. The method name is compared case-insensitively.
    pub fn is_authorized(
        &self,
        method: &str,
        access: &[AccessRule],
        authorization: Option<&str>,
    ) -> bool {
        if self.is_super_user(authorization) {
            return true;
        }
        let Some(method) = Method::parse(method) else {
            return false;
        };
        let token = bearer_token(authorization);
        access
            .iter()
            .filter(|rule| rule.matches(token))
            .any(|rule| rule.allows(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::PUBLIC_KEY;

    fn control(secret: Option<&str>) -> AccessControl {
        AccessControl::new(secret.map(str::to_string))
    }

    #[test]
    fn bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(Some("Basic abc")), None);
        assert_eq!(bearer_token(Some("abc")), None);
        assert_eq!(bearer_token(None), None);
    }

    #[test]
    fn super_user_requires_configured_secret() {
        let ac = control(Some("SECRET"));
        assert!(ac.is_super_user(Some("Bearer SECRET")));
        assert!(!ac.is_super_user(Some("Bearer wrong")));
        assert!(!ac.is_super_user(None));

        // unconfigured secret denies everything, whatever the token
        let ac = control(None);
        assert!(!ac.is_super_user(Some("Bearer SECRET")));
    }

    #[test]
    fn super_user_bypasses_all_rules() {
        let ac = control(Some("SECRET"));
        let auth = Some("Bearer SECRET");
        assert!(ac.is_authorized("DELETE", &[], auth));
        assert!(ac.is_authorized("GET", &[AccessRule::new("other")], auth));
    }

    #[test]
    fn public_rule_grants_only_its_flags() {
        let ac = control(None);
        let rules = [AccessRule::new(PUBLIC_KEY).allow(Method::Get)];
        assert!(ac.is_authorized("GET", &rules, None));
        assert!(ac.is_authorized("get", &rules, None));
        assert!(!ac.is_authorized("POST", &rules, None));
    }

    #[test]
    fn keyed_rule_requires_matching_token() {
        let ac = control(None);
        let rules = [AccessRule::new("abc").allow(Method::Post)];
        assert!(ac.is_authorized("POST", &rules, Some("Bearer abc")));
        assert!(!ac.is_authorized("GET", &rules, Some("Bearer abc")));
        assert!(!ac.is_authorized("POST", &rules, Some("Bearer xyz")));
        assert!(!ac.is_authorized("POST", &rules, None));
    }

    #[test]
    fn permissions_are_additive_across_matching_rules() {
        let ac = control(None);
        let rules = [
            AccessRule::new(PUBLIC_KEY).allow(Method::Get),
            AccessRule::new("abc").allow(Method::Post),
        ];
        // the keyed caller gets the union of both rules
        assert!(ac.is_authorized("GET", &rules, Some("Bearer abc")));
        assert!(ac.is_authorized("POST", &rules, Some("Bearer abc")));
        // the anonymous caller only matches the public rule
        assert!(ac.is_authorized("GET", &rules, None));
        assert!(!ac.is_authorized("POST", &rules, None));
    }

    #[test]
    fn unknown_methods_and_empty_lists_deny() {
        let ac = control(None);
        let rules = [AccessRule::new(PUBLIC_KEY).allow(Method::Get)];
        assert!(!ac.is_authorized("OPTIONS", &rules, None));
        assert!(!ac.is_authorized("GET", &[], Some("Bearer abc")));
    }
}
