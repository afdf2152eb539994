use super::token::Claims;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Allows access only when the resource has a recorded owner and that owner
/// is the caller. Unowned resources are never mutable through an
/// authenticated route.
pub fn authorize_ownership(claims: &Claims, resource_owner: Option<i32>) -> Access {
    match resource_owner {
        Some(owner) if owner == claims.user_id => Access::Allow,
        _ => Access::Deny,
    }
}

/// Owner filter for a scoped listing. Always derived from the verified
/// claims, so a client can never ask for someone else's records.
pub fn scope_filter_for(claims: &Claims) -> i32 {
    claims.user_id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(user_id: i32) -> Claims {
        Claims {
            user_id,
            is_admin: false,
            exp: i64::MAX,
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        assert_eq!(authorize_ownership(&claims(5), Some(5)), Access::Allow);
    }

    #[test]
    fn test_other_owner_is_denied() {
        for owner in [-1, 0, 4, 6, i32::MAX] {
            assert_eq!(authorize_ownership(&claims(5), Some(owner)), Access::Deny);
        }
    }

    #[test]
    fn test_unowned_is_denied() {
        assert_eq!(authorize_ownership(&claims(5), None), Access::Deny);
    }

    #[test]
    fn test_admin_flag_grants_nothing_extra() {
        let admin = Claims {
            is_admin: true,
            ..claims(1)
        };
        assert_eq!(authorize_ownership(&admin, Some(2)), Access::Deny);
    }

    #[test]
    fn test_scope_filter_is_callers_id() {
        assert_eq!(scope_filter_for(&claims(77)), 77);
    }
}
