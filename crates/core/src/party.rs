//! Party membership rules and shared-list content.

use serde_json::json;

use crate::error::CoreError;
use crate::tier_list::TierList;

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

pub const ROLE_OWNER: &str = "owner";
pub const ROLE_MEMBER: &str = "member";

/// Largest number of members a party may hold, owner included.
pub const MAX_PARTY_MEMBERS: i64 = 10;

pub const MAX_NAME_LEN: usize = 60;

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "party name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "party name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Reject owner-only actions for anyone but the owner.
pub fn ensure_owner(role: &str) -> Result<(), CoreError> {
    if role != ROLE_OWNER {
        return Err(CoreError::Forbidden(
            "only the party owner can do this".to_string(),
        ));
    }
    Ok(())
}

/// Reject joins once the party is full.
pub fn ensure_has_room(member_count: i64) -> Result<(), CoreError> {
    if member_count >= MAX_PARTY_MEMBERS {
        return Err(CoreError::Conflict(format!(
            "party is full ({MAX_PARTY_MEMBERS} members)"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared lists
// ---------------------------------------------------------------------------

pub const LIST_TYPE_WATCHLIST: &str = "watchlist";
pub const LIST_TYPE_TIER_LIST: &str = "tier_list";

pub const VALID_LIST_TYPES: &[&str] = &[LIST_TYPE_WATCHLIST, LIST_TYPE_TIER_LIST];

pub const MAX_LIST_NAME_LEN: usize = 100;

pub fn validate_list_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "list name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_LIST_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "list name must be at most {MAX_LIST_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_list_type(list_type: &str) -> Result<(), CoreError> {
    if VALID_LIST_TYPES.contains(&list_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown list type: '{list_type}'. Valid types: {}",
            VALID_LIST_TYPES.join(", ")
        )))
    }
}

/// Content stored for a new list when the client sends none.
pub fn default_list_content(list_type: &str) -> Result<serde_json::Value, CoreError> {
    match list_type {
        LIST_TYPE_TIER_LIST => TierList::with_default_tiers().to_value(),
        _ => Ok(json!({ "items": [] })),
    }
}

/// Check that list content has the shape its type expects.
///
/// Watch-lists are `{ "items": [...] }`; tier lists must deserialize as a
/// [`TierList`]. Item payloads are otherwise opaque.
pub fn validate_list_content(
    list_type: &str,
    content: &serde_json::Value,
) -> Result<(), CoreError> {
    match list_type {
        LIST_TYPE_TIER_LIST => TierList::from_value(content).map(|_| ()),
        LIST_TYPE_WATCHLIST => match content.get("items") {
            Some(items) if items.is_array() => Ok(()),
            _ => Err(CoreError::Validation(
                "watchlist content must be an object with an 'items' array".to_string(),
            )),
        },
        other => validate_list_type(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_checks() {
        assert!(ensure_owner(ROLE_OWNER).is_ok());
        assert!(matches!(
            ensure_owner(ROLE_MEMBER),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn room_check_at_cap() {
        assert!(ensure_has_room(MAX_PARTY_MEMBERS - 1).is_ok());
        assert!(matches!(
            ensure_has_room(MAX_PARTY_MEMBERS),
            Err(CoreError::Conflict(_))
        ));
    }

    #[test]
    fn party_names() {
        assert!(validate_name("Weekend Watchers").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"p".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn list_names() {
        assert!(validate_list_name("Summer season").is_ok());
        assert!(validate_list_name("  ").is_err());
        assert!(validate_list_name(&"l".repeat(MAX_LIST_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn default_contents_validate() {
        for list_type in VALID_LIST_TYPES {
            let content = default_list_content(list_type).unwrap();
            assert!(validate_list_content(list_type, &content).is_ok());
        }
    }

    #[test]
    fn watchlist_requires_items_array() {
        assert!(validate_list_content(LIST_TYPE_WATCHLIST, &json!({"items": [1, 2]})).is_ok());
        assert!(validate_list_content(LIST_TYPE_WATCHLIST, &json!({"items": {}})).is_err());
        assert!(validate_list_content(LIST_TYPE_WATCHLIST, &json!([])).is_err());
    }

    #[test]
    fn tier_list_content_must_parse() {
        assert!(validate_list_content(LIST_TYPE_TIER_LIST, &json!({"tiers": []})).is_ok());
        assert!(validate_list_content(LIST_TYPE_TIER_LIST, &json!({"items": []})).is_err());
    }

    #[test]
    fn unknown_list_type_rejected() {
        assert!(validate_list_type("ranking").is_err());
        assert!(validate_list_content("ranking", &json!({})).is_err());
    }
}
