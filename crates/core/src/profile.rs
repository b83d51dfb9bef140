//! Profile field validation.

use crate::error::CoreError;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 30;
pub const MAX_DISPLAY_NAME_LEN: usize = 60;

/// Usernames are 3-30 characters of ASCII letters, digits and underscores.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.len();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(CoreError::Validation(
            "username may only contain letters, digits and underscores".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "display_name must not be blank".to_string(),
        ));
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "display_name must be at most {MAX_DISPLAY_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Image URLs (avatars, cover art) must be absolute http(s) URLs.
pub fn validate_image_url(url: &str) -> Result<(), CoreError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "image url must start with http:// or https://, got '{url}'"
        )))
    }
}

/// Username assigned to a profile created on first sign-in.
pub fn default_username(user_id: &uuid::Uuid) -> String {
    let simple = user_id.simple().to_string();
    format!("user_{}", &simple[..8])
}

/// Longer username used when [`default_username`] is already taken.
pub fn fallback_username(user_id: &uuid::Uuid) -> String {
    let simple = user_id.simple().to_string();
    format!("user_{}", &simple[..MAX_USERNAME_LEN - 5])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(validate_username("otaku_42").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("émile").is_err());
    }

    #[test]
    fn display_names() {
        assert!(validate_display_name("Kai").is_ok());
        assert!(validate_display_name("  ").is_err());
    }

    #[test]
    fn image_urls() {
        assert!(validate_image_url("https://cdn.myanimelist.net/x.jpg").is_ok());
        assert!(validate_image_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn fallback_username_fits_limit() {
        let id = uuid::Uuid::new_v4();
        let name = fallback_username(&id);
        assert_eq!(name.len(), MAX_USERNAME_LEN);
        assert!(validate_username(&name).is_ok());
        assert!(name.starts_with(&default_username(&id)));
    }

    #[test]
    fn default_username_is_valid() {
        let name = default_username(&uuid::Uuid::new_v4());
        assert_eq!(name.len(), 13);
        assert!(validate_username(&name).is_ok());
    }
}
