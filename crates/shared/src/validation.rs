use crate::constants::*;

/// Trims a chat message and checks it is non-empty and within bounds.
/// Returns the trimmed content on success.
pub fn validate_message_content(content: &str) -> Result<&str, String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err("Message content is required".into());
    }
    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(format!(
            "Message must be at most {} characters",
            MAX_MESSAGE_LENGTH
        ));
    }
    Ok(trimmed)
}

pub fn validate_hire_message(message: &str) -> Result<&str, String> {
    let trimmed = message.trim();
    if trimmed.chars().count() > MAX_HIRE_MESSAGE_LENGTH {
        return Err(format!(
            "Hiring message must be at most {} characters",
            MAX_HIRE_MESSAGE_LENGTH
        ));
    }
    Ok(trimmed)
}

pub fn validate_display_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if len < MIN_DISPLAY_NAME_LENGTH {
        return Err(format!(
            "Name must be at least {} characters",
            MIN_DISPLAY_NAME_LENGTH
        ));
    }
    if len > MAX_DISPLAY_NAME_LENGTH {
        return Err(format!(
            "Name must be at most {} characters",
            MAX_DISPLAY_NAME_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_location(location: &str) -> Result<(), String> {
    if location.trim().chars().count() > MAX_LOCATION_LENGTH {
        return Err(format!(
            "Location must be at most {} characters",
            MAX_LOCATION_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_post_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Post title is required".into());
    }
    if trimmed.chars().count() > MAX_POST_TITLE_LENGTH {
        return Err(format!(
            "Post title must be at most {} characters",
            MAX_POST_TITLE_LENGTH
        ));
    }
    Ok(())
}

pub fn validate_post_description(description: &str) -> Result<(), String> {
    if description.chars().count() > MAX_POST_DESCRIPTION_LENGTH {
        return Err(format!(
            "Post description must be at most {} characters",
            MAX_POST_DESCRIPTION_LENGTH
        ));
    }
    Ok(())
}
