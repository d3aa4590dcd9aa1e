use super::ApiError;

pub fn validate_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Email cannot be empty"));
    }

    if !trimmed.contains('@') || trimmed.len() > 254 {
        return Err(ApiError::validation(format!(
            "Invalid email address: {}",
            email
        )));
    }

    Ok(trimmed)
}

pub fn validate_site_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Site name cannot be empty"));
    }

    if trimmed.len() > 50 {
        return Err(ApiError::validation(
            "Site name must be 50 characters or less",
        ));
    }

    Ok(trimmed)
}
