/// Boundary check for request bodies. Runs after JSON decoding and before
/// any service code sees the value.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Reject empty or whitespace-only text and text longer than `max` chars.
pub fn require_text(field: &str, value: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", field));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{} must be at most {} characters", field, max));
    }
    Ok(())
}
