//! Reusable field checks shared by every entity constructor and setter

use crate::error::{MelodyError, Result};

/// Reject blank (empty or whitespace-only) strings
pub fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MelodyError::empty_value(field));
    }
    Ok(())
}

/// Validate an e-mail address: non-empty, contains `@`, and the part after
/// the last `@` contains a dot
pub fn email(field: &str, value: &str) -> Result<()> {
    non_empty(field, value)?;

    match value.rsplit_once('@') {
        Some((_, domain)) if domain.contains('.') => Ok(()),
        _ => Err(MelodyError::InvalidEmail(value.to_string())),
    }
}

/// Reject sequences containing a blank string
pub fn non_empty_all<S: AsRef<str>>(field: &str, values: &[S]) -> Result<()> {
    values
        .iter()
        .try_for_each(|value| non_empty(field, value.as_ref()))
}

/// Drop repeated values, keeping first-insertion order
pub fn unique<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        push_unique(&mut out, value);
    }
    out
}

/// Push `value` unless it is already present, keeping first-insertion order
///
/// Returns `true` when the value was inserted.
pub fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) -> bool {
    if values.contains(&value) {
        return false;
    }
    values.push(value);
    true
}
