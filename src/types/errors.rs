use std::fmt;

// === FieldErrors ===

/// Validation failures keyed by field name, suitable for rendering next to
/// the offending form field. Preserves insertion order; a field may appear
/// at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Records a message for a field, keeping the first message if the
    /// field already has one.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field.to_string(), message.into()));
        }
    }

    /// Returns the message recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

// === EntryError ===

/// Errors related to url entry operations.
#[derive(Debug)]
pub enum EntryError {
    /// Entry with the given ID was not found, is owned by another user, or
    /// is not in the state the operation requires.
    NotFound(String),
    /// One or more submitted fields failed validation.
    Validation(FieldErrors),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryError::NotFound(id) => write!(f, "Entry not found: {}", id),
            EntryError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            EntryError::DatabaseError(msg) => write!(f, "Entry database error: {}", msg),
        }
    }
}

impl std::error::Error for EntryError {}

// === TransferError ===

/// Errors related to the CSV import/export boundary.
#[derive(Debug)]
pub enum TransferError {
    /// CSV data could not be read or written.
    Csv(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Csv(msg) => write!(f, "CSV error: {}", msg),
            TransferError::DatabaseError(msg) => {
                write!(f, "Transfer database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for TransferError {}
