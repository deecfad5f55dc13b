//! Error types for codec operations

use thiserror::Error;

/// Error type for codec operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("invalid data in {0}: {1}")]
    InvalidData(&'static str, &'static str), // context, message
    #[error("{field} mismatch: expected {expected}, found {found}")]
    Mismatch {
        field: &'static str,
        expected: u64,
        found: u64,
    },
    #[error("{field} at byte {offset}: {source}")]
    Field {
        field: &'static str,
        offset: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attributes this error to `field`, located `offset` bytes into the enclosing record.
    pub fn at(self, field: &'static str, offset: usize) -> Self {
        Error::Field {
            field,
            offset,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping any field attribution.
    pub fn root(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the dotted field path leading to the innermost error (e.g. `contexts.data_length`).
    pub fn path(&self) -> String {
        let mut path = Vec::new();
        let mut current = self;
        while let Error::Field { field, source, .. } = current {
            path.push(*field);
            current = source;
        }
        path.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_attribution() {
        let err = Error::EndOfBuffer.at("data_length", 2).at("contexts", 112);
        assert_eq!(err.root(), &Error::EndOfBuffer);
        assert_eq!(err.path(), "contexts.data_length");
        assert_eq!(
            err.to_string(),
            "contexts at byte 112: data_length at byte 2: unexpected end of buffer"
        );
    }

    #[test]
    fn test_unattributed() {
        let err = Error::ExtraData(3);
        assert_eq!(err.root(), &err);
        assert_eq!(err.path(), "");
    }
}
