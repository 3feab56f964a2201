//! Storage-value adapters: wrapper types the persistence layer binds and
//! scans directly, routing through the default encryptor on the way.
//!
//! The [`StorageValue`] trait names the two operations explicitly; the
//! `rusqlite` [`ToSql`]/[`FromSql`] impls invoke them automatically whenever
//! a wrapper is bound as a query parameter or used as a scan destination, so
//! no caller-visible control flow branches on encryption state.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{de::DeserializeOwned, Serialize};

use crate::default;
use crate::error::Error;

/// The literal stored for an absent JSON document. Never encrypted, so a
/// trivially-empty unencrypted value can never be misread as ciphertext.
pub const EMPTY_JSON: &str = "{}";

/// Marshal to and from the representation written to a database column.
pub trait StorageValue: Sized {
    /// Render the value as the string to be written to storage.
    fn to_storage_representation(&self) -> Result<String, Error>;

    /// Reconstruct the value from the string read back from storage.
    fn from_storage_representation(raw: &str) -> Result<Self, Error>;
}

/// A string column transparently encrypted at rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptedString(pub String);

impl EncryptedString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for EncryptedString {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl StorageValue for EncryptedString {
    fn to_storage_representation(&self) -> Result<String, Error> {
        default::encrypt(&self.0)
    }

    fn from_storage_representation(raw: &str) -> Result<Self, Error> {
        default::decrypt(raw).map(Self)
    }
}

/// An optional JSON document column transparently encrypted at rest.
///
/// An absent document is stored as the bare [`EMPTY_JSON`] literal and read
/// back as absent without touching the encryptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptedJson<T>(pub Option<T>);

impl<T> EncryptedJson<T> {
    pub fn new(value: Option<T>) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> StorageValue for EncryptedJson<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_storage_representation(&self) -> Result<String, Error> {
        match &self.0 {
            None => Ok(EMPTY_JSON.to_owned()),
            Some(value) => {
                let json = serde_json::to_string(value)
                    .map_err(|e| Error::Encrypt(format!("failed to serialise JSON value: {e}")))?;
                default::encrypt(&json)
            }
        }
    }

    fn from_storage_representation(raw: &str) -> Result<Self, Error> {
        if raw == EMPTY_JSON {
            return Ok(Self(None));
        }
        let json = default::decrypt(raw)?;
        let value = serde_json::from_str(&json)
            .map_err(|e| Error::Decrypt(format!("failed to deserialise JSON value: {e}")))?;
        Ok(Self(Some(value)))
    }
}

// ---------------------------------------------------------------------------
// Driver boundary: bind and scan through the trait automatically
// ---------------------------------------------------------------------------

impl ToSql for EncryptedString {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let stored = self
            .to_storage_representation()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::from(stored))
    }
}

impl FromSql for EncryptedString {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        // A non-textual column value is a type error at the driver boundary.
        let raw = value.as_str()?;
        Self::from_storage_representation(raw).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl<T> ToSql for EncryptedJson<T>
where
    T: Serialize + DeserializeOwned,
{
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let stored = self
            .to_storage_representation()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::from(stored))
    }
}

impl<T> FromSql for EncryptedJson<T>
where
    T: Serialize + DeserializeOwned,
{
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        Self::from_storage_representation(raw).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
