//! Relying-party application records.
//!
//! Applications are provisioned outside this service; the store only reads
//! them. Each one carries the symmetric secret its session tokens are signed
//! with.
use serde::Deserialize;
use std::fmt;

pub type AppId = i32;

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct App {
    pub id: AppId,
    pub name: String,
    #[serde(deserialize_with = "secret_from_str")]
    pub secret: Vec<u8>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// Config files carry secrets as plain strings.
fn secret_from_str<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.into_bytes())
}
