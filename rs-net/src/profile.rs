//! Session profile shapes and the signed `textures` blob.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use crate::client::Endpoints;
use crate::error::{Error, Result};

pub const TEXTURES_PROPERTY: &str = "textures";

/// Body of `users/profiles/minecraft/{username}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProfileLookupResponse {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileProperty {
    pub name: String,
    /// Base64 encoded JSON.
    pub value: String,
    #[serde(default)]
    pub signature: Option<String>,
}

/// Body of `session/minecraft/profile/{uuid}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(rename = "id")]
    pub uuid: String,
    #[serde(rename = "name", default)]
    pub username: String,
    #[serde(default)]
    pub properties: Vec<ProfileProperty>,
}

impl Profile {
    /// The property named `textures`, or the first one if the service named it differently.
    pub fn textures_property(&self) -> Option<&ProfileProperty> {
        self.properties
            .iter()
            .find(|p| p.name == TEXTURES_PROPERTY)
            .or_else(|| self.properties.first())
    }

    pub fn textures(&self) -> Result<Option<TexturesPayload>> {
        self.textures_property()
            .map(|p| decode_textures_blob(&p.value))
            .transpose()
    }

    pub fn skin_location(&self) -> Result<SkinLocation> {
        let not_found = || Error::TextureNotFound {
            uuid: self.uuid.clone(),
        };
        let skin = self
            .textures()?
            .and_then(|payload| payload.textures)
            .and_then(|textures| textures.skin)
            .ok_or_else(not_found)?;
        SkinLocation::new(&self.uuid, skin.url)
    }
}

pub fn decode_textures_blob(value: &str) -> Result<TexturesPayload> {
    let bytes = STANDARD
        .decode(value.trim())
        .map_err(|e| Error::decode("textures property (base64)", e))?;
    let text =
        String::from_utf8(bytes).map_err(|e| Error::decode("textures property (utf-8)", e))?;
    serde_json::from_str(&text).map_err(|e| Error::decode("textures property (json)", e))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturesPayload {
    pub timestamp: Option<u64>,
    pub profile_id: Option<String>,
    pub profile_name: Option<String>,
    pub textures: Option<Textures>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Textures {
    #[serde(rename = "SKIN")]
    pub skin: Option<TextureRef>,
    #[serde(rename = "CAPE")]
    pub cape: Option<TextureRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureRef {
    pub url: String,
    pub metadata: Option<TextureMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextureMetadata {
    pub model: Option<String>,
}

/// Where a player's skin lives on the texture CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinLocation {
    pub uuid: String,
    /// URL exactly as published in the profile blob.
    pub url: String,
    /// Last path segment of `url`; the CDN key.
    pub texture_hash: String,
}

impl SkinLocation {
    pub fn new(uuid: &str, url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let texture_hash = url
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::decode("skin url", format!("no texture hash in {url:?}")))?;
        Ok(Self {
            uuid: uuid.to_string(),
            url,
            texture_hash,
        })
    }

    /// Download URL rebuilt from the hash, so `http://` links in old profiles go through the
    /// configured base.
    pub fn texture_url(&self, endpoints: &Endpoints) -> String {
        endpoints.texture_url(&self.texture_hash)
    }
}
