//! Blocking client for the Mojang profile, session and texture services.

use rs_utils::TextureAtlas;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::http::{HttpResponse, HttpTransport, ReqwestTransport};
use crate::profile::{Profile, ProfileLookupResponse, SkinLocation};

pub const API_BASE: &str = "https://api.mojang.com";
pub const SESSION_BASE: &str = "https://sessionserver.mojang.com";
pub const TEXTURES_BASE: &str = "https://textures.minecraft.net/texture";

/// Base URLs of the three services. Overridable for tests and mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub session_base: String,
    pub textures_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            session_base: SESSION_BASE.to_string(),
            textures_base: TEXTURES_BASE.to_string(),
        }
    }
}

impl Endpoints {
    pub fn profile_lookup_url(&self, username: &str) -> String {
        format!(
            "{}/users/profiles/minecraft/{username}",
            self.api_base.trim_end_matches('/')
        )
    }

    pub fn session_profile_url(&self, uuid: &str) -> String {
        format!(
            "{}/session/minecraft/profile/{uuid}",
            self.session_base.trim_end_matches('/')
        )
    }

    pub fn texture_url(&self, texture_hash: &str) -> String {
        format!("{}/{texture_hash}", self.textures_base.trim_end_matches('/'))
    }
}

/// Username to skin location.
pub trait ProfileLookup {
    fn lookup_skin(&self, username: &str) -> Result<SkinLocation>;
}

impl<F> ProfileLookup for F
where
    F: Fn(&str) -> Result<SkinLocation>,
{
    fn lookup_skin(&self, username: &str) -> Result<SkinLocation> {
        self(username)
    }
}

/// Skin location to decoded atlas.
pub trait TextureFetch {
    fn fetch_texture(&self, location: &SkinLocation) -> Result<TextureAtlas>;
}

impl<F> TextureFetch for F
where
    F: Fn(&SkinLocation) -> Result<TextureAtlas>,
{
    fn fetch_texture(&self, location: &SkinLocation) -> Result<TextureAtlas> {
        self(location)
    }
}

pub struct MojangClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    endpoints: Endpoints,
}

impl<T: HttpTransport> MojangClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            endpoints: Endpoints::default(),
        }
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Names outside the Mojang charset cannot exist, so they are not sent.
    pub fn fetch_uuid(&self, username: &str) -> Result<String> {
        if !is_username_charset(username) {
            debug!(username, "username has characters Mojang does not allow");
            return Err(Error::PlayerNotFound {
                username: username.to_string(),
            });
        }
        let url = self.endpoints.profile_lookup_url(username);
        let response = self.transport.get(&url)?;
        if response.is_missing() {
            return Err(Error::PlayerNotFound {
                username: username.to_string(),
            });
        }
        let lookup: ProfileLookupResponse =
            parse_json(&url, require_success(&url, response)?, "profile lookup")?;
        debug!(username, uuid = %lookup.id, "resolved uuid");
        Ok(lookup.id)
    }

    pub fn fetch_profile(&self, uuid: &str) -> Result<Profile> {
        let url = self.endpoints.session_profile_url(uuid);
        let response = self.transport.get(&url)?;
        if response.is_missing() {
            return Err(Error::TextureNotFound {
                uuid: uuid.to_string(),
            });
        }
        let profile: Profile = parse_json(&url, require_success(&url, response)?, "session profile")?;
        debug!(uuid, properties = profile.properties.len(), "fetched session profile");
        Ok(profile)
    }

    pub fn resolve_skin(&self, username: &str) -> Result<SkinLocation> {
        let uuid = self.fetch_uuid(username)?;
        let location = self.fetch_profile(&uuid)?.skin_location()?;
        info!(username, uuid = %location.uuid, url = %location.url, "resolved skin");
        Ok(location)
    }

    /// Single GET of the atlas; no retry.
    pub fn download_texture(&self, location: &SkinLocation) -> Result<TextureAtlas> {
        let url = location.texture_url(&self.endpoints);
        let response = require_success(&url, self.transport.get(&url)?)?;
        let atlas =
            TextureAtlas::decode(&response.body).map_err(|e| Error::decode("skin texture", e))?;
        info!(
            hash = %location.texture_hash,
            width = atlas.width(),
            height = atlas.height(),
            "downloaded skin texture"
        );
        Ok(atlas)
    }
}

impl<T: HttpTransport> ProfileLookup for MojangClient<T> {
    fn lookup_skin(&self, username: &str) -> Result<SkinLocation> {
        self.resolve_skin(username)
    }
}

impl<T: HttpTransport> TextureFetch for MojangClient<T> {
    fn fetch_texture(&self, location: &SkinLocation) -> Result<TextureAtlas> {
        self.download_texture(location)
    }
}

/// Non-empty and only ASCII letters, digits and underscores. Length is not checked.
pub fn is_username_charset(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Lookup that reports "not found" as `Ok(None)`.
///
/// Missing players, missing skins and network failures are logged and swallowed; a profile
/// blob that fails to decode is still an error.
pub fn find_skin_location<L>(lookup: &L, username: &str) -> Result<Option<SkinLocation>>
where
    L: ProfileLookup + ?Sized,
{
    match lookup.lookup_skin(username) {
        Ok(location) => Ok(Some(location)),
        Err(e) if e.is_not_found() => {
            warn!("{e}");
            Ok(None)
        }
        Err(e) if e.is_fetch() => {
            warn!("error retrieving skin texture for username {username}: {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn require_success(url: &str, response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(Error::HttpStatus {
            url: url.to_string(),
            status: response.status,
        })
    }
}

fn parse_json<D: DeserializeOwned>(
    url: &str,
    response: HttpResponse,
    context: &'static str,
) -> Result<D> {
    serde_json::from_slice(&response.body).map_err(|e| {
        debug!(url, "unparseable body");
        Error::decode(context, e)
    })
}
