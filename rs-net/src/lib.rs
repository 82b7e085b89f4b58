//! Profile resolution and skin download against the Mojang services.
//!
//! Everything goes through [`HttpTransport`], so the resolver and fetcher can be driven by a
//! stub in tests.

mod client;
mod error;
mod http;
mod profile;

#[cfg(test)]
mod tests;

pub use client::{
    API_BASE, Endpoints, MojangClient, ProfileLookup, SESSION_BASE, TEXTURES_BASE, TextureFetch,
    find_skin_location, is_username_charset,
};
pub use error::{Error, Result};
pub use http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpResponse, HttpTransport, ReqwestTransport};
pub use profile::{
    Profile, ProfileProperty, SkinLocation, TEXTURES_PROPERTY, TextureMetadata, TextureRef,
    Textures, TexturesPayload, decode_textures_blob,
};
