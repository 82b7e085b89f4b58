use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::net::TcpListener;
use std::thread;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use super::*;

const UUID: &str = "069a79f444e94726a5befca90e38aaf5";
const HASH: &str = "292009a4925b58f02c77dadc3ecef07ea4c7472f64e0fdc32ce5522489362680";

#[derive(Default)]
struct StubTransport {
    routes: HashMap<String, HttpResponse>,
    hits: RefCell<Vec<String>>,
}

impl StubTransport {
    fn route(mut self, url: impl Into<String>, response: HttpResponse) -> Self {
        self.routes.insert(url.into(), response);
        self
    }
}

impl HttpTransport for StubTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.hits.borrow_mut().push(url.to_string());
        self.routes.get(url).cloned().ok_or_else(|| Error::Fetch {
            url: url.to_string(),
            message: "connection refused".to_string(),
        })
    }
}

fn textures_blob(url: &str) -> String {
    STANDARD.encode(format!(
        r#"{{"timestamp":1700000000000,"profileId":"{UUID}","profileName":"Notch","textures":{{"SKIN":{{"url":"{url}"}}}}}}"#
    ))
}

fn session_body(value: &str) -> String {
    format!(
        r#"{{"id":"{UUID}","name":"Notch","properties":[{{"name":"textures","value":"{value}","signature":"c2ln"}}]}}"#
    )
}

fn solid_png() -> Vec<u8> {
    let mut png = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([12, 200, 40, 255])))
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    png
}

fn happy_transport() -> StubTransport {
    let endpoints = Endpoints::default();
    StubTransport::default()
        .route(
            endpoints.profile_lookup_url("Notch"),
            HttpResponse::new(200, format!(r#"{{"id":"{UUID}","name":"Notch"}}"#)),
        )
        .route(
            endpoints.session_profile_url(UUID),
            HttpResponse::new(
                200,
                session_body(&textures_blob(&format!(
                    "http://textures.minecraft.net/texture/{HASH}"
                ))),
            ),
        )
        .route(endpoints.texture_url(HASH), HttpResponse::new(200, solid_png()))
}

#[test]
fn resolves_skin_location_through_both_endpoints() {
    let client = MojangClient::with_transport(happy_transport());
    let location = client.resolve_skin("Notch").unwrap();
    assert_eq!(location.uuid, UUID);
    assert_eq!(location.texture_hash, HASH);
    assert!(location.url.starts_with("http://"));
    assert_eq!(
        location.texture_url(client.endpoints()),
        format!("{TEXTURES_BASE}/{HASH}")
    );
}

#[test]
fn downloads_and_decodes_texture() {
    let client = MojangClient::with_transport(happy_transport());
    let location = client.resolve_skin("Notch").unwrap();
    let atlas = client.fetch_texture(&location).unwrap();
    assert_eq!((atlas.width(), atlas.height()), (64, 64));
    assert_eq!(atlas.texel(5, 5), [12, 200, 40, 255]);
}

#[test]
fn no_content_is_player_not_found() {
    let endpoints = Endpoints::default();
    let transport = StubTransport::default().route(
        endpoints.profile_lookup_url("__nonexistent_user__"),
        HttpResponse::new(204, Vec::new()),
    );
    let client = MojangClient::with_transport(transport);

    let err = client.resolve_skin("__nonexistent_user__").unwrap_err();
    assert_eq!(
        err,
        Error::PlayerNotFound {
            username: "__nonexistent_user__".to_string()
        }
    );
    assert_eq!(find_skin_location(&client, "__nonexistent_user__"), Ok(None));
}

#[test]
fn names_outside_the_charset_never_reach_the_network() {
    let client = MojangClient::with_transport(StubTransport::default());

    for name in ["a/b?c", "../../etc", "", "Notch#1"] {
        assert_eq!(
            client.fetch_uuid(name),
            Err(Error::PlayerNotFound {
                username: name.to_string()
            })
        );
        assert_eq!(find_skin_location(&client, name), Ok(None));
    }
    assert!(client.transport().hits.borrow().is_empty());

    assert!(is_username_charset("__nonexistent_user__"));
    assert!(!is_username_charset("é"));
}

#[test]
fn session_without_content_is_texture_not_found() {
    let endpoints = Endpoints::default();
    let transport = StubTransport::default()
        .route(
            endpoints.profile_lookup_url("Notch"),
            HttpResponse::new(200, format!(r#"{{"id":"{UUID}"}}"#)),
        )
        .route(endpoints.session_profile_url(UUID), HttpResponse::new(204, Vec::new()));
    let client = MojangClient::with_transport(transport);

    assert!(matches!(
        client.resolve_skin("Notch"),
        Err(Error::TextureNotFound { .. })
    ));
    assert_eq!(find_skin_location(&client, "Notch"), Ok(None));
}

#[test]
fn blob_without_skin_is_texture_not_found() {
    let profile = Profile {
        uuid: UUID.to_string(),
        username: "Notch".to_string(),
        properties: vec![ProfileProperty {
            name: TEXTURES_PROPERTY.to_string(),
            value: STANDARD.encode(r#"{"timestamp":1,"textures":{}}"#),
            signature: None,
        }],
    };
    assert!(matches!(
        profile.skin_location(),
        Err(Error::TextureNotFound { .. })
    ));

    let bare = Profile {
        properties: Vec::new(),
        ..profile
    };
    assert!(matches!(
        bare.skin_location(),
        Err(Error::TextureNotFound { .. })
    ));
}

#[test]
fn malformed_base64_is_a_decode_error() {
    let endpoints = Endpoints::default();
    let transport = StubTransport::default()
        .route(
            endpoints.profile_lookup_url("Notch"),
            HttpResponse::new(200, format!(r#"{{"id":"{UUID}"}}"#)),
        )
        .route(
            endpoints.session_profile_url(UUID),
            HttpResponse::new(200, session_body("!!not*base64!!")),
        );
    let client = MojangClient::with_transport(transport);

    let err = find_skin_location(&client, "Notch").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "{err}");
}

#[test]
fn non_utf8_blob_is_a_decode_error() {
    let err = decode_textures_blob(&STANDARD.encode([0xff, 0xfe, 0x00])).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn falls_back_to_first_property() {
    let profile = Profile {
        uuid: UUID.to_string(),
        username: String::new(),
        properties: vec![ProfileProperty {
            name: "legacy".to_string(),
            value: textures_blob(&format!("https://textures.minecraft.net/texture/{HASH}")),
            signature: None,
        }],
    };
    assert_eq!(profile.skin_location().unwrap().texture_hash, HASH);
}

#[test]
fn network_failure_is_swallowed_by_lookup_but_not_by_fetch() {
    let client = MojangClient::with_transport(StubTransport::default());
    assert_eq!(find_skin_location(&client, "Notch"), Ok(None));

    let location = SkinLocation::new(UUID, format!("https://example.invalid/{HASH}")).unwrap();
    assert!(client.fetch_texture(&location).unwrap_err().is_fetch());
}

#[test]
fn server_error_is_http_status() {
    let endpoints = Endpoints::default();
    let transport = StubTransport::default().route(
        endpoints.profile_lookup_url("Notch"),
        HttpResponse::new(503, "busy"),
    );
    let client = MojangClient::with_transport(transport);
    assert_eq!(
        client.fetch_uuid("Notch"),
        Err(Error::HttpStatus {
            url: endpoints.profile_lookup_url("Notch"),
            status: 503
        })
    );
}

#[test]
fn garbage_texture_is_a_decode_error() {
    let endpoints = Endpoints::default();
    let transport = StubTransport::default()
        .route(endpoints.texture_url(HASH), HttpResponse::new(200, "<html>oops</html>"));
    let client = MojangClient::with_transport(transport);
    let location = SkinLocation::new(UUID, format!("http://x/{HASH}")).unwrap();

    let err = client.fetch_texture(&location).unwrap_err();
    assert!(matches!(err, Error::Decode { context: "skin texture", .. }));
}

#[test]
fn empty_hash_is_rejected() {
    assert!(matches!(
        SkinLocation::new(UUID, "https://textures.minecraft.net/texture/"),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn endpoints_tolerate_trailing_slashes() {
    let endpoints = Endpoints {
        api_base: "http://127.0.0.1:1/".to_string(),
        session_base: "http://127.0.0.1:2".to_string(),
        textures_base: "http://127.0.0.1:3/texture/".to_string(),
    };
    assert_eq!(
        endpoints.profile_lookup_url("a"),
        "http://127.0.0.1:1/users/profiles/minecraft/a"
    );
    assert_eq!(
        endpoints.session_profile_url("b"),
        "http://127.0.0.1:2/session/minecraft/profile/b"
    );
    assert_eq!(endpoints.texture_url("c"), "http://127.0.0.1:3/texture/c");
}

#[test]
fn closures_are_lookups() {
    let lookup = |username: &str| -> Result<SkinLocation> {
        Err(Error::PlayerNotFound {
            username: username.to_string(),
        })
    };
    assert_eq!(find_skin_location(&lookup, "nobody"), Ok(None));
}

/// Serves one canned HTTP/1.1 response on a loopback port.
fn serve_once(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(response.as_bytes()).unwrap();
    });
    format!("http://{addr}")
}

#[test]
fn reqwest_transport_maps_no_content_to_not_found() {
    let base = serve_once("HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n");
    let http = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();
    let client =
        MojangClient::with_transport(ReqwestTransport::with_client(http)).with_endpoints(
            Endpoints {
                api_base: base,
                ..Endpoints::default()
            },
        );

    assert_eq!(find_skin_location(&client, "__nonexistent_user__"), Ok(None));
}
