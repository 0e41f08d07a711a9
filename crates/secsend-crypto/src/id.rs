//! Tagged object identifiers: the private [`RootId`] and the public [`FileId`]
//!
//! On the wire an ID is 11 bytes: one kind byte followed by a 10-byte body,
//! base64url-encoded without `=` padding. [`RootId`] is the write/delete
//! capability the uploader holds; [`FileId`] is a one-way hash of it and is
//! the read capability safely shared with recipients.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::{CryptoError, Result};
use crate::key::Key;

/// Byte length of an ID body (excludes the kind byte)
pub const ID_LEN: usize = 10;

const KIND_FILE: u8 = 0;
const KIND_ROOT: u8 = 1;

/// Which kind of ID a textual form decoded to, or was required to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Public read capability
    File,
    /// Private write/delete capability
    Root,
}

impl Kind {
    fn byte(self) -> u8 {
        match self {
            Kind::File => KIND_FILE,
            Kind::Root => KIND_ROOT,
        }
    }

    fn from_byte(b: u8) -> Option<Kind> {
        match b {
            KIND_FILE => Some(Kind::File),
            KIND_ROOT => Some(Kind::Root),
            _ => None,
        }
    }
}

fn render(kind: Kind, body: &[u8; ID_LEN]) -> String {
    let mut buf = Vec::with_capacity(1 + ID_LEN);
    buf.push(kind.byte());
    buf.extend_from_slice(body);
    URL_SAFE_NO_PAD.encode(buf)
}

fn parse_raw(s: &str, expected: Option<Kind>) -> Result<(Kind, [u8; ID_LEN])> {
    let decoded = URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|_| CryptoError::IdInvalid(s.to_string()))?;

    let kind_byte = *decoded
        .first()
        .ok_or_else(|| CryptoError::IdInvalid(s.to_string()))?;
    let kind = match (Kind::from_byte(kind_byte), expected) {
        (Some(k), None) => k,
        (Some(k), Some(want)) if k == want => k,
        // Unknown kind byte but caller fixed a kind: still a "wrong type",
        // matching the original decoder which only ever compares to the
        // caller-fixed kind and never validates the byte otherwise.
        (_, Some(_)) => return Err(CryptoError::IdWrongType(s.to_string())),
        (None, None) => return Err(CryptoError::IdInvalid(s.to_string())),
    };

    let body = &decoded[1..];
    if body.len() != ID_LEN {
        return Err(CryptoError::IdInvalid(s.to_string()));
    }
    let mut out = [0u8; ID_LEN];
    out.copy_from_slice(body);
    Ok((kind, out))
}

/// The public, shareable read handle: a one-way hash of a [`RootId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub [u8; ID_LEN]);

impl FileId {
    /// Parse a textual file ID
    pub fn parse(s: &str) -> Result<Self> {
        let (_, body) = parse_raw(s, Some(Kind::File))?;
        Ok(Self(body))
    }

    /// Render to the base64url-no-pad textual form
    pub fn render(&self) -> String {
        render(Kind::File, &self.0)
    }

    /// Lowercase-hex of the full 10-byte body, used for on-disk filenames
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// The private write/delete capability minted by `upload/new`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootId(pub [u8; ID_LEN]);

impl RootId {
    /// Generate a fresh random root ID
    pub fn generate() -> Self {
        let mut body = [0u8; ID_LEN];
        OsRng.fill_bytes(&mut body);
        Self(body)
    }

    /// Parse a textual root ID
    pub fn parse(s: &str) -> Result<Self> {
        let (_, body) = parse_raw(s, Some(Kind::Root))?;
        Ok(Self(body))
    }

    /// Render to the base64url-no-pad textual form
    pub fn render(&self) -> String {
        render(Kind::Root, &self.0)
    }

    /// Derive this root ID's public [`FileId`]: `SHA-256("secsend_fiid" || root)[0:10]`
    pub fn file_id(&self) -> FileId {
        let mut hasher = Sha256::new();
        hasher.update(b"secsend_fiid");
        hasher.update(self.0);
        let digest = hasher.finalize();
        let mut out = [0u8; ID_LEN];
        out.copy_from_slice(&digest[..ID_LEN]);
        FileId(out)
    }
}

impl std::fmt::Display for RootId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Either kind of ID, used where the caller hasn't fixed which is expected
/// (e.g. parsing the `id` query parameter of a share URL)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyId {
    /// A public read handle
    File(FileId),
    /// A private write/delete capability
    Root(RootId),
}

impl AnyId {
    /// Parse a textual ID of either kind, letting the wire kind byte decide
    pub fn parse(s: &str) -> Result<Self> {
        let (kind, body) = parse_raw(s, None)?;
        Ok(match kind {
            Kind::File => AnyId::File(FileId(body)),
            Kind::Root => AnyId::Root(RootId(body)),
        })
    }

    /// Render back to its textual form
    pub fn render(&self) -> String {
        match self {
            AnyId::File(id) => id.render(),
            AnyId::Root(id) => id.render(),
        }
    }

    /// Resolve to the file ID a download would use: pass through a file ID,
    /// or derive one from a root ID
    pub fn to_file_id(&self) -> FileId {
        match self {
            AnyId::File(id) => *id,
            AnyId::Root(id) => id.file_id(),
        }
    }
}

/// A full share link: server origin, the ID it points at, and the key
/// carried in the fragment (never sent to the server).
///
/// Accepts both the current `/dl?id=<id>#<key>` form and the legacy
/// `/v1/download/<id>#<key>` form on parse; always renders the current form.
#[derive(Debug, Clone)]
pub struct ShareUrl {
    /// Scheme + host (+ optional port), no trailing slash
    pub server: String,
    /// The ID embedded in the link — a [`RootId`] (sender's own copy) or a
    /// [`FileId`] (what's handed to a recipient)
    pub id: AnyId,
    /// The key from the fragment. `None` when the fragment was empty, which
    /// the original client treats as "link copied without a key".
    pub key: Option<Key>,
}

impl ShareUrl {
    /// Parse a share link in either the current or legacy path form
    pub fn parse(raw: &str) -> Result<Self> {
        let url = url::Url::parse(raw).map_err(|_| CryptoError::IdInvalid(raw.to_string()))?;

        let id_str = if let Some(rest) = url.path().strip_prefix("/v1/download/") {
            rest.to_string()
        } else if url.path() == "/dl" {
            url.query_pairs()
                .find(|(k, _)| k == "id")
                .map(|(_, v)| v.into_owned())
                .ok_or_else(|| CryptoError::IdInvalid(raw.to_string()))?
        } else {
            return Err(CryptoError::IdInvalid(raw.to_string()));
        };
        let id = AnyId::parse(&id_str)?;

        let key = match url.fragment() {
            None | Some("") => None,
            Some(frag) => Some(
                Key::from_base36(frag).ok_or_else(|| CryptoError::IdInvalid(raw.to_string()))?,
            ),
        };

        let server = match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), url.host_str().unwrap_or(""), port),
            None => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("")),
        };

        Ok(Self { server, id, key })
    }

    /// Render in the current `/dl?id=...#key` form
    pub fn render(&self) -> String {
        let key_txt = self.key.as_ref().map(Key::to_base36).unwrap_or_default();
        format!("{}/dl?id={}#{}", self.server, self.id.render(), key_txt)
    }

    /// Rewrite a root-id link into the file-id link handed to a recipient
    pub fn into_file_share(self) -> Self {
        let id = AnyId::File(self.id.to_file_id());
        Self { id, ..self }
    }
}
