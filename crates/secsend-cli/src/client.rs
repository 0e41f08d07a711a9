//! A thin async wrapper over the relay's `/v1` HTTP API, grounded in the
//! original `cli/secsend/client.py::ClientAPI`.

use reqwest::{Body, Response};
use thiserror::Error;

use secsend_crypto::{AnyId, FileId, RootId};
use secsend_protocol::wire::{ConfigResponse, EmptyResponse, ErrorResponse, MetadataResponse, UploadNewResponse};
use secsend_protocol::EncryptedFileMetadata;

/// Errors talking to a relay server
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client itself failed (DNS, connect, TLS, body read, ...)
    #[error("request to relay failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-2xx status and an error body
    #[error("relay returned an error: {0}")]
    Server(String),

    /// The relay's root-id response didn't parse as one
    #[error(transparent)]
    Id(#[from] secsend_crypto::CryptoError),
}

type Result<T> = std::result::Result<T, ClientError>;

/// Talks to one relay server's `/v1` API
pub struct Client {
    http: reqwest::Client,
    server: String,
}

impl Client {
    /// Build a client pointed at `server` (e.g. `http://127.0.0.1:8080`)
    pub fn new(server: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            server: server.as_ref().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: impl std::fmt::Display) -> String {
        format!("{}/v1/{}", self.server, path)
    }

    async fn check_status(resp: Response) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let message = resp
            .json::<ErrorResponse>()
            .await
            .map(|e| e.message)
            .unwrap_or_else(|_| status.to_string());
        Err(ClientError::Server(message))
    }

    /// `GET /v1/config`
    pub async fn config(&self) -> Result<ConfigResponse> {
        let resp = self.http.get(self.url("config")).send().await?;
        Ok(Self::check_status(resp).await?.json().await?)
    }

    /// `GET /v1/metadata/<file_id>`
    pub async fn metadata(&self, file_id: FileId) -> Result<MetadataResponse> {
        let resp = self.http.get(self.url(format!("metadata/{}", file_id.render()))).send().await?;
        Ok(Self::check_status(resp).await?.json().await?)
    }

    /// `GET /v1/download/<file_id>`, resuming at `seek` output bytes if non-zero
    pub async fn download(&self, file_id: FileId, seek: u64) -> Result<Response> {
        let mut req = self.http.get(self.url(format!("download/{}", file_id.render())));
        if seek > 0 {
            req = req.header(reqwest::header::RANGE, format!("bytes={seek}-"));
        }
        let resp = req.send().await?;
        Self::check_status(resp).await
    }

    /// `POST /v1/upload/new`
    pub async fn upload_new(&self, metadata: &EncryptedFileMetadata) -> Result<RootId> {
        let resp = self.http.post(self.url("upload/new")).json(metadata).send().await?;
        let created: UploadNewResponse = Self::check_status(resp).await?.json().await?;
        Ok(RootId::parse(&created.root_id)?)
    }

    /// `POST /v1/upload/push/<root_id>`, with the whole ciphertext body
    /// streamed from `body` in one call
    pub async fn upload_push(&self, root_id: RootId, body: Body) -> Result<()> {
        let resp = self
            .http
            .post(self.url(format!("upload/push/{}", root_id.render())))
            .body(body)
            .send()
            .await?;
        Self::check_status(resp).await?.json::<EmptyResponse>().await?;
        Ok(())
    }

    /// `POST /v1/upload/finish/<root_id>`
    pub async fn upload_finish(&self, root_id: RootId) -> Result<()> {
        let resp = self.http.post(self.url(format!("upload/finish/{}", root_id.render()))).send().await?;
        Self::check_status(resp).await?.json::<EmptyResponse>().await?;
        Ok(())
    }

    /// `POST /v1/delete/<id>`
    pub async fn delete(&self, id: AnyId) -> Result<()> {
        let resp = self.http.post(self.url(format!("delete/{}", id.render()))).send().await?;
        Self::check_status(resp).await?.json::<EmptyResponse>().await?;
        Ok(())
    }
}
