//! `secsend send` — encrypt a file and upload it

use std::io::SeekFrom;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use futures::stream;
use rand::rngs::OsRng;
use rand::RngCore;
use tokio::io::AsyncSeekExt;

use secsend_crypto::envelope::{sign_key, verify_key, ChunkEnvelope, Mode};
use secsend_crypto::{AnyId, Key, RootId, ShareUrl};
use secsend_protocol::{decrypt_metadata, encrypt_metadata, ChunkPlan, FileMetadata, StreamTransform};

use crate::cli::SendArgs;
use crate::client::Client;
use crate::output::{color, format_size};

/// Wrap a [`StreamTransform`] as a [`reqwest::Body`] the client can push in
/// one streaming call, without buffering the whole ciphertext in memory.
fn transform_body<R>(transform: StreamTransform<R>) -> reqwest::Body
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    let blocks = stream::unfold(transform, |mut transform| async move {
        match transform.next_block().await {
            Ok(Some(block)) => Some((Ok(Bytes::from(block)), transform)),
            Ok(None) => None,
            Err(e) => Some((Err(std::io::Error::other(e.to_string())), transform)),
        }
    });
    reqwest::Body::wrap_stream(blocks)
}

/// Everything the push/finish/share-link steps need, whichever path
/// produced it.
struct UploadStart {
    client: Client,
    server: String,
    root_id: RootId,
    key: Key,
    seal_env: ChunkEnvelope,
    plain_chunk_size: u32,
    out_seek: u64,
}

/// Mint a fresh key/iv, seal the metadata, and register a brand-new root-id.
async fn start_new(args: &SendArgs, name: String) -> Result<UploadStart> {
    let client = Client::new(&args.server);

    let key = Key::generate();
    let mut iv = [0u8; 12];
    OsRng.fill_bytes(&mut iv);
    let key_sign = sign_key(&key, &iv);

    let plain_meta = FileMetadata::new(name, args.mime_type.clone(), iv, args.chunk_size, key_sign, args.timeout_s);
    let seal_env = ChunkEnvelope::new(iv, &key, Mode::Encrypt);
    let wire_meta = encrypt_metadata(&plain_meta, &seal_env)?;

    let root_id = client.upload_new(&wire_meta).await?;

    Ok(UploadStart {
        client,
        server: args.server.trim_end_matches('/').to_string(),
        root_id,
        key,
        seal_env,
        plain_chunk_size: args.chunk_size,
        out_seek: 0,
    })
}

/// Resume a previously started upload from its owner link: recover the
/// key/iv/chunk_size the relay already has on file instead of minting a
/// fresh envelope, and resume from however many ciphertext bytes the relay
/// already holds. Grounded on `cli/secsend/stream.py::UploadCtx.upload_resume`.
async fn resume_upload(link: &str) -> Result<UploadStart> {
    let share = ShareUrl::parse(link).context("parsing resume link")?;
    let root_id = match share.id {
        AnyId::Root(root_id) => root_id,
        AnyId::File(_) => bail!(
            "this is a recipient link, not an owner link — resuming requires the link `send` printed for you"
        ),
    };
    let key = share.key.context("resume link is missing its key fragment")?;
    let file_id = root_id.file_id();

    let client = Client::new(&share.server);
    let stored = client.metadata(file_id).await?;
    if stored.metadata.complete {
        bail!("this upload already finished — nothing to resume");
    }

    let iv: [u8; 12] = stored
        .metadata
        .iv
        .as_slice()
        .try_into()
        .context("relay sent a malformed iv")?;
    let key_sign: [u8; 32] = stored
        .metadata
        .key_sign
        .as_slice()
        .try_into()
        .context("relay sent a malformed key-proof")?;
    if !verify_key(&key_sign, &key, &iv) {
        bail!("wrong key: could not verify this link's key-proof");
    }

    let dec_env = ChunkEnvelope::new(iv, &key, Mode::Decrypt);
    let plain_meta = decrypt_metadata(&stored.metadata, &dec_env)?;
    let seal_env = ChunkEnvelope::new(iv, &key, Mode::Encrypt);

    Ok(UploadStart {
        client,
        server: share.server,
        root_id,
        key,
        seal_env,
        plain_chunk_size: plain_meta.chunk_size,
        out_seek: stored.size,
    })
}

pub async fn execute(args: SendArgs) -> Result<()> {
    let name = args
        .file
        .file_name()
        .context("path has no file name")?
        .to_string_lossy()
        .into_owned();
    let mut source = tokio::fs::File::open(&args.file)
        .await
        .with_context(|| format!("opening {}", args.file.display()))?;
    let size = source.metadata().await?.len();

    let start = match &args.resume {
        Some(link) => resume_upload(link).await?,
        None => start_new(&args, name).await?,
    };

    let plan = ChunkPlan::new(&start.seal_env, start.plain_chunk_size as usize, start.out_seek);
    if start.out_seek > 0 {
        source
            .seek(SeekFrom::Start(plan.chunk_seek))
            .await
            .context("seeking to resume point")?;
    }

    let (transform, _) = StreamTransform::new(start.seal_env, source, start.plain_chunk_size as usize, start.out_seek);
    start.client.upload_push(start.root_id, transform_body(transform)).await?;
    start.client.upload_finish(start.root_id).await?;

    let share = ShareUrl {
        server: start.server,
        id: AnyId::Root(start.root_id),
        key: Some(start.key),
    };
    let owner_link = share.render();
    let recipient_link = share.into_file_share().render();

    color::success(&format!("uploaded {} ({})", args.file.display(), format_size(size)));
    color::info(&format!("share this link with the recipient:\n  {recipient_link}"));
    color::info(&format!("keep this link to delete the file later:\n  {owner_link}"));

    Ok(())
}
