//! `secsend receive` — download and decrypt a file from a share link

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use secsend_crypto::envelope::{verify_key, ChunkEnvelope, Mode, TAG_SIZE};
use secsend_crypto::ShareUrl;
use secsend_protocol::{decrypt_metadata, ChunkPlan, StreamTransform};

use crate::cli::ReceiveArgs;
use crate::client::Client;
use crate::output::{color, format_size, prompts};

pub async fn execute(args: ReceiveArgs) -> Result<()> {
    let share = ShareUrl::parse(&args.url).context("parsing share link")?;
    let key = match share.key {
        Some(key) => key,
        None => prompts::ask_key().context("reading key")?,
    };
    let file_id = share.id.to_file_id();

    let client = Client::new(&share.server);
    let stored = client.metadata(file_id).await?;
    if !stored.metadata.complete {
        bail!("upload is not finished yet");
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
    let ciphertext_chunk_size = plain_meta.chunk_size as usize + TAG_SIZE;

    let output: PathBuf = args.output.clone().unwrap_or_else(|| PathBuf::from(&plain_meta.name));

    let out_seek = if args.resume {
        match tokio::fs::metadata(&output).await {
            Ok(m) => m.len(),
            Err(_) => 0,
        }
    } else {
        0
    };

    let plan = ChunkPlan::new(&dec_env, ciphertext_chunk_size, out_seek);
    let resp = client.download(file_id, plan.chunk_seek).await?;
    let byte_stream = resp.bytes_stream().map_err(std::io::Error::other);
    let reader = StreamReader::new(byte_stream);

    let (mut transform, _) = StreamTransform::new(dec_env, reader, ciphertext_chunk_size, out_seek);

    let mut out_file = if out_seek > 0 {
        tokio::fs::OpenOptions::new().append(true).open(&output).await?
    } else {
        tokio::fs::OpenOptions::new().write(true).create(true).truncate(true).open(&output).await?
    };

    let mut written = out_seek;
    while let Some(block) = transform.next_block().await? {
        out_file.write_all(&block).await?;
        written += block.len() as u64;
    }
    out_file.flush().await?;

    color::success(&format!("saved {} ({})", output.display(), format_size(written)));
    Ok(())
}
