//! `secsend delete` — remove an uploaded file using its owner link

use anyhow::{bail, Context, Result};

use secsend_crypto::{AnyId, ShareUrl};

use crate::cli::DeleteArgs;
use crate::client::Client;
use crate::output::color;

pub async fn execute(args: DeleteArgs) -> Result<()> {
    let share = ShareUrl::parse(&args.url).context("parsing share link")?;
    if !matches!(share.id, AnyId::Root(_)) {
        bail!("this is a recipient link, not an owner link — deleting requires the link `send` printed for you");
    }

    let client = Client::new(&share.server);
    client.delete(share.id).await?;

    color::success("deleted");
    Ok(())
}
