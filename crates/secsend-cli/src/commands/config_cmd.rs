//! `secsend config` — show a relay's advertised limits

use anyhow::Result;

use crate::cli::ConfigArgs;
use crate::client::Client;
use crate::output::{color, format_size};

pub async fn execute(args: ConfigArgs) -> Result<()> {
    let client = Client::new(&args.server);
    let config = client.config().await?;

    color::info(&format!("accepted timeout_s values: {:?}", config.timeout_s_valid));
    if config.filesize_limit == 0 {
        color::info("upload size limit: unlimited");
    } else {
        color::info(&format!("upload size limit: {}", format_size(config.filesize_limit)));
    }
    Ok(())
}
