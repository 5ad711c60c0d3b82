//! Streaming HTTP download to a uniquely named temporary file.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Download a URL into `dest_dir` under a random unique filename.
///
/// The random name avoids collisions between concurrent or repeated
/// invocations sharing a temp directory. `authorization`, when given, is
/// sent verbatim as the `Authorization` header value; the caller decides
/// whether attaching credentials to this URL is safe.
pub async fn download_to_dir(
    client: &reqwest::Client,
    url: &str,
    dest_dir: &Path,
    authorization: Option<&str>,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dest_dir).map_err(|e| Error::io(e, dest_dir, "create_dir_all"))?;
    let dest = dest_dir.join(Uuid::new_v4().to_string());
    debug!(%url, dest = %dest.display(), "downloading archive");

    let mut request = client
        .get(url)
        .header("Accept", "application/octet-stream");
    if let Some(header) = authorization {
        request = request.header("Authorization", header);
    }

    let mut response = request
        .send()
        .await
        .map_err(|e| Error::download(url, e.to_string()))?;
    if !response.status().is_success() {
        return Err(Error::download(
            url,
            format!("HTTP {}", response.status()),
        ));
    }

    let mut file = tokio::fs::File::create(&dest)
        .await
        .map_err(|e| Error::io(e, &dest, "create"))?;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::download(url, e.to_string()))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io(e, &dest, "write"))?;
    }
    file.flush()
        .await
        .map_err(|e| Error::io(e, &dest, "flush"))?;

    Ok(dest)
}
