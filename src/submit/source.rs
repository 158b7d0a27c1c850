//! Source reader: turns a file of sources or a single URL into a sequence of
//! submission items.

use crate::error::Error;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Where a submission batch's items come from.
#[derive(Clone, Debug)]
pub enum SubmitSource {
    /// A file with one source URI per line; empty lines are skipped
    File(PathBuf),
    /// A single literal source URI
    Url(String),
}

impl SubmitSource {
    /// Push every item onto the submission channel, in source order.
    ///
    /// Blocks while the channel's buffer is full; this backpressure bounds
    /// memory use for large files. A read error stops reading and is
    /// returned, but items already sent stay enqueued for processing.
    pub(crate) async fn feed(self, tx: &async_channel::Sender<String>) -> Option<Error> {
        match self {
            SubmitSource::Url(uri) => {
                // Send fails only if every worker is gone; nothing to do then.
                let _ = tx.send(uri).await;
                None
            }
            SubmitSource::File(path) => {
                let file = match File::open(&path).await {
                    Ok(file) => file,
                    Err(e) => {
                        tracing::error!(path = %path.display(), error = %e, "could not open source file");
                        return Some(e.into());
                    }
                };

                let mut lines = BufReader::new(file).lines();
                loop {
                    match lines.next_line().await {
                        Ok(Some(line)) => {
                            if line.trim().is_empty() {
                                continue;
                            }
                            if tx.send(line).await.is_err() {
                                return None;
                            }
                        }
                        Ok(None) => return None,
                        Err(e) => {
                            tracing::error!(path = %path.display(), error = %e, "source file read failed");
                            return Some(e.into());
                        }
                    }
                }
            }
        }
    }
}
