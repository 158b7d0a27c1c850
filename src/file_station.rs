//! File Station operations: rename and move.

use crate::client::{ENTRY_CGI, SynoClient};
use crate::error::{ApiScope, Error, Result};
use serde::Deserialize;

/// Payload of a successful rename
#[derive(Debug, Deserialize)]
struct RenameData {
    files: Vec<RenamedFile>,
}

#[derive(Debug, Deserialize)]
struct RenamedFile {
    path: String,
}

impl SynoClient {
    /// Rename a file or folder, returning its new path.
    ///
    /// `path` is the full path on the NAS (e.g. `/downloads/old.iso`), `name`
    /// the new basename.
    pub async fn rename_file(&self, path: &str, name: &str) -> Result<String> {
        let data: RenameData = self
            .call_data(
                ENTRY_CGI,
                ApiScope::FileStation,
                &[
                    ("api", "SYNO.FileStation.Rename"),
                    ("version", "1"),
                    ("method", "rename"),
                    ("path", path),
                    ("name", name),
                ],
            )
            .await?;

        data.files
            .into_iter()
            .next()
            .map(|file| file.path)
            .ok_or(Error::MissingField("files"))
    }

    /// Move a file to another directory on the NAS.
    ///
    /// The source is removed after the copy completes (`remove_src=true`).
    pub async fn move_file(&self, source: &str, dest_dir: &str) -> Result<()> {
        self.call(
            ENTRY_CGI,
            ApiScope::FileStation,
            &[
                ("api", "SYNO.FileStation.CopyMove"),
                ("version", "1"),
                ("method", "start"),
                ("path", source),
                ("dest_folder_path", dest_dir),
                ("remove_src", "true"),
            ],
        )
        .await?;
        Ok(())
    }
}
