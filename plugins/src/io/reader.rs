use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use tokio::io::AsyncReadExt;

use semflow_core::runtime::SourceReader;
use semflow_core::{Blob, BlobPair, FileSpec, Language, Pair, PairSource, Source};

/// Reads inputs from files, or from a JSON payload on stdin.
///
/// Stdin payloads look like `{"blobs": [{"path", "language", "content"}]}`
/// for single inputs and `{"blobs": [{"before": {..}, "after": {..}}]}` for
/// pairs, where either side of a pair may be omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

#[async_trait]
impl SourceReader for FsSourceReader {
    async fn read_blobs(&self, source: &Source) -> anyhow::Result<Vec<Blob>> {
        match source {
            Source::Stdin => decode_blobs(&read_stdin().await?),
            Source::Files(specs) => try_join_all(specs.iter().map(read_file)).await,
        }
    }

    async fn read_blob_pairs(&self, source: &PairSource) -> anyhow::Result<Vec<BlobPair>> {
        match source {
            PairSource::Stdin => decode_blob_pairs(&read_stdin().await?),
            PairSource::Files(pairs) => try_join_all(pairs.iter().map(read_pair)).await,
        }
    }
}

async fn read_stdin() -> anyhow::Result<String> {
    let mut buf = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buf)
        .await
        .context("cannot read stdin")?;
    Ok(buf)
}

async fn read_file(spec: &FileSpec) -> anyhow::Result<Blob> {
    let bytes = tokio::fs::read(&spec.path)
        .await
        .with_context(|| format!("cannot read {}", spec.path.display()))?;
    tracing::debug!(path = %spec.path.display(), bytes = bytes.len(), "read input");
    Ok(Blob::new(spec.path.clone(), spec.resolved_language(), bytes))
}

async fn read_pair(pair: &Pair<FileSpec>) -> anyhow::Result<BlobPair> {
    Ok(match pair {
        Pair::Before(before) => Pair::Before(read_file(before).await?),
        Pair::After(after) => Pair::After(read_file(after).await?),
        Pair::Both(before, after) => {
            let (before, after) = tokio::try_join!(read_file(before), read_file(after))?;
            Pair::Both(before, after)
        }
    })
}

#[derive(Deserialize)]
struct Payload<T> {
    blobs: Vec<T>,
}

#[derive(Deserialize)]
struct BlobJson {
    path: PathBuf,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    content: String,
}

impl From<BlobJson> for Blob {
    fn from(json: BlobJson) -> Self {
        let language = json
            .language
            .as_deref()
            .and_then(|name| name.parse::<Language>().ok())
            .or_else(|| Language::from_path(&json.path));
        Blob::new(json.path, language, json.content)
    }
}

#[derive(Deserialize)]
struct PairJson {
    #[serde(default)]
    before: Option<BlobJson>,
    #[serde(default)]
    after: Option<BlobJson>,
}

pub fn decode_blobs(text: &str) -> anyhow::Result<Vec<Blob>> {
    let payload: Payload<BlobJson> =
        serde_json::from_str(text).context("invalid blob payload on stdin")?;
    Ok(payload.blobs.into_iter().map(Blob::from).collect())
}

pub fn decode_blob_pairs(text: &str) -> anyhow::Result<Vec<BlobPair>> {
    let payload: Payload<PairJson> =
        serde_json::from_str(text).context("invalid blob pair payload on stdin")?;
    payload
        .blobs
        .into_iter()
        .enumerate()
        .map(|(index, pair)| match (pair.before, pair.after) {
            (Some(before), Some(after)) => Ok(Pair::Both(before.into(), after.into())),
            (Some(before), None) => Ok(Pair::Before(before.into())),
            (None, Some(after)) => Ok(Pair::After(after.into())),
            (None, None) => Err(anyhow::anyhow!(
                "blob pair {index} has neither a before nor an after side"
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_blobs_with_explicit_or_detected_language() {
        let blobs = decode_blobs(
            r#"{"blobs":[
                {"path":"a.py","content":"x = 1"},
                {"path":"b.txt","language":"Ruby","content":"puts 1"},
                {"path":"c","language":"Klingon"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(blobs[0].language, Some(Language::Python));
        assert_eq!(blobs[1].language, Some(Language::Ruby));
        assert_eq!(blobs[2].language, None);
        assert_eq!(&blobs[0].source[..], b"x = 1");
    }

    #[test]
    fn decodes_pairs_and_rejects_empty_ones() {
        let pairs = decode_blob_pairs(
            r#"{"blobs":[{"before":{"path":"a.md","content":"a"}},{"before":{"path":"a.md"},"after":{"path":"b.md"}}]}"#,
        )
        .unwrap();
        assert!(matches!(pairs[0], Pair::Before(_)));
        assert!(matches!(pairs[1], Pair::Both(_, _)));

        let err = decode_blob_pairs(r#"{"blobs":[{}]}"#).unwrap_err();
        assert!(err.to_string().contains("neither"));
    }

    #[tokio::test]
    async fn reads_files_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.md");
        std::fs::write(&a, "# a").unwrap();

        let reader = FsSourceReader;
        let blobs = reader
            .read_blobs(&Source::Files(vec![FileSpec::new(&a)]))
            .await
            .unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].language, Some(Language::Markdown));

        let missing = dir.path().join("missing.md");
        let err = reader
            .read_blobs(&Source::Files(vec![FileSpec::new(&a), FileSpec::new(&missing)]))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.md"));
    }

    #[tokio::test]
    async fn reads_file_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.py");
        let b = dir.path().join("b.py");
        std::fs::write(&a, "x").unwrap();
        std::fs::write(&b, "y").unwrap();
        let pairs = FsSourceReader
            .read_blob_pairs(&PairSource::Files(vec![Pair::Both(
                FileSpec::new(&a),
                FileSpec::new(&b),
            )]))
            .await
            .unwrap();
        assert_eq!(pairs[0].after().map(|blob| blob.path.clone()), Some(b));
    }
}
