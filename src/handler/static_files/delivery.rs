//! File delivery
//!
//! Resolves a prefix-relative path, applies the directory index fallback and
//! streams the file into the response.

use super::fallback;
use super::resolver::{self, DenyReason, Resolution};
use super::source::SourceConfig;
use crate::http::{mime, ResponseWriter};
use crate::logger;
use chrono::{DateTime, Utc};
use hyper::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
use hyper::{Method, Request, StatusCode};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 64 * 1024;

/// Outcome of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A file was written to the response
    Served,
    /// Nothing was written; another handler may still respond
    NotServed,
    /// The path tried to leave the source root; nothing was written
    Denied(DenyReason),
}

/// Serve `rel` from `config` into `res`
pub async fn serve(
    config: &SourceConfig,
    rel: &str,
    req: &Request<()>,
    res: &mut ResponseWriter,
) -> Delivery {
    let fs_path = match resolver::resolve(config, rel) {
        Resolution::Found(path) => path,
        Resolution::NotFound => return Delivery::NotServed,
        Resolution::Denied(reason) => return Delivery::Denied(reason),
    };

    let Some(file_path) = fallback::apply(&fs_path, config.defaults()).await else {
        return Delivery::NotServed;
    };

    match send_file(&file_path, req.method() == Method::HEAD, res).await {
        Ok(()) => Delivery::Served,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to deliver '{}': {e}",
                file_path.display()
            ));
            Delivery::NotServed
        }
    }
}

async fn send_file(path: &Path, head_only: bool, res: &mut ResponseWriter) -> std::io::Result<()> {
    // Open before writing the head so an unreadable file can still fall through
    let file = File::open(path).await?;
    let meta = file.metadata().await?;
    if !meta.is_file() {
        return Err(std::io::Error::other("not a regular file"));
    }
    let len = meta.len();

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(mime::get_by_path(path)));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    if let Ok(modified) = meta.modified() {
        let stamp = DateTime::<Utc>::from(modified)
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string();
        if let Ok(value) = HeaderValue::from_str(&stamp) {
            headers.insert(LAST_MODIFIED, value);
        }
    }

    res.write_head(StatusCode::OK, headers)
        .map_err(std::io::Error::other)?;

    if !head_only {
        let mut reader = file.take(len);
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            res.write(&buf[..n]).map_err(std::io::Error::other)?;
        }
    }

    res.end(None).map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::static_files::SourceDto;
    use std::fs;

    fn get(uri: &str) -> Request<()> {
        Request::get(uri).body(()).unwrap()
    }

    fn source(root: &Path) -> SourceConfig {
        SourceConfig::from_dto(&SourceDto::new(root.to_string_lossy(), "/")).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file_bytes_and_headers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();

        let mut res = ResponseWriter::new();
        let outcome = serve(&source(dir.path()), "app.js", &get("/app.js"), &mut res).await;

        assert_eq!(outcome, Delivery::Served);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body(), b"console.log(1);");
        assert_eq!(res.headers()[CONTENT_LENGTH], "15");
        assert_eq!(res.headers()[CONTENT_TYPE], "application/javascript");
        assert!(res.headers().contains_key(LAST_MODIFIED));
        assert!(res.writable_ended());
    }

    #[tokio::test]
    async fn test_large_file_is_read_completely() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        fs::write(dir.path().join("blob.bin"), &data).unwrap();

        let mut res = ResponseWriter::new();
        let outcome = serve(&source(dir.path()), "blob.bin", &get("/blob.bin"), &mut res).await;

        assert_eq!(outcome, Delivery::Served);
        assert_eq!(res.body(), data.as_slice());
    }

    #[tokio::test]
    async fn test_directory_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();

        let mut res = ResponseWriter::new();
        let outcome = serve(&source(dir.path()), "docs", &get("/docs"), &mut res).await;

        assert_eq!(outcome, Delivery::Served);
        assert_eq!(res.body(), b"<h1>docs</h1>");
        assert_eq!(res.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_head_sends_headers_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        let req = Request::head("/a.txt").body(()).unwrap();

        let mut res = ResponseWriter::new();
        let outcome = serve(&source(dir.path()), "a.txt", &req, &mut res).await;

        assert_eq!(outcome, Delivery::Served);
        assert!(res.body().is_empty());
        assert_eq!(res.headers()[CONTENT_LENGTH], "5");
        assert!(res.writable_ended());
    }

    #[tokio::test]
    async fn test_missing_file_leaves_response_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut res = ResponseWriter::new();
        let outcome = serve(&source(dir.path()), "nope.txt", &get("/nope.txt"), &mut res).await;

        assert_eq!(outcome, Delivery::NotServed);
        assert!(res.is_writable());
    }

    #[tokio::test]
    async fn test_traversal_reported_as_denied() {
        let dir = tempfile::tempdir().unwrap();
        let mut res = ResponseWriter::new();
        let outcome = serve(&source(dir.path()), "../secret", &get("/x"), &mut res).await;

        assert_eq!(outcome, Delivery::Denied(DenyReason::Traversal));
        assert!(res.is_writable());
    }

    #[tokio::test]
    async fn test_non_file_rejected_before_head() {
        let dir = tempfile::tempdir().unwrap();
        let mut res = ResponseWriter::new();

        assert!(send_file(dir.path(), false, &mut res).await.is_err());
        assert!(res.is_writable());
        assert!(res.body().is_empty());
    }

    #[tokio::test]
    async fn test_allow_list_blocks_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg/a.txt"), "a").unwrap();
        fs::write(dir.path().join("pkg/b.txt"), "b").unwrap();
        let cfg = SourceConfig::from_dto(
            &SourceDto::new(dir.path().to_string_lossy(), "/p").allow("pkg", ["a.txt"]),
        )
        .unwrap();

        let mut res = ResponseWriter::new();
        assert_eq!(
            serve(&cfg, "pkg/b.txt", &get("/p/pkg/b.txt"), &mut res).await,
            Delivery::NotServed
        );
        assert_eq!(
            serve(&cfg, "pkg/a.txt", &get("/p/pkg/a.txt"), &mut res).await,
            Delivery::Served
        );
        assert_eq!(res.body(), b"a");
    }
}
