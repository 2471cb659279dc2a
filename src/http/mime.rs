//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get MIME Content-Type based on file extension
///
/// The extension is matched case-insensitively, with or without a leading dot.
///
/// # Examples
/// ```
/// use stagehand::http::mime::get_by_extension;
/// assert_eq!(get_by_extension("html"), "text/html; charset=utf-8");
/// assert_eq!(get_by_extension(".PNG"), "image/png");
/// assert_eq!(get_by_extension("unknown"), "application/octet-stream");
/// ```
pub fn get_by_extension(extension: &str) -> &'static str {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();
    match ext.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "ics" => "text/calendar",
        "xml" => "application/xml",
        "xhtml" => "application/xhtml+xml",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",

        // Video
        "mp4" => "video/mp4",
        "mpeg" => "video/mpeg",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",

        // Audio
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "aac" => "audio/aac",
        "oga" | "ogg" => "audio/ogg",
        "weba" => "audio/webm",
        "flac" => "audio/flac",
        "mid" | "midi" => "audio/midi",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        // Documents and archives
        "pdf" => "application/pdf",
        "rtf" => "application/rtf",
        "epub" => "application/epub+zip",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",
        "sh" => "application/x-sh",

        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Content-Type for a filesystem path, based on its extension
pub fn get_by_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(DEFAULT_CONTENT_TYPE, get_by_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_by_extension("html"), "text/html; charset=utf-8");
        assert_eq!(get_by_extension("css"), "text/css");
        assert_eq!(get_by_extension("js"), "application/javascript");
        assert_eq!(get_by_extension("json"), "application/json");
        assert_eq!(get_by_extension("png"), "image/png");
        assert_eq!(get_by_extension("mp4"), "video/mp4");
    }

    #[test]
    fn test_case_and_dot_insensitive() {
        assert_eq!(get_by_extension(".CSS"), "text/css");
        assert_eq!(get_by_extension("Js"), "application/javascript");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_by_extension("xyz"), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_by_extension(""), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_by_path(Path::new("/srv/README")), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_by_path(Path::new("/srv/app.MJS")), "application/javascript");
    }
}
