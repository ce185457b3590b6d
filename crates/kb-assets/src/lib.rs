//! Browser shell assets for the KB viewer.
//!
//! The shell is a stylesheet and a small script that forwards clicks and
//! fragment changes to the server's event API and swaps in the returned
//! markup. Both live in `static/` and are available in two modes:
//!
//! - **`embed` feature on**: Compiled into the binary via `rust-embed`
//! - **`embed` feature off**: Read from the crate's `static/` directory at runtime

use std::borrow::Cow;
#[cfg(not(feature = "embed"))]
use std::path::Path;

#[cfg(feature = "embed")]
#[derive(rust_embed::RustEmbed)]
#[folder = "static"]
struct Assets;

#[cfg(not(feature = "embed"))]
const DEV_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Stylesheet path, relative to the asset root.
pub const STYLESHEET: &str = "style.css";

/// Client script path, relative to the asset root.
pub const SCRIPT: &str = "app.js";

/// Contents of the asset at `path`, if it exists.
#[cfg(feature = "embed")]
#[must_use]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    Assets::get(path).map(|f| f.data)
}

/// Contents of the asset at `path`, if it exists.
#[cfg(not(feature = "embed"))]
#[must_use]
pub fn get(path: &str) -> Option<Cow<'static, [u8]>> {
    if path.split('/').any(|part| part == "..") {
        return None;
    }
    std::fs::read(Path::new(DEV_DIR).join(path))
        .ok()
        .map(Cow::Owned)
}

/// Paths of every available asset.
#[cfg(feature = "embed")]
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    Assets::iter()
}

/// Paths of every available asset.
#[cfg(not(feature = "embed"))]
pub fn iter() -> impl Iterator<Item = Cow<'static, str>> {
    std::fs::read_dir(DEV_DIR)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.path().is_file())
        .map(|entry| Cow::Owned(entry.file_name().to_string_lossy().into_owned()))
}

/// MIME type for `path`, from its extension.
#[must_use]
pub fn mime_for(path: &str) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}
