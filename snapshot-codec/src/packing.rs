use std::io::{Read, Write};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};

/// Compresses text into a fragment-safe token: raw DEFLATE wrapped in
/// unpadded URL-safe base64, so the result can sit after `#` in a URL
/// without any percent-escaping.
pub fn pack(text: &str) -> std::io::Result<String> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(text.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Reverses [`pack`]. `None` when the token is not valid base64, not
/// valid DEFLATE, or does not decompress to UTF-8 text.
pub fn unpack(token: &str) -> Option<String> {
    let compressed = URL_SAFE_NO_PAD.decode(token).ok()?;
    let mut text = String::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .ok()?;
    Some(text)
}
