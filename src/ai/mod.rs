//! AI card generation contract
//!
//! An alternative extraction path: a vision-capable model receives the
//! photograph directly and returns ready-made front/back pairs, bypassing
//! line classification entirely. The network transport is abstracted behind
//! a trait; this module owns payload assembly, response parsing, and the
//! user-facing failure reasons.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

use crate::cards::CardDraft;
use crate::imaging::Bitmap;

/// Model identifier sent with every request
pub const MODEL: &str = "claude-haiku-4-5-20251001";

/// Photographs are downscaled so the long edge does not exceed this
const MAX_LONG_EDGE: u32 = 1200;
const JPEG_QUALITY: u8 = 70;
const MAX_TOKENS: u32 = 2048;

/// Instruction sent alongside the photograph. The model is asked to find
/// emphasized terms and read their definitions from the page context.
const PROMPT: &str = "\
この画像は教科書や参考書のページです。\n\
画像の中から重要な用語・キーワード（特に赤字、太字、色付きの文字）を見つけ、\n\
それぞれの用語について、画像内の文脈からその意味や定義を読み取ってください。\n\
\n\
以下のJSON形式で出力してください（他のテキストは一切不要です）：\n\
[{\"front\":\"用語\",\"back\":\"意味・定義\"},{\"front\":\"用語2\",\"back\":\"意味・定義2\"}]\n\
\n\
ルール：\n\
- frontには用語・キーワードを入れる\n\
- backにはその用語の意味・定義・説明を入れる（画像内の文脈から読み取る）\n\
- 重要でない用語は含めない\n\
- JSON配列のみを出力し、他の文章は含めない";

/// Why card generation failed, phrased for direct display to the user
#[derive(Debug, Error)]
pub enum CardGenError {
    /// The caller never configured a credential
    #[error("no API key is configured")]
    MissingApiKey,
    /// The photograph could not be converted into a request payload
    #[error("failed to encode the photograph")]
    ImageEncodingFailed,
    /// The server produced no response body
    #[error("no response from the server")]
    NoResponse,
    /// The response arrived but no card list could be read from it
    #[error("could not parse the model response")]
    MalformedResponse,
    /// The server returned an explicit error message
    #[error("API error: {0}")]
    Api(String),
}

/// Delivers a request payload to the model endpoint.
///
/// Implementations map their own transport failures onto [`CardGenError`]
/// (a missing body is [`CardGenError::NoResponse`]).
#[async_trait]
pub trait CardModelTransport: Send + Sync {
    /// Send the payload and return the raw response JSON
    async fn send(&self, payload: &Value, api_key: &str) -> Result<Value, CardGenError>;
}

/// Generate drafts for a photograph through the model.
///
/// The credential is checked before any transport work; the drafts honor the
/// same non-empty front/back contract as pipeline extraction.
pub async fn generate_cards(
    transport: &dyn CardModelTransport,
    api_key: &str,
    bitmap: &Bitmap,
) -> Result<Vec<CardDraft>, CardGenError> {
    if api_key.trim().is_empty() {
        return Err(CardGenError::MissingApiKey);
    }

    let payload = build_request(bitmap)?;
    let response = transport.send(&payload, api_key).await?;
    parse_response(&response)
}

/// Assemble the message payload: the downscaled JPEG photograph plus the
/// extraction instruction.
pub fn build_request(bitmap: &Bitmap) -> Result<Value, CardGenError> {
    let encoded = encode_image(bitmap)?;

    Ok(json!({
        "model": MODEL,
        "max_tokens": MAX_TOKENS,
        "messages": [{
            "role": "user",
            "content": [
                {
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": "image/jpeg",
                        "data": encoded,
                    },
                },
                {
                    "type": "text",
                    "text": PROMPT,
                },
            ],
        }],
    }))
}

/// Downscale to the payload size limit, JPEG-encode, base64-encode
fn encode_image(bitmap: &Bitmap) -> Result<String, CardGenError> {
    let rgba = RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.data.clone())
        .ok_or(CardGenError::ImageEncodingFailed)?;
    let mut image = DynamicImage::ImageRgba8(rgba);

    if bitmap.width.max(bitmap.height) > MAX_LONG_EDGE {
        image = image.resize(MAX_LONG_EDGE, MAX_LONG_EDGE, FilterType::Triangle);
        debug!(
            width = image.width(),
            height = image.height(),
            "downscaled photograph for the request payload"
        );
    }

    let rgb = image.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|_| CardGenError::ImageEncodingFailed)?;

    Ok(BASE64.encode(buffer.into_inner()))
}

#[derive(Debug, Deserialize)]
struct RawPair {
    front: String,
    back: String,
}

/// Read the card list out of a raw model response.
///
/// An explicit error body wins over everything else; otherwise the first
/// text block must contain a JSON array, possibly wrapped in a code fence
/// or surrounding prose.
pub fn parse_response(response: &Value) -> Result<Vec<CardDraft>, CardGenError> {
    if let Some(message) = response.pointer("/error/message").and_then(Value::as_str) {
        return Err(CardGenError::Api(message.to_string()));
    }

    let text = response
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .ok_or(CardGenError::MalformedResponse)?;

    let array = extract_json_array(text).ok_or(CardGenError::MalformedResponse)?;
    let pairs: Vec<RawPair> =
        serde_json::from_str(array).map_err(|_| CardGenError::MalformedResponse)?;

    Ok(pairs
        .iter()
        .filter_map(|pair| CardDraft::new(&pair.front, &pair.back))
        .collect())
}

/// Slice out the JSON array portion of the model text. Covers bare arrays,
/// ```json fences, and prose before or after the array.
fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}
