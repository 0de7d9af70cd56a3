/// Fish disease detection via a hosted inference endpoint.
///
/// The model runs on a Hugging Face Space; this module only ships the image
/// there and interprets whatever comes back. The Space answers either with a
/// bare JSON string label or with a Gradio-style `{"data": [...]}` envelope.
///
/// Model docs: https://huggingface.co/spaces/ararsen/dr-fish-aadhyanta

use std::path::Path;

use reqwest::blocking::multipart::{Form, Part};
use serde_json::Value;

use crate::model::DrFishError;

pub const DEFAULT_PREDICT_URL: &str = "https://ararsen-dr-fish-aadhyanta.hf.space/predict";

/// Multipart field name the endpoint reads the image from.
const IMAGE_FIELD: &str = "img";

const NO_RESULT: &str = "No result";

/// Guesses an image MIME type from the file extension.
pub fn image_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Turns an inference response into display text.
///
/// - a JSON string is returned as is
/// - an object with a non-empty `data` field yields the compact JSON of `data`
/// - anything else yields "No result"
///
/// `null`, `false`, `0` and `""` all count as an empty `data` field.
pub fn interpret_prediction(response: &Value) -> String {
    match response {
        Value::String(label) => label.clone(),
        Value::Object(obj) => match obj.get("data") {
            Some(data) if has_content(data) => data.to_string(),
            _ => NO_RESULT.to_string(),
        },
        _ => NO_RESULT.to_string(),
    }
}

fn has_content(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Uploads an image file and returns the endpoint's raw JSON response.
pub fn predict_disease(
    client: &reqwest::blocking::Client,
    url: &str,
    image_path: &Path,
) -> Result<Value, DrFishError> {
    let bytes = std::fs::read(image_path).map_err(|e| {
        DrFishError::PredictionFailed(format!("cannot read {}: {}", image_path.display(), e))
    })?;

    let file_name = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();

    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(image_mime_type(image_path))
        .map_err(|e| DrFishError::PredictionFailed(e.to_string()))?;

    let form = Form::new().part(IMAGE_FIELD, part);

    let response = client
        .post(url)
        .multipart(form)
        .send()
        .map_err(|e| DrFishError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(DrFishError::PredictionFailed(format!(
            "HTTP {}",
            response.status().as_u16()
        )));
    }

    response
        .json::<Value>()
        .map_err(|e| DrFishError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_response_is_used_verbatim() {
        assert_eq!(interpret_prediction(&json!("Healthy")), "Healthy");
    }

    #[test]
    fn test_data_envelope_is_serialized_compactly() {
        let resp = json!({"data": ["Diseased", 0.93]});
        assert_eq!(interpret_prediction(&resp), r#"["Diseased",0.93]"#);
    }

    #[test]
    fn test_unrecognized_shapes_yield_no_result() {
        assert_eq!(interpret_prediction(&json!({"label": "x"})), "No result");
        assert_eq!(interpret_prediction(&json!({"data": null})), "No result");
        assert_eq!(interpret_prediction(&json!({"data": false})), "No result");
        assert_eq!(interpret_prediction(&json!({"data": 0})), "No result");
        assert_eq!(interpret_prediction(&json!({"data": ""})), "No result");
        assert_eq!(interpret_prediction(&json!(42)), "No result");
        assert_eq!(interpret_prediction(&Value::Null), "No result");
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(image_mime_type(Path::new("koi.JPG")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("/tmp/fish.png")), "image/png");
        assert_eq!(image_mime_type(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_missing_file_fails_before_any_request() {
        let client = reqwest::blocking::Client::new();
        let err = predict_disease(&client, "http://127.0.0.1:9/", Path::new("/nonexistent/fish.jpg"))
            .unwrap_err();
        assert!(matches!(err, DrFishError::PredictionFailed(_)), "got {:?}", err);
    }
}
