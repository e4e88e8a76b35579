//! The first-generation endpoints the dashboard still calls

use kit::{handler, json_response, App, Config, FrameworkError, HttpResponse, Request, Response};

use crate::config::LlmConfig;
use crate::requests::ArchitectRequest;
use crate::services::architect;
use crate::services::llm::LanguageModel;

#[handler]
pub async fn analyze(form: ArchitectRequest) -> Response {
    let llm = App::make::<dyn LanguageModel>();
    let default_model = Config::get_or(LlmConfig::from_env).model;

    tracing::debug!(workflow_type = %form.workflow_type, "Designing agent architecture");
    let blueprints = architect::design(form.text(), llm.as_deref(), &default_model).await;
    let report = architect::report(form.text(), blueprints);
    Ok(HttpResponse::serialize(&report)?)
}

/// Acknowledge a multipart upload; the file itself is not analyzed yet
#[handler]
pub async fn upload(req: Request) -> Response {
    let boundary = req.content_type().and_then(multipart_boundary).map(str::to_string);
    let (_, body) = req.body_bytes().await?;
    let filename = boundary
        .and_then(|boundary| upload_filename(&body, &boundary))
        .ok_or_else(|| FrameworkError::validation("file", "A file upload is required"))?;

    json_response!({
        "filename": filename,
        "status": "uploaded",
        "message": "File analysis not implemented yet",
    })
}

/// `boundary` parameter of a `multipart/form-data` content type
fn multipart_boundary(content_type: &str) -> Option<&str> {
    let (mime, params) = content_type.split_once(';')?;
    if !mime.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|boundary| !boundary.is_empty())
}

/// Filename of the first part that carries one
///
/// Parts are split on the boundary as raw bytes, so binary file content is
/// never decoded; only part headers must be UTF-8.
fn upload_filename(body: &[u8], boundary: &str) -> Option<String> {
    let delimiter = format!("--{}", boundary);
    split_on(body, delimiter.as_bytes())
        .into_iter()
        .skip(1)
        .take_while(|part| !part.starts_with(b"--"))
        .find_map(|part| {
            let part = part.strip_prefix(b"\r\n").unwrap_or(part);
            let head_end = find(part, b"\r\n\r\n")?;
            let head = std::str::from_utf8(&part[..head_end]).ok()?;
            head.split("\r\n")
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-disposition"))
                .and_then(|(_, value)| disposition_filename(value))
        })
}

fn disposition_filename(value: &str) -> Option<String> {
    value
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("filename"))
        .map(|(_, name)| name.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let mut rest = haystack;
    while let Some(at) = find(rest, needle) {
        parts.push(&rest[..at]);
        rest = &rest[at + needle.len()..];
    }
    parts.push(rest);
    parts
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestApp;
    use kit::expect;
    use serde_json::json;

    #[tokio::test]
    async fn test_analyze_falls_back_to_mock_architecture() {
        let app = TestApp::new().await;
        let response = app
            .client
            .post("/api/v1/analyze")
            .json(&json!({ "description": "Match every invoice against its purchase order" }))
            .send()
            .await;

        expect!(response.status()).to_equal(200);
        let body = response.json();
        expect!(body["agent_blueprints"][0]["name"].clone()).to_equal(json!("Workflow Coordinator"));
        expect!(body["agent_blueprints"][1]["name"].clone()).to_equal(json!("Document Processor"));
        expect!(body["workflow_steps"][0]["description"].as_str().unwrap().to_string())
            .to_contain("Trigger: Match every invoice");
        expect!(body["automated_percentage"].as_u64().unwrap()).to_be_between(60, 95);
    }

    #[tokio::test]
    async fn test_upload_acknowledges_file() {
        let app = TestApp::new().await;
        let body = "--b\r\nContent-Disposition: form-data; name=\"file\"; filename=\"flow.txt\"\r\n\r\nhello\r\n--b--\r\n";

        let response = app
            .client
            .post("/api/v1/upload")
            .body("multipart/form-data; boundary=b", body)
            .send()
            .await;
        expect!(response.json()).to_equal(json!({
            "filename": "flow.txt",
            "status": "uploaded",
            "message": "File analysis not implemented yet",
        }));

        let empty = app.client.post("/api/v1/upload").body("text/plain", "nothing").send().await;
        expect!(empty.status()).to_equal(422);
    }

    #[test]
    fn test_upload_filename_from_multipart() {
        let body = b"--x\r\nContent-Disposition: form-data; name=\"file\"; filename=\"invoices.csv\"\r\nContent-Type: text/csv\r\n\r\na,b\r\n--x--\r\n";
        expect!(upload_filename(body, "x")).to_equal(Some("invoices.csv".to_string()));
    }

    #[test]
    fn test_upload_without_file_part() {
        let body = b"--x\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhi\r\n--x--\r\n";
        expect!(upload_filename(body, "x")).to_equal(None);
    }

    #[test]
    fn test_upload_file_after_field_with_binary_content() {
        let mut body = Vec::new();
        body.extend_from_slice(b"--b0und\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nfilename=\"decoy.txt\"\r\n");
        body.extend_from_slice(b"--b0und\r\nContent-Disposition: form-data; name=\"file\"; filename=\"scan.png\"\r\n\r\n");
        body.extend_from_slice(&[0x89, 0x50, 0xff, 0xfe, 0x00]);
        body.extend_from_slice(b"\r\n--b0und--\r\n");

        expect!(upload_filename(&body, "b0und")).to_equal(Some("scan.png".to_string()));
        expect!(upload_filename(&body, "other")).to_equal(None);
    }

    #[test]
    fn test_multipart_boundary() {
        expect!(multipart_boundary("multipart/form-data; boundary=\"abc\"")).to_equal(Some("abc"));
        expect!(multipart_boundary("Multipart/Form-Data;charset=utf-8; Boundary=xyz")).to_equal(Some("xyz"));
        expect!(multipart_boundary("text/plain; boundary=abc")).to_equal(None);
        expect!(multipart_boundary("multipart/form-data")).to_equal(None);
    }
}
