use serde_json::Value;
use std::time::Duration;

use crate::utils::debug_enabled;

use super::{GenerateError, GenerationParams, Generator};

pub(crate) const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/microsoft/DialoGPT-medium";
const RETRY_BACKOFF_MS: u64 = 250;

/// Hugging Face style text-generation endpoint client
pub(crate) struct HttpGenerator {
    agent: ureq::Agent,
    endpoint: String,
    api_token: Option<String>,
    retries: usize,
}

impl HttpGenerator {
    pub(crate) fn new(
        endpoint: &str,
        api_token: Option<&str>,
        timeout: Duration,
        retries: usize,
    ) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: endpoint.to_string(),
            api_token: api_token.map(str::to_string),
            retries: retries.max(1),
        }
    }

    fn call(&self, body: &Value) -> Result<Value, GenerateError> {
        let mut request = self.agent.post(&self.endpoint);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        let response = request.send_json(body).map_err(|e| self.http_error(e.to_string()))?;

        let status = response.status();
        let mut response_body = response.into_body();
        let parsed: Result<Value, _> = serde_json::from_reader(response_body.as_reader());

        if status.is_success() {
            return parsed.map_err(|e| GenerateError::Malformed(e.to_string()));
        }
        // error statuses still carry `{"error": ..}` worth surfacing
        match parsed {
            Ok(value) if value.get("error").is_some() => Ok(value),
            _ => Err(self.http_error(format!("HTTP status {}", status.as_u16()))),
        }
    }

    fn http_error(&self, message: String) -> GenerateError {
        GenerateError::Http {
            endpoint: self.endpoint.clone(),
            message,
        }
    }
}

impl Generator for HttpGenerator {
    fn name(&self) -> &'static str {
        "http"
    }

    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, GenerateError> {
        let body = request_body(prompt, params);

        let mut last_err = GenerateError::Disabled;
        for attempt in 0..self.retries {
            match self.call(&body) {
                Ok(value) => return parse_generated_text(&value),
                Err(err) => {
                    if debug_enabled() {
                        eprintln!("Generation attempt {} failed: {}", attempt + 1, err);
                    }
                    last_err = err;
                }
            }

            if attempt + 1 < self.retries {
                std::thread::sleep(Duration::from_millis(
                    RETRY_BACKOFF_MS * (attempt as u64 + 1),
                ));
            }
        }

        Err(last_err)
    }
}

fn request_body(prompt: &str, params: &GenerationParams) -> Value {
    serde_json::json!({
        "inputs": prompt,
        "parameters": {
            "max_length": params.max_length,
            "truncation": params.truncation,
            "do_sample": params.do_sample,
            "pad_token_id": params.pad_token_id,
        },
    })
}

/// Accepts `[{"generated_text": ..}]` or `{"generated_text": ..}`.
fn parse_generated_text(value: &Value) -> Result<String, GenerateError> {
    if let Some(error) = value.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(GenerateError::Api(message));
    }

    let candidate = match value {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(value),
        _ => None,
    };

    candidate
        .and_then(|item| item.get("generated_text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GenerateError::Malformed(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Answer a single request on a local port with a fixed response.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request_complete(&request) {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}/generate")
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(head_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..head_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= head_end + 4 + length
    }

    fn generator_for(endpoint: &str) -> HttpGenerator {
        HttpGenerator::new(endpoint, None, Duration::from_secs(5), 1)
    }

    #[test]
    fn request_body_carries_sampling_params() {
        let body = request_body("user: hi", &GenerationParams::default());
        assert_eq!(body["inputs"], "user: hi");
        assert_eq!(body["parameters"]["max_length"], 1000);
        assert_eq!(body["parameters"]["truncation"], true);
        assert_eq!(body["parameters"]["do_sample"], true);
        assert_eq!(body["parameters"]["pad_token_id"], 50256);
    }

    #[test]
    fn parse_list_response() {
        let value = serde_json::json!([{"generated_text": "user: hi\nbot: hello there"}]);
        assert_eq!(
            parse_generated_text(&value).unwrap(),
            "user: hi\nbot: hello there"
        );
    }

    #[test]
    fn parse_object_response() {
        let value = serde_json::json!({"generated_text": "sure"});
        assert_eq!(parse_generated_text(&value).unwrap(), "sure");
    }

    #[test]
    fn parse_error_payload() {
        let value = serde_json::json!({"error": "Model is currently loading"});
        let err = parse_generated_text(&value).unwrap_err();
        assert!(matches!(err, GenerateError::Api(ref m) if m == "Model is currently loading"));
    }

    #[test]
    fn parse_unexpected_shape() {
        let value = serde_json::json!([]);
        assert!(matches!(
            parse_generated_text(&value),
            Err(GenerateError::Malformed(_))
        ));
    }

    #[test]
    fn success_response_returns_generated_text() {
        let endpoint = serve_once("200 OK", r#"[{"generated_text": "user: hi\nbot: hello"}]"#);
        let text = generator_for(&endpoint)
            .generate("user: hi", &GenerationParams::default())
            .unwrap();
        assert_eq!(text, "user: hi\nbot: hello");
    }

    #[test]
    fn error_status_with_error_payload_is_an_api_error() {
        let endpoint = serve_once(
            "503 Service Unavailable",
            r#"{"error": "Model is currently loading"}"#,
        );
        let err = generator_for(&endpoint)
            .generate("user: hi", &GenerationParams::default())
            .unwrap_err();
        assert!(matches!(err, GenerateError::Api(ref m) if m == "Model is currently loading"));
    }

    #[test]
    fn error_status_without_payload_is_an_http_error() {
        let endpoint = serve_once("500 Internal Server Error", "oops");
        let err = generator_for(&endpoint)
            .generate("user: hi", &GenerationParams::default())
            .unwrap_err();
        assert!(
            matches!(err, GenerateError::Http { ref message, .. } if message == "HTTP status 500")
        );
    }

    #[test]
    fn unreachable_endpoint_is_an_http_error() {
        let generator = HttpGenerator::new(
            "http://127.0.0.1:9/generate",
            None,
            Duration::from_millis(200),
            1,
        );
        let err = generator
            .generate("user: hi", &GenerationParams::default())
            .unwrap_err();
        assert!(matches!(err, GenerateError::Http { .. }));
    }
}
