use crate::SdkResult;
use crate::error::SdkError;
use hackqr_core::*;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

#[derive(Clone)]
pub struct HackQrClient {
    client: Client,
    pub base_url: Url,
    pub timeout: Duration,
}

impl HackQrClient {
    pub fn new(base_url: &str) -> SdkResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(SdkError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            timeout: Duration::from_secs(30),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 逐段拼接路径，token 等参数会被正确转义
    fn endpoint(&self, segments: &[&str]) -> SdkResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SdkError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn unwrap_response<T>(response: Response) -> SdkResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(SdkError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let api_response: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        if api_response.status != "ok" {
            return Err(SdkError::UnexpectedResponse(format!(
                "status field was {}",
                api_response.status
            )));
        }
        Ok(api_response.data)
    }

    async fn get<T>(&self, segments: &[&str]) -> SdkResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        Self::unwrap_response(response).await
    }

    async fn post<B, T>(&self, segments: &[&str], body: &B) -> SdkResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        Self::unwrap_response(response).await
    }

    pub async fn health(&self) -> SdkResult<bool> {
        let url = self.endpoint(&["health"])?;
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let response = response.error_for_status()?;
        let body: serde_json::Value = response.json().await?;
        Ok(body["status"] == "ok")
    }

    pub async fn register_user(&self, request: &RegisterUserRequest) -> SdkResult<UserItem> {
        self.post(&["users"], request).await
    }

    pub async fn get_user(&self, user_id: i32) -> SdkResult<UserItem> {
        self.get(&["users", &user_id.to_string()]).await
    }

    pub async fn set_verification(
        &self,
        user_id: i32,
        status: VerificationStatus,
    ) -> SdkResult<UserItem> {
        let url = self.endpoint(&["users", &user_id.to_string(), "verification"])?;
        let response = self
            .client
            .patch(url)
            .timeout(self.timeout)
            .json(&VerificationUpdate { status })
            .send()
            .await?;
        Self::unwrap_response(response).await
    }

    pub async fn issue_token(&self, request: &IssueTokenRequest) -> SdkResult<TokenItem> {
        self.post(&["qr", "generate"], request).await
    }

    pub async fn get_token(&self, token: &str) -> SdkResult<TokenItem> {
        self.get(&["qr", "tokens", token]).await
    }

    pub async fn scan_history(&self, token: &str) -> SdkResult<Vec<ScanLogItem>> {
        self.get(&["qr", "tokens", token, "scans"]).await
    }

    /// 被拒绝的扫码返回 `Ok`，`success` 为 false
    pub async fn scan(&self, token: &str, scanner_id: i32) -> SdkResult<ScanResult> {
        let request = ScanRequest {
            token: token.to_string(),
            scanner_id,
        };
        self.post(&["scan"], &request).await
    }

    pub async fn get_analytics(&self, hackathon_id: i32) -> SdkResult<ScanAnalytics> {
        let url = self.endpoint(&["admin", "scan-analytics"])?;
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .query(&AnalyticsQuery { hackathon_id })
            .send()
            .await?;
        Self::unwrap_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// 只应答一次的假服务器，返回固定状态码与 JSON
    async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_client_creation() {
        let client = HackQrClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_client_rejects_invalid_url() {
        assert!(matches!(
            HackQrClient::new("not a url"),
            Err(SdkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_client_with_timeout() {
        let client = HackQrClient::new("http://localhost:3000")
            .unwrap()
            .with_timeout(Duration::from_millis(500));
        assert_eq!(client.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = HackQrClient::new("http://localhost:3000/").unwrap();
        let url = client.endpoint(&["qr", "tokens", "LUNCH-abc_-9"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/qr/tokens/LUNCH-abc_-9");

        let url = client.endpoint(&["qr", "tokens", "a/b", "scans"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/qr/tokens/a%2Fb/scans");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HackQrClient::new("http://localhost:3000/hackqr/").unwrap();
        let url = client.endpoint(&["health"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/hackqr/health");
    }

    #[test]
    fn test_sdk_error_display() {
        let error = SdkError::ApiError {
            status: 403,
            message: "Scanner role required".to_string(),
        };
        assert_eq!(error.to_string(), "API error (403): Scanner role required");
        assert_eq!(error.status(), Some(403));
    }

    #[tokio::test]
    async fn test_get_token_unwraps_envelope() {
        let base = one_shot_server(
            "200 OK",
            r#"{"status":"ok","data":{"token":"LUNCH-x","user_id":1,"hackathon_id":2,"purpose":"LUNCH","valid_from":"2026-01-01T12:00:00Z","valid_to":"2026-01-01T14:00:00Z","status":"CONSUMED"}}"#,
        )
        .await;
        let client = HackQrClient::new(&base).unwrap();

        let token = client.get_token("LUNCH-x").await.unwrap();
        assert_eq!(token.purpose, Purpose::Lunch);
        assert_eq!(token.status, TokenState::Consumed);
        assert_eq!(token.hackathon_id, 2);
    }

    #[tokio::test]
    async fn test_error_body_becomes_api_error() {
        let base = one_shot_server("404 Not Found", r#"{"error":"QR token not found"}"#).await;
        let client = HackQrClient::new(&base).unwrap();

        match client.get_token("LUNCH-missing").await {
            Err(SdkError::ApiError { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "QR token not found");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let base = one_shot_server("200 OK", r#"{"status":"ok"}"#).await;
        let client = HackQrClient::new(&base).unwrap();
        assert!(client.health().await.unwrap());
    }
}
