use crate::error::AppResult;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;

/// HTTP 客户端包装器
///
/// 下载通过流式分块进行并逐块上报进度；`check_url` 只做 HEAD 探测，
/// 不传输响应体。
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    pub fn new() -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("govm/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// GET 请求并返回文本
    pub async fn get_text(&self, url: &str) -> AppResult<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let text = response.text().await?;
        Ok(text)
    }

    /// 流式下载整个响应体，回调上报 (已下载, 总大小) 字节数
    pub async fn download(
        &self,
        url: &str,
        progress: impl Fn(u64, u64),
    ) -> AppResult<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let total_size = response.content_length().unwrap_or(0);

        let mut data = Vec::new();
        let mut downloaded = 0u64;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            downloaded += chunk.len() as u64;
            data.extend_from_slice(&chunk);
            progress(downloaded, total_size);
        }

        Ok(data)
    }

    /// 检查 URL 是否可达（HEAD 探测，任何失败都视为不可达）
    pub async fn check_url(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
