use crate::core::version::Version;
use crate::error::{AppError, AppResult};
use crate::infrastructure::remote::http_client::HttpClient;
use crate::infrastructure::remote::target::DOWNLOAD_BASE;
use regex::Regex;

/// 远程版本目录
///
/// 每次查询都重新抓取下载列表页，不做跨调用缓存。
pub struct RemoteCatalog {
    http: HttpClient,
}

impl RemoteCatalog {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 抓取列表页并解析其中出现的所有版本，去重升序返回
    ///
    /// 页面能取到但解析不出任何版本时返回空序列，不视为错误；
    /// 网络不可用才报 `Fetch`。
    pub async fn list_all(&self) -> AppResult<Vec<Version>> {
        let page = self.http.get_text(DOWNLOAD_BASE).await?;
        Ok(parse_versions(&page))
    }

    /// 最新版本，即 `list_all` 的最大元素
    pub async fn latest(&self) -> AppResult<Version> {
        self.list_all()
            .await?
            .into_iter()
            .next_back()
            .ok_or(AppError::NoVersionsAvailable)
    }
}

/// 从列表页文本中提取 `go<version>.<os>-<arch>.tar.gz` 的版本号部分
///
/// 命名方案与 `target::resolve_url` 保持一致。
pub fn parse_versions(page: &str) -> Vec<Version> {
    let pattern = Regex::new(r"go(\d+\.\d+(?:\.\d+)?)\.[a-z0-9]+-[a-z0-9]+\.tar\.gz")
        .expect("版本提取正则不合法");

    let mut versions: Vec<Version> = pattern
        .captures_iter(page)
        .filter_map(|captures| captures[1].parse().ok())
        .collect();
    versions.sort();
    versions.dedup();
    versions
}
