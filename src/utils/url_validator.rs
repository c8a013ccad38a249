//! 落地页 URL 校验
//!
//! 二维码只应指向 http(s) 落地页；相对地址允许，但需要提示。

use url::Url;

/// URL 校验错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    /// 缺少 scheme/host，属于相对地址
    Relative,
    UnsupportedScheme(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::Relative => write!(f, "URL has no scheme or host"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Unsupported scheme: {}. Only http:// and https:// landing pages can be tracked",
                scheme
            ),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 校验落地页 URL
///
/// 检查项目：
/// 1. URL 不为空
/// 2. 能够解析为绝对 URL（含 host）
/// 3. scheme 为 http 或 https
pub fn validate_url(url: &str) -> Result<Url, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => return Err(UrlValidationError::Relative),
        Err(e) => return Err(UrlValidationError::InvalidFormat(e.to_string())),
    };

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedScheme(format!("{}:", other))),
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::Relative);
    }

    Ok(parsed)
}
