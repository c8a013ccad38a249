use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintlinkerError {
    ConfigFile(String),
    Credentials(String),
    Validation(String),
    FileOperation(String),
    Serialization(String),
    DateParse(String),
    Authentication(String),
    PermissionDenied(String),
    QuotaExceeded(String),
    NotFound(String),
    RemoteApi(String),
    Network(String),
    QrEncode(String),
    ImageRender(String),
}

impl PrintlinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            PrintlinkerError::ConfigFile(_) => "E001",
            PrintlinkerError::Credentials(_) => "E002",
            PrintlinkerError::Validation(_) => "E003",
            PrintlinkerError::FileOperation(_) => "E004",
            PrintlinkerError::Serialization(_) => "E005",
            PrintlinkerError::DateParse(_) => "E006",
            PrintlinkerError::Authentication(_) => "E007",
            PrintlinkerError::PermissionDenied(_) => "E008",
            PrintlinkerError::QuotaExceeded(_) => "E009",
            PrintlinkerError::NotFound(_) => "E010",
            PrintlinkerError::RemoteApi(_) => "E011",
            PrintlinkerError::Network(_) => "E012",
            PrintlinkerError::QrEncode(_) => "E013",
            PrintlinkerError::ImageRender(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            PrintlinkerError::ConfigFile(_) => "Configuration File Error",
            PrintlinkerError::Credentials(_) => "Credentials Error",
            PrintlinkerError::Validation(_) => "Validation Error",
            PrintlinkerError::FileOperation(_) => "File Operation Error",
            PrintlinkerError::Serialization(_) => "Serialization Error",
            PrintlinkerError::DateParse(_) => "Date Parse Error",
            PrintlinkerError::Authentication(_) => "Authentication Error",
            PrintlinkerError::PermissionDenied(_) => "Permission Denied",
            PrintlinkerError::QuotaExceeded(_) => "Quota Exceeded",
            PrintlinkerError::NotFound(_) => "Resource Not Found",
            PrintlinkerError::RemoteApi(_) => "Remote API Error",
            PrintlinkerError::Network(_) => "Network Error",
            PrintlinkerError::QrEncode(_) => "QR Encode Error",
            PrintlinkerError::ImageRender(_) => "Image Render Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            PrintlinkerError::ConfigFile(msg) => msg,
            PrintlinkerError::Credentials(msg) => msg,
            PrintlinkerError::Validation(msg) => msg,
            PrintlinkerError::FileOperation(msg) => msg,
            PrintlinkerError::Serialization(msg) => msg,
            PrintlinkerError::DateParse(msg) => msg,
            PrintlinkerError::Authentication(msg) => msg,
            PrintlinkerError::PermissionDenied(msg) => msg,
            PrintlinkerError::QuotaExceeded(msg) => msg,
            PrintlinkerError::NotFound(msg) => msg,
            PrintlinkerError::RemoteApi(msg) => msg,
            PrintlinkerError::Network(msg) => msg,
            PrintlinkerError::QrEncode(msg) => msg,
            PrintlinkerError::ImageRender(msg) => msg,
        }
    }

    /// 面向用户的修复建议
    pub fn remediation_hint(&self) -> Option<&'static str> {
        match self {
            PrintlinkerError::ConfigFile(_) => {
                Some("Run `printlinker setup` to see which configuration files are missing")
            }
            PrintlinkerError::Credentials(_) => Some(
                "Download a service account key (JSON) from the Google Cloud console into config/credentials.json",
            ),
            PrintlinkerError::Authentication(_) => Some(
                "Check that the service account key is valid and the Analytics Admin/Data APIs are enabled",
            ),
            PrintlinkerError::PermissionDenied(_) => Some(
                "Add the service account email under Admin > Property access management and grant the Editor role",
            ),
            PrintlinkerError::QuotaExceeded(_) => Some(
                "A property holds at most 50 event-scoped custom dimensions; archive unused ones first",
            ),
            PrintlinkerError::Network(_) => Some("Check network connectivity and the configured API base URLs"),
            PrintlinkerError::DateParse(_) => Some("Dates must use the YYYY-MM-DD format"),
            _ => None,
        }
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        let mut out = format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        );
        if let Some(hint) = self.remediation_hint() {
            out.push_str(&format!("\n  {} {}", "hint:".cyan().bold(), hint));
        }
        out
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PrintlinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PrintlinkerError {}

// 便捷的构造函数
impl PrintlinkerError {
    pub fn config_file<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::ConfigFile(msg.into())
    }

    pub fn credentials<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::Credentials(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::Validation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::DateParse(msg.into())
    }

    pub fn authentication<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::Authentication(msg.into())
    }

    pub fn permission_denied<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::PermissionDenied(msg.into())
    }

    pub fn quota_exceeded<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::QuotaExceeded(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::NotFound(msg.into())
    }

    pub fn remote_api<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::RemoteApi(msg.into())
    }

    pub fn network<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::Network(msg.into())
    }

    pub fn qr_encode<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::QrEncode(msg.into())
    }

    pub fn image_render<T: Into<String>>(msg: T) -> Self {
        PrintlinkerError::ImageRender(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for PrintlinkerError {
    fn from(err: std::io::Error) -> Self {
        PrintlinkerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PrintlinkerError {
    fn from(err: serde_json::Error) -> Self {
        PrintlinkerError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for PrintlinkerError {
    fn from(err: serde_yaml::Error) -> Self {
        PrintlinkerError::ConfigFile(err.to_string())
    }
}

impl From<csv::Error> for PrintlinkerError {
    fn from(err: csv::Error) -> Self {
        PrintlinkerError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PrintlinkerError {
    fn from(err: chrono::ParseError) -> Self {
        PrintlinkerError::DateParse(err.to_string())
    }
}

impl From<image::ImageError> for PrintlinkerError {
    fn from(err: image::ImageError) -> Self {
        PrintlinkerError::ImageRender(err.to_string())
    }
}

impl From<qrcode::types::QrError> for PrintlinkerError {
    fn from(err: qrcode::types::QrError) -> Self {
        PrintlinkerError::QrEncode(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for PrintlinkerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        PrintlinkerError::Credentials(format!("Failed to sign service account assertion: {}", err))
    }
}

impl From<ureq::Error> for PrintlinkerError {
    fn from(err: ureq::Error) -> Self {
        PrintlinkerError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PrintlinkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            PrintlinkerError::config_file("x"),
            PrintlinkerError::credentials("x"),
            PrintlinkerError::validation("x"),
            PrintlinkerError::file_operation("x"),
            PrintlinkerError::serialization("x"),
            PrintlinkerError::date_parse("x"),
            PrintlinkerError::authentication("x"),
            PrintlinkerError::permission_denied("x"),
            PrintlinkerError::quota_exceeded("x"),
            PrintlinkerError::not_found("x"),
            PrintlinkerError::remote_api("x"),
            PrintlinkerError::network("x"),
            PrintlinkerError::qr_encode("x"),
            PrintlinkerError::image_render("x"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_permission_denied_has_hint() {
        let err = PrintlinkerError::permission_denied("caller lacks permission");
        assert!(err.remediation_hint().unwrap().contains("Editor"));
        assert!(err.format_colored().contains("hint:"));
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = PrintlinkerError::validation("budget must be >= 0");
        assert_eq!(err.to_string(), "Validation Error: budget must be >= 0");
        assert!(err.remediation_hint().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PrintlinkerError = io.into();
        assert_eq!(err.code(), "E004");
    }
}
