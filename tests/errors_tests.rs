use printlinker::errors::{PrintlinkerError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_config_file_error() {
        let error = PrintlinkerError::config_file("campaigns.yml not found");

        assert!(matches!(error, PrintlinkerError::ConfigFile(_)));
        assert!(error.to_string().contains("Configuration File Error"));
        assert!(error.to_string().contains("campaigns.yml not found"));
        assert_eq!(error.code(), "E001");
    }

    #[test]
    fn test_credentials_error() {
        let error = PrintlinkerError::credentials("private_key missing");

        assert!(matches!(error, PrintlinkerError::Credentials(_)));
        assert!(error.remediation_hint().unwrap().contains("service account key"));
    }

    #[test]
    fn test_quota_error_hint_mentions_limit() {
        let error = PrintlinkerError::quota_exceeded("too many dimensions");

        assert!(error.remediation_hint().unwrap().contains("50"));
    }

    #[test]
    fn test_local_errors_have_no_hint() {
        for error in [
            PrintlinkerError::validation("x"),
            PrintlinkerError::file_operation("x"),
            PrintlinkerError::qr_encode("x"),
            PrintlinkerError::image_render("x"),
        ] {
            assert!(
                error.remediation_hint().is_none(),
                "{} should have no hint",
                error.code()
            );
        }
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;

    #[test]
    fn test_serde_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let error: PrintlinkerError = json_error.into();

        assert!(matches!(error, PrintlinkerError::Serialization(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("a: [1, 2").unwrap_err();
        let error: PrintlinkerError = yaml_error.into();

        assert!(matches!(error, PrintlinkerError::ConfigFile(_)));
    }

    #[test]
    fn test_chrono_error_conversion() {
        let parse_error = chrono::NaiveDate::parse_from_str("2024-13-01", "%Y-%m-%d").unwrap_err();
        let error: PrintlinkerError = parse_error.into();

        assert!(matches!(error, PrintlinkerError::DateParse(_)));
        assert_eq!(error.code(), "E006");
    }

    #[test]
    fn test_qr_error_conversion() {
        let data = vec![b'x'; 4000];
        let qr_error = qrcode::QrCode::new(&data).err().expect("expected QR encode error");
        let error: PrintlinkerError = qr_error.into();

        assert!(matches!(error, PrintlinkerError::QrEncode(_)));
    }
}

#[cfg(test)]
mod error_trait_tests {
    use super::*;

    fn fails() -> Result<()> {
        std::fs::read_to_string("/definitely/not/here/campaigns.yml")?;
        Ok(())
    }

    #[test]
    fn test_question_mark_converts_io_error() {
        let error = fails().unwrap_err();
        assert!(matches!(error, PrintlinkerError::FileOperation(_)));
    }

    #[test]
    fn test_is_std_error() {
        let error = PrintlinkerError::network("timeout");
        let boxed: Box<dyn Error> = Box::new(error.clone());

        assert_eq!(boxed.to_string(), error.format_simple());
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_equality() {
        assert_eq!(
            PrintlinkerError::not_found("a"),
            PrintlinkerError::not_found("a")
        );
        assert_ne!(
            PrintlinkerError::not_found("a"),
            PrintlinkerError::remote_api("a")
        );
    }
}
