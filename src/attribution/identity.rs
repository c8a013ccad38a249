use md5::{Digest, Md5};

use crate::config::Campaign;
use crate::utils::date_parser::DATE_FORMAT;

/// 活动 token 长度（十六进制字符）
pub const TOKEN_LEN: usize = 8;

/// Derive the campaign token from `name` and `start_date`.
///
/// The token is written into `utm_campaign` on the QR code and later used as
/// the report filter value, so both paths must go through this function.
pub fn campaign_token(campaign: &Campaign) -> String {
    token_for(
        &campaign.name,
        &campaign.start_date.format(DATE_FORMAT).to_string(),
    )
}

/// MD5(`{name}_{start_date}`) 十六进制摘要的前 8 位
pub fn token_for(name: &str, start_date: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(name.as_bytes());
    hasher.update(b"_");
    hasher.update(start_date.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..TOKEN_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn campaign(name: &str, start: &str) -> Campaign {
        Campaign {
            name: name.to_string(),
            location: "Station".to_string(),
            start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            end_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            budget: 1000.0,
            target_url: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_golden_token() {
        assert_eq!(token_for("Spring Sale", "2024-03-01"), "1283efc4");
        assert_eq!(campaign_token(&campaign("Spring Sale", "2024-03-01")), "1283efc4");
        assert_eq!(token_for("Summer Flyer", "2024-06-01"), "2671e879");
    }

    #[test]
    fn test_token_is_stable() {
        let c = campaign("Spring Sale", "2024-03-01");
        let first = campaign_token(&c);
        for _ in 0..10 {
            assert_eq!(campaign_token(&c), first);
        }
    }

    #[test]
    fn test_token_shape() {
        let token = campaign_token(&campaign("ポスター 駅前", "2024-07-01"));
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_token_depends_on_both_fields() {
        let base = campaign_token(&campaign("Spring Sale", "2024-03-01"));
        assert_ne!(base, campaign_token(&campaign("Spring Sale", "2024-03-02")));
        assert_ne!(base, campaign_token(&campaign("Spring Sale 2", "2024-03-01")));
    }

    #[test]
    fn test_location_does_not_affect_token() {
        let a = campaign("Spring Sale", "2024-03-01");
        let mut b = a.clone();
        b.location = "Elsewhere".to_string();
        b.budget = 1.0;
        assert_eq!(campaign_token(&a), campaign_token(&b));
    }
}
