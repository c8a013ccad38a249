//! UTM 参数合并
//!
//! 在落地页 URL 上写入五个归因参数，保留已有的其他查询参数。

use strum::{AsRefStr, EnumIter, IntoEnumIterator};
use tracing::warn;
use url::form_urlencoded;

use super::identity::campaign_token;
use crate::config::Campaign;
use crate::utils::url_validator::validate_url;

/// `utm_source` 固定值
pub const SOURCE_VALUE: &str = "offline";
/// `utm_medium` 固定值
pub const MEDIUM_VALUE: &str = "print";

/// 归因参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum AttributionParam {
    UtmSource,
    UtmMedium,
    UtmCampaign,
    UtmContent,
    UtmTerm,
}

impl AttributionParam {
    /// 对应参数的取值
    pub fn value_for(self, campaign: &Campaign, token: &str) -> String {
        match self {
            Self::UtmSource => SOURCE_VALUE.to_string(),
            Self::UtmMedium => MEDIUM_VALUE.to_string(),
            Self::UtmCampaign => token.to_string(),
            Self::UtmContent => campaign.location.clone(),
            Self::UtmTerm => campaign.name.clone(),
        }
    }

    /// Tag-manager variable name, e.g. `{{UTM Source}}`
    pub fn variable_name(self) -> &'static str {
        match self {
            Self::UtmSource => "{{UTM Source}}",
            Self::UtmMedium => "{{UTM Medium}}",
            Self::UtmCampaign => "{{UTM Campaign}}",
            Self::UtmContent => "{{UTM Content}}",
            Self::UtmTerm => "{{UTM Term}}",
        }
    }
}

/// 活动对应的五个归因参数
pub fn attribution_params(campaign: &Campaign, token: &str) -> Vec<(String, String)> {
    AttributionParam::iter()
        .map(|p| (p.as_ref().to_string(), p.value_for(campaign, token)))
        .collect()
}

/// Build the tracked URL for a campaign.
///
/// Returns `(url, token)`.
pub fn build_attribution_url(campaign: &Campaign) -> (String, String) {
    let token = campaign_token(campaign);
    let params = attribution_params(campaign, &token);
    (apply_params(&campaign.target_url, &params), token)
}

/// Overwrite `params` in the query string of `target_url`.
///
/// Absolute http(s) URLs go through `url::Url`. Anything else is split on
/// the first `#` and `?` and reassembled around the new query.
pub fn apply_params(target_url: &str, params: &[(String, String)]) -> String {
    let target_url = target_url.trim();

    match validate_url(target_url) {
        Ok(mut url) => {
            let existing: Vec<(String, String)> = url.query_pairs().into_owned().collect();
            let merged = merge_query(existing, params);
            {
                let mut query = url.query_pairs_mut();
                query.clear();
                query.extend_pairs(merged.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            url.to_string()
        }
        Err(e) => {
            warn!(
                "Target URL '{}' is not absolute ({}), appending parameters best-effort",
                target_url, e
            );
            apply_params_best_effort(target_url, params)
        }
    }
}

fn apply_params_best_effort(target_url: &str, params: &[(String, String)]) -> String {
    let (before_fragment, fragment) = match target_url.split_once('#') {
        Some((head, frag)) => (head, Some(frag)),
        None => (target_url, None),
    };
    let (base, query) = match before_fragment.split_once('?') {
        Some((base, query)) => (base, query),
        None => (before_fragment, ""),
    };

    let existing: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let merged = merge_query(existing, params);
    let new_query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(merged.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();

    let mut out = format!("{}?{}", base, new_query);
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// 合并查询参数
///
/// 已有参数按首次出现顺序分组（同名参数保留全部值），
/// 归因参数覆盖同名参数，未出现过的追加到末尾。
fn merge_query(
    existing: Vec<(String, String)>,
    params: &[(String, String)],
) -> Vec<(String, String)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in existing {
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => groups.push((key, vec![value])),
        }
    }

    for (key, value) in params {
        match groups.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => *values = vec![value.clone()],
            None => groups.push((key.clone(), vec![value.clone()])),
        }
    }

    groups
        .into_iter()
        .flat_map(|(key, values)| values.into_iter().map(move |v| (key.clone(), v)))
        .collect()
}
