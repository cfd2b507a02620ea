//! 点击统计聚合
//!
//! 所有统计都是对（过滤后的）点击列表做一次线性扫描。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::storage::Hit;

/// stats / export 接口共用的过滤条件
///
/// 空字符串等同于未设置。`type` 与点击类型按字符串比较，
/// 未知类型只会得到空结果。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitFilter {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl HitFilter {
    pub fn new(slug: Option<&str>, kind: Option<&str>) -> Self {
        Self {
            slug: slug.map(str::to_string),
            kind: kind.map(str::to_string),
        }
    }

    pub fn matches(&self, hit: &Hit) -> bool {
        if let Some(slug) = self.slug.as_deref().filter(|s| !s.is_empty())
            && hit.slug != slug
        {
            return false;
        }
        if let Some(kind) = self.kind.as_deref().filter(|s| !s.is_empty())
            && hit.kind.as_str() != kind
        {
            return false;
        }
        true
    }

    /// 按到达顺序返回匹配的点击
    pub fn apply<'a>(&self, hits: &'a [Hit]) -> Vec<&'a Hit> {
        hits.iter().filter(|hit| self.matches(hit)).collect()
    }
}

/// `/admin/stats` 响应体
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_slug: BTreeMap<String, usize>,
    #[serde(rename = "byIP")]
    pub by_ip: BTreeMap<String, usize>,
    pub by_browser: BTreeMap<String, usize>,
    #[serde(rename = "byOS")]
    pub by_os: BTreeMap<String, usize>,
    pub by_device: BTreeMap<String, usize>,
    /// 最新的点击在前
    pub recent: Vec<Hit>,
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    if let Some(count) = map.get_mut(key) {
        *count += 1;
    } else {
        map.insert(key.to_string(), 1);
    }
}

/// 聚合过滤后的点击
pub fn aggregate(hits: &[Hit], filter: &HitFilter, recent_limit: usize) -> HitStats {
    let filtered = filter.apply(hits);
    let mut stats = HitStats {
        total: filtered.len(),
        ..Default::default()
    };

    for hit in &filtered {
        bump(&mut stats.by_type, hit.kind.as_str());
        bump(&mut stats.by_slug, &hit.slug);
        bump(&mut stats.by_ip, &hit.ip);
        bump(&mut stats.by_browser, &hit.browser);
        bump(&mut stats.by_os, &hit.os);
        bump(&mut stats.by_device, &hit.device);
    }

    stats.recent = filtered
        .iter()
        .rev()
        .take(recent_limit)
        .map(|hit| (*hit).clone())
        .collect();

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::HitType;
    use chrono::{Duration, TimeZone, Utc};

    fn hits() -> Vec<Hit> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let rows = [
            ("a", HitType::Redirect, "1.1.1.1", "Chrome 120", "Windows 10", "desktop"),
            ("a", HitType::Pixel, "1.1.1.1", "Chrome 120", "Windows 10", "desktop"),
            ("b", HitType::Redirect, "2.2.2.2", "Safari 17", "iOS 17", "mobile"),
            ("a", HitType::Redirect, "3.3.3.3", "Firefox 121", "Linux", "desktop"),
        ];
        rows.iter()
            .enumerate()
            .map(|(i, (slug, kind, ip, browser, os, device))| Hit {
                kind: *kind,
                slug: slug.to_string(),
                ip: ip.to_string(),
                timestamp: base + Duration::minutes(i as i64),
                user_agent: "ua".to_string(),
                browser: browser.to_string(),
                os: os.to_string(),
                device: device.to_string(),
                referer: "Direct".to_string(),
                accept_language: "en".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_unfiltered_totals() {
        let hits = hits();
        let stats = aggregate(&hits, &HitFilter::default(), 100);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.by_type.values().sum::<usize>(), stats.total);
        assert_eq!(stats.by_type["redirect"], 3);
        assert_eq!(stats.by_type["pixel"], 1);
        assert_eq!(stats.by_slug["a"], 3);
        assert_eq!(stats.by_ip["1.1.1.1"], 2);
        assert_eq!(stats.by_device["desktop"], 3);
        assert_eq!(stats.by_os["iOS 17"], 1);
    }

    #[test]
    fn test_filters_combine() {
        let hits = hits();
        let stats = aggregate(&hits, &HitFilter::new(Some("a"), Some("redirect")), 100);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_type.values().sum::<usize>(), 2);
        assert_eq!(stats.by_slug.len(), 1);
        assert_eq!(stats.by_browser["Firefox 121"], 1);
    }

    #[test]
    fn test_empty_filter_values_are_ignored() {
        let hits = hits();
        let stats = aggregate(&hits, &HitFilter::new(Some(""), Some("")), 100);
        assert_eq!(stats.total, 4);
    }

    #[test]
    fn test_unknown_type_yields_nothing() {
        let hits = hits();
        let stats = aggregate(&hits, &HitFilter::new(None, Some("click")), 100);
        assert_eq!(stats.total, 0);
        assert!(stats.by_type.is_empty());
        assert!(stats.recent.is_empty());
    }

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let hits = hits();
        let stats = aggregate(&hits, &HitFilter::default(), 2);

        assert_eq!(stats.recent.len(), 2);
        assert_eq!(stats.recent[0].ip, "3.3.3.3");
        assert_eq!(stats.recent[1].ip, "2.2.2.2");
        assert!(stats.recent[0].timestamp > stats.recent[1].timestamp);
    }

    #[test]
    fn test_serialized_keys() {
        let hits = hits();
        let value = serde_json::to_value(aggregate(&hits, &HitFilter::default(), 1)).unwrap();
        for key in ["total", "byType", "bySlug", "byIP", "byBrowser", "byOS", "byDevice", "recent"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }
}
