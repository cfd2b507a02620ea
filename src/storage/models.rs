use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 短链接：slug → 目标地址
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub slug: String,
    pub destination: String,
}

/// 点击来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitType {
    Redirect,
    Pixel,
}

impl HitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redirect => "redirect",
            Self::Pixel => "pixel",
        }
    }
}

impl fmt::Display for HitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HitType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "redirect" => Ok(Self::Redirect),
            "pixel" => Ok(Self::Pixel),
            _ => Err(format!(
                "Invalid hit type: '{}'. Valid: redirect, pixel",
                s
            )),
        }
    }
}

/// 一次点击记录，创建后不再修改
///
/// 字段名与 hits.json 中的 camelCase 键一一对应。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit {
    #[serde(rename = "type")]
    pub kind: HitType,
    pub slug: String,
    #[serde(default)]
    pub ip: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub browser: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub device: String,
    #[serde(default)]
    pub referer: String,
    #[serde(default)]
    pub accept_language: String,
}

/// `2024-05-01T12:00:00.000Z` 格式的时间戳
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_hit() -> Hit {
        Hit {
            kind: HitType::Pixel,
            slug: "news".to_string(),
            ip: "203.0.113.9".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            user_agent: "curl/8.0".to_string(),
            browser: "Unknown".to_string(),
            os: "Unknown".to_string(),
            device: "desktop".to_string(),
            referer: "Direct".to_string(),
            accept_language: "Unknown".to_string(),
        }
    }

    #[test]
    fn test_hit_uses_legacy_field_names() {
        let value = serde_json::to_value(sample_hit()).unwrap();
        assert_eq!(value["type"], "pixel");
        assert_eq!(value["timestamp"], "2024-05-01T12:00:00.000Z");
        assert_eq!(value["userAgent"], "curl/8.0");
        assert_eq!(value["acceptLanguage"], "Unknown");
    }

    #[test]
    fn test_hit_reads_legacy_record() {
        let raw = r#"{
            "type": "redirect",
            "slug": "abc",
            "ip": "::1",
            "timestamp": "2023-11-02T08:15:30.123Z",
            "userAgent": "Mozilla/5.0",
            "browser": "Chrome 119.0.0.0",
            "os": "Windows 10",
            "device": "desktop",
            "referer": "Direct",
            "acceptLanguage": "en-US"
        }"#;
        let hit: Hit = serde_json::from_str(raw).unwrap();
        assert_eq!(hit.kind, HitType::Redirect);
        assert_eq!(hit.timestamp.timestamp_subsec_millis(), 123);
        assert_eq!(hit.browser, "Chrome 119.0.0.0");
    }

    #[test]
    fn test_hit_type_parse() {
        assert_eq!("pixel".parse::<HitType>().unwrap(), HitType::Pixel);
        assert!("click".parse::<HitType>().is_err());
        assert_eq!(HitType::Redirect.to_string(), "redirect");
    }
}
