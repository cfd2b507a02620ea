//! 点击日志 CSV 导出
//!
//! 每个字段都加引号，字段内的 `"` 转义为 `""`，行之间用 `\n` 分隔，
//! 最后一行后面没有换行。

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::errors::{LinktrackError, Result};
use crate::storage::Hit;

pub const HIT_CSV_HEADERS: [&str; 9] = [
    "Type", "Slug", "IP", "Timestamp", "Browser", "OS", "Device", "Referer", "Language",
];

/// 将点击记录写成 CSV 字节
pub fn hits_to_csv<'a, I>(hits: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Hit>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HIT_CSV_HEADERS)?;

    for hit in hits {
        let timestamp = hit
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        writer.write_record([
            hit.kind.as_str(),
            hit.slug.as_str(),
            hit.ip.as_str(),
            timestamp.as_str(),
            hit.browser.as_str(),
            hit.os.as_str(),
            hit.device.as_str(),
            hit.referer.as_str(),
            hit.accept_language.as_str(),
        ])?;
    }

    let mut bytes = writer.into_inner().map_err(|e| {
        LinktrackError::serialization(format!("Failed to finish CSV: {}", e.error()))
    })?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(bytes)
}
