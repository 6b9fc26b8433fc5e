use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    let now_utc = Utc::now();
    let now_jst: DateTime<FixedOffset> = now_utc.with_timezone(&jst_offset);
    now_jst.timestamp_millis()
}

/// Render a JST millisecond timestamp as an RFC 3339 string
pub fn timestamp_to_jst_rfc3339(millis: i64) -> String {
    let jst_offset = FixedOffset::east_opt(9 * 3600).unwrap(); // JST is UTC+9
    jst_offset
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_jst_rfc3339() {
        // テスト項目: ミリ秒タイムスタンプを JST の RFC 3339 文字列に変換できる
        // given (前提条件):
        let millis = 1672498800000i64; // 2023-01-01 00:00:00 ends with +09:00 in JST

        // when (操作):
        let rendered = timestamp_to_jst_rfc3339(millis);

        // then (期待する結果):
        assert!(rendered.ends_with("+09:00"));
        assert!(rendered.starts_with("2023-01-01"));
    }
}
