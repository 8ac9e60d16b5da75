/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at facility scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Generate a shareable public code for a stay request.
///
/// Format: `REQ-YYYYMMDD-XXXX` (4 random base-36 characters).
/// Not a primary key; collisions are acceptable.
pub fn public_request_code() -> String {
    use rand::Rng;
    const ALLOWED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let date = chrono::Utc::now().format("%Y%m%d");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| ALLOWED[rng.gen_range(0..ALLOWED.len())] as char)
        .collect();
    format!("REQ-{}-{}", date, suffix)
}
