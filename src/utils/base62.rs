//! Base62 短码编解码
//!
//! 字母表顺序为数字、小写、大写，与已发布的短码保持兼容

const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const BASE: i64 = 62;

/// 将非负整数编码为 base62 字符串，负数返回 None
pub fn encode(mut number: i64) -> Option<String> {
    if number < 0 {
        return None;
    }
    if number == 0 {
        return Some("0".to_string());
    }

    // i64::MAX 在 base62 下最多 11 位
    let mut buffer = [0u8; 11];
    let mut index = buffer.len();
    while number > 0 {
        index -= 1;
        buffer[index] = ALPHABET[(number % BASE) as usize];
        number /= BASE;
    }

    Some(buffer[index..].iter().map(|&b| b as char).collect())
}

/// 将 base62 字符串解码为整数
///
/// 空字符串、非法字符或超出 i64 范围时返回 None
pub fn decode(code: &str) -> Option<i64> {
    if code.is_empty() {
        return None;
    }

    code.bytes().try_fold(0i64, |acc, b| {
        let digit = digit_value(b)?;
        acc.checked_mul(BASE)?.checked_add(digit)
    })
}

fn digit_value(b: u8) -> Option<i64> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as i64),
        b'a'..=b'z' => Some((b - b'a') as i64 + 10),
        b'A'..=b'Z' => Some((b - b'A') as i64 + 36),
        _ => None,
    }
}
