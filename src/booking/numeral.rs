//! Chinese numerals in the range 0–99.

const DIGITS: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];

fn digit_value(c: char) -> Option<u32> {
    match c {
        '两' => Some(2),
        c => DIGITS.iter().position(|&d| d == c).and_then(|i| u32::try_from(i).ok()),
    }
}

/// Value of one side of `十`; a blank side takes `blank`.
fn side(text: &str, blank: u32) -> Option<u32> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Some(blank),
        (Some(c), None) => digit_value(c),
        (Some(_), Some(_)) => None,
    }
}

/// Decode a numeral such as `三`, `十五`, `二十`, `九十九` or `廿三`.
///
/// The text is split on `十` into at most two sides of at most one digit
/// each. A blank tens side reads as one and a blank units side as zero;
/// without any `十` the whole text is the units digit. `廿` stands for `二十`.
#[must_use]
pub fn decode(text: &str) -> Option<u32> {
    let expanded = text.replace('廿', "二十");
    let mut parts = expanded.split('十');
    let first = parts.next().unwrap_or("");
    match (parts.next(), parts.next()) {
        (None, _) => side(first, 0),
        (Some(units), None) => Some(side(first, 1)? * 10 + side(units, 0)?),
        (Some(_), Some(_)) => None,
    }
}

/// The canonical spelling of `n`, or `None` above 99.
#[must_use]
pub fn encode(n: u32) -> Option<String> {
    let digit = |d: u32| DIGITS[d as usize];
    let (tens, units) = (n / 10, n % 10);
    let mut out = String::new();
    match tens {
        0 => {
            out.push(digit(units));
            return Some(out);
        }
        1 => {}
        2..=9 => out.push(digit(tens)),
        _ => return None,
    }
    out.push('十');
    if units != 0 {
        out.push(digit(units));
    }
    Some(out)
}
