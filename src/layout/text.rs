use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LayoutConfig;
use crate::text_metrics;
use crate::theme::Theme;

use super::LabelBlock;

pub const ELLIPSIS: char = '…';
pub const DEFAULT_ADDRESS_CHARS: usize = 9;

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0x[0-9a-fA-F]{16,}|[1-9A-HJ-NP-Za-km-z]{32,44}|[a-z0-9]{2,8}1[02-9ac-hj-np-z]{20,})$")
        .expect("address pattern is valid")
});

/// Hex (`0x…`), base58 or bech32 style on-chain address.
pub fn is_address_like(text: &str) -> bool {
    ADDRESS_RE.is_match(text.trim())
}

/// Keeps a prefix and a suffix with an ellipsis between them so both ends of
/// an address stay recognisable. Output is at most `max_chars` characters.
pub fn shorten_address(address: &str, max_chars: usize) -> String {
    shorten_middle(address.trim(), max_chars)
}

pub fn shorten_middle(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }
    if max_chars < 3 {
        return chars[..max_chars].iter().collect();
    }
    let keep = max_chars - 1;
    let suffix_len = keep / 2;
    let prefix_len = keep - suffix_len;
    let mut out: String = chars[..prefix_len].iter().collect();
    out.push(ELLIPSIS);
    out.extend(chars[chars.len() - suffix_len..].iter());
    out
}

/// Longest middle-ellipsised form of `label` whose measured width fits
/// `max_width`. Falls back to a single character.
pub fn fit_label<F>(label: &str, max_width: f32, measure: F) -> String
where
    F: Fn(&str) -> f32,
{
    if measure(label) <= max_width {
        return label.to_string();
    }
    let count = label.chars().count();
    for chars in (1..count).rev() {
        let candidate = shorten_middle(label, chars);
        if measure(&candidate) <= max_width {
            return candidate;
        }
    }
    shorten_middle(label, 1)
}

/// Text shown inside a node of the given radius. Addresses always use the
/// fixed-width shortening; other names are fitted to the space available at
/// the smallest font size the renderer may shrink to.
pub fn node_label(display_name: &str, radius: f32, font_size: f32, theme: &Theme, config: &LayoutConfig) -> LabelBlock {
    let family = theme.font_family.as_str();
    let fast = config.fast_text_metrics;
    let text = if is_address_like(display_name) {
        shorten_address(display_name, config.address_max_chars)
    } else {
        let max_width = radius * config.label_width_ratio;
        let floor = config.label_min_font_size;
        fit_label(display_name.trim(), max_width, |candidate| {
            text_metrics::text_width(candidate, floor, family, fast)
        })
    };
    let width = text_metrics::text_width(&text, font_size, family, fast);
    LabelBlock {
        text,
        width,
        font_size,
    }
}
