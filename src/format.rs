use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

const GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// `used / total` in gigabytes with one decimal, as shown on the memory gauge.
pub fn format_gb_pair(used: u64, total: u64) -> String {
    format!("{:.1}GB / {:.1}GB", used as f64 / GB, total as f64 / GB)
}

pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Network counters as a single status line.
pub fn format_network(sent: u64, recv: u64, packets_sent: u64, packets_recv: u64) -> String {
    format!(
        "Sent: {sent} bytes, Received: {recv} bytes, Packets Sent: {packets_sent}, Packets Received: {packets_recv}"
    )
}
