use super::isometric::ScreenPoint;

pub const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub const FONT_STYLE: &str = "font-family: 'Segoe UI', Ubuntu, sans-serif;";

/// Escapes text content and attribute values.
pub fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Value of a `points` attribute.
pub fn points(points: &[ScreenPoint]) -> String {
    points
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
