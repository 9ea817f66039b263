//! Overlays drawn on top of the effect: status bar, help box, notifications.

use crate::colors::Rgb;
use crate::params::VisualConfig;
use crate::render::{Style, Surface};
use crate::visualizer::Style as VisStyle;

const STATUS: Rgb = Rgb::new(120, 120, 140);
const ACCENT: Rgb = Rgb::new(100, 200, 255);
const SEPARATOR: Rgb = Rgb::new(80, 80, 100);
const HELP_BODY: Rgb = Rgb::new(200, 200, 220);
const HELP_BORDER: Rgb = Rgb::new(80, 140, 220);
const HELP_TITLE: Rgb = Rgb::new(120, 200, 255);
pub const NOTICE: Rgb = Rgb::new(255, 255, 0);

const HELP: [&str; 19] = [
    "╔══════════════════════════════════════════════╗",
    "║           AUDIOVIS  ─  CONTROLS              ║",
    "╠══════════════════════════════════════════════╣",
    "║                                              ║",
    "║   1-5     Switch visualization style         ║",
    "║   n       Next visualization                 ║",
    "║   c / C   Next / Previous color scheme       ║",
    "║   + / -   Adjust sensitivity                 ║",
    "║   m       Toggle mirror mode                 ║",
    "║   p       Toggle peak indicators             ║",
    "║   s       Cycle smoothing level              ║",
    "║   [ / ]   Adjust bar width                   ║",
    "║                                              ║",
    "║   ?/h     Toggle this help                   ║",
    "║   q/ESC   Quit                               ║",
    "║                                              ║",
    "║   Styles: bars wave spectrum circle fire     ║",
    "║                                              ║",
    "╚══════════════════════════════════════════════╝",
];
const HELP_WIDTH: usize = 48;

/// Status line text, e.g. ` ♪ LIVE │ BARS │ rainbow │ sens:1.0x │ smooth:65% │ peaks │ ?:help `
pub fn status_line(source: &str, style: VisStyle, scheme: &str, visual: &VisualConfig) -> String {
    let mirror = if visual.mirror { " │ mirror" } else { "" };
    let peaks = if visual.show_peaks { " │ peaks" } else { "" };
    format!(
        " ♪ {} │ {} │ {} │ sens:{:.1}x │ smooth:{:.0}%{}{} │ ?:help ",
        source,
        style.name().to_uppercase(),
        scheme,
        visual.sensitivity,
        visual.smoothing * 100.0,
        mirror,
        peaks,
    )
}

/// Draw `text` on the last row, separators dimmed and the note accented
pub fn draw_status_bar(surface: &mut dyn Surface, text: &str) {
    let (width, height) = surface.size();
    let Some(y) = height.checked_sub(1) else {
        return;
    };
    for (x, ch) in text.chars().take(width).enumerate() {
        let color = match ch {
            '│' => SEPARATOR,
            '♪' => ACCENT,
            _ => STATUS,
        };
        surface.set_content(x, y, ch, Style::fg(color));
    }
}

/// Centered controls box, clipped to the surface
pub fn draw_help(surface: &mut dyn Surface) {
    let (width, height) = surface.size();
    let start_x = width.saturating_sub(HELP_WIDTH) / 2;
    let start_y = height.saturating_sub(HELP.len()) / 2;

    for (i, line) in HELP.iter().enumerate() {
        let y = start_y + i;
        if y >= height {
            break;
        }
        for (j, ch) in line.chars().enumerate() {
            let x = start_x + j;
            if x >= width {
                break;
            }
            let style = if i == 1 {
                Style::fg(HELP_TITLE).bold()
            } else if "╔╗╚╝═║╠╣".contains(ch) {
                Style::fg(HELP_BORDER)
            } else {
                Style::fg(HELP_BODY)
            };
            surface.set_content(x, y, ch, style);
        }
    }
}

/// One-line message centered on the second row
pub fn draw_notification(surface: &mut dyn Surface, message: &str, color: Rgb) {
    let (width, _) = surface.size();
    let text = format!("  {}  ", message);
    let start = width.saturating_sub(text.chars().count()) / 2;
    for (i, ch) in text.chars().enumerate() {
        if start + i < width {
            surface.set_content(start + i, 1, ch, Style::fg(color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CellBuffer;

    #[test]
    fn test_status_line_format() {
        let visual = VisualConfig::default();
        assert_eq!(
            status_line("LIVE", VisStyle::Bars, "rainbow", &visual),
            " ♪ LIVE │ BARS │ rainbow │ sens:1.0x │ smooth:65% │ peaks │ ?:help "
        );

        let visual = VisualConfig {
            mirror: true,
            show_peaks: false,
            sensitivity: 2.0,
            ..VisualConfig::default()
        };
        assert_eq!(
            status_line("DEMO", VisStyle::Fire, "ocean", &visual),
            " ♪ DEMO │ FIRE │ ocean │ sens:2.0x │ smooth:65% │ mirror │ ?:help "
        );
    }

    #[test]
    fn test_status_bar_colors() {
        let mut buf = CellBuffer::new(80, 3);
        let text = status_line("LIVE", VisStyle::Wave, "neon", &VisualConfig::default());
        draw_status_bar(&mut buf, &text);

        assert!(buf.row_text(2).starts_with(" ♪ LIVE │ WAVE"));
        assert_eq!(buf.get(1, 2).unwrap().style.fg, Some(ACCENT));
        assert_eq!(buf.get(8, 2).unwrap().style.fg, Some(SEPARATOR));
        assert_eq!(buf.get(3, 2).unwrap().style.fg, Some(STATUS));
    }

    #[test]
    fn test_status_bar_is_clipped() {
        let mut buf = CellBuffer::new(10, 1);
        draw_status_bar(&mut buf, " ♪ LIVE │ BARS │ rainbow");
        assert_eq!(buf.row_text(0), " ♪ LIVE │ ");
    }

    #[test]
    fn test_help_is_centered() {
        let mut buf = CellBuffer::new(60, 25);
        draw_help(&mut buf);
        // (60 - 48) / 2 = 6, (25 - 19) / 2 = 3
        assert_eq!(buf.content(6, 3), Some('╔'));
        assert_eq!(buf.get(6, 3).unwrap().style.fg, Some(HELP_BORDER));
        let title = buf.get(20, 4).unwrap();
        assert!(title.style.bold);
        assert_eq!(buf.content(53, 21), Some('╝'));
    }

    #[test]
    fn test_help_on_tiny_surface() {
        let mut buf = CellBuffer::new(5, 2);
        draw_help(&mut buf);
        assert_eq!(buf.row_text(0), "╔════");
    }

    #[test]
    fn test_notification_row() {
        let mut buf = CellBuffer::new(20, 4);
        draw_notification(&mut buf, "hello", NOTICE);
        // "  hello  " is 9 wide, starts at 5
        assert_eq!(buf.row_text(1), "       hello        ");
        assert_eq!(buf.get(7, 1).unwrap().style.fg, Some(NOTICE));
    }
}
