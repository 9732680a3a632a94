// TUI widget modules for each screen zone and overlay.

pub mod board;
pub mod confirm;
pub mod notice;
pub mod question_modal;
pub mod scoreboard;
pub mod setup;
pub mod status_bar;

use ratatui::style::Color;
use trivia_core::HexColor;

/// Terminal color for a team or cell color.
pub fn to_color(color: HexColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: HexColor) -> Color {
    let (r, g, b) = background.rgb();
    // ITU-R BT.601 luma
    let luma = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    if luma > 150_000 {
        Color::Black
    } else {
        Color::White
    }
}
