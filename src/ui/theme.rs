//! Theme constants for the Omok GUI

use egui::Color32;

// Board colors - warm wood tones
pub const BOARD_BG: Color32 = Color32::from_rgb(222, 184, 135); // Burlywood
pub const GRID_LINE: Color32 = Color32::from_rgb(60, 40, 20);
pub const STAR_POINT: Color32 = Color32::from_rgb(50, 35, 20);

// Stones
pub const BLACK_STONE: Color32 = Color32::from_rgb(25, 25, 30);
pub const BLACK_STONE_HIGHLIGHT: Color32 = Color32::from_rgb(70, 70, 80);
pub const WHITE_STONE: Color32 = Color32::from_rgb(250, 250, 252);
pub const WHITE_STONE_SHADOW: Color32 = Color32::from_rgb(190, 190, 195);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(230, 60, 60);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);
pub const FORBIDDEN_MARK: Color32 = Color32::from_rgb(200, 40, 40);

pub fn hover_invalid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 50, 50, 100)
}

// Panel text
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Timer / status
pub const TIMER_NORMAL: Color32 = Color32::from_rgb(80, 200, 120);
pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const TIMER_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 40.0;
pub const STONE_RADIUS_RATIO: f32 = 0.45;
pub const STAR_POINT_RADIUS: f32 = 4.0;
pub const GRID_LINE_WIDTH: f32 = 1.0;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 5.0;

/// Star points for a board of side `size`: center plus the four corner
/// points (three lines in, two on boards under 13). Boards under 9 only get
/// the center.
pub fn star_points(size: usize) -> Vec<(u8, u8)> {
    let center = (size / 2) as u8;
    if size < 9 {
        return vec![(center, center)];
    }
    let edge: u8 = if size >= 13 { 3 } else { 2 };
    let far = size as u8 - 1 - edge;
    vec![(edge, edge), (far, edge), (center, center), (edge, far), (far, far)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_points_standard_board() {
        let points = star_points(15);
        assert_eq!(points.len(), 5);
        assert!(points.contains(&(7, 7)));
        assert!(points.contains(&(3, 3)));
        assert!(points.contains(&(11, 11)));
    }

    #[test]
    fn test_star_points_small_board() {
        assert_eq!(star_points(5), vec![(2, 2)]);
        assert!(star_points(25).iter().all(|&(x, y)| x < 25 && y < 25));
    }
}
