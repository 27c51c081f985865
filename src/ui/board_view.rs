//! Board rendering for both topologies
//!
//! Free-placement boards are drawn Go style, stones on grid intersections.
//! Gravity boards are drawn as a frame of holes, and a click anywhere in a
//! column drops into it.

use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use crate::board::{Board, Move, Placement, Player, Pos};

use super::theme::*;

/// Human-readable cell name: column letter, then row counted from the bottom.
pub fn notation(rows: u8, pos: Pos) -> String {
    let col = (b'A' + pos.col) as char;
    format!("{}{}", col, rows - pos.row)
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
    /// Gravity boards put stones inside cells, free boards on intersections
    cell_offset: f32,
    rows: u8,
    cols: u8,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 30.0,
            board_rect: Rect::NOTHING,
            cell_offset: 0.0,
            rows: 0,
            cols: 0,
        }
    }
}

/// What the board view needs to draw one frame
pub struct BoardScene<'a> {
    pub board: &'a Board,
    pub turn: Player,
    pub last_move: Option<Pos>,
    pub hint: Option<Move>,
    pub winning_line: Option<&'a [Pos]>,
    /// False while the engine is thinking or the game is over
    pub accept_input: bool,
}

impl BoardView {
    /// Render the board and return the move clicked, if any
    pub fn show(&mut self, ui: &mut egui::Ui, scene: &BoardScene<'_>) -> Option<Move> {
        let board = scene.board;
        self.layout(board, ui.available_size());

        let size = Vec2::new(
            2.0 * BOARD_MARGIN + self.span(self.cols),
            2.0 * BOARD_MARGIN + self.span(self.rows),
        );
        let (response, painter) = ui.allocate_painter(size, Sense::click());
        self.board_rect = response.rect;

        match board.placement() {
            Placement::FreePlacement => {
                painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
                self.draw_grid(&painter);
                self.draw_star_points(&painter);
            }
            Placement::GravityDrop => {
                painter.rect_filled(self.board_rect, CornerRadius::same(8), GRAVITY_FRAME);
                self.draw_holes(&painter);
            }
        }
        self.draw_coordinates(&painter, board.placement());
        self.draw_stones(&painter, board);

        if let Some(pos) = scene.last_move {
            self.draw_last_move_marker(&painter, pos);
        }
        if let Some(line) = scene.winning_line {
            self.draw_winning_line(&painter, line);
        }
        if let Some(pos) = scene.hint.and_then(|mv| board.landing(mv).ok()) {
            self.draw_suggestion(&painter, pos, scene.turn);
        }

        if !scene.accept_input {
            return None;
        }

        // Hover preview and click
        let pointer = response.hover_pos()?;
        let hovered = self.move_at(board, pointer)?;
        match board.landing(hovered) {
            Ok(pos) => {
                self.draw_hover_preview(&painter, pos, scene.turn);
                response.clicked().then_some(hovered)
            }
            Err(_) => {
                if let Some(pos) = self.screen_to_board(pointer) {
                    self.draw_stone_disc(&painter, pos, hover_invalid());
                }
                None
            }
        }
    }

    fn layout(&mut self, board: &Board, available: Vec2) {
        self.rows = board.rows();
        self.cols = board.cols();
        self.cell_offset = match board.placement() {
            Placement::FreePlacement => 0.0,
            Placement::GravityDrop => 0.5,
        };
        let fit_x = (available.x - 20.0 - 2.0 * BOARD_MARGIN) / self.cells_across(self.cols);
        let fit_y = (available.y - 20.0 - 2.0 * BOARD_MARGIN) / self.cells_across(self.rows);
        self.cell_size = fit_x.min(fit_y).max(MIN_CELL_SIZE);
    }

    fn cells_across(&self, n: u8) -> f32 {
        // Intersections: n points span n - 1 gaps; holes: n cells
        (f32::from(n) - 1.0 + 2.0 * self.cell_offset).max(1.0)
    }

    fn span(&self, n: u8) -> f32 {
        self.cells_across(n) * self.cell_size
    }

    /// Draw the grid lines
    fn draw_grid(&self, painter: &Painter) {
        let stroke = Stroke::new(GRID_LINE_WIDTH, GRID_LINE);
        let origin = self.board_rect.min + Vec2::splat(BOARD_MARGIN);

        for col in 0..self.cols {
            let x = f32::from(col) * self.cell_size;
            let start = origin + Vec2::new(x, 0.0);
            painter.line_segment([start, start + Vec2::new(0.0, self.span(self.rows))], stroke);
        }
        for row in 0..self.rows {
            let y = f32::from(row) * self.cell_size;
            let start = origin + Vec2::new(0.0, y);
            painter.line_segment([start, start + Vec2::new(self.span(self.cols), 0.0)], stroke);
        }
    }

    /// Draw star points (hoshi) on boards large enough to carry them
    fn draw_star_points(&self, painter: &Painter) {
        if self.rows < 9 || self.cols < 9 {
            return;
        }
        let lines = |n: u8| [3, n / 2, n - 4];
        for row in lines(self.rows) {
            for col in lines(self.cols) {
                let center = self.board_to_screen(Pos::new(row, col));
                painter.circle_filled(center, STAR_POINT_RADIUS, STAR_POINT);
            }
        }
    }

    fn draw_holes(&self, painter: &Painter) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.draw_stone_disc(painter, Pos::new(row, col), GRAVITY_HOLE);
            }
        }
    }

    /// Draw coordinate labels: letters across, numbers counted from the bottom
    fn draw_coordinates(&self, painter: &Painter, placement: Placement) {
        let font = egui::FontId::proportional(12.0);
        let color = match placement {
            Placement::FreePlacement => GRID_LINE,
            Placement::GravityDrop => TEXT_PRIMARY,
        };

        for col in 0..self.cols {
            let letter = (b'A' + col) as char;
            let x = self.board_to_screen(Pos::new(0, col)).x;
            painter.text(
                Pos2::new(x, self.board_rect.min.y + 12.0),
                egui::Align2::CENTER_CENTER,
                letter,
                font.clone(),
                color,
            );
            painter.text(
                Pos2::new(x, self.board_rect.max.y - 12.0),
                egui::Align2::CENTER_CENTER,
                letter,
                font.clone(),
                color,
            );
        }

        for row in 0..self.rows {
            let num = self.rows - row;
            let y = self.board_to_screen(Pos::new(row, 0)).y;
            painter.text(
                Pos2::new(self.board_rect.min.x + 12.0, y),
                egui::Align2::CENTER_CENTER,
                num.to_string(),
                font.clone(),
                color,
            );
            painter.text(
                Pos2::new(self.board_rect.max.x - 12.0, y),
                egui::Align2::CENTER_CENTER,
                num.to_string(),
                font.clone(),
                color,
            );
        }
    }

    /// Draw all placed stones
    fn draw_stones(&self, painter: &Painter, board: &Board) {
        for (pos, player) in board.stones() {
            self.draw_stone(painter, pos, player);
        }
    }

    fn draw_stone_disc(&self, painter: &Painter, pos: Pos, color: Color32) {
        let center = self.board_to_screen(pos);
        painter.circle_filled(center, self.cell_size * STONE_RADIUS_RATIO, color);
    }

    /// Draw a single stone with visual polish
    fn draw_stone(&self, painter: &Painter, pos: Pos, player: Player) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * STONE_RADIUS_RATIO;
        let shadow_offset = Vec2::new(2.0, 2.0);

        match player {
            Player::First => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 60),
                );
                painter.circle_filled(center, radius, BLACK_STONE);

                let highlight_offset = Vec2::new(-radius * 0.3, -radius * 0.3);
                painter.circle_filled(
                    center + highlight_offset,
                    radius * 0.2,
                    BLACK_STONE_HIGHLIGHT,
                );
            }
            Player::Second => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 40),
                );
                painter.circle_filled(center, radius, WHITE_STONE);

                // Inner shadow for depth
                painter.circle_stroke(
                    center,
                    radius * 0.85,
                    Stroke::new(radius * 0.1, WHITE_STONE_SHADOW),
                );
            }
        }
    }

    fn draw_last_move_marker(&self, painter: &Painter, pos: Pos) {
        let center = self.board_to_screen(pos);
        painter.circle_filled(center, LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
    }

    /// Draw winning line highlight
    fn draw_winning_line(&self, painter: &Painter, line: &[Pos]) {
        let stroke = Stroke::new(4.0, WIN_HIGHLIGHT);

        for pair in line.windows(2) {
            let start = self.board_to_screen(pair[0]);
            let end = self.board_to_screen(pair[1]);
            painter.line_segment([start, end], stroke);
        }

        let radius = self.cell_size * STONE_RADIUS_RATIO + 3.0;
        for pos in line {
            painter.circle_stroke(self.board_to_screen(*pos), radius, stroke);
        }
    }

    /// Draw move suggestion
    fn draw_suggestion(&self, painter: &Painter, pos: Pos, turn: Player) {
        let center = self.board_to_screen(pos);
        self.draw_stone_disc(painter, pos, preview_color(turn, 100));

        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "?",
            egui::FontId::proportional(14.0),
            match turn {
                Player::First => WHITE_STONE,
                Player::Second => BLACK_STONE,
            },
        );
    }

    fn draw_hover_preview(&self, painter: &Painter, pos: Pos, turn: Player) {
        self.draw_stone_disc(painter, pos, preview_color(turn, 80));
    }

    /// Move a click at `screen_pos` stands for: the cell on free boards, the column on gravity boards.
    fn move_at(&self, board: &Board, screen_pos: Pos2) -> Option<Move> {
        match board.placement() {
            Placement::FreePlacement => self.screen_to_board(screen_pos).map(Move::from),
            Placement::GravityDrop => {
                let col = self.lattice_index(screen_pos.x - self.board_rect.min.x);
                (0..i32::from(self.cols))
                    .contains(&col)
                    .then(|| Move::column(col as u8))
            }
        }
    }

    fn lattice_index(&self, offset: f32) -> i32 {
        ((offset - BOARD_MARGIN) / self.cell_size - self.cell_offset + 0.5).floor() as i32
    }

    /// Convert screen coordinates to board position
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let relative = screen_pos - self.board_rect.min;
        let col = self.lattice_index(relative.x);
        let row = self.lattice_index(relative.y);

        if (0..i32::from(self.cols)).contains(&col) && (0..i32::from(self.rows)).contains(&row) {
            Some(Pos::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Convert board position to screen coordinates
    pub fn board_to_screen(&self, pos: Pos) -> Pos2 {
        let x = BOARD_MARGIN + (f32::from(pos.col) + self.cell_offset) * self.cell_size;
        let y = BOARD_MARGIN + (f32::from(pos.row) + self.cell_offset) * self.cell_size;
        self.board_rect.min + Vec2::new(x, y)
    }
}

fn preview_color(turn: Player, alpha: u8) -> Color32 {
    match turn {
        Player::First => Color32::from_rgba_unmultiplied(20, 20, 20, alpha),
        Player::Second => Color32::from_rgba_unmultiplied(240, 240, 240, alpha),
    }
}
