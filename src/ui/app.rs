//! Main application for the desktop GUI

use std::time::{Duration, Instant};

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use crate::board::{BoardConfig, Move, Placement, Player, Pos};
use crate::game::{GameController, GameMode};
use crate::rules::GameStatus;

use super::board_view::{notation, BoardScene, BoardView};
use super::theme::*;

/// Main application: one game session plus view state
pub struct KinrowApp {
    game: GameController,
    board_view: BoardView,
    show_debug: bool,
    message: Option<String>,
    /// Start of the current turn and the move count it belongs to
    turn_started: Instant,
    moves_seen: usize,
}

impl KinrowApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, game: GameController) -> Self {
        Self {
            game,
            board_view: BoardView::default(),
            show_debug: true,
            message: None,
            turn_started: Instant::now(),
            moves_seen: 0,
        }
    }

    fn player_name(player: Player) -> &'static str {
        match player {
            Player::First => "BLACK (X)",
            Player::Second => "WHITE (O)",
        }
    }

    fn move_label(&self, mv: Move) -> String {
        match mv {
            Move::Place { row, col } => notation(self.game.board().rows(), Pos::new(row, col)),
            Move::Drop { col } => format!("column {}", (b'A' + col) as char),
        }
    }

    fn start_new_game(&mut self, config: BoardConfig, mode: GameMode) {
        self.game.new_game(config, mode);
        self.message = None;
    }

    fn undo(&mut self) {
        match self.game.undo() {
            Ok(()) => self.message = None,
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn request_hint(&mut self) {
        if let Err(e) = self.game.request_hint() {
            self.message = Some(e.to_string());
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    let games = [
                        ("Gomoku", BoardConfig::gomoku()),
                        ("Connect Four", BoardConfig::connect_four()),
                    ];
                    for (name, config) in games {
                        if ui.button(format!("{name} (vs AI - Black)")).clicked() {
                            self.start_new_game(config, GameMode::PvE { human: Player::First });
                            ui.close_menu();
                        }
                        if ui.button(format!("{name} (vs AI - White)")).clicked() {
                            self.start_new_game(config, GameMode::PvE { human: Player::Second });
                            ui.close_menu();
                        }
                        if ui.button(format!("{name} (Hot-seat)")).clicked() {
                            self.start_new_game(config, GameMode::PvP);
                            ui.close_menu();
                        }
                        ui.separator();
                    }
                    if ui.button("Restart (N)").clicked() {
                        self.game.reset();
                        ui.close_menu();
                    }
                    if ui.button("Undo (U)").clicked() {
                        self.undo();
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_text = match self.game.mode() {
                        GameMode::PvE { human } => format!("vs AI - You: {}", Self::player_name(human)),
                        GameMode::PvP => "Hot-seat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info and debug
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                self.render_title_card(ui);
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);

                self.render_timer_card(ui);
                ui.add_space(10.0);

                self.render_actions_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                if self.game.status().is_over() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui);
                }

                if let Some(msg) = &self.message {
                    ui.add_space(10.0);
                    Self::render_message_card(ui, msg);
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        let config = self.game.board().config();
        let title = match config.placement {
            Placement::FreePlacement => "GOMOKU",
            Placement::GravityDrop => "CONNECT FOUR",
        };
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("●○").size(20.0).color(TEXT_SECONDARY));
            ui.add_space(4.0);
            ui.label(RichText::new(title).size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!(
                    "{}x{}, {} in a row",
                    config.rows, config.cols, config.win_length
                ))
                .size(11.0)
                .color(TEXT_MUTED),
            );
        });
    }

    /// Render turn indicator card
    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let turn = self.game.turn();
            let (stone_char, accent, stone_color) = match turn {
                Player::First => ("●", egui::Color32::from_rgb(70, 70, 75), TEXT_PRIMARY),
                Player::Second => (
                    "○",
                    egui::Color32::from_rgb(220, 220, 225),
                    egui::Color32::from_rgb(30, 30, 35),
                ),
            };

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, accent);
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    stone_char,
                    egui::FontId::proportional(28.0),
                    stone_color,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(RichText::new(Self::player_name(turn)).size(18.0).strong().color(TEXT_PRIMARY));

                    let status = if self.game.is_ai_thinking() {
                        ("AI thinking...", TIMER_WARNING)
                    } else if self.game.status().is_over() {
                        ("Game Over", WIN_HIGHLIGHT)
                    } else if self.game.is_hint_pending() {
                        ("Looking for a hint...", TIMER_WARNING)
                    } else {
                        ("Your turn", TIMER_NORMAL)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    /// Render timer card
    fn render_timer_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("TIMER").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let budget = self.game.engine_config().time_budget_ms as f32 / 1000.0;
            if let Some(elapsed) = self.game.ai_thinking_elapsed() {
                let secs = elapsed.as_secs_f32();
                let color = if secs < budget * 0.5 {
                    TIMER_NORMAL
                } else if secs < budget {
                    TIMER_WARNING
                } else {
                    TIMER_CRITICAL
                };
                ui.label(RichText::new(format!("{secs:.2}s")).size(28.0).strong().color(color));
            } else {
                let elapsed = if self.game.status().is_over() {
                    Duration::ZERO
                } else {
                    self.turn_started.elapsed()
                };
                ui.label(
                    RichText::new(format!("{:.1}s", elapsed.as_secs_f32()))
                        .size(24.0)
                        .color(TEXT_PRIMARY),
                );
            }

            if let Some(ai_time) = self.game.last_ai_time() {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Last AI: {:.3}s (budget {budget:.1}s)", ai_time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    /// Render actions card
    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            let btn_frame = Frame::new()
                .fill(BUTTON_BG)
                .corner_radius(CornerRadius::same(6))
                .inner_margin(8.0);
            let button = |ui: &mut egui::Ui, text: &str| {
                btn_frame
                    .show(ui, |ui| {
                        ui.add(
                            egui::Label::new(RichText::new(text).size(12.0).color(TEXT_PRIMARY))
                                .sense(egui::Sense::click()),
                        )
                        .clicked()
                    })
                    .inner
            };

            ui.horizontal(|ui| {
                if button(ui, "↩ Undo") {
                    self.undo();
                }
                ui.add_space(4.0);
                if button(ui, "New") {
                    self.game.reset();
                    self.message = None;
                }
                if self.game.mode() == GameMode::PvP {
                    ui.add_space(4.0);
                    if button(ui, "Hint") {
                        self.request_hint();
                    }
                }
            });

            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("Move #{}", self.game.history().len()))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
            );
        });
    }

    /// Render debug card
    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Frame::new()
            .fill(DEBUG_CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
                ui.add_space(6.0);

                let Some(result) = self.game.last_ai_result() else {
                    ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                    return;
                };

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(format!("{:?}", result.search_type))
                                .size(11.0)
                                .strong()
                                .color(TIMER_NORMAL),
                        );
                        ui.label(RichText::new(format!("Score: {}", result.score)).size(10.0).color(TEXT_SECONDARY));
                        ui.label(RichText::new(format!("Depth: {}", result.depth)).size(10.0).color(TEXT_SECONDARY));
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(format!("{}ms", result.time_ms)).size(10.0).color(TEXT_SECONDARY));
                            ui.label(RichText::new(format!("{} nodes", result.nodes)).size(10.0).color(TEXT_MUTED));
                            ui.label(
                                RichText::new(format!("{:.0}% first-move cuts", result.stats.first_move_rate()))
                                    .size(10.0)
                                    .color(TEXT_MUTED),
                            );
                        });
                    });
                });

                if let Some(mv) = result.best_move {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("→ {}", self.move_label(mv)))
                            .size(12.0)
                            .strong()
                            .color(WIN_HIGHLIGHT),
                    );
                }
            });
    }

    /// Render game over card
    fn render_game_over_card(&mut self, ui: &mut egui::Ui) {
        let (headline, detail) = match self.game.status() {
            GameStatus::Won(player) => (
                format!("{} WINS!", Self::player_name(player)),
                format!("{} in a row", self.game.board().win_length()),
            ),
            _ => ("DRAW".to_string(), "board is full".to_string()),
        };

        Frame::new()
            .fill(GAME_OVER_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.add_space(4.0);
                    ui.label(RichText::new(detail).size(11.0).color(TEXT_SECONDARY));
                    ui.add_space(12.0);

                    let clicked = Frame::new()
                        .fill(egui::Color32::from_rgb(60, 100, 70))
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.add(
                                egui::Label::new(
                                    RichText::new("New Game").size(14.0).strong().color(TEXT_PRIMARY),
                                )
                                .sense(egui::Sense::click()),
                            )
                            .clicked()
                        })
                        .inner;
                    if clicked {
                        self.game.reset();
                        self.message = None;
                    }
                });
            });
    }

    /// Render status message card
    fn render_message_card(ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(MESSAGE_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("⚠").size(14.0));
                    ui.add_space(4.0);
                    ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
                });
            });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(Frame::new().fill(BOARD_AREA_BG).inner_margin(10.0))
            .show(ctx, |ui| {
                let scene = BoardScene {
                    board: self.game.board(),
                    turn: self.game.turn(),
                    last_move: self.game.last_move(),
                    hint: self.game.hint(),
                    winning_line: self.game.winning_line(),
                    accept_input: self.game.is_human_turn() && !self.game.is_ai_thinking(),
                };
                let clicked = self.board_view.show(ui, &scene);

                if let Some(mv) = clicked {
                    match self.game.play(mv) {
                        Ok(()) => self.message = None,
                        Err(e) => self.message = Some(e.to_string()),
                    }
                }
            });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (debug, hint, undo, new_game) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::H),
                i.key_pressed(egui::Key::U),
                i.key_pressed(egui::Key::N),
            )
        });

        if debug {
            self.show_debug = !self.show_debug;
        }
        if hint && self.game.mode() == GameMode::PvP {
            self.request_hint();
        }
        if undo {
            self.undo();
        }
        if new_game {
            self.game.reset();
            self.message = None;
        }
    }
}

impl eframe::App for KinrowApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        // Starts the engine on its turn and applies finished searches
        self.game.poll();
        if let Some(e) = self.game.last_error() {
            self.message = Some(format!("Engine stopped: {e}. Press N to retry."));
        }

        let moves = self.game.history().len();
        if moves != self.moves_seen {
            self.moves_seen = moves;
            self.turn_started = Instant::now();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.game.is_ai_thinking() || self.game.is_hint_pending() {
            ctx.request_repaint();
        } else if !self.game.status().is_over() {
            // Keep the turn timer ticking
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
