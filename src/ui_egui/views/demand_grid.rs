//! Demand overlay for the slot grid.
//!
//! Each demand record is drawn as its own row with its enabled slots filled.
//! A trailing empty row accepts drags for new demands. The projection from
//! records to rows is pure and recomputed every frame.

use chrono::Month;
use egui::{Align2, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use super::palette::DemandGridPalette;
use crate::models::demand::DemandRecord;
use crate::ui_egui::drag::{GridEvent, SlotDragController};
use crate::utils::time::SlotGrid;

pub const ROW_HEIGHT: f32 = 28.0;
pub const LABEL_WIDTH: f32 = 160.0;
pub const HEADER_HEIGHT: f32 = 18.0;
const MIN_SLOT_WIDTH: f32 = 10.0;

/// One rendered demand row.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandRow<'a> {
    pub record: &'a DemandRecord,
    pub enabled: Vec<bool>,
    pub tooltip: String,
}

/// Half-open slot span `[start, end)` covered by a record.
///
/// The span is clamped into the grid and is always at least one slot wide.
/// An end of `00:00` is read as end of day. Returns `None` when either stored
/// time cannot be parsed.
pub fn slot_span(grid: SlotGrid, record: &DemandRecord) -> Option<(usize, usize)> {
    let total = grid.total_slots();
    let start = grid.clamp_slot(grid.time_to_slot_index(&record.start_time)?);
    let end = match grid.time_to_slot_index(&record.end_time)? {
        0 => total,
        end => end.min(total),
    };
    Some((start, end.max(start + 1)))
}

/// Boolean mask of the slots a record covers.
pub fn enabled_slots(grid: SlotGrid, record: &DemandRecord) -> Vec<bool> {
    let mut enabled = vec![false; grid.total_slots()];
    match slot_span(grid, record) {
        Some((start, end)) => enabled[start..end].iter_mut().for_each(|slot| *slot = true),
        None => log::warn!(
            "Demand {} has unparsable times {:?} - {:?}",
            record.id,
            record.start_time,
            record.end_time
        ),
    }
    enabled
}

/// Records in display order: oldest `created_at` first, untimed rows after,
/// ties broken by id.
pub fn sort_records(records: &[DemandRecord]) -> Vec<&DemandRecord> {
    let mut sorted: Vec<&DemandRecord> = records.iter().collect();
    sorted.sort_by_key(|record| (record.created_at.is_none(), record.created_at, record.id));
    sorted
}

pub fn project_rows(grid: SlotGrid, records: &[DemandRecord]) -> Vec<DemandRow<'_>> {
    sort_records(records)
        .into_iter()
        .map(|record| DemandRow {
            record,
            enabled: enabled_slots(grid, record),
            tooltip: format_demand_tooltip(record),
        })
        .collect()
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Multi-line hover summary for a demand window.
pub fn format_demand_tooltip(record: &DemandRecord) -> String {
    let mut lines = vec![
        record.name.clone(),
        format!("Time: {} - {}", record.start_time, record.end_time),
        format!("Price base: {:.4}", record.price_base),
        format!(
            "Months: {} - {}",
            month_name(record.start_month),
            month_name(record.end_month)
        ),
        format!(
            "Lookback: {} day{}",
            record.lookback_days,
            if record.lookback_days == 1 { "" } else { "s" }
        ),
        format!("Applies: {}", record.weekday_applicability.label()),
    ];
    if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("\n{}", description));
    }
    lines.join("\n")
}

struct PointerFrame {
    pressed: bool,
    released: bool,
    pos: Option<Pos2>,
}

/// Per-frame renderer for the demand grid.
pub struct DemandGridView;

impl DemandGridView {
    /// Draw every demand row plus the empty creation row and feed pointer
    /// input to `controller`. Returns at most one event per frame.
    pub fn show(
        ui: &mut egui::Ui,
        controller: &mut SlotDragController,
        records: &[DemandRecord],
    ) -> Option<GridEvent> {
        let grid = controller.grid();
        let rows = project_rows(grid, records);
        let palette = DemandGridPalette::from_visuals(ui.visuals());
        let slot_width =
            ((ui.available_width() - LABEL_WIDTH) / grid.total_slots() as f32).max(MIN_SLOT_WIDTH);
        let pointer = ui.input(|i| PointerFrame {
            pressed: i.pointer.primary_pressed(),
            released: i.pointer.primary_released(),
            pos: i.pointer.interact_pos(),
        });

        let mut event = None;
        let mut slot_under_pointer = None;

        let grid_response = ui.vertical(|ui| {
            ui.spacing_mut().item_spacing = Vec2::ZERO;
            render_hour_header(ui, grid, slot_width, &palette);

            for row in &rows {
                let row_event = render_row(
                    ui,
                    controller,
                    &row.record.name,
                    Some(row),
                    slot_width,
                    &palette,
                    &pointer,
                    &mut slot_under_pointer,
                );
                if event.is_none() {
                    event = row_event;
                }
            }

            let new_row_event = render_row(
                ui,
                controller,
                "New demand",
                None,
                slot_width,
                &palette,
                &pointer,
                &mut slot_under_pointer,
            );
            if event.is_none() {
                event = new_row_event;
            }
        });

        if !controller.is_enabled() {
            ui.painter()
                .rect_filled(grid_response.response.rect, 0.0, palette.disabled_overlay);
        }

        if pointer.released && controller.is_dragging() {
            if let Some(selection) = controller.pointer_up(slot_under_pointer) {
                event = Some(GridEvent::CreateDemandFromRange(selection));
            }
        }

        event
    }
}

fn render_hour_header(ui: &mut egui::Ui, grid: SlotGrid, slot_width: f32, palette: &DemandGridPalette) {
    let width = LABEL_WIDTH + slot_width * grid.total_slots() as f32;
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, HEADER_HEIGHT), Sense::hover());
    let slots_per_hour = (60 / grid.slot_minutes()) as usize;
    for hour in (0..24).step_by(2) {
        let x = rect.left() + LABEL_WIDTH + (hour * slots_per_hour) as f32 * slot_width;
        ui.painter().text(
            Pos2::new(x, rect.center().y),
            Align2::LEFT_CENTER,
            format!("{:02}:00", hour),
            FontId::proportional(10.0),
            palette.label_text,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn render_row(
    ui: &mut egui::Ui,
    controller: &mut SlotDragController,
    label: &str,
    row: Option<&DemandRow<'_>>,
    slot_width: f32,
    palette: &DemandGridPalette,
    pointer: &PointerFrame,
    slot_under_pointer: &mut Option<usize>,
) -> Option<GridEvent> {
    let grid = controller.grid();
    let slots_per_hour = (60 / grid.slot_minutes()) as usize;
    let mut event = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = Vec2::ZERO;

        let (label_rect, label_response) =
            ui.allocate_exact_size(Vec2::new(LABEL_WIDTH, ROW_HEIGHT), Sense::click());
        ui.painter().text(
            Pos2::new(label_rect.left() + 4.0, label_rect.center().y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(12.0),
            palette.label_text,
        );
        // Labels stay clickable so rows with unreadable times can still be edited
        if let Some(demand_row) = row {
            if label_response.clicked() {
                event = controller.click_occupied(demand_row.record);
            }
            label_response.on_hover_text(demand_row.tooltip.as_str());
        }

        for slot in 0..grid.total_slots() {
            let (rect, response) =
                ui.allocate_exact_size(Vec2::new(slot_width, ROW_HEIGHT), Sense::click_and_drag());
            let occupant = row.filter(|r| r.enabled[slot]);

            if pointer.pos.is_some_and(|pos| rect.contains(pos)) {
                *slot_under_pointer = Some(slot);
                if controller.is_dragging() {
                    controller.pointer_enter(slot);
                }
            }

            match occupant {
                Some(demand_row) => {
                    if response.clicked() {
                        event = controller.click_occupied(demand_row.record);
                    }
                }
                None => {
                    if pointer.pressed && response.hovered() {
                        controller.pointer_down(slot, false);
                    }
                }
            }

            paint_cell(ui, rect, slot, slot_width, slots_per_hour, occupant, controller, palette);

            if response.hovered() && controller.is_enabled() {
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }
            if let Some(demand_row) = occupant {
                response.on_hover_text(demand_row.tooltip.as_str());
            }
        }
    });

    event
}

#[allow(clippy::too_many_arguments)]
fn paint_cell(
    ui: &egui::Ui,
    rect: Rect,
    slot: usize,
    slot_width: f32,
    slots_per_hour: usize,
    occupant: Option<&DemandRow<'_>>,
    controller: &SlotDragController,
    palette: &DemandGridPalette,
) {
    let is_hour_start = slot % slots_per_hour == 0;
    let painter = ui.painter();

    let bg = if is_hour_start { palette.hour_bg } else { palette.slot_bg };
    painter.rect_filled(rect, 0.0, bg);

    if let Some(demand_row) = occupant {
        let fill = palette.demand_fill(demand_row.record.weekday_applicability);
        painter.rect_filled(rect.shrink2(Vec2::new(0.0, 3.0)), 0.0, fill);
    } else if controller.is_highlighted(slot) {
        painter.rect_filled(rect, 0.0, palette.drag_fill);
    } else if ui.rect_contains_pointer(rect) && controller.is_enabled() {
        painter.rect_filled(rect, 0.0, palette.hover_overlay);
    }

    let line_color = if is_hour_start { palette.hour_line } else { palette.slot_line };
    painter.line_segment(
        [
            Pos2::new(rect.left(), rect.top()),
            Pos2::new(rect.left(), rect.bottom()),
        ],
        Stroke::new(if slot_width > 14.0 { 1.0 } else { 0.5 }, line_color),
    );
    painter.line_segment(
        [
            Pos2::new(rect.left(), rect.bottom()),
            Pos2::new(rect.right(), rect.bottom()),
        ],
        Stroke::new(1.0, palette.slot_line),
    );
}
