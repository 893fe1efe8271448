//! Pointer-driven range selection over the demand slot grid.
//!
//! The controller is a two-state machine: idle (`drag_range == None`) and
//! dragging. Every terminal transition clears the range.

use crate::models::demand::DemandRecord;
use crate::utils::time::{ordered, SlotGrid};

/// Slots touched by an in-progress drag, in gesture order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragRange {
    pub start: usize,
    pub end: usize,
}

impl DragRange {
    /// `(min, max)` of the two endpoints.
    pub fn normalized(&self) -> (usize, usize) {
        ordered(self.start, self.end)
    }

    pub fn contains(&self, slot: usize) -> bool {
        let (low, high) = self.normalized();
        (low..=high).contains(&slot)
    }
}

/// A finished selection, with end-exclusive times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotSelection {
    pub start_slot: usize,
    pub end_slot: usize,
    pub start_time: String,
    pub end_time: String,
}

/// Events emitted by the grid to the owning page.
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    CreateDemandFromRange(SlotSelection),
    EditDemand(DemandRecord),
}

pub struct SlotDragController {
    grid: SlotGrid,
    drag_range: Option<DragRange>,
    saving: bool,
    read_only: bool,
}

impl SlotDragController {
    pub fn new(grid: SlotGrid) -> Self {
        Self {
            grid,
            drag_range: None,
            saving: false,
            read_only: false,
        }
    }

    pub fn grid(&self) -> SlotGrid {
        self.grid
    }

    /// Update the busy/read-only flags, abandoning any drag they disable.
    pub fn set_interaction(&mut self, saving: bool, read_only: bool) {
        self.saving = saving;
        self.read_only = read_only;
        if !self.is_enabled() {
            self.cancel();
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.saving && !self.read_only
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_range.is_some()
    }

    pub fn drag_range(&self) -> Option<DragRange> {
        self.drag_range
    }

    /// True when `slot` lies inside the current drag.
    pub fn is_highlighted(&self, slot: usize) -> bool {
        self.drag_range.is_some_and(|range| range.contains(slot))
    }

    /// Start a drag. Returns whether a drag began.
    ///
    /// Ignored while disabled, on occupied slots and outside the grid.
    pub fn pointer_down(&mut self, slot: usize, occupied: bool) -> bool {
        if !self.is_enabled() || occupied || slot >= self.grid.total_slots() {
            return false;
        }
        log::debug!("Demand drag started at slot {}", slot);
        self.drag_range = Some(DragRange {
            start: slot,
            end: slot,
        });
        true
    }

    /// Extend the drag to `slot`. The start is never moved.
    pub fn pointer_enter(&mut self, slot: usize) {
        if slot >= self.grid.total_slots() {
            return;
        }
        if let Some(range) = self.drag_range.as_mut() {
            range.end = slot;
        }
    }

    /// Finish the gesture.
    ///
    /// Releasing over a slot yields the normalized selection; releasing
    /// outside the grid (`None`) abandons the drag.
    pub fn pointer_up(&mut self, slot: Option<usize>) -> Option<SlotSelection> {
        let mut range = self.drag_range.take()?;
        let Some(slot) = slot.filter(|s| *s < self.grid.total_slots()) else {
            log::debug!("Demand drag released outside the grid, discarding");
            return None;
        };
        range.end = slot;

        let (start_slot, end_slot) = range.normalized();
        let (start_time, end_time) = self.grid.drag_time_range(start_slot, end_slot);
        log::debug!(
            "Demand drag finished: slots {}..={} ({} - {})",
            start_slot,
            end_slot,
            start_time,
            end_time
        );
        Some(SlotSelection {
            start_slot,
            end_slot,
            start_time,
            end_time,
        })
    }

    /// Drop the in-progress drag without emitting anything.
    pub fn cancel(&mut self) {
        if self.drag_range.take().is_some() {
            log::debug!("Demand drag cancelled");
        }
    }

    /// Click on a slot covered by `record`: request an edit instead of a drag.
    pub fn click_occupied(&self, record: &DemandRecord) -> Option<GridEvent> {
        if self.saving || self.is_dragging() {
            return None;
        }
        Some(GridEvent::EditDemand(record.clone()))
    }
}

impl Default for SlotDragController {
    fn default() -> Self {
        Self::new(SlotGrid::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demand::WeekdayApplicability;
    use pretty_assertions::assert_eq;

    fn record() -> DemandRecord {
        DemandRecord {
            id: 7,
            scheme_id: 1,
            name: "Evening".to_string(),
            description: None,
            start_time: "17:00".to_string(),
            end_time: "21:00".to_string(),
            start_month: 1,
            end_month: 12,
            lookback_days: 30,
            price_base: 0.5,
            weekday_applicability: WeekdayApplicability::AllDays,
            created_at: None,
        }
    }

    #[test]
    fn test_reverse_drag_is_normalized() {
        let mut controller = SlotDragController::default();
        assert!(controller.pointer_down(10, false));
        controller.pointer_enter(5);
        let selection = controller.pointer_up(Some(5)).unwrap();

        let grid = SlotGrid::default();
        assert_eq!(
            selection,
            SlotSelection {
                start_slot: 5,
                end_slot: 10,
                start_time: grid.slot_index_to_time(5),
                end_time: grid.slot_index_to_time(11),
            }
        );
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_single_slot_click_selects_one_slot() {
        let mut controller = SlotDragController::default();
        controller.pointer_down(18, false);
        let selection = controller.pointer_up(Some(18)).unwrap();
        assert_eq!(selection.start_time, "09:00");
        assert_eq!(selection.end_time, "09:30");
    }

    #[test]
    fn test_last_slot_ends_at_midnight_marker() {
        let mut controller = SlotDragController::default();
        controller.pointer_down(46, false);
        controller.pointer_enter(47);
        let selection = controller.pointer_up(Some(47)).unwrap();
        assert_eq!(selection.start_time, "23:00");
        assert_eq!(selection.end_time, "24:00");
    }

    #[test]
    fn test_enter_moves_end_only() {
        let mut controller = SlotDragController::default();
        controller.pointer_down(4, false);
        controller.pointer_enter(9);
        controller.pointer_enter(2);
        assert_eq!(controller.drag_range(), Some(DragRange { start: 4, end: 2 }));
        assert!(controller.is_highlighted(3));
        assert!(!controller.is_highlighted(5));
    }

    #[test]
    fn test_enter_without_drag_is_ignored() {
        let mut controller = SlotDragController::default();
        controller.pointer_enter(3);
        assert_eq!(controller.drag_range(), None);
        assert_eq!(controller.pointer_up(Some(3)), None);
    }

    #[test]
    fn test_pointer_down_on_occupied_slot_does_not_drag() {
        let mut controller = SlotDragController::default();
        assert!(!controller.pointer_down(36, true));
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_pointer_down_out_of_bounds_does_not_drag() {
        let mut controller = SlotDragController::default();
        assert!(!controller.pointer_down(48, false));
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_disabled_while_saving_or_read_only() {
        let mut controller = SlotDragController::default();
        controller.set_interaction(true, false);
        assert!(!controller.pointer_down(1, false));

        controller.set_interaction(false, true);
        assert!(!controller.pointer_down(1, false));

        controller.set_interaction(false, false);
        assert!(controller.pointer_down(1, false));
    }

    #[test]
    fn test_disabling_mid_drag_abandons_range() {
        let mut controller = SlotDragController::default();
        controller.pointer_down(3, false);
        controller.pointer_enter(6);
        controller.set_interaction(true, false);
        assert_eq!(controller.drag_range(), None);

        controller.set_interaction(false, false);
        assert_eq!(controller.pointer_up(Some(6)), None);
    }

    #[test]
    fn test_release_outside_grid_discards() {
        let mut controller = SlotDragController::default();
        controller.pointer_down(3, false);
        controller.pointer_enter(8);
        assert_eq!(controller.pointer_up(None), None);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_cancel_clears_range() {
        let mut controller = SlotDragController::default();
        controller.pointer_down(3, false);
        controller.cancel();
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_click_occupied_emits_edit() {
        let controller = SlotDragController::default();
        assert_eq!(
            controller.click_occupied(&record()),
            Some(GridEvent::EditDemand(record()))
        );
    }

    #[test]
    fn test_click_occupied_ignored_while_saving() {
        let mut controller = SlotDragController::default();
        controller.set_interaction(true, false);
        assert_eq!(controller.click_occupied(&record()), None);
    }
}
