use egui::{Color32, Visuals};

use crate::models::demand::WeekdayApplicability;

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| -> u8 { ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8 };
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

#[derive(Clone, Copy)]
pub(crate) struct DemandGridPalette {
    pub slot_bg: Color32,
    pub hour_bg: Color32,
    pub slot_line: Color32,
    pub hour_line: Color32,
    pub hover_overlay: Color32,
    pub drag_fill: Color32,
    pub disabled_overlay: Color32,
    pub label_text: Color32,
    pub all_days: Color32,
    pub weekday: Color32,
    pub weekend: Color32,
}

impl DemandGridPalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let base = visuals.extreme_bg_color;
        let text = visuals.text_color();
        let accent = visuals.selection.bg_fill;
        Self {
            slot_bg: base,
            hour_bg: blend(base, text, 0.04),
            slot_line: blend(base, text, 0.12),
            hour_line: blend(base, text, 0.25),
            hover_overlay: with_alpha(accent, if visuals.dark_mode { 60 } else { 40 }),
            drag_fill: with_alpha(accent, if visuals.dark_mode { 150 } else { 110 }),
            disabled_overlay: with_alpha(base, 140),
            label_text: text,
            all_days: Color32::from_rgb(59, 130, 246),
            weekday: Color32::from_rgb(245, 158, 11),
            weekend: Color32::from_rgb(16, 185, 129),
        }
    }

    pub fn demand_fill(&self, applicability: WeekdayApplicability) -> Color32 {
        match applicability {
            WeekdayApplicability::AllDays => self.all_days,
            WeekdayApplicability::Weekday => self.weekday,
            WeekdayApplicability::Weekend => self.weekend,
        }
    }
}
