use crate::state::plot_state::AxisExtrema;
use crate::ui::number_field::{FieldBounds, FieldValue, NumberField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    XMin,
    XMax,
    YMin,
    YMax,
}

/// The x/y range controls: two required x fields, two y fields gated by the
/// auto-scale toggle. Emits the exported [`AxisExtrema`] at most once per
/// distinct value, and never while any field is in error.
pub struct AxisRangeControls {
    xmin: NumberField,
    xmax: NumberField,
    ymin: NumberField,
    ymax: NumberField,
    y_auto: bool,
    xmin_value: f64,
    xmax_value: f64,
    ymin_value: Option<f64>,
    ymax_value: Option<f64>,
    last_notified: AxisExtrema,
}

impl AxisRangeControls {
    pub fn new(xmin_default: f64, xmax_default: f64) -> Self {
        let mut controls = Self {
            xmin: NumberField::with_value("min", true, xmin_default),
            xmax: NumberField::with_value("max", true, xmax_default),
            ymin: NumberField::new("min", false),
            ymax: NumberField::new("max", false),
            y_auto: true,
            xmin_value: xmin_default,
            xmax_value: xmax_default,
            ymin_value: None,
            ymax_value: None,
            last_notified: AxisExtrema::new(xmin_default, xmax_default),
        };
        controls.settle();
        controls
    }

    pub fn any_error(&self) -> bool {
        self.xmin.is_error()
            || self.xmax.is_error()
            || self.ymin.is_error()
            || self.ymax.is_error()
    }

    pub fn edit_xmin(&mut self, text: &str) -> Option<AxisExtrema> {
        let emission = self.xmin.edit(text);
        self.after_event(Field::XMin, emission)
    }

    pub fn edit_xmax(&mut self, text: &str) -> Option<AxisExtrema> {
        let emission = self.xmax.edit(text);
        self.after_event(Field::XMax, emission)
    }

    pub fn edit_ymin(&mut self, text: &str) -> Option<AxisExtrema> {
        let emission = self.ymin.edit(text);
        self.after_event(Field::YMin, emission)
    }

    pub fn edit_ymax(&mut self, text: &str) -> Option<AxisExtrema> {
        let emission = self.ymax.edit(text);
        self.after_event(Field::YMax, emission)
    }

    pub fn toggle_auto(&mut self, on: bool) -> Option<AxisExtrema> {
        if on == self.y_auto {
            return None;
        }
        self.y_auto = on;
        if let Some(value) = self.ymin.set_required(!on) {
            self.store(Field::YMin, value);
        }
        if let Some(value) = self.ymax.set_required(!on) {
            self.store(Field::YMax, value);
        }
        self.settle();
        self.notify()
    }

    fn after_event(&mut self, field: Field, emission: Option<FieldValue>) -> Option<AxisExtrema> {
        if let Some(value) = emission {
            self.store(field, value);
        }
        self.settle();
        self.notify()
    }

    fn store(&mut self, field: Field, value: FieldValue) {
        match (field, value) {
            (Field::XMin, FieldValue::Number(v)) => self.xmin_value = v,
            (Field::XMax, FieldValue::Number(v)) => self.xmax_value = v,
            (Field::YMin, FieldValue::Number(v)) => self.ymin_value = Some(v),
            (Field::YMin, FieldValue::Unset) => self.ymin_value = None,
            (Field::YMax, FieldValue::Number(v)) => self.ymax_value = Some(v),
            (Field::YMax, FieldValue::Unset) => self.ymax_value = None,
            // The x fields are required, so they never emit Unset.
            (Field::XMin | Field::XMax, FieldValue::Unset) => {}
        }
    }

    /// Re-derives every field's sibling bounds from the stored values; a bound
    /// move can flip a previously invalid field to valid, whose emission feeds
    /// back into the stored values. Each field can transition at most once per
    /// pass, so this converges within a few iterations.
    fn settle(&mut self) {
        loop {
            let mut emissions = Vec::new();
            if let Some(v) = self.xmin.set_bounds(FieldBounds {
                lower_than: Some(self.xmax_value),
                higher_than: None,
            }) {
                emissions.push((Field::XMin, v));
            }
            if let Some(v) = self.xmax.set_bounds(FieldBounds {
                lower_than: None,
                higher_than: Some(self.xmin_value),
            }) {
                emissions.push((Field::XMax, v));
            }
            if let Some(v) = self.ymin.set_bounds(FieldBounds {
                lower_than: self.ymax_value,
                higher_than: None,
            }) {
                emissions.push((Field::YMin, v));
            }
            if let Some(v) = self.ymax.set_bounds(FieldBounds {
                lower_than: None,
                higher_than: self.ymin_value,
            }) {
                emissions.push((Field::YMax, v));
            }
            if emissions.is_empty() {
                break;
            }
            for (field, value) in emissions {
                self.store(field, value);
            }
        }
    }

    fn exported(&self) -> AxisExtrema {
        AxisExtrema {
            xmin: self.xmin_value,
            xmax: self.xmax_value,
            ymin: if self.y_auto { None } else { self.ymin_value },
            ymax: if self.y_auto { None } else { self.ymax_value },
        }
    }

    fn notify(&mut self) -> Option<AxisExtrema> {
        if self.any_error() {
            return None;
        }
        let exported = self.exported();
        if exported == self.last_notified {
            return None;
        }
        self.last_notified = exported;
        Some(exported)
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<AxisExtrema> {
        let mut notification = None;
        ui.horizontal(|ui| {
            if let Some(v) = self.xmin.show(ui) {
                notification = self.after_event(Field::XMin, Some(v));
            }
            ui.label("\u{2264} x \u{2264}");
            if let Some(v) = self.xmax.show(ui) {
                notification = self.after_event(Field::XMax, Some(v));
            }
        });
        ui.horizontal(|ui| {
            if let Some(v) = self.ymin.show(ui) {
                notification = self.after_event(Field::YMin, Some(v));
            }
            ui.label("\u{2264} y \u{2264}");
            if let Some(v) = self.ymax.show(ui) {
                notification = self.after_event(Field::YMax, Some(v));
            }
            let mut auto = self.y_auto;
            if ui.checkbox(&mut auto, "Auto").changed() {
                if let Some(n) = self.toggle_auto(auto) {
                    notification = Some(n);
                }
            }
        });
        notification
    }
}
