use crate::ui::number_field::{FieldBounds, FieldValue, NumberField};

/// Shared initial domain and position for every freshly created slider.
#[derive(Debug, Clone, Copy)]
pub struct SliderDefaults {
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

impl Default for SliderDefaults {
    fn default() -> Self {
        Self {
            min: -5.0,
            max: 5.0,
            value: 1.0,
        }
    }
}

/// A named slider over an editable `[min, max]` domain. Shrinking the domain
/// past the current position clamps it to the violated bound and emits the
/// clamped value exactly once; drags emit only actual position changes.
pub struct ParameterSlider {
    name: String,
    min_field: NumberField,
    max_field: NumberField,
    min: f64,
    max: f64,
    position: f64,
}

impl ParameterSlider {
    pub fn new(name: impl Into<String>, defaults: SliderDefaults) -> Self {
        let mut slider = Self {
            name: name.into(),
            min_field: NumberField::with_value("min", true, defaults.min),
            max_field: NumberField::with_value("max", true, defaults.max),
            min: defaults.min,
            max: defaults.max,
            position: defaults.value,
        };
        slider.rewire();
        slider
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn step(&self) -> f64 {
        (self.max - self.min) / 25.0
    }

    pub fn set_min(&mut self, value: f64) -> Option<f64> {
        self.min = value;
        self.rewire();
        self.clamp()
    }

    pub fn set_max(&mut self, value: f64) -> Option<f64> {
        self.max = value;
        self.rewire();
        self.clamp()
    }

    pub fn has_error(&self) -> bool {
        self.min_field.is_error() || self.max_field.is_error()
    }

    pub fn drag(&mut self, value: f64) -> Option<f64> {
        if value == self.position {
            return None;
        }
        self.position = value;
        Some(value)
    }

    fn clamp(&mut self) -> Option<f64> {
        if self.position > self.max {
            self.position = self.max;
            return Some(self.position);
        }
        if self.position < self.min {
            self.position = self.min;
            return Some(self.position);
        }
        None
    }

    /// One moved limit can revalidate the opposite field, whose buffered value
    /// then commits too; loop until the domain stops moving.
    fn rewire(&mut self) {
        loop {
            let min_emit = self.min_field.set_bounds(FieldBounds {
                lower_than: Some(self.max),
                higher_than: None,
            });
            let max_emit = self.max_field.set_bounds(FieldBounds {
                lower_than: None,
                higher_than: Some(self.min),
            });
            let mut moved = false;
            if let Some(FieldValue::Number(v)) = min_emit {
                if v != self.min {
                    self.min = v;
                    moved = true;
                }
            }
            if let Some(FieldValue::Number(v)) = max_emit {
                if v != self.max {
                    self.max = v;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<f64> {
        let mut emitted = None;
        ui.horizontal(|ui| {
            ui.label(&self.name);
            if let Some(FieldValue::Number(v)) = self.min_field.show(ui) {
                emitted = self.set_min(v).or(emitted);
            }
            let mut position = self.position;
            let response = ui.add(
                egui::Slider::new(&mut position, self.min..=self.max)
                    .step_by(self.step())
                    .show_value(true),
            );
            if response.changed() {
                if let Some(v) = self.drag(position) {
                    emitted = Some(v);
                }
            }
            if let Some(FieldValue::Number(v)) = self.max_field.show(ui) {
                emitted = self.set_max(v).or(emitted);
            }
        });
        emitted
    }
}
