use std::collections::BTreeMap;

use crate::state::parameters::ParameterSet;
use crate::ui::parameter_slider::{ParameterSlider, SliderDefaults};

/// One slider per backend-reported parameter name. Every accepted name list
/// replaces the whole set; nothing is diffed or preserved across rebuilds.
pub struct ParameterSliderGroup {
    defaults: SliderDefaults,
    sliders: Vec<ParameterSlider>,
    values: ParameterSet,
}

impl ParameterSliderGroup {
    pub fn new(defaults: SliderDefaults) -> Self {
        Self {
            defaults,
            sliders: Vec::new(),
            values: ParameterSet::default(),
        }
    }

    /// Discards all slider state, starts every name at the shared default and
    /// returns the fresh mapping for the caller to adopt synchronously.
    pub fn rebuild(&mut self, names: &[String]) -> BTreeMap<String, f64> {
        self.sliders = names
            .iter()
            .map(|name| ParameterSlider::new(name.clone(), self.defaults))
            .collect();
        self.values.rebuild(names, self.defaults.value);
        self.values.as_map().clone()
    }

    pub fn names(&self) -> &[String] {
        self.values.names()
    }

    pub fn len(&self) -> usize {
        self.sliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sliders.is_empty()
    }

    pub fn values(&self) -> &BTreeMap<String, f64> {
        self.values.as_map()
    }

    /// Routes one slider's position change into the mapping, returning the
    /// full updated mapping.
    pub fn apply_change(&mut self, name: &str, value: f64) -> Option<BTreeMap<String, f64>> {
        if self.values.set(name, value) {
            Some(self.values.as_map().clone())
        } else {
            None
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<BTreeMap<String, f64>> {
        let mut changes: Vec<(String, f64)> = Vec::new();
        for slider in &mut self.sliders {
            if let Some(value) = slider.show(ui) {
                changes.push((slider.name().to_string(), value));
            }
        }
        let mut updated = None;
        for (name, value) in changes {
            if let Some(map) = self.apply_change(&name, value) {
                updated = Some(map);
            }
        }
        updated
    }
}
