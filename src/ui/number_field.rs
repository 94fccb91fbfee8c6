/// Exclusive bounds imposed by sibling fields: a value must stay strictly
/// below `lower_than` and strictly above `higher_than`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldBounds {
    pub lower_than: Option<f64>,
    pub higher_than: Option<f64>,
}

/// Parsed content of a field. An empty buffer is a value of its own ("unset"),
/// not automatically an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Unset,
    Number(f64),
}

fn parse_buffer(buffer: &str) -> Option<FieldValue> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Some(FieldValue::Unset);
    }
    trimmed.parse::<f64>().ok().map(FieldValue::Number)
}

/// Validity as a pure function of the parsed buffer and its surroundings; the
/// owning aggregate feeds in the sibling bounds, the field never reaches into
/// its siblings itself.
pub fn is_error(parsed: Option<FieldValue>, required: bool, bounds: FieldBounds) -> bool {
    match parsed {
        None => true,
        Some(FieldValue::Unset) => required,
        Some(FieldValue::Number(v)) => {
            bounds.lower_than.is_some_and(|b| v >= b) || bounds.higher_than.is_some_and(|b| v <= b)
        }
    }
}

/// A labeled numeric text field. Emits its parsed value only when valid; a
/// sibling bound moving can retroactively validate the buffer, which also
/// counts as an emission.
pub struct NumberField {
    label: String,
    required: bool,
    buffer: String,
    bounds: FieldBounds,
}

impl NumberField {
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            required,
            buffer: String::new(),
            bounds: FieldBounds::default(),
        }
    }

    pub fn with_value(label: impl Into<String>, required: bool, value: f64) -> Self {
        let mut field = Self::new(label, required);
        field.buffer = format_value(value);
        field
    }

    pub fn is_error(&self) -> bool {
        is_error(parse_buffer(&self.buffer), self.required, self.bounds)
    }

    pub fn value(&self) -> Option<FieldValue> {
        parse_buffer(&self.buffer)
    }

    /// Replaces the buffer, emitting the parsed value iff now valid.
    pub fn edit(&mut self, text: &str) -> Option<FieldValue> {
        self.buffer = text.to_string();
        self.emit_if_valid()
    }

    /// Updates the sibling bounds. Emits iff the field was invalid under the
    /// old bounds and is valid under the new ones.
    pub fn set_bounds(&mut self, bounds: FieldBounds) -> Option<FieldValue> {
        if bounds == self.bounds {
            return None;
        }
        let was_error = self.is_error();
        self.bounds = bounds;
        if was_error {
            self.emit_if_valid()
        } else {
            None
        }
    }

    /// Changes whether an empty buffer is acceptable, with the same
    /// transition-triggered emission as [`NumberField::set_bounds`].
    pub fn set_required(&mut self, required: bool) -> Option<FieldValue> {
        if required == self.required {
            return None;
        }
        let was_error = self.is_error();
        self.required = required;
        if was_error {
            self.emit_if_valid()
        } else {
            None
        }
    }

    fn emit_if_valid(&self) -> Option<FieldValue> {
        let parsed = parse_buffer(&self.buffer);
        if is_error(parsed, self.required, self.bounds) {
            None
        } else {
            parsed
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<FieldValue> {
        let mut emitted = None;
        ui.horizontal(|ui| {
            ui.label(&self.label);
            let error = self.is_error();
            let mut edit = egui::TextEdit::singleline(&mut self.buffer).desired_width(64.0);
            if error {
                edit = edit.text_color(ui.visuals().error_fg_color);
            }
            if ui.add(edit).changed() {
                emitted = self.emit_if_valid();
            }
        });
        emitted
    }
}

fn format_value(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(emission: Option<FieldValue>) -> f64 {
        match emission {
            Some(FieldValue::Number(v)) => v,
            other => panic!("expected a number emission, got {other:?}"),
        }
    }

    #[test]
    fn required_field_errors_on_empty_buffer() {
        let mut field = NumberField::new("min", true);
        assert!(field.is_error());
        assert_eq!(field.edit("3.5"), Some(FieldValue::Number(3.5)));
        assert!(!field.is_error());
        assert_eq!(field.edit(""), None);
        assert!(field.is_error());
    }

    #[test]
    fn optional_field_treats_empty_as_unset() {
        let mut field = NumberField::new("min", false);
        assert!(!field.is_error());
        assert_eq!(field.edit(""), Some(FieldValue::Unset));
    }

    #[test]
    fn garbage_is_an_error_but_only_when_nonempty() {
        let mut field = NumberField::new("min", false);
        assert_eq!(field.edit("1abc"), None);
        assert!(field.is_error());
        assert_eq!(field.edit("-2.5e3"), Some(FieldValue::Number(-2500.0)));
    }

    #[test]
    fn lower_than_bound_is_exclusive() {
        let mut field = NumberField::new("min", true);
        field.set_bounds(FieldBounds {
            lower_than: Some(5.0),
            higher_than: None,
        });
        assert_eq!(number(field.edit("4.9")), 4.9);
        assert_eq!(field.edit("5"), None);
        assert!(field.is_error());
        assert_eq!(field.edit("7"), None);
    }

    #[test]
    fn higher_than_bound_is_exclusive() {
        let mut field = NumberField::new("max", true);
        field.set_bounds(FieldBounds {
            lower_than: None,
            higher_than: Some(-1.0),
        });
        assert_eq!(field.edit("-1"), None);
        assert_eq!(number(field.edit("0")), 0.0);
    }

    #[test]
    fn moving_a_sibling_bound_revalidates_and_emits_once() {
        let mut field = NumberField::new("min", true);
        field.set_bounds(FieldBounds {
            lower_than: Some(3.0),
            higher_than: None,
        });
        assert_eq!(field.edit("4"), None);

        // Sibling moves from 3 to 10: the buffered 4 becomes valid.
        let emitted = field.set_bounds(FieldBounds {
            lower_than: Some(10.0),
            higher_than: None,
        });
        assert_eq!(number(emitted), 4.0);

        // A further move while already valid must not re-emit.
        let emitted = field.set_bounds(FieldBounds {
            lower_than: Some(11.0),
            higher_than: None,
        });
        assert_eq!(emitted, None);
    }

    #[test]
    fn dropping_requiredness_emits_unset() {
        let mut field = NumberField::new("ymin", true);
        assert!(field.is_error());
        assert_eq!(field.set_required(false), Some(FieldValue::Unset));
        assert_eq!(field.set_required(false), None);
    }
}
