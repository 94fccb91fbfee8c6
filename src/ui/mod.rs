pub mod axis_controls;
pub mod chart_panel;
pub mod function_editor;
pub mod number_field;
pub mod parameter_slider;
pub mod slider_group;
