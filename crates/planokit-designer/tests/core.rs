#[path = "core/canvas.rs"]
mod canvas;
#[path = "core/designer_state.rs"]
mod designer_state;
#[path = "core/planogram.rs"]
mod planogram;
#[path = "core/properties.rs"]
mod properties;
