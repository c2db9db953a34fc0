/// UI widgets module
///
/// This module holds the widgets that are more than a button or a label:
/// - The scrubbable image stack viewer (stack_view.rs)

pub mod stack_view;
