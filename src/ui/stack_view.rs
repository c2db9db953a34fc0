/// The scrubbable image stack viewer
///
/// Every slice of the stack is decoded up front into an in-memory frame,
/// so moving the slider swaps textures instead of hitting the disk. The
/// datasets this browses are sweep exports of small PNG screenshots, which
/// keeps whole stacks comfortably in memory.
use iced::widget::image::Handle;
use iced::widget::{button, column, row, slider, text, Column, Image};
use iced::{Alignment, Element, Font, Length};

use crate::state::data::param_full_name;
use crate::state::stack::ImageStack;
use crate::Message;

/// One decoded slice, ready for display.
#[derive(Debug, Clone)]
pub struct Frame {
    pub row_id: i64,
    pub value: f64,
    pub handle: Handle,
}

/// Side-column entry: one sweep parameter of the current frame.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: &'static str,
    pub value: String,
    pub neighbor_count: usize,
}

/// A loaded stack plus the slider position.
#[derive(Debug, Clone)]
pub struct StackView {
    pub axis: String,
    pub frames: Vec<Frame>,
    pub position: usize,
}

impl StackView {
    /// Decode every slice of an assembled stack. The slider starts on the
    /// base image, matching where the user came from.
    pub fn load(stack: &ImageStack) -> Result<Self, String> {
        let mut frames = Vec::with_capacity(stack.slices.len());
        for slice in &stack.slices {
            let decoded = image::open(&slice.path)
                .map_err(|error| format!("Could not load '{}': {error}", slice.path))?
                .to_rgba8();
            let (width, height) = decoded.dimensions();
            frames.push(Frame {
                row_id: slice.row_id,
                value: slice.value,
                handle: Handle::from_rgba(width, height, decoded.into_raw()),
            });
        }
        Ok(StackView {
            axis: stack.axis.clone(),
            frames,
            position: stack.base_index,
        })
    }

    pub fn current(&self) -> &Frame {
        &self.frames[self.position.min(self.frames.len() - 1)]
    }

    /// Move the slider by `delta` frames, clamped to the stack.
    pub fn step(&mut self, delta: i32) {
        let last = self.frames.len() as i32 - 1;
        self.position = (self.position as i32 + delta).clamp(0, last) as usize;
    }

    /// Jump to an absolute slider position.
    pub fn scrub(&mut self, position: usize) {
        self.position = position.min(self.frames.len() - 1);
    }
}

/// Build the viewer: parameter side column, the current slice, the slider
/// and the position line, plus the actions on the current image.
pub fn view<'a>(stack: &'a StackView, info: &'a [ParamInfo]) -> Element<'a, Message> {
    let frame = stack.current();

    let side_column = Column::with_children(info.iter().map(|param| {
        let marker = if param.name == stack.axis { ">" } else { " " };
        text(format!(
            "{marker}{:>4} {:<12} ({})",
            param.name, param.value, param.neighbor_count
        ))
        .font(Font::MONOSPACE)
        .size(12)
        .into()
    }))
    .spacing(2);

    let position_line = format!(
        "{:>4}/{:<4}   id: {:<6}   {} ({}): {}",
        stack.position + 1,
        stack.frames.len(),
        frame.row_id,
        param_full_name(&stack.axis),
        stack.axis,
        frame.value,
    );

    let last = stack.frames.len().saturating_sub(1) as f32;
    let viewer = column![
        Image::new(frame.handle.clone())
            .width(Length::Fill)
            .height(Length::Fill),
        slider(0.0..=last, stack.position as f32, Message::StackScrubbed).step(1.0),
        text(position_line).font(Font::MONOSPACE).size(14),
        row![
            button("Use as new base image").on_press(Message::UseAsBase),
            button("Export parameters to txt").on_press(Message::ExportParams),
        ]
        .spacing(10),
    ]
    .spacing(8)
    .align_x(Alignment::Start);

    row![side_column, viewer]
        .spacing(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
