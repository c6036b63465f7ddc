/// Thumbnail grids for the folder, book and chapter pickers
use iced::widget::image::Handle;
use iced::widget::{button, column, container, scrollable, text, Image};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::archive::thumbnail::placeholder;
use crate::config::ThumbSize;
use crate::state::data::chapter_label;
use crate::state::navigator::{ChapterScreen, FolderScreen};
use crate::Message;

/// Folder or book grid; cells show placeholders until thumbnails arrive
pub fn folder_grid(screen: &FolderScreen) -> Element<'_, Message> {
    let cells = screen
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let handle = screen
                .thumbnails
                .get(index)
                .map(|thumb| thumb.handle().clone())
                .unwrap_or_else(|| placeholder(screen.thumb_size));
            cell(handle, entry.name.clone(), screen.thumb_size, index)
        })
        .collect();

    grid(cells)
}

/// Chapter grid, one cell per archive
pub fn chapter_grid(screen: &ChapterScreen) -> Element<'_, Message> {
    let cells = screen
        .chapters
        .iter()
        .zip(screen.thumbnails.iter())
        .enumerate()
        .map(|(index, (chapter, handle))| {
            cell(handle.clone(), chapter_label(chapter), screen.thumb_size, index)
        })
        .collect();

    grid(cells)
}

/// A clickable thumbnail with its label underneath
fn cell<'a>(handle: Handle, label: String, size: ThumbSize, index: usize) -> Element<'a, Message> {
    let thumbnail = Image::new(handle)
        .width(Length::Fixed(size.width as f32))
        .height(Length::Fixed(size.height as f32));

    let content = column![thumbnail, text(label).size(14)]
        .spacing(8)
        .align_x(Alignment::Center);

    button(content)
        .on_press(Message::Activate(index))
        .padding(10)
        .style(button::text)
        .into()
}

fn grid(cells: Vec<Element<'_, Message>>) -> Element<'_, Message> {
    let wrap = Wrap::with_elements(cells).spacing(20.0).line_spacing(20.0);

    scrollable(container(wrap).padding(20).width(Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
