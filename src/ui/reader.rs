/// Reader and notice views
use iced::widget::{column, container, text, Image};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::navigator::{NoticeScreen, PageView, ReaderScreen};
use crate::Message;

/// Full-window page with a one-line status underneath
pub fn reader_view(screen: &ReaderScreen) -> Element<'_, Message> {
    let page: Element<'_, Message> = match &screen.page {
        PageView::Loading => text("Loading...").size(24).into(),
        PageView::Shown(handle) => Image::new(handle.clone())
            .content_fit(ContentFit::Contain)
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        PageView::Unavailable(message) => text(message.clone()).size(24).into(),
    };

    let status = screen
        .status
        .clone()
        .unwrap_or_else(|| screen.status_line());

    column![
        container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
        text(status).size(14),
    ]
    .align_x(Alignment::Center)
    .into()
}

/// Error text for a screen that could not be built
pub fn notice_view(screen: &NoticeScreen) -> Element<'_, Message> {
    let content = column![
        text(screen.message.clone()).size(24),
        text("Press Escape to go back").size(16),
    ]
    .spacing(20)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
