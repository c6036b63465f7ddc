use iced::widget::image::Handle;
use iced::{keyboard, window, Element, Subscription, Task, Theme};
use std::time::Duration;

mod archive;
mod config;
mod error;
mod natural_sort;
mod state;
mod ui;

#[cfg(test)]
mod test_support;

use archive::page::render_page;
use config::{Config, ThumbSize};
use error::KioskError;
use state::library::Library;
use state::navigator::{Navigator, PageRequest, Screen, ScreenId, ScreenRequest};
use state::thumbnails::{load_in_background, ThumbnailUpdate};
use ui::keys::KeyAction;

/// Main application state
struct Kiosk {
    /// Builds screens and computes where they lead
    navigator: Navigator,
    /// The one live screen
    screen: Screen,
    config: Config,
    fullscreen: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A grid cell was clicked
    Activate(usize),
    /// A bound key was pressed
    Key(KeyAction),
    /// The background loader resolved a folder thumbnail
    ThumbnailResolved(ThumbnailUpdate),
    /// A reader page finished rendering
    PageRendered {
        screen: ScreenId,
        token: u64,
        result: Result<Handle, String>,
    },
    /// The post-open fullscreen delay elapsed
    EnterFullscreen(ScreenId),
}

impl Kiosk {
    /// Create the application around an already-built first screen
    fn new(navigator: Navigator, screen: Screen, config: Config) -> (Self, Task<Message>) {
        let mut kiosk = Kiosk {
            navigator,
            screen,
            config,
            fullscreen: false,
        };
        let task = kiosk.screen_tasks();
        (kiosk, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Activate(index) => match self.navigator.activate(&self.screen, index) {
                Some(request) => self.navigate(request),
                None => Task::none(),
            },
            Message::Key(action) => self.handle_key(action),
            Message::ThumbnailResolved(update) => {
                // Late results for a replaced screen are dropped here
                if let Screen::Folders(grid) = &mut self.screen {
                    if grid.thumbnails.apply(update) {
                        log::debug!(
                            "🖼️  Thumbnails {}/{}",
                            grid.thumbnails.loaded_count(),
                            grid.thumbnails.len()
                        );
                        return Task::none();
                    }
                }
                log::debug!("🗑️  Dropped thumbnail for a closed screen");
                Task::none()
            }
            Message::PageRendered {
                screen,
                token,
                result,
            } => {
                if let Screen::Reader(reader) = &mut self.screen {
                    if reader.id == screen {
                        reader.finish_render(token, result);
                    }
                }
                Task::none()
            }
            Message::EnterFullscreen(screen) => {
                if self.screen.id() != screen {
                    return Task::none();
                }
                self.enter_fullscreen()
            }
        }
    }

    fn handle_key(&mut self, action: KeyAction) -> Task<Message> {
        if action == KeyAction::Back {
            let request = self.navigator.back(&self.screen);
            return self.navigate(request);
        }

        let Screen::Reader(reader) = &mut self.screen else {
            return Task::none();
        };

        let redraw = match action {
            KeyAction::NextPage => reader.next(),
            KeyAction::PrevPage => reader.prev(),
            KeyAction::RotateClockwise => reader.rotate_clockwise(),
            KeyAction::RotateCounterclockwise => reader.rotate_counterclockwise(),
            KeyAction::Back => false,
        };

        if redraw {
            render_task(reader.begin_render(), self.config.page_max)
        } else {
            Task::none()
        }
    }

    /// Replace the live screen with the one `request` names
    fn navigate(&mut self, request: ScreenRequest) -> Task<Message> {
        match self.navigator.open(request.clone()) {
            Ok(Some(screen)) => {
                self.screen = screen;
                self.screen_tasks()
            }
            Ok(None) => {
                log::info!("👋 Closing kiosk");
                iced::exit()
            }
            Err(e) => {
                if e.is_fatal() {
                    log::error!("❌ {}", e);
                } else {
                    log::warn!("⚠️  {}", e);
                }
                let back = self.navigator.fallback(&request);
                self.screen = self.navigator.notice(&e, back);
                Task::none()
            }
        }
    }

    /// Background work a freshly opened screen needs
    fn screen_tasks(&mut self) -> Task<Message> {
        let page_max = self.config.page_max;

        let (work, immediate) = match &mut self.screen {
            Screen::Folders(grid) => {
                let stream =
                    load_in_background(grid.id, grid.thumbnail_targets(), grid.thumb_size);
                (Task::run(stream, Message::ThumbnailResolved), false)
            }
            Screen::Reader(reader) => (render_task(reader.begin_render(), page_max), true),
            Screen::Chapters(_) | Screen::Notice(_) => (Task::none(), false),
        };

        let fullscreen = if immediate {
            self.enter_fullscreen()
        } else if self.fullscreen {
            Task::none()
        } else {
            delayed_fullscreen(self.screen.id(), self.config.fullscreen_delay())
        };

        Task::batch([work, fullscreen])
    }

    fn enter_fullscreen(&mut self) -> Task<Message> {
        if self.fullscreen {
            return Task::none();
        }
        self.fullscreen = true;

        window::get_latest()
            .and_then(|id| window::change_mode::<Message>(id, window::Mode::Fullscreen))
    }

    fn title(&self) -> String {
        self.screen.title()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match &self.screen {
            Screen::Folders(grid) => ui::grid::folder_grid(grid),
            Screen::Chapters(chapters) => ui::grid::chapter_grid(chapters),
            Screen::Reader(reader) => ui::reader::reader_view(reader),
            Screen::Notice(notice) => ui::reader::notice_view(notice),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| ui::keys::action_for(&key).map(Message::Key))
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Render a reader page off the UI thread
fn render_task(request: PageRequest, max: ThumbSize) -> Task<Message> {
    let PageRequest {
        screen,
        token,
        archive,
        entry,
        rotation,
    } = request;

    Task::perform(
        render_page(archive, entry, rotation, max),
        move |result| Message::PageRendered {
            screen,
            token,
            result,
        },
    )
}

/// Switch to fullscreen after `delay`, unless the screen has changed
fn delayed_fullscreen(screen: ScreenId, delay: Duration) -> Task<Message> {
    Task::perform(tokio::time::sleep(delay), move |_| {
        Message::EnterFullscreen(screen)
    })
}

fn run() -> Result<(), KioskError> {
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("⚠️  Ignoring config file: {}", e);
        Config::default()
    });
    if let Ok(json) = config.to_json() {
        log::debug!("⚙️  Effective config: {}", json);
    }

    let library = Library::open(&config.library_root)?;
    let mut navigator = Navigator::new(library, &config);

    // Content errors on the first screen end the process
    let first = navigator.initial_request();
    let Some(screen) = navigator.open(first)? else {
        return Ok(());
    };

    iced::application(Kiosk::title, Kiosk::update, Kiosk::view)
        .subscription(Kiosk::subscription)
        .theme(Kiosk::theme)
        .centered()
        .run_with(move || Kiosk::new(navigator, screen, config))?;

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }
}
