use iced::widget::{button, column, container, pick_list, row, text, text_input};
use iced::{event, keyboard, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::fmt;
use std::path::PathBuf;

// Declare the modules
mod config;
mod error;
mod export;
mod scan;
mod state;
mod ui;

use config::Config;
use scan::import::{build_database, BuildReport};
use state::data::param_full_name;
use state::library::Library;
use state::stack::ImageStack;
use ui::stack_view::{self, ParamInfo, StackView};

/// One entry of the axis picker: a sweep parameter that actually has
/// neighbors around the chosen base image.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisChoice {
    name: &'static str,
    count: usize,
}

impl fmt::Display for AxisChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} - {:<45} ({})",
            self.name,
            param_full_name(self.name),
            self.count
        )
    }
}

/// Main application state
struct ToothSeeker {
    /// Remembered database selection
    config: Config,
    /// The open catalog, if any
    library: Option<Library>,
    /// Status message to display to the user
    status: String,
    /// Digits-only row id input
    row_id_input: String,
    /// Axis parameters with neighbors around the current base row
    axis_options: Vec<AxisChoice>,
    picked_axis: Option<AxisChoice>,
    /// The loaded stack, if any
    stack: Option<StackView>,
    /// Side column for the current frame
    param_info: Vec<ParamInfo>,
    /// A database build is running in the background
    building: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub(crate) enum Message {
    /// User wants to build a new database from an export folder
    NewDatabase,
    /// Background build completed
    BuildFinished(Result<BuildReport, String>),
    /// User wants to open an existing database
    OpenDatabase,
    /// Row id text input changed
    RowIdInput(String),
    /// Pick a random catalogued image as the base
    RandomRow,
    /// Query which parameters have neighbors around the base row
    FindNeighbors,
    /// User picked the stack axis
    AxisPicked(AxisChoice),
    /// Background stack load completed
    StackLoaded(Result<StackView, String>),
    /// Slider moved
    StackScrubbed(f32),
    /// Arrow keys
    StepStack(i32),
    /// Make the current slice the new base image
    UseAsBase,
    /// Export the current slice's parameters for the simulator
    ExportParams,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
}

impl ToothSeeker {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();

        let (library, status) = match &config.db_path {
            Some(db_path) => match Library::open(db_path, &config.table_name) {
                Ok(library) => {
                    let count = library.image_count().unwrap_or(0);
                    let status = format!("Ready. {count} images in '{}'.", db_path.display());
                    (Some(library), status)
                }
                Err(error) => (
                    None,
                    format!("Configured database not usable ({error}). Open or create one."),
                ),
            },
            None => (None, "No database selected. Open or create one.".to_string()),
        };

        if let Some(library) = &library {
            println!(
                "🦷 ToothSeeker initialized with {} images",
                library.image_count().unwrap_or(0)
            );
        }

        (
            ToothSeeker {
                config,
                library,
                status,
                row_id_input: String::new(),
                axis_options: Vec::new(),
                picked_axis: None,
                stack: None,
                param_info: Vec::new(),
                building: false,
            },
            Task::none(),
        )
    }

    fn title(&self) -> String {
        match &self.config.db_path {
            Some(db_path) => format!("ToothSeeker   -   {}", db_path.display()),
            None => "ToothSeeker".to_string(),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NewDatabase => {
                if self.building {
                    return Task::none();
                }
                let Some(source_dir) = FileDialog::new()
                    .set_title("Folder containing ToothMaker export folders")
                    .pick_folder()
                else {
                    return Task::none();
                };
                let Some(db_path) = FileDialog::new()
                    .set_title("Where to create the database")
                    .set_file_name("tooth_database.db")
                    .save_file()
                else {
                    return Task::none();
                };

                self.building = true;
                self.status = format!("Building database from {}...", source_dir.display());
                let table = self.config.table_name.clone();
                Task::perform(
                    build_database_async(source_dir, db_path, table),
                    Message::BuildFinished,
                )
            }
            Message::BuildFinished(result) => {
                self.building = false;
                match result {
                    Ok(report) => {
                        self.select_database(report.db_path.clone());
                        self.status = format!(
                            "✅ Database built: {} images from {} folders, {} duplicates removed \
                             (audit '{}', table dump '{}').",
                            report.inserted - report.duplicates.removed,
                            report.folders,
                            report.duplicates.removed,
                            report.duplicates.audit_csv.display(),
                            report.table_csv.display(),
                        );
                    }
                    Err(error) => {
                        self.status = format!("Database build failed: {error}");
                        eprintln!("⚠️  Database build failed: {error}");
                    }
                }
                Task::none()
            }
            Message::OpenDatabase => {
                let picked = FileDialog::new()
                    .set_title("Select database file")
                    .add_filter("Database Files", &["db"])
                    .pick_file();
                if let Some(db_path) = picked {
                    self.select_database(db_path);
                }
                Task::none()
            }
            Message::RowIdInput(value) => {
                // Digits only, like the original input validator
                if value.chars().all(|c| c.is_ascii_digit()) {
                    self.row_id_input = value;
                }
                Task::none()
            }
            Message::RandomRow => {
                let Some(library) = &self.library else {
                    return Task::none();
                };
                match library.random_row_id() {
                    Ok(Some(id)) => {
                        self.row_id_input = id.to_string();
                        self.status = format!("Randomized base image id: {id}");
                    }
                    Ok(None) => self.status = "The database has no images.".to_string(),
                    Err(error) => self.status = error.to_string(),
                }
                Task::none()
            }
            Message::FindNeighbors => {
                self.find_neighbors(None);
                Task::none()
            }
            Message::AxisPicked(choice) => {
                self.picked_axis = Some(choice.clone());
                let Some(library) = &self.library else {
                    return Task::none();
                };
                let Ok(row_id) = self.row_id_input.parse::<i64>() else {
                    self.status = "Enter a base image row id first.".to_string();
                    return Task::none();
                };
                self.status = format!("Loading stack along {}...", choice.name);
                Task::perform(
                    load_stack_async(
                        library.path().to_path_buf(),
                        self.config.table_name.clone(),
                        row_id,
                        choice.name.to_string(),
                    ),
                    Message::StackLoaded,
                )
            }
            Message::StackLoaded(result) => {
                match result {
                    Ok(stack) => {
                        self.status = format!(
                            "Stack of {} images along {} ({}).",
                            stack.frames.len(),
                            stack.axis,
                            param_full_name(&stack.axis),
                        );
                        self.stack = Some(stack);
                        self.refresh_param_info();
                    }
                    Err(error) => self.status = error,
                }
                Task::none()
            }
            Message::StackScrubbed(position) => {
                if let Some(stack) = &mut self.stack {
                    stack.scrub(position.round() as usize);
                    self.refresh_param_info();
                }
                Task::none()
            }
            Message::StepStack(delta) => {
                if let Some(stack) = &mut self.stack {
                    stack.step(delta);
                    self.refresh_param_info();
                }
                Task::none()
            }
            Message::UseAsBase => {
                let Some(stack) = &self.stack else {
                    return Task::none();
                };
                let row_id = stack.current().row_id;
                let old_axis = stack.axis.clone();
                self.row_id_input = row_id.to_string();
                self.find_neighbors(Some(&old_axis));
                Task::none()
            }
            Message::ExportParams => {
                let (Some(library), Some(stack)) = (&self.library, &self.stack) else {
                    return Task::none();
                };
                match export::export_row_to_file(library, stack.current().row_id) {
                    Ok(path) => {
                        self.status = format!("Parameters exported to '{}'.", path.display());
                    }
                    Err(error) => self.status = format!("Export failed: {error}"),
                }
                Task::none()
            }
            Message::FileDropped(path) => {
                self.handle_dropped_file(path);
                Task::none()
            }
        }
    }

    /// Open a database, remember it, and reset any per-database view state.
    fn select_database(&mut self, db_path: PathBuf) {
        match Library::open(&db_path, &self.config.table_name) {
            Ok(library) => {
                let count = library.image_count().unwrap_or(0);
                self.status = format!("Ready. {count} images in '{}'.", db_path.display());
                self.library = Some(library);
                self.config.remember_database(&db_path);
                self.stack = None;
                self.param_info.clear();
                self.axis_options.clear();
                self.picked_axis = None;
                println!("Database selected: {}", db_path.display());
            }
            Err(error) => {
                self.status = format!("Could not open '{}': {error}", db_path.display());
            }
        }
    }

    /// Fill the axis picker with the parameters that have neighbors around
    /// the base row. `exclude` drops the axis we just came from, so a
    /// re-based view offers a genuinely new direction.
    fn find_neighbors(&mut self, exclude: Option<&str>) {
        self.axis_options.clear();
        self.picked_axis = None;

        let Some(library) = &self.library else {
            self.status = "No database selected. Open or create one.".to_string();
            return;
        };
        let Ok(row_id) = self.row_id_input.parse::<i64>() else {
            self.status = "Enter a base image row id first.".to_string();
            return;
        };

        let row = match library.row(row_id) {
            Ok(row) => row,
            Err(error) => {
                self.status = error.to_string();
                return;
            }
        };
        let counts = match library.neighbor_counts(&row) {
            Ok(counts) => counts,
            Err(error) => {
                self.status = error.to_string();
                return;
            }
        };

        self.axis_options = counts
            .into_iter()
            .filter(|(name, count)| *count > 0 && Some(*name) != exclude)
            .map(|(name, count)| AxisChoice { name, count })
            .collect();

        if self.axis_options.is_empty() {
            self.status = format!("No axis parameter options for image id {row_id}.");
        } else {
            self.status = format!(
                "Base image id {row_id}: pick an axis parameter ({} options).",
                self.axis_options.len()
            );
        }
    }

    /// Rebuild the parameter side column for the frame under the slider.
    fn refresh_param_info(&mut self) {
        self.param_info.clear();
        let (Some(library), Some(stack)) = (&self.library, &self.stack) else {
            return;
        };
        let row = match library.row(stack.current().row_id) {
            Ok(row) => row,
            Err(error) => {
                eprintln!("⚠️  Could not read row {}: {error}", stack.current().row_id);
                return;
            }
        };
        let counts = match library.neighbor_counts(&row) {
            Ok(counts) => counts,
            Err(error) => {
                eprintln!("⚠️  Could not count neighbors: {error}");
                return;
            }
        };
        self.param_info = counts
            .into_iter()
            .map(|(name, count)| ParamInfo {
                name,
                value: if name == "iter" {
                    row.params.iter.to_string()
                } else {
                    row.params.sweep_value(name).unwrap_or(0.0).to_string()
                },
                neighbor_count: count,
            })
            .collect();
    }

    /// A dropped PNG is looked up by its stored path and becomes the base
    /// image input. Failures show an example path from the database, since
    /// the stored form depends on how the export folder was scanned.
    fn handle_dropped_file(&mut self, path: PathBuf) {
        if path.extension().map(|ext| ext.to_ascii_lowercase()) != Some("png".into()) {
            self.status = "Not a .png image file.".to_string();
            return;
        }
        let Some(library) = &self.library else {
            self.status = "No database selected. Open or create one.".to_string();
            return;
        };
        match library.row_id_for_dropped_path(&path) {
            Ok(Some(id)) => {
                self.row_id_input = id.to_string();
                self.status = format!("Image found in database, row id {id}.");
            }
            Ok(None) => {
                let example = library
                    .first_path()
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "none found".to_string());
                self.status = format!(
                    "'{}' not found in the database (it may have been removed as a duplicate). \
                     Example of a stored path: '{example}'",
                    path.display()
                );
            }
            Err(error) => self.status = error.to_string(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let database_row = row![
            button("New database…").on_press(Message::NewDatabase),
            button("Open database…").on_press(Message::OpenDatabase),
            text(match &self.config.db_path {
                Some(path) => format!("Database: {}", path.display()),
                None => "No database selected".to_string(),
            })
            .size(14),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let base_row = row![
            text_input("Image row id", &self.row_id_input)
                .on_input(Message::RowIdInput)
                .width(Length::Fixed(140.0)),
            button("Random").on_press(Message::RandomRow),
            button("Find neighbors").on_press(Message::FindNeighbors),
            pick_list(
                self.axis_options.as_slice(),
                self.picked_axis.clone(),
                Message::AxisPicked,
            )
            .placeholder("Pick axis parameter"),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let mut content = column![
            text("ToothSeeker").size(32),
            database_row,
            base_row,
        ]
        .spacing(14)
        .padding(20);

        if let Some(stack) = &self.stack {
            content = content.push(stack_view::view(stack, &self.param_info));
        } else {
            content = content.push(
                text(
                    "Create a new view: enter a row id (or drop a screenshot from the \
                     database onto this window), then pick an axis parameter.",
                )
                .size(14),
            );
        }
        content = content.push(text(&self.status).size(14));

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window-level events: dropped files and arrow-key scrubbing.
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, status, _window| {
            if status == event::Status::Captured {
                return None;
            }
            match event {
                Event::Window(window::Event::FileDropped(path)) => {
                    Some(Message::FileDropped(path))
                }
                Event::Keyboard(keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(keyboard::key::Named::ArrowRight),
                    ..
                }) => Some(Message::StepStack(1)),
                Event::Keyboard(keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(keyboard::key::Named::ArrowLeft),
                    ..
                }) => Some(Message::StepStack(-1)),
                _ => None,
            }
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    println!("\nStarting up ToothSeeker...\n");
    iced::application(ToothSeeker::title, ToothSeeker::update, ToothSeeker::view)
        .subscription(ToothSeeker::subscription)
        .theme(ToothSeeker::theme)
        .centered()
        .run_with(ToothSeeker::new)
}

/// Build a database on a background thread.
/// rusqlite::Connection is not Send, so the build opens its own connection.
async fn build_database_async(
    source_dir: PathBuf,
    db_path: PathBuf,
    table: String,
) -> Result<BuildReport, String> {
    tokio::task::spawn_blocking(move || {
        build_database(&source_dir, &db_path, &table).map_err(|error| error.to_string())
    })
    .await
    .map_err(|error| format!("Task join error: {error}"))?
}

/// Query the stack and decode its screenshots on a background thread.
async fn load_stack_async(
    db_path: PathBuf,
    table: String,
    row_id: i64,
    axis: String,
) -> Result<StackView, String> {
    tokio::task::spawn_blocking(move || {
        let library = Library::open(&db_path, &table).map_err(|error| error.to_string())?;
        let base = library.row(row_id).map_err(|error| error.to_string())?;
        let neighbors = library
            .neighbors(&base, &axis)
            .map_err(|error| error.to_string())?;
        if neighbors.is_empty() {
            return Err("No neighboring tooth images found for the given parameter".to_string());
        }
        let stack =
            ImageStack::assemble(&base, &neighbors, &axis).map_err(|error| error.to_string())?;
        StackView::load(&stack)
    })
    .await
    .map_err(|error| format!("Task join error: {error}"))?
}
