//! Interactive numbered menu over a line-oriented terminal.
//!
//! Operation failures are reported inline and the loop continues; only
//! terminal I/O errors and the final save end it with an error. Changes
//! stay in memory until "Save Books" or "Exit".

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::library::error::{LibraryError, LibraryResult};
use crate::library::manager::Library;
use crate::library::model::{BookPatch, NewBook};

const MENU: &str = "\
Library Management System
*************************
1. Add a Book
2. Edit Book
3. View Books
4. Delete Book
5. Save Books
6. Export to CSV
7. Read Book
8. Exit";

/// State for one interactive session.
pub struct Menu<'a, R, W> {
    library: &'a mut Library,
    input: R,
    out: W,
    csv_file: PathBuf,
}

/// What the loop should do after an action.
enum Flow {
    Continue,
    Quit,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(library: &'a mut Library, input: R, out: W, csv_file: PathBuf) -> Self {
        Self {
            library,
            input,
            out,
            csv_file,
        }
    }

    /// Run until the user exits or input ends.
    ///
    /// End of input leaves without saving.
    pub fn run(mut self) -> LibraryResult<()> {
        loop {
            self.say(MENU)?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };
            let flow = match choice.trim() {
                "1" => self.add()?,
                "2" => self.edit()?,
                "3" => self.view()?,
                "4" => self.remove()?,
                "5" => self.save()?,
                "6" => self.export()?,
                "7" => self.read()?,
                "8" => {
                    self.library.save()?;
                    self.say("Books saved successfully!")?;
                    self.say("Exiting...")?;
                    return Ok(());
                }
                _ => {
                    self.say("Invalid choice. Please choose a valid option.\n")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn add(&mut self) -> LibraryResult<Flow> {
        let Some(title) = self.prompt("Enter book title: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(author) = self.prompt("Enter the author of the book: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(year) = self.prompt("Enter the publication date: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(url) = self.prompt("Enter the URL of the book: ")? else {
            return Ok(Flow::Quit);
        };

        let result = self
            .library
            .add_book(NewBook {
                title,
                author,
                year,
                url,
            })
            .map(|b| (b.title.clone(), b.file_path.clone()));
        match result {
            Ok((title, path)) => {
                self.say(&format!("Book downloaded and saved as '{path}'"))?;
                self.say(&format!(
                    "You have successfully added '{title}' to your Library"
                ))?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn edit(&mut self) -> LibraryResult<Flow> {
        let Some(title) = self.prompt("Book title to edit: ")? else {
            return Ok(Flow::Quit);
        };
        let Ok(current) = self.library.find_book(&title).cloned() else {
            self.say("Book title not found.")?;
            return Ok(Flow::Continue);
        };

        let mut patch = BookPatch::default();
        for (label, value, slot) in [
            ("title", &current.title, &mut patch.title),
            ("author", &current.author, &mut patch.author),
            ("publication date", &current.year, &mut patch.year),
            ("file path", &current.file_path, &mut patch.file_path),
        ] {
            let Some(answer) = self.prompt(&format!("Enter new {label} (current: '{value}'): "))?
            else {
                return Ok(Flow::Quit);
            };
            *slot = Some(answer);
        }

        match self.library.edit_book(&title, &patch) {
            Ok(_) => self.say("Book details updated successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn view(&mut self) -> LibraryResult<Flow> {
        let listing: Vec<String> = self
            .library
            .view_books()
            .iter()
            .enumerate()
            .map(|(i, book)| format!("{}. {book} \n", i + 1))
            .collect();
        if listing.is_empty() {
            self.say("No books recorded.\n")?;
        }
        for entry in listing {
            self.say(&entry)?;
        }
        Ok(Flow::Continue)
    }

    fn remove(&mut self) -> LibraryResult<Flow> {
        let Some(title) = self.prompt("Book title to delete: ")? else {
            return Ok(Flow::Quit);
        };
        match self.library.remove_book(&title) {
            Ok(_) => self.say(&format!("Book '{title}' deleted successfully!"))?,
            Err(LibraryError::BookNotFound { .. }) => {
                self.say(&format!("Book with title '{title}' not found."))?
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn save(&mut self) -> LibraryResult<Flow> {
        match self.library.save() {
            Ok(()) => self.say("Books saved successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn export(&mut self) -> LibraryResult<Flow> {
        match self.library.export_csv(&self.csv_file) {
            Ok(_) => self.say("Books exported to CSV file successfully!")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn read(&mut self) -> LibraryResult<Flow> {
        let Some(title) = self.prompt("Enter book title: ")? else {
            return Ok(Flow::Quit);
        };
        match self.library.read_book(&title) {
            Ok(outcome) => {
                if let Some(pages) = outcome.extracted.page_count {
                    self.say(&format!("Reading {title}: {pages} pages available.\n"))?;
                }
                self.say(&outcome.extracted.text)?;
            }
            Err(LibraryError::BookNotFound { .. }) => {
                self.say(&format!("Book titled '{title}' not found in the store."))?
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    /// Print `label` and read one line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> LibraryResult<Option<String>> {
        write!(self.out, "{label}").map_err(io_err)?;
        self.out.flush().map_err(io_err)?;

        let mut line = String::new();
        let n = self.input.read_line(&mut line).map_err(io_err)?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, text: &str) -> LibraryResult<()> {
        writeln!(self.out, "{text}").map_err(io_err)
    }

    fn report(&mut self, err: &LibraryError) -> LibraryResult<()> {
        tracing::debug!(error = ?err, "menu action failed");
        self.say(&format!("Error: {err}"))
    }
}

fn io_err(source: std::io::Error) -> LibraryError {
    LibraryError::Io { source }
}
