//! biblio CLI: personal library catalog.

use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use bibliotheca::config::LibraryConfig;
use bibliotheca::library::{BookPatch, Library, NewBook};
use bibliotheca::menu::Menu;

#[derive(Parser)]
#[command(name = "biblio", version, about = "Personal library catalog manager")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/bibliotheca/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON book store to use.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Directory downloaded books are saved to.
    #[arg(long, global = true)]
    books_dir: Option<PathBuf>,

    /// Directory extracted text files are written to.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Disable the OCR fallback for scanned PDF pages.
    #[arg(long, global = true)]
    no_ocr: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with the effective settings.
    Init {
        /// Replace an existing config file.
        #[arg(long)]
        force: bool,
    },

    #[command(flatten)]
    Book(BookCommand),
}

#[derive(Subcommand)]
enum BookCommand {
    /// Download a book from a URL and add it to the store.
    Add {
        /// Book title.
        #[arg(long)]
        title: String,
        /// Author.
        #[arg(long, default_value = "")]
        author: String,
        /// Publication date or year.
        #[arg(long, default_value = "")]
        year: String,
        /// URL of the book file (.pdf or .docx to be readable later).
        #[arg(long)]
        url: String,
    },

    /// Change the details of a book. Omitted fields keep their value.
    Edit {
        /// Current title of the book.
        title: String,
        #[arg(long = "title")]
        new_title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        file_path: Option<String>,
    },

    /// List all recorded books.
    List,

    /// Show one book.
    Show {
        /// Exact book title.
        title: String,
    },

    /// Delete a book from the store (the downloaded file is kept).
    Remove {
        /// Exact book title.
        title: String,
    },

    /// Export the store as CSV.
    Export {
        /// Destination file (defaults to the configured csv_file).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Extract the text of a book, print it, and save it as {title}.txt.
    Read {
        /// Exact book title.
        title: String,
        /// Only write the text file, do not print the text.
        #[arg(long)]
        quiet: bool,
    },

    /// Interactive menu (the default when no command is given).
    Menu,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Book(BookCommand::Menu));
    let init = matches!(command, Commands::Init { .. });

    // `init --config` may name a file that does not exist yet.
    let mut config = match cli.config.as_deref() {
        Some(path) if init && !path.exists() => LibraryConfig::default(),
        explicit => LibraryConfig::resolve(explicit)?,
    };
    if let Some(store) = cli.store {
        config.store_file = store;
    }
    if let Some(dir) = cli.books_dir {
        config.books_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if cli.no_ocr {
        config.ocr.enabled = false;
    }

    match command {
        Commands::Init { force } => {
            let path = match cli.config {
                Some(path) => path,
                None => LibraryConfig::default_path()?,
            };
            config.init(&path, force)?;
            println!("Config written to {}", path.display());
            Ok(())
        }
        Commands::Book(command) => run(command, &config),
    }
}

fn run(command: BookCommand, config: &LibraryConfig) -> Result<()> {
    let mut library = Library::open(config)?;

    match command {
        BookCommand::Add {
            title,
            author,
            year,
            url,
        } => {
            let book = library.add_book(NewBook {
                title,
                author,
                year,
                url,
            })?;
            println!("Book downloaded and saved as '{}'", book.file_path);
            println!("Added \"{}\"", book.title);
            library.save()?;
        }

        BookCommand::Edit {
            title,
            new_title,
            author,
            year,
            file_path,
        } => {
            let patch = BookPatch {
                title: new_title,
                author,
                year,
                file_path,
            };
            if patch.is_empty() {
                miette::bail!("nothing to change: pass at least one of --title, --author, --year, --file-path");
            }
            let book = library.edit_book(&title, &patch)?;
            println!("Updated:\n{book}");
            library.save()?;
        }

        BookCommand::List => {
            let books = library.view_books();
            if books.is_empty() {
                println!("No books recorded.");
            } else {
                for (i, book) in books.iter().enumerate() {
                    println!("{}. {book}\n", i + 1);
                }
            }
        }

        BookCommand::Show { title } => {
            println!("{}", library.find_book(&title)?);
        }

        BookCommand::Remove { title } => {
            let removed = library.remove_book(&title)?;
            println!("Book '{}' deleted successfully!", removed.title);
            library.save()?;
        }

        BookCommand::Export { output } => {
            let path = output.unwrap_or_else(|| config.csv_file.clone());
            let rows = library.export_csv(&path)?;
            println!("Exported {rows} books to {}", path.display());
        }

        BookCommand::Read { title, quiet } => {
            let outcome = library.read_book(&title)?;
            if let Some(pages) = outcome.extracted.page_count {
                eprintln!("Reading {}: {pages} pages available.", outcome.book.title);
            }
            if !outcome.extracted.ocr_pages.is_empty() {
                eprintln!("OCR used on pages {:?}", outcome.extracted.ocr_pages);
            }
            if !quiet {
                let mut out = BufWriter::new(std::io::stdout().lock());
                out.write_all(outcome.extracted.text.as_bytes())
                    .into_diagnostic()?;
                out.flush().into_diagnostic()?;
            }
            eprintln!("Text saved to {}", outcome.text_file.display());
        }

        BookCommand::Menu => {
            let stdin = std::io::stdin().lock();
            let stdout = std::io::stdout().lock();
            Menu::new(&mut library, stdin, stdout, config.csv_file.clone()).run()?;
        }
    }

    Ok(())
}
