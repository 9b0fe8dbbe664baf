use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use quillpdf::geometry::INCH;
use quillpdf::{Document, Filter, Image, Path, Rectangle, StandardFont, Text};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "quillpdf",
    about = "Writes PDF 1.7 files from drawings and raster images",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the hello-world document: a letter page with a line and text
    Hello {
        /// Output file path
        #[arg(short, long, default_value = "hello.pdf")]
        output: PathBuf,

        /// Compression for page content
        #[arg(short, long, value_enum, default_value_t = FilterArg::Flate)]
        filter: FilterArg,
    },

    /// Place each image on its own 12x12 inch page, one file per image
    Image {
        /// Input image files (PNG, JPEG or BMP)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory the PDF files are written to
        #[arg(short = 'd', long, default_value = ".")]
        output_dir: PathBuf,

        /// Compression for page content and image pixels
        #[arg(short, long, value_enum, default_value_t = FilterArg::Flate)]
        filter: FilterArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterArg {
    None,
    Lzw,
    Flate,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::None => Filter::None,
            FilterArg::Lzw => Filter::Lzw,
            FilterArg::Flate => Filter::Flate,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Hello { output, filter } => {
            let mut doc = hello_document(filter.into())?;
            doc.save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!("✓ PDF written to {}", output.display());
        }

        Commands::Image {
            inputs,
            output_dir,
            filter,
        } => {
            for input in &inputs {
                let file_name = input
                    .file_name()
                    .with_context(|| format!("Not a file: {}", input.display()))?;
                let mut output = output_dir.join(file_name).into_os_string();
                output.push(".pdf");
                let output = PathBuf::from(output);

                let image = Image::open(input)
                    .with_context(|| format!("Failed to read image {}", input.display()))?;
                let mut doc = image_document(&image, filter.into())?;
                doc.save(&output)
                    .with_context(|| format!("Failed to write {}", output.display()))?;

                tracing::info!(input = %input.display(), output = %output.display(), "image converted");
                println!("✓ {} -> {}", input.display(), output.display());
            }
        }
    }

    Ok(())
}

fn hello_document(filter: Filter) -> Result<Document> {
    let mut doc = Document::new();
    doc.set_content_filter(filter);
    doc.set_creator("quillpdf CLI");

    let mut canvas = doc.new_page(612.0, 792.0);
    canvas.translate(100.0, 100.0)?;
    canvas.stroke(&Path::new().move_to(0.0, 0.0).line_to(100.0, 0.0))?;

    let mut text = Text::new();
    text.set_font(StandardFont::Helvetica, 14.0)
        .show("Hello, World!");
    canvas.draw_text(&text)?;
    canvas.close()?;

    Ok(doc)
}

fn image_document(image: &Image, filter: Filter) -> Result<Document> {
    let mut doc = Document::new();
    doc.set_content_filter(filter);

    let page_size = 12.0 * INCH;
    let mut canvas = doc.new_page(page_size, page_size);
    canvas.draw_image(image, Rectangle::from_size(page_size, page_size).inset(INCH))?;
    canvas.close()?;

    Ok(doc)
}
