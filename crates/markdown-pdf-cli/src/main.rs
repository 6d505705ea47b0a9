use std::process;

fn main() {
    match markdown_pdf_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-pdf error: {err:#}");
            process::exit(1);
        }
    }
}
