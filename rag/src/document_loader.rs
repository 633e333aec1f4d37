//! Loads documents from a directory through a per-extension parser
//! registry. PDFs are split into one document per page so retrieval can
//! point back at a page label; everything else goes through the plain
//! text parser.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::{RagError, Result};
use crate::models::{Document, Metadata, FILE_NAME_KEY, PAGE_LABEL_KEY};

/// File path to documents. One registered implementation per extension.
pub trait DocumentParser: Send + Sync {
    fn parse(&self, path: &Path) -> anyhow::Result<Vec<Document>>;
}

/// Extracts PDF text page by page. Empty pages are dropped.
pub struct PdfParser;

impl DocumentParser for PdfParser {
    fn parse(&self, path: &Path) -> anyhow::Result<Vec<Document>> {
        let file_name = file_name_of(path);
        let pages = pdf_extract::extract_text_by_pages(path)?;

        let mut documents = Vec::new();
        for (number, text) in pages.iter().enumerate() {
            if text.trim().is_empty() {
                continue;
            }
            let mut metadata = Metadata::new();
            metadata.insert(FILE_NAME_KEY.to_string(), file_name.clone());
            metadata.insert(PAGE_LABEL_KEY.to_string(), (number + 1).to_string());
            documents.push(Document::new(text.clone(), metadata));
        }
        Ok(documents)
    }
}

/// Reads the whole file as UTF-8 text. No page labels.
pub struct TextParser;

impl DocumentParser for TextParser {
    fn parse(&self, path: &Path) -> anyhow::Result<Vec<Document>> {
        let text = fs::read_to_string(path)?;
        let mut metadata = Metadata::new();
        metadata.insert(FILE_NAME_KEY.to_string(), file_name_of(path));
        Ok(vec![Document::new(text, metadata)])
    }
}

pub struct DirectoryLoader {
    parsers: HashMap<String, Box<dyn DocumentParser>>,
    fallback: Box<dyn DocumentParser>,
}

impl DirectoryLoader {
    pub fn new() -> Self {
        let mut parsers: HashMap<String, Box<dyn DocumentParser>> = HashMap::new();
        parsers.insert("pdf".to_string(), Box::new(PdfParser));
        Self {
            parsers,
            fallback: Box::new(TextParser),
        }
    }

    /// Registers a parser for a file extension (without the dot),
    /// replacing any previous entry for that extension.
    pub fn register(&mut self, extension: &str, parser: Box<dyn DocumentParser>) {
        self.parsers.insert(extension.to_lowercase(), parser);
    }

    /// Loads every plain file in `dir`, in filesystem enumeration order.
    ///
    /// If the directory does not exist it is created and the load fails
    /// with a setup error telling the user to fill it and run again.
    /// Files a parser cannot handle are skipped with a warning.
    pub fn load(&self, dir: &Path) -> Result<Vec<Document>> {
        if !dir.is_dir() {
            fs::create_dir_all(dir)?;
            return Err(RagError::Setup(format!(
                "created documents directory '{}'; place your PDF or text files inside it and run again",
                dir.display()
            )));
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();
            let parser = self.parsers.get(&extension).unwrap_or(&self.fallback);

            match parser.parse(&path) {
                Ok(parsed) => {
                    info!("Loaded {} document(s) from {}", parsed.len(), path.display());
                    documents.extend(parsed);
                }
                Err(err) => warn!("Skipping {}: {}", path.display(), err),
            }
        }

        info!("Loaded {} documents total", documents.len());
        Ok(documents)
    }
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
