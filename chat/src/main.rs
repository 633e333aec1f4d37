mod config;
mod session;

use std::io;
use std::process;

use log::info;
use rag_pipeline::document_loader::DirectoryLoader;
use rag_pipeline::gemini_service::GeminiService;
use rag_pipeline::index::VectorIndex;
use rag_pipeline::query_engine::{QueryEngine, ResponseMode};
use rag_pipeline::splitter::SentenceSplitter;
use rag_pipeline::RagError;

use config::AppConfig;
use session::ChatSession;

#[tokio::main]
async fn main() {
    dotenv::from_filename("secrets.env").ok();
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Please create a secrets.env file and set GEMINI_API_KEY.");
            process::exit(1);
        }
    };
    info!(
        "Configuration loaded: documents_dir={}, model={}, top_k={}",
        config.documents_dir.display(),
        config.chat_model,
        config.top_k
    );

    let engine = match build_pipeline(&config) {
        Ok(engine) => engine,
        Err(RagError::Setup(message)) => {
            println!("{message}");
            return;
        }
        Err(err) => {
            eprintln!("Failed to build the RAG pipeline: {err}");
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let session = ChatSession::new(&engine);
    if let Err(err) = session.run(stdin.lock(), stdout.lock()).await {
        eprintln!("Session ended unexpectedly: {err}");
        process::exit(1);
    }
}

fn build_pipeline(config: &AppConfig) -> Result<QueryEngine<GeminiService>, RagError> {
    println!("1. Loading documents from '{}'", config.documents_dir.display());
    let documents = DirectoryLoader::new().load(&config.documents_dir)?;
    println!("Loaded {} document(s).", documents.len());

    println!("2. Chunking, embedding and indexing");
    let index = VectorIndex::from_documents(&documents, &SentenceSplitter::default())?;
    println!("Indexed {} chunk(s).", index.len());

    println!("3. Creating the query engine");
    let llm = GeminiService::new(config.gemini_api_key.clone(), config.chat_model.clone());
    let engine = QueryEngine::new(index, llm, ResponseMode::Compact)?.with_top_k(config.top_k);
    Ok(engine)
}
