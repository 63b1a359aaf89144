//! Interactive document question-answering CLI.
//!
//! Reads a comma-separated list of files/directories to ingest, then
//! answers questions against them in a loop until `quit`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dqa_model::OpenAIChatModel;
use dqa_qa::{LlmExtractor, QaEngine};
use dqa_rag::{AppConfig, DocumentLoader, IngestPipeline, LanceStore, OpenAIEmbedder};

/// The single collection every run ingests into and answers from.
const COLLECTION: &str = "documents";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            eprintln!("Error: {e}");
            return Ok(());
        }
    };
    info!("starting dqa");

    let stdin = io::stdin();
    let Some(line) =
        prompt_line(&stdin, "Enter the path to a directory or file(s), separated by commas: ")?
    else {
        return Ok(());
    };
    let paths: Vec<String> =
        line.split(',').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect();

    let loader = DocumentLoader::new(&config);
    let chunks = match loader.load_documents(&paths) {
        Ok(chunks) => chunks,
        Err(e) => {
            eprintln!("Error loading documents: {e}");
            return Ok(());
        }
    };
    if chunks.is_empty() {
        println!(
            "No documents found in the provided paths. Please provide a valid directory or file(s)."
        );
        return Ok(());
    }

    let embedder =
        Arc::new(OpenAIEmbedder::new(&config.api_key)?.with_model(&config.embeddings_model));
    let store = Arc::new(LanceStore::connect(&config.vector_store_path).await?);

    let pipeline =
        IngestPipeline::builder().embedder(embedder.clone()).vector_store(store.clone()).build()?;

    // Each run rebuilds the collection so it reflects exactly the paths
    // that were just loaded.
    pipeline.delete_collection(COLLECTION).await?;
    pipeline.create_collection(COLLECTION).await?;
    let stored = match pipeline.ingest_chunks(COLLECTION, chunks).await {
        Ok(stored) => stored,
        Err(e) => {
            eprintln!("Error creating vector store: {e}");
            return Ok(());
        }
    };
    println!("Indexed {stored} chunks into {}.", config.vector_store_path.display());

    let llm = Arc::new(OpenAIChatModel::new(&config.api_key, &config.qa_model)?);
    let engine = QaEngine::builder()
        .embedder(embedder)
        .vector_store(store)
        .llm(llm.clone())
        .filter(Arc::new(LlmExtractor::new(llm)))
        .collection(COLLECTION)
        .top_k(config.top_k)
        .build()?;

    loop {
        let Some(line) = prompt_line(&stdin, "Enter your question (or 'quit' to exit): ")? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("quit") {
            break;
        }

        match engine.answer_question(question).await {
            Ok(answer) => {
                println!("Answer: {}", answer.text);
                println!("Sources: {:?}", answer.sources);
            }
            Err(e) => {
                error!(error = %e, "failed to answer question");
                println!("Answer: An error occurred while processing the question: {e}");
                println!("Sources: []");
            }
        }
    }

    Ok(())
}

/// Print `prompt`, then read one line from stdin. `None` on EOF.
fn prompt_line(stdin: &io::Stdin, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if stdin.lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
