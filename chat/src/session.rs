//! Interactive console session. Reads questions line by line, dispatches
//! each to the query engine, and prints the answer with its grounding
//! sources. One failed query is reported and the loop continues; only the
//! exit keyword (or end of input) terminates the session.

use std::io::{BufRead, Write};

use anyhow::Result;
use rag_pipeline::gemini_service::CompletionModel;
use rag_pipeline::query_engine::QueryEngine;

const EXIT_KEYWORD: &str = "exit";

pub struct ChatSession<'a, L: CompletionModel> {
    engine: &'a QueryEngine<L>,
}

impl<'a, L: CompletionModel> ChatSession<'a, L> {
    pub fn new(engine: &'a QueryEngine<L>) -> Self {
        Self { engine }
    }

    pub async fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        writeln!(output)?;
        writeln!(output, "Start chatting with your documents")?;
        writeln!(output, "Type your question or 'exit' to quit.")?;
        writeln!(output, "{}", "-".repeat(50))?;

        loop {
            write!(output, "\nYou: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // End of input counts as leaving the chat.
                break;
            }
            let question = line.trim();

            if question.eq_ignore_ascii_case(EXIT_KEYWORD) {
                writeln!(output, "Thank you for chatting with your documents. Goodbye!")?;
                break;
            }
            if question.is_empty() {
                continue;
            }

            match self.engine.answer(question).await {
                Ok(response) => {
                    writeln!(output, "\nAI Assistant: {}", response.answer)?;
                    if response.source_nodes.is_empty() {
                        writeln!(output, "\nNo source nodes were retrieved for this query.")?;
                    } else {
                        writeln!(output, "\n[Sources used for grounding]:")?;
                        for source in &response.source_nodes {
                            writeln!(
                                output,
                                " - File: {}, Page: {}",
                                source.file_name(),
                                source.page_label()
                            )?;
                        }
                    }
                }
                Err(err) => {
                    writeln!(output, "\nAn error occurred during query: {err}")?;
                    writeln!(output, "Please check your API key for the Gemini LLM.")?;
                }
            }
        }

        Ok(())
    }
}
