//! Terminal rendering for query results

use colored::*;
use crossterm::terminal::size;

use rq_core::{AnswerResponse, CollectionInfo, RetrievalResponse, RetrievedPassage};

const MAX_PREVIEW_CHARS: usize = 400;

fn rule() -> String {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    "─".repeat(std::cmp::min(67, terminal_width.saturating_sub(4)))
}

fn page_label(page_number: Option<i64>) -> String {
    match page_number {
        Some(page) => format!("p. {}", page),
        None => "p. ?".to_string(),
    }
}

fn preview(text: &str) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= MAX_PREVIEW_CHARS {
        return flattened;
    }
    let cut: String = flattened.chars().take(MAX_PREVIEW_CHARS).collect();
    format!("{}…", cut)
}

fn display_passages(passages: &[RetrievedPassage]) {
    if passages.is_empty() {
        println!("{}", "No matching passages.".yellow());
        return;
    }

    for (i, passage) in passages.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("{}.", i + 1).blue().bold(),
            format!("[{}]", page_label(passage.page_number)).cyan(),
            format!("score {:.3}", passage.score).dimmed()
        );
        println!("   {}", preview(&passage.text));
        println!();
    }
}

pub fn display_retrieval(response: &RetrievalResponse) {
    println!();
    println!("{} {}", "🔍".blue(), response.question.bold());
    println!("{}", format!("collection: {}", response.collection).dimmed());
    println!("{}", rule().blue());
    display_passages(&response.results);
}

pub fn display_answer(response: &AnswerResponse) {
    println!();
    println!("{} {}", "💬".blue(), response.question.bold());
    println!("{}", rule().blue());
    println!("{}", response.answer);
    println!("{}", rule().blue());
    println!(
        "{}",
        format!(
            "Sources ({} from collection '{}'):",
            response.sources.len(),
            response.collection
        )
        .dimmed()
    );
    println!();
    display_passages(&response.sources);
}

pub fn display_collection_info(info: &CollectionInfo) {
    println!("{} {}", "📊 Collection".blue().bold(), info.name.bold());
    println!("   Points count: {}", info.points_count);
    println!("   Status:       {}", info.status);
}
